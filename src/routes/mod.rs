pub mod admin;
pub mod advice;
pub mod auth;
pub mod chat;
pub mod comment;
pub mod confession;
pub mod report;
pub mod system;
pub mod vote;
