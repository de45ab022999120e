mod chat;
mod comment;
mod confession;
mod moderation;
mod report;
mod user;
mod vote;

pub use chat::{ChatMessage, ChatRole, ChatSession};
pub use comment::{Comment, NewComment};
pub use confession::{Confession, ConfessionPatch, NewConfession};
pub use moderation::{ModerationResult, Sentiment};
pub use report::{NewReport, Report, ReportStatus};
pub use user::{NewUser, User};
pub use vote::{Vote, VoteType};
