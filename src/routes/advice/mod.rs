mod handler;
mod model;

pub use handler::advice;
pub use model::AdviceRequest;
