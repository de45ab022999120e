mod handler;
mod model;

pub use handler::{create_comment, list_comments, upvote_comment};
pub use model::CreateCommentRequest;
