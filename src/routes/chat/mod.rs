mod handler;
mod model;

pub use handler::{chat, get_session, stream_chat};
pub use model::{ChatReply, ChatRequest, StreamQuery};
