mod handler;
mod model;

pub use handler::{create_confession, get_confession, list_confessions, trending};
pub use model::{CreateConfessionRequest, moderate_content};
