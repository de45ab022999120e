mod handler;
mod model;

pub use handler::{google_auth, me};
pub use model::college_from_email;
