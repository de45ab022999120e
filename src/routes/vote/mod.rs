mod handler;
mod model;

pub use handler::{cast_vote, get_vote, retract_vote};
pub use model::{RetractResponse, VoteRequest, VoteResponse};
