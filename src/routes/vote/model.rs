use serde::{Deserialize, Serialize};

use crate::models::Vote;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "type", default)]
    pub vote_type: String,
}

/// 投票结果连同帖子最新计数一起返回
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub vote: Vote,
    pub upvotes: i64,
    pub downvotes: i64,
}

#[derive(Debug, Serialize)]
pub struct RetractResponse {
    pub retracted: bool,
}
