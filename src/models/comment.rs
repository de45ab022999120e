use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub confession_id: String,
    pub content: String,
    pub anonymous_name: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) seq: u64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub confession_id: String,
    pub content: String,
    pub anonymous_name: String,
}
