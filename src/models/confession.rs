use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModerationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confession {
    pub id: String,
    pub content: String,
    pub college: String,
    pub anonymous_name: String,
    pub tags: Vec<String>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comment_count: i64,
    pub views: i64,
    pub is_approved: bool,
    pub is_flagged: bool,
    pub ai_analysis: Option<ModerationResult>,
    pub trending_score: i64,
    pub created_at: DateTime<Utc>,
    /// 插入序号，时间相同时用于稳定排序
    #[serde(skip)]
    pub(crate) seq: u64,
}

impl Confession {
    /// 只有审核通过且未被标记的帖子出现在公开列表中
    pub fn is_visible(&self) -> bool {
        self.is_approved && !self.is_flagged
    }
}

#[derive(Debug, Clone)]
pub struct NewConfession {
    pub content: String,
    pub college: String,
    pub anonymous_name: String,
    pub tags: Vec<String>,
}

/// 部分更新，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct ConfessionPatch {
    pub content: Option<String>,
    pub college: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_approved: Option<bool>,
    pub is_flagged: Option<bool>,
    pub ai_analysis: Option<ModerationResult>,
}
