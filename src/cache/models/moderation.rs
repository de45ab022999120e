use serde::{Deserialize, Serialize};

use crate::models::ModerationResult;

/// 审核结论缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedVerdict {
    pub verdict: ModerationResult,
    pub cached_at: i64, // Unix timestamp
}
