use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// 审核结论，原样保存在帖子的 ai_analysis 字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    pub is_appropriate: bool,
    /// 取值范围 [0, 1]
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub flags: Vec<String>,
    pub suggested_actions: Vec<String>,
}

impl ModerationResult {
    /// 审核服务不可用时放行内容
    pub fn fail_open() -> Self {
        Self {
            is_appropriate: true,
            confidence: 0.5,
            sentiment: Sentiment::Neutral,
            flags: Vec::new(),
            suggested_actions: Vec::new(),
        }
    }
}
