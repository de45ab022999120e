//! 外部 AI 服务：内容审核、建议生成和聊天回复。
//!
//! 所有方法都不返回错误，调用失败时在内部记录日志并返回兜底结果。

use std::str::FromStr;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{ChatMessage, ModerationResult};

mod openai;
mod sse;

pub use openai::OpenAiService;

#[async_trait]
pub trait AiService: Send + Sync {
    /// 失败时放行（见 `ModerationResult::fail_open`）
    async fn moderate(&self, content: &str) -> ModerationResult;

    async fn generate_advice(
        &self,
        problem: &str,
        category: Option<&str>,
        urgency: Option<Urgency>,
    ) -> AdviceResponse;

    async fn generate_chat_reply(&self, history: &[ChatMessage]) -> ChatResponse;

    /// 逐段返回回复文本，流结束即回复结束
    fn stream_chat_reply(&self, history: Vec<ChatMessage>) -> BoxStream<'static, String>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unparseable response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("empty response")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

impl FromStr for Urgency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            other => Err(AppError::validation(format!("invalid urgency: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
    pub category: String,
    pub urgency: Urgency,
    pub resources: Vec<String>,
    pub follow_up_suggestions: Vec<String>,
}

impl AdviceResponse {
    pub fn fallback(category: Option<&str>, urgency: Option<Urgency>) -> Self {
        Self {
            advice: "I'm here to help, but I'm having technical difficulties right now. \
                     Please consider reaching out to your college counseling services or a \
                     trusted friend for support."
                .into(),
            category: category.unwrap_or("general").into(),
            urgency: urgency.unwrap_or_default(),
            resources: vec![
                "College Counseling Center".into(),
                "Student Support Services".into(),
            ],
            follow_up_suggestions: vec!["Would you like to talk more about this?".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl ChatResponse {
    pub fn fallback() -> Self {
        Self {
            message: "I'm having some technical difficulties, but I'm here to support you. \
                      Can you tell me more about what's going on?"
                .into(),
            suggestions: vec![
                "Tell me more about your situation".into(),
                "What kind of support would be helpful?".into(),
                "How are you feeling right now?".into(),
            ],
        }
    }
}

pub const STREAM_FALLBACK: &str = "I'm here to help, but I'm having some technical difficulties. \
                                   Please let me know how I can support you.";
