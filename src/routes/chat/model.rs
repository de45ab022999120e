use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::{ChatMessage, ChatRole},
};

pub const MAX_CHAT_MESSAGE_LEN: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub suggestions: Vec<String>,
    pub session_id: String,
}

/// `messages` 为 JSON 编码的消息数组
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub messages: String,
}

pub fn validate_message(message: &str) -> Result<String, AppError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message is required"));
    }
    if message.chars().count() > MAX_CHAT_MESSAGE_LEN {
        return Err(AppError::validation(format!(
            "message must be at most {} characters",
            MAX_CHAT_MESSAGE_LEN
        )));
    }
    Ok(message.to_string())
}

impl StreamQuery {
    /// 解析历史消息，最后一条必须是用户消息
    pub fn history(&self) -> Result<Vec<ChatMessage>, AppError> {
        let history: Vec<ChatMessage> = serde_json::from_str(&self.messages)
            .map_err(|_| AppError::validation("messages must be a JSON array of chat messages"))?;

        match history.last() {
            Some(last) if last.role == ChatRole::User => {
                validate_message(&last.content)?;
                Ok(history)
            }
            _ => Err(AppError::validation("last message must come from the user")),
        }
    }
}
