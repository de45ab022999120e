use async_trait::async_trait;
use futures_util::{
    StreamExt, future,
    stream::{self, BoxStream, Stream},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::sse::SseDecoder;
use super::{AdviceResponse, AiError, AiService, ChatResponse, STREAM_FALLBACK, Urgency};
use crate::config::Config;
use crate::models::{ChatMessage, ChatRole, ModerationResult, Sentiment};

const MODERATION_PROMPT: &str = r#"You are a content moderator for a college confession platform. Analyze the content for:
1. Appropriateness (harmful content, hate speech, explicit content)
2. Sentiment (positive, negative, neutral)
3. Policy violations
4. Suggested moderation actions

Respond with JSON in this format:
{
  "isAppropriate": boolean,
  "confidence": number (0-1),
  "sentiment": "positive" | "negative" | "neutral",
  "flags": ["array of issues if any"],
  "suggestedActions": ["array of suggested actions"]
}"#;

const ADVICE_PROMPT: &str = r#"You are an AI counselor for college students. Provide empathetic, evidence-based advice for student problems.
Focus on practical solutions, emotional support, and helpful resources.

Categories: mental_health, relationships, academics, career, family, social, general
Urgency levels: low, medium, high

For high urgency issues (self-harm, crisis), always include crisis resources.

Respond with JSON in this format:
{
  "advice": "detailed advice text",
  "category": "detected category",
  "urgency": "detected urgency level",
  "resources": ["array of helpful resources"],
  "followUpSuggestions": ["array of follow-up questions/suggestions"]
}"#;

const CHAT_PROMPT: &str = r#"You are a supportive AI counselor for college students. Provide empathetic, helpful responses to student concerns about mental health, relationships, academics, career, and general life issues.

Guidelines:
- Be warm, understanding, and non-judgmental
- Provide practical advice when appropriate
- Suggest professional resources for serious issues
- Ask follow-up questions to understand better
- Keep responses conversational and supportive
- For crisis situations, provide immediate resources

Respond with JSON in this format:
{
  "message": "your response message",
  "suggestions": ["array of follow-up conversation starters"]
}"#;

const STREAM_PROMPT: &str = "You are a supportive AI counselor for college students. Provide empathetic, \
                             helpful responses to student concerns. Be conversational and supportive.";

const DEFAULT_CHAT_MESSAGE: &str =
    "I'm here to listen and support you. Can you tell me more about what's on your mind?";
const DEFAULT_ADVICE: &str = "I understand you're going through a challenging time. Consider reaching \
                              out to your college counseling services or a trusted friend for support.";

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl WireMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system",
            content: content.to_string(),
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        Self {
            role,
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

// 模型返回的 JSON 字段均可能缺失，缺失时取默认值
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModeration {
    is_appropriate: Option<bool>,
    confidence: Option<f64>,
    sentiment: Option<String>,
    flags: Option<Vec<String>>,
    suggested_actions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdvice {
    advice: Option<String>,
    category: Option<String>,
    urgency: Option<String>,
    resources: Option<Vec<String>>,
    follow_up_suggestions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChat {
    message: Option<String>,
    suggestions: Option<Vec<String>>,
}

fn parse_sentiment(value: Option<&str>) -> Sentiment {
    match value.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("positive") => Sentiment::Positive,
        Some("negative") => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub(crate) fn moderation_from_content(content: &str) -> Result<ModerationResult, AiError> {
    let raw: RawModeration = serde_json::from_str(content)?;
    Ok(ModerationResult {
        is_appropriate: raw.is_appropriate.unwrap_or(true),
        confidence: raw.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        sentiment: parse_sentiment(raw.sentiment.as_deref()),
        flags: raw.flags.unwrap_or_default(),
        suggested_actions: raw.suggested_actions.unwrap_or_default(),
    })
}

pub(crate) fn advice_from_content(
    content: &str,
    category: Option<&str>,
    urgency: Option<Urgency>,
) -> Result<AdviceResponse, AiError> {
    let raw: RawAdvice = serde_json::from_str(content)?;
    Ok(AdviceResponse {
        advice: non_empty(raw.advice).unwrap_or_else(|| DEFAULT_ADVICE.into()),
        category: non_empty(raw.category)
            .or_else(|| category.map(str::to_string))
            .unwrap_or_else(|| "general".into()),
        urgency: raw
            .urgency
            .and_then(|u| u.parse().ok())
            .or(urgency)
            .unwrap_or_default(),
        resources: raw.resources.unwrap_or_default(),
        follow_up_suggestions: raw.follow_up_suggestions.unwrap_or_default(),
    })
}

pub(crate) fn chat_from_content(content: &str) -> Result<ChatResponse, AiError> {
    let raw: RawChat = serde_json::from_str(content)?;
    Ok(ChatResponse {
        message: non_empty(raw.message).unwrap_or_else(|| DEFAULT_CHAT_MESSAGE.into()),
        suggestions: raw.suggestions.unwrap_or_else(|| {
            vec![
                "Tell me more about how you're feeling".into(),
                "What would be most helpful right now?".into(),
                "Have you talked to anyone else about this?".into(),
            ]
        }),
    })
}

async fn check_status(response: Response) -> Result<Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn open_stream(
    request: RequestBuilder,
) -> Result<impl Stream<Item = String> + Send + 'static, AiError> {
    let response = check_status(request.send().await?).await?;

    Ok(response
        .bytes_stream()
        .scan(SseDecoder::default(), |decoder, chunk| {
            let next = if decoder.is_done() {
                None
            } else {
                match chunk {
                    Ok(bytes) => Some(decoder.push(&bytes)),
                    Err(e) => {
                        tracing::error!("Chat stream interrupted: {}", e);
                        None
                    }
                }
            };
            future::ready(next)
        })
        .flat_map(stream::iter))
}

/// 基于 OpenAI 兼容 chat completions 接口的实现
pub struct OpenAiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiService {
    pub fn new(config: &Config) -> Result<Self, AiError> {
        let client = Client::builder().timeout(config.ai_timeout()).build()?;
        if config.openai_api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY is not set, AI calls will fall back to defaults");
        }

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        })
    }

    fn request(&self, body: &CompletionRequest<'_>) -> RequestBuilder {
        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
    }

    async fn complete_json(
        &self,
        messages: Vec<WireMessage>,
        max_completion_tokens: u32,
    ) -> Result<String, AiError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
            max_completion_tokens,
            stream: false,
        };

        let response = check_status(self.request(&body).send().await?).await?;
        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| non_empty(choice.message.content))
            .ok_or(AiError::EmptyResponse)
    }
}

#[async_trait]
impl AiService for OpenAiService {
    async fn moderate(&self, content: &str) -> ModerationResult {
        let messages = vec![
            WireMessage::system(MODERATION_PROMPT),
            WireMessage::user(format!("Moderate this confession: \"{}\"", content)),
        ];

        match self
            .complete_json(messages, 1024)
            .await
            .and_then(|raw| moderation_from_content(&raw))
        {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!("Content moderation failed, failing open: {}", e);
                ModerationResult::fail_open()
            }
        }
    }

    async fn generate_advice(
        &self,
        problem: &str,
        category: Option<&str>,
        urgency: Option<Urgency>,
    ) -> AdviceResponse {
        let urgency_label = match urgency.unwrap_or_default() {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        };
        let messages = vec![
            WireMessage::system(ADVICE_PROMPT),
            WireMessage::user(format!(
                "Problem: {}\nCategory: {}\nUrgency: {}\n\nPlease provide thoughtful advice for this college student.",
                problem,
                category.unwrap_or("general"),
                urgency_label
            )),
        ];

        match self
            .complete_json(messages, 2048)
            .await
            .and_then(|raw| advice_from_content(&raw, category, urgency))
        {
            Ok(advice) => advice,
            Err(e) => {
                tracing::error!("Advice generation failed: {}", e);
                AdviceResponse::fallback(category, urgency)
            }
        }
    }

    async fn generate_chat_reply(&self, history: &[ChatMessage]) -> ChatResponse {
        let mut messages = vec![WireMessage::system(CHAT_PROMPT)];
        messages.extend(history.iter().map(WireMessage::from));

        match self
            .complete_json(messages, 1024)
            .await
            .and_then(|raw| chat_from_content(&raw))
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Chat response generation failed: {}", e);
                ChatResponse::fallback()
            }
        }
    }

    fn stream_chat_reply(&self, history: Vec<ChatMessage>) -> BoxStream<'static, String> {
        let mut messages = vec![WireMessage::system(STREAM_PROMPT)];
        messages.extend(history.iter().map(WireMessage::from));
        let request = self.request(&CompletionRequest {
            model: &self.model,
            messages,
            response_format: None,
            max_completion_tokens: 1024,
            stream: true,
        });

        stream::once(async move {
            match open_stream(request).await {
                Ok(deltas) => deltas.boxed(),
                Err(e) => {
                    tracing::error!("Streaming chat response failed: {}", e);
                    stream::once(future::ready(STREAM_FALLBACK.to_string())).boxed()
                }
            }
        })
        .flatten()
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> Config {
        Config {
            jwt_secret: "secret".into(),
            jwt_expiration_secs: 3600,
            server_host: "127.0.0.1".into(),
            server_port: 0,
            api_base_uri: "/api".into(),
            redis_url: None,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            openai_api_key: "key".into(),
            openai_base_url: base_url.into(),
            openai_model: "test-model".into(),
            ai_timeout_secs: 2,
            moderation_cache_ttl_secs: 60,
            moderation_hold: false,
            admin_user_ids: vec![],
        }
    }

    #[test]
    fn partial_moderation_is_filled_with_defaults() {
        let verdict = moderation_from_content(r#"{"isAppropriate": false, "confidence": 7}"#).unwrap();
        assert!(!verdict.is_appropriate);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert!(verdict.flags.is_empty());

        let verdict = moderation_from_content("{}").unwrap();
        assert_eq!(verdict, ModerationResult::fail_open());
    }

    #[test]
    fn moderation_reads_all_fields() {
        let verdict = moderation_from_content(
            r#"{"isAppropriate": true, "confidence": 0.8, "sentiment": "Positive",
                "flags": ["mild language"], "suggestedActions": ["none"]}"#,
        )
        .unwrap();
        assert!(verdict.is_appropriate);
        assert_eq!(verdict.sentiment, Sentiment::Positive);
        assert_eq!(verdict.flags, vec!["mild language".to_string()]);
        assert_eq!(verdict.suggested_actions, vec!["none".to_string()]);
    }

    #[test]
    fn unparseable_moderation_is_an_error() {
        assert!(matches!(
            moderation_from_content("the content looks fine"),
            Err(AiError::Parse(_))
        ));
    }

    #[test]
    fn advice_falls_back_to_requested_category_and_urgency() {
        let advice =
            advice_from_content(r#"{"urgency": "critical"}"#, Some("academics"), Some(Urgency::Medium))
                .unwrap();
        assert_eq!(advice.category, "academics");
        assert_eq!(advice.urgency, Urgency::Medium);
        assert_eq!(advice.advice, DEFAULT_ADVICE);

        let advice = advice_from_content(r#"{"urgency": "high", "category": "family"}"#, None, None)
            .unwrap();
        assert_eq!(advice.urgency, Urgency::High);
        assert_eq!(advice.category, "family");
    }

    #[test]
    fn chat_defaults_when_fields_missing() {
        let reply = chat_from_content(r#"{"message": ""}"#).unwrap();
        assert_eq!(reply.message, DEFAULT_CHAT_MESSAGE);
        assert_eq!(reply.suggestions.len(), 3);
    }

    // 端口 9 通常无人监听，请求会立即失败
    #[tokio::test]
    async fn unreachable_provider_fails_open() {
        let service = OpenAiService::new(&config("http://127.0.0.1:9")).unwrap();

        assert_eq!(service.moderate("hello").await, ModerationResult::fail_open());

        let advice = service
            .generate_advice("exams", Some("academics"), Some(Urgency::High))
            .await;
        assert_eq!(advice.category, "academics");
        assert_eq!(advice.urgency, Urgency::High);
        assert!(!advice.resources.is_empty());

        let reply = service.generate_chat_reply(&[]).await;
        assert_eq!(reply.message, ChatResponse::fallback().message);

        let chunks: Vec<String> = service.stream_chat_reply(vec![]).collect().await;
        assert_eq!(chunks, vec![STREAM_FALLBACK.to_string()]);
    }
}
