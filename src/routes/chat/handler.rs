use std::convert::Infallible;

use axum::{
    extract::{Extension, Json, Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt, stream};
use serde_json::json;

use super::model::{ChatReply, ChatRequest, StreamQuery, validate_message};
use crate::{
    AppState,
    error::AppError,
    models::{ChatRole, ChatSession},
    utils::{ApiResponse, Claims, success_to_api_response},
};

/// 一轮对话：记录用户消息，按完整历史生成回复并记录
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let message = validate_message(&req.message)?;
    let user_id = claims.as_ref().map(|Extension(claims)| claims.sub.as_str());

    let session = state
        .store
        .get_or_create_session(user_id, req.session_id.as_deref())
        .await;
    let session = state
        .store
        .append_message(&session.id, ChatRole::User, message)
        .await?;

    // 调用 AI 期间不持有存储锁
    let reply = state.ai.generate_chat_reply(&session.messages).await;
    state
        .store
        .append_message(&session.id, ChatRole::Assistant, reply.message.clone())
        .await?;

    Ok(success_to_api_response(ChatReply {
        message: reply.message,
        suggestions: reply.suggestions,
        session_id: session.id,
    }))
}

/// 以 SSE 推送回复片段，最后发送 `[DONE]`
pub async fn stream_chat(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let history = query.history()?;

    let events = state
        .ai
        .stream_chat_reply(history)
        .map(|chunk| Ok(Event::default().data(json!({ "content": chunk }).to_string())))
        .chain(stream::once(async { Ok(Event::default().data("[DONE]")) }));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// 只有会话归属者能读取，其他人看到的是 NotFound
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let user_id = claims.as_ref().map(|Extension(claims)| claims.sub.as_str());

    state
        .store
        .get_session(&id)
        .await
        .filter(|session| session.user_id.as_deref() == user_id)
        .map(success_to_api_response)
        .ok_or(AppError::NotFound("chat session"))
}
