use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use super::model::CreateCommentRequest;
use crate::{
    AppState,
    error::AppError,
    models::Comment,
    utils::{ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(confession_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Comment>>>, AppError> {
    if state.store.get_confession(&confession_id).await.is_none() {
        return Err(AppError::NotFound("confession"));
    }

    let comments = state.store.get_comments_by_confession(&confession_id).await;
    Ok(success_to_api_response(comments))
}

#[axum::debug_handler]
pub async fn create_comment(
    State(state): State<AppState>,
    Path(confession_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>), AppError> {
    let new_comment = req.into_new_comment(confession_id)?;
    let comment = state.store.create_comment(new_comment).await?;
    Ok((StatusCode::CREATED, success_to_api_response(comment)))
}

#[axum::debug_handler]
pub async fn upvote_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Comment>>, AppError> {
    state
        .store
        .upvote_comment(&id)
        .await
        .map(success_to_api_response)
        .ok_or(AppError::NotFound("comment"))
}
