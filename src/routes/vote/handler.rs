use axum::extract::{Extension, Json, Path, State};

use super::model::{RetractResponse, VoteRequest, VoteResponse};
use crate::{
    AppState,
    error::AppError,
    models::{Vote, VoteType},
    utils::{ApiResponse, Claims, success_to_api_response},
};

fn user_id(claims: &Option<Extension<Claims>>) -> Option<&str> {
    claims.as_ref().map(|Extension(claims)| claims.sub.as_str())
}

/// 当前用户对该帖子的投票，未投票时 resp_data 为 null
#[axum::debug_handler]
pub async fn get_vote(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(confession_id): Path<String>,
) -> Result<Json<ApiResponse<Option<Vote>>>, AppError> {
    let user_id = user_id(&claims).ok_or(AppError::Unauthorized)?;
    let vote = state.store.get_user_vote(user_id, &confession_id).await;
    Ok(success_to_api_response(vote))
}

#[axum::debug_handler]
pub async fn cast_vote(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(confession_id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<ApiResponse<VoteResponse>>, AppError> {
    let vote_type: VoteType = req.vote_type.parse()?;
    let vote = state
        .store
        .cast_vote(user_id(&claims), &confession_id, vote_type)
        .await?;

    let confession = state
        .store
        .get_confession(&confession_id)
        .await
        .ok_or(AppError::NotFound("confession"))?;

    Ok(success_to_api_response(VoteResponse {
        vote,
        upvotes: confession.upvotes,
        downvotes: confession.downvotes,
    }))
}

#[axum::debug_handler]
pub async fn retract_vote(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(confession_id): Path<String>,
) -> Result<Json<ApiResponse<RetractResponse>>, AppError> {
    let retracted = state
        .store
        .retract_vote(user_id(&claims), &confession_id)
        .await?;
    Ok(success_to_api_response(RetractResponse { retracted }))
}
