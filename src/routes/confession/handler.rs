use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};

use super::model::{
    CreateConfessionRequest, DEFAULT_PAGE_SIZE, DEFAULT_TRENDING_LIMIT, ListQuery, MAX_PAGE_SIZE,
    TrendingQuery,
};
use crate::{
    AppState,
    error::AppError,
    models::Confession,
    utils::{ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn list_confessions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ApiResponse<Vec<Confession>>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let confessions = state
        .store
        .get_confessions(query.college.as_deref(), limit, offset)
        .await;
    success_to_api_response(confessions)
}

/// 每次读取前重新计算热度分
#[axum::debug_handler]
pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Json<ApiResponse<Vec<Confession>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TRENDING_LIMIT)
        .min(MAX_PAGE_SIZE);

    state.store.recompute_trending_scores().await;
    success_to_api_response(state.store.get_trending(limit).await)
}

#[axum::debug_handler]
pub async fn create_confession(
    State(state): State<AppState>,
    Json(req): Json<CreateConfessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Confession>>), AppError> {
    let confession = Confession::create_moderated(&state, req).await?;
    Ok((StatusCode::CREATED, success_to_api_response(confession)))
}

/// 读取帖子并增加浏览数
#[axum::debug_handler]
pub async fn get_confession(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Confession>>, AppError> {
    state
        .store
        .increment_views(&id)
        .await
        .map(success_to_api_response)
        .ok_or(AppError::NotFound("confession"))
}
