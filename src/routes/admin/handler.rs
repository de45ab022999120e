use axum::extract::{Extension, Json, Path, Query, State};

use super::model::{DeleteResponse, ReportQuery, UpdateReportRequest, UpdateUserRequest};
use crate::{
    AppState,
    error::AppError,
    models::{Report, ReportStatus, User},
    utils::{ApiResponse, Claims, success_to_api_response},
};

/// 以存储中的用户为准校验管理员身份，撤销的权限立即生效
async fn require_admin(state: &AppState, claims: &Claims) -> Result<User, AppError> {
    let user = state
        .store
        .get_user(&claims.sub)
        .await
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin {
        tracing::warn!("Non-admin user {} tried an admin action", user.id);
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

#[axum::debug_handler]
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<Vec<Report>>>, AppError> {
    require_admin(&state, &claims).await?;
    let status = query.status()?;
    Ok(success_to_api_response(state.store.get_reports(status).await))
}

#[axum::debug_handler]
pub async fn update_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReportRequest>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let admin = require_admin(&state, &claims).await?;
    let status: ReportStatus = req.status.parse()?;

    let report = state
        .store
        .update_report_status(&id, status)
        .await
        .ok_or(AppError::NotFound("report"))?;
    tracing::info!("Admin {} marked report {} as {:?}", admin.id, id, status);
    Ok(success_to_api_response(report))
}

#[axum::debug_handler]
pub async fn delete_confession(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteResponse>>, AppError> {
    let admin = require_admin(&state, &claims).await?;
    if !state.store.delete_confession(&id).await {
        return Err(AppError::NotFound("confession"));
    }

    tracing::info!("Admin {} deleted confession {}", admin.id, id);
    Ok(success_to_api_response(DeleteResponse { deleted: true }))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let admin = require_admin(&state, &claims).await?;
    let user = state
        .store
        .update_user_flags(&id, req.is_premium, req.is_admin)
        .await
        .ok_or(AppError::NotFound("user"))?;

    tracing::info!(
        "Admin {} set flags on user {}: premium={} admin={}",
        admin.id,
        user.id,
        user.is_premium,
        user.is_admin
    );
    Ok(success_to_api_response(user))
}
