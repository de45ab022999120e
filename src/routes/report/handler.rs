use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};

use super::model::CreateReportRequest;
use crate::{
    AppState,
    error::AppError,
    models::Report,
    utils::{ApiResponse, Claims, success_to_api_response},
};

#[axum::debug_handler]
pub async fn create_report(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(confession_id): Path<String>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Report>>), AppError> {
    let user_id = claims.as_ref().map(|Extension(claims)| claims.sub.as_str());
    let new_report = req.into_new_report(confession_id)?;
    let report = state.store.create_report(user_id, new_report).await?;
    Ok((StatusCode::CREATED, success_to_api_response(report)))
}
