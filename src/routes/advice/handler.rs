use axum::extract::{Json, State};

use super::model::AdviceRequest;
use crate::{
    AppState,
    error::AppError,
    infrastructure::AdviceResponse,
    utils::{ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn advice(
    State(state): State<AppState>,
    Json(req): Json<AdviceRequest>,
) -> Result<Json<ApiResponse<AdviceResponse>>, AppError> {
    let req = req.validate()?;
    let advice = state
        .ai
        .generate_advice(&req.problem, req.category.as_deref(), req.urgency)
        .await;
    Ok(success_to_api_response(advice))
}
