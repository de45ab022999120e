use axum::extract::{Json, State};

use crate::{
    AppState,
    store::PlatformStats,
    utils::{ApiResponse, success_to_api_response},
};

pub async fn ping() -> &'static str {
    "pong"
}

#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<PlatformStats>> {
    success_to_api_response(state.store.stats().await)
}
