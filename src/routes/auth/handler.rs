use axum::extract::{Extension, Json, State};

use super::model::{AuthResponse, GoogleAuthRequest};
use crate::{
    AppState,
    error::AppError,
    models::User,
    utils::{ApiResponse, Claims, generate_token, success_to_api_response},
};

#[axum::debug_handler]
pub async fn google_auth(
    State(state): State<AppState>,
    Json(req): Json<GoogleAuthRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let profile = req
        .profile
        .ok_or_else(|| AppError::validation("invalid Google profile"))?;
    let new_user = profile.into_new_user()?;

    let (user, created) = state.store.find_or_create_user(new_user).await;
    if created {
        tracing::info!("First login for user {}", user.id);
    }

    let (token, expires_at) = generate_token(&user.id, user.is_admin, &state.config)
        .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))?;

    Ok(success_to_api_response(AuthResponse {
        user,
        token,
        expires_at,
    }))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    // token 有效但用户已不存在时视为会话失效
    state
        .store
        .get_user(&claims.sub)
        .await
        .map(success_to_api_response)
        .ok_or(AppError::Unauthorized)
}
