use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{AppState, error::AppError, utils::verify_token};

/// 受保护路由：必须携带有效 token，解析出的 Claims 放入请求扩展
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;
    let claims = verify_token(bearer.token(), &state.config).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// 可选认证：没有 token 时按匿名处理，token 无效时拒绝
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        let claims = verify_token(bearer.token(), &state.config).map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            AppError::Unauthorized
        })?;
        request.extensions_mut().insert(claims);
    }

    Ok(next.run(request).await)
}
