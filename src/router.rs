use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    middleware::{RateLimiter, auth_middleware, log_errors, optional_auth_middleware, rate_limit},
    routes,
};

// 无需登录的路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(routes::system::ping))
        .route("/stats", get(routes::system::stats))
        .route("/auth/google", post(routes::auth::google_auth))
        .route(
            "/confessions",
            get(routes::confession::list_confessions).post(routes::confession::create_confession),
        )
        .route("/confessions/trending", get(routes::confession::trending))
        .route("/confessions/{id}", get(routes::confession::get_confession))
        .route(
            "/confessions/{id}/comments",
            get(routes::comment::list_comments).post(routes::comment::create_comment),
        )
        .route("/comments/{id}/upvote", post(routes::comment::upvote_comment))
        .route("/advice", post(routes::advice::advice))
        .route("/chat/stream", get(routes::chat::stream_chat))
}

// token 可选，由处理函数决定匿名请求能否继续
fn optional_auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/confessions/{id}/vote",
            get(routes::vote::get_vote)
                .post(routes::vote::cast_vote)
                .delete(routes::vote::retract_vote),
        )
        .route("/confessions/{id}/report", post(routes::report::create_report))
        .route("/chat", post(routes::chat::chat))
        .route("/chat/sessions/{id}", get(routes::chat::get_session))
        .route_layer(from_fn_with_state(state, optional_auth_middleware))
}

// 必须登录，管理接口在处理函数中再校验管理员身份
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/admin/reports", get(routes::admin::list_reports))
        .route("/admin/reports/{id}", put(routes::admin::update_report))
        .route("/admin/confessions/{id}", delete(routes::admin::delete_confession))
        .route("/admin/users/{id}", put(routes::admin::update_user))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(optional_auth_routes(state.clone()))
        .merge(protected_routes(state.clone()));

    // nest 不接受根路径
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    let mut router = router.layer(from_fn(log_errors));

    // 未配置 Redis 时不限流
    if let Some(redis) = &state.redis {
        let limiter = Arc::new(RateLimiter::new(redis.clone(), state.config.clone()));
        router = router.layer(from_fn_with_state(limiter, rate_limit));
    }

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
