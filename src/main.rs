use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use confess_backend::{
    AppState, config::Config, infrastructure::OpenAiService, router::create_router, store::Store,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().map_err(|e| format!("JWT_SECRET must be set: {}", e))?;

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // Redis 可选，用于限流和审核结果缓存
    let redis = match &config.redis_url {
        Some(url) => Some(Arc::new(redis::Client::open(url.as_str())?)),
        None => {
            tracing::warn!("REDIS_URL not set, rate limiting and moderation cache disabled");
            None
        }
    };

    let ai = OpenAiService::new(&config)?;

    if config.admin_user_ids.is_empty() {
        tracing::warn!("ADMIN_USER_IDS not set, admin routes are unreachable");
    } else {
        tracing::info!("Seeding {} admin account(s)", config.admin_user_ids.len());
    }
    let store =
        Store::with_moderation_hold(config.moderation_hold).with_admins(&config.admin_user_ids);

    let state = AppState {
        store: Arc::new(store),
        config: config.clone(),
        redis,
        ai: Arc::new(ai),
    };

    let app = create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
