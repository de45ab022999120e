use std::sync::Arc;

use config::Config;
use infrastructure::AiService;
use redis::Client as RedisClient;
use store::Store;

pub mod cache;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod store;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Config,
    /// 未配置 REDIS_URL 时为 None
    pub redis: Option<Arc<RedisClient>>,
    pub ai: Arc<dyn AiService>,
}
