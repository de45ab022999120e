// 缓存模块
// Redis 可选：审核结论缓存和请求限流计数

pub mod keys;
pub mod models;
pub mod operations;

pub use models::moderation::CachedVerdict;
pub use operations::{ModerationCacheOperations, RateLimitCacheOperations};
