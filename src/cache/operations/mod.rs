/// 缓存操作
pub mod moderation;
pub mod rate_limit;

pub use moderation::ModerationCacheOperations;
pub use rate_limit::RateLimitCacheOperations;
