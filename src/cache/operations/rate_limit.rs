use std::sync::Arc;

use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::rate_limit_key;

/// 速率限制缓存操作
pub struct RateLimitCacheOperations;

impl RateLimitCacheOperations {
    /// 记录一次请求并返回当前窗口内的请求数
    pub async fn hit(
        redis: &Arc<RedisClient>,
        ip: &str,
        window_secs: u64,
    ) -> Result<i64, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;
        let key = rate_limit_key(ip);

        // 使用 Redis 的 INCR 和 EXPIRE 命令实现计数器
        let count: i64 = conn.incr(&key, 1).await?;
        if count == 1 {
            // 窗口内第一次请求时设置过期时间
            let _: () = conn.expire(&key, window_secs as i64).await?;
        }

        Ok(count)
    }
}
