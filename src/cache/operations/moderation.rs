use std::sync::Arc;

use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::moderation_verdict_key;
use crate::cache::models::CachedVerdict;
use crate::models::ModerationResult;

/// 审核结论缓存操作
pub struct ModerationCacheOperations;

impl ModerationCacheOperations {
    /// 获取缓存的审核结论
    pub async fn get_verdict(
        redis: &Arc<RedisClient>,
        content: &str,
    ) -> Result<Option<CachedVerdict>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(moderation_verdict_key(content)).await?;
        match result {
            Some(json) => {
                let cached = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(cached))
            }
            None => Ok(None),
        }
    }

    /// 缓存审核结论
    pub async fn set_verdict(
        redis: &Arc<RedisClient>,
        content: &str,
        verdict: &ModerationResult,
        ttl: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let cached = CachedVerdict {
            verdict: verdict.clone(),
            cached_at: chrono::Utc::now().timestamp(),
        };
        let json = serde_json::to_string(&cached).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::IoError,
                "serialization error",
                e.to_string(),
            ))
        })?;

        let _: () = conn
            .set_ex(moderation_verdict_key(content), json, ttl)
            .await?;

        Ok(())
    }
}
