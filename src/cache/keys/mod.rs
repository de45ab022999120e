/// 缓存键模块
use sha2::{Digest, Sha256};

/// 审核结论缓存键前缀
const MODERATION_VERDICT_PREFIX: &str = "moderation:verdict:";

/// 限流计数键前缀
const RATE_LIMIT_PREFIX: &str = "rate_limit:";

/// 以内容的 SHA-256 作为审核缓存键，相同内容复用同一结论
pub fn moderation_verdict_key(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("{}{:x}", MODERATION_VERDICT_PREFIX, digest)
}

pub fn rate_limit_key(ip: &str) -> String {
    format!("{}{}", RATE_LIMIT_PREFIX, ip)
}
