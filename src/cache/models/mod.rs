/// 缓存数据模型
pub mod moderation;

pub use moderation::CachedVerdict;
