use serde::Deserialize;

use crate::{
    AppState,
    cache::ModerationCacheOperations,
    error::AppError,
    models::{Confession, ModerationResult, NewConfession},
    utils::generate_anonymous_name,
};

pub const MAX_CONFESSION_LEN: usize = 1000;
pub const MAX_COLLEGE_LEN: usize = 100;
pub const MAX_TAGS: usize = 5;
pub const MAX_TAG_LEN: usize = 30;
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_TRENDING_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub college: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CreateConfessionRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateConfessionRequest {
    pub fn validate(self) -> Result<NewConfession, AppError> {
        let content = self.content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::validation("content is required"));
        }
        if content.chars().count() > MAX_CONFESSION_LEN {
            return Err(AppError::validation(format!(
                "content must be at most {} characters",
                MAX_CONFESSION_LEN
            )));
        }

        let college = self.college.trim().to_string();
        if college.is_empty() || college.chars().count() > MAX_COLLEGE_LEN {
            return Err(AppError::validation("college is required"));
        }

        Ok(NewConfession {
            content,
            college,
            anonymous_name: generate_anonymous_name(),
            tags: normalize_tags(self.tags)?,
        })
    }
}

/// 去掉空标签和重复标签，保持原有顺序
fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || normalized.contains(&tag) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(AppError::validation(format!(
                "tags must be at most {} characters",
                MAX_TAG_LEN
            )));
        }
        normalized.push(tag);
    }

    if normalized.len() > MAX_TAGS {
        return Err(AppError::validation(format!(
            "at most {} tags are allowed",
            MAX_TAGS
        )));
    }
    Ok(normalized)
}

/// 审核内容：先查 Redis 缓存，未命中时调用 AI 服务并回写
pub async fn moderate_content(state: &AppState, content: &str) -> ModerationResult {
    if let Some(redis) = &state.redis {
        match ModerationCacheOperations::get_verdict(redis, content).await {
            Ok(Some(cached)) => {
                tracing::debug!("Moderation cache hit");
                return cached.verdict;
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("Moderation cache unavailable: {}", e),
        }
    }

    let verdict = state.ai.moderate(content).await;

    // 放行兜底结果不写缓存，服务恢复后同样的内容会被重新审核
    if verdict != ModerationResult::fail_open() {
        if let Some(redis) = &state.redis {
            if let Err(e) = ModerationCacheOperations::set_verdict(
                redis,
                content,
                &verdict,
                state.config.moderation_cache_ttl_secs,
            )
            .await
            {
                tracing::debug!("Failed to cache moderation verdict: {}", e);
            }
        }
    }

    verdict
}

impl Confession {
    /// 创建帖子并写入审核结论
    pub async fn create_moderated(
        state: &AppState,
        req: CreateConfessionRequest,
    ) -> Result<Self, AppError> {
        let new = req.validate()?;
        let content = new.content.clone();
        let confession = state.store.create_confession(new).await;
        tracing::info!(
            "Confession {} created for {}",
            confession.id,
            confession.college
        );

        let verdict = moderate_content(state, &content).await;
        // 审核期间帖子可能已被管理员删除
        Ok(state
            .store
            .apply_moderation(&confession.id, verdict)
            .await
            .unwrap_or(confession))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str, tags: &[&str]) -> CreateConfessionRequest {
        CreateConfessionRequest {
            content: content.into(),
            college: "IIT Delhi".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn content_is_trimmed_and_required() {
        let new = request("  hello  ", &[]).validate().unwrap();
        assert_eq!(new.content, "hello");
        assert!(!new.anonymous_name.is_empty());
        assert!(matches!(
            request("   ", &[]).validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn content_length_is_limited() {
        let at_limit = "a".repeat(MAX_CONFESSION_LEN);
        assert!(request(&at_limit, &[]).validate().is_ok());
        let over = "a".repeat(MAX_CONFESSION_LEN + 1);
        assert!(request(&over, &[]).validate().is_err());
    }

    #[test]
    fn tags_are_deduplicated_and_capped() {
        let new = request("x", &["Crush", "crush", " ", "academics"])
            .validate()
            .unwrap();
        assert_eq!(new.tags, vec!["crush".to_string(), "academics".to_string()]);

        let too_many = request("x", &["a", "b", "c", "d", "e", "f"]);
        assert!(too_many.validate().is_err());
    }
}
