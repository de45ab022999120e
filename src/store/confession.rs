use chrono::Utc;

use super::{Store, new_id, paginate};
use crate::models::{Confession, ConfessionPatch, NewConfession};

impl Store {
    /// 公开列表：只含可见帖子，按创建时间倒序。`college` 为 "all" 时不过滤
    pub async fn get_confessions(
        &self,
        college: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Vec<Confession> {
        let tables = self.tables.read().await;
        let college = college.filter(|college| !college.is_empty() && *college != "all");

        let mut confessions: Vec<Confession> = tables
            .confessions
            .values()
            .filter(|c| c.is_visible())
            .filter(|c| college.is_none_or(|college| c.college == college))
            .cloned()
            .collect();
        confessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.seq.cmp(&a.seq)));

        paginate(confessions, limit, offset)
    }

    pub async fn get_confession(&self, id: &str) -> Option<Confession> {
        self.tables.read().await.confessions.get(id).cloned()
    }

    pub async fn create_confession(&self, new: NewConfession) -> Confession {
        let mut tables = self.tables.write().await;
        let confession = Confession {
            id: new_id(),
            content: new.content,
            college: new.college,
            anonymous_name: new.anonymous_name,
            tags: new.tags,
            upvotes: 0,
            downvotes: 0,
            comment_count: 0,
            views: 0,
            is_approved: !self.moderation_hold,
            is_flagged: false,
            ai_analysis: None,
            trending_score: 0,
            created_at: Utc::now(),
            seq: tables.next_seq(),
        };
        tables
            .confessions
            .insert(confession.id.clone(), confession.clone());
        confession
    }

    pub async fn update_confession(&self, id: &str, patch: ConfessionPatch) -> Option<Confession> {
        let mut tables = self.tables.write().await;
        let confession = tables.confessions.get_mut(id)?;

        if let Some(content) = patch.content {
            confession.content = content;
        }
        if let Some(college) = patch.college {
            confession.college = college;
        }
        if let Some(tags) = patch.tags {
            confession.tags = tags;
        }
        if let Some(is_approved) = patch.is_approved {
            confession.is_approved = is_approved;
        }
        if let Some(is_flagged) = patch.is_flagged {
            confession.is_flagged = is_flagged;
        }
        if let Some(analysis) = patch.ai_analysis {
            confession.ai_analysis = Some(analysis);
        }

        Some(confession.clone())
    }

    /// 硬删除，同时删除该帖的评论、投票和举报
    pub async fn delete_confession(&self, id: &str) -> bool {
        let mut tables = self.tables.write().await;
        if tables.confessions.remove(id).is_none() {
            return false;
        }

        tables.comments.retain(|_, comment| comment.confession_id != id);
        tables.votes.retain(|(_, confession_id), _| confession_id != id);
        tables.reports.retain(|_, report| report.confession_id != id);
        tracing::info!("Deleted confession {}", id);
        true
    }

    pub async fn increment_views(&self, id: &str) -> Option<Confession> {
        let mut tables = self.tables.write().await;
        let confession = tables.confessions.get_mut(id)?;
        confession.views += 1;
        Some(confession.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{ModerationResult, NewComment, NewReport, VoteType};

    pub(crate) fn new_confession(college: &str, content: &str) -> NewConfession {
        NewConfession {
            content: content.into(),
            college: college.into(),
            anonymous_name: "Quiet Owl".into(),
            tags: vec!["general".into()],
        }
    }

    #[tokio::test]
    async fn created_confession_starts_visible_with_zero_counters() {
        let store = Store::new();
        let confession = store.create_confession(new_confession("IIT Delhi", "hi")).await;
        assert!(confession.is_approved);
        assert!(!confession.is_flagged);
        assert!(confession.ai_analysis.is_none());
        assert_eq!(
            (confession.upvotes, confession.downvotes, confession.comment_count, confession.views),
            (0, 0, 0, 0)
        );
    }

    #[tokio::test]
    async fn moderation_hold_creates_hidden_confessions() {
        let store = Store::with_moderation_hold(true);
        let confession = store.create_confession(new_confession("IIT Delhi", "hi")).await;
        assert!(!confession.is_approved);
        assert!(store.get_confessions(None, 20, 0).await.is_empty());
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_filters_by_college() {
        let store = Store::new();
        let first = store.create_confession(new_confession("IIT Delhi", "one")).await;
        let second = store.create_confession(new_confession("BITS Pilani", "two")).await;
        let third = store.create_confession(new_confession("IIT Delhi", "three")).await;

        let all = store.get_confessions(None, 20, 0).await;
        let ids: Vec<_> = all.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);

        let same_as_all = store.get_confessions(Some("all"), 20, 0).await;
        assert_eq!(same_as_all.len(), 3);

        let iitd = store.get_confessions(Some("IIT Delhi"), 20, 0).await;
        assert_eq!(iitd.len(), 2);
        assert!(iitd.iter().all(|c| c.college == "IIT Delhi"));

        let page = store.get_confessions(None, 1, 1).await;
        assert_eq!(page[0].id, second.id);
        assert!(store.get_confessions(None, 20, 10).await.is_empty());
    }

    #[tokio::test]
    async fn listing_contains_exactly_the_visible_confessions() {
        let store = Store::new();
        let visible = store.create_confession(new_confession("DU", "ok")).await;
        let flagged = store.create_confession(new_confession("DU", "bad")).await;
        let unapproved = store.create_confession(new_confession("DU", "pending")).await;

        store
            .update_confession(
                &flagged.id,
                ConfessionPatch {
                    is_flagged: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .update_confession(
                &unapproved.id,
                ConfessionPatch {
                    is_approved: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let listed = store.get_confessions(None, 20, 0).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, visible.id);
        for id in [&visible.id, &flagged.id, &unapproved.id] {
            let confession = store.get_confession(id).await.unwrap();
            assert_eq!(
                confession.is_visible(),
                listed.iter().any(|c| c.id == confession.id)
            );
        }
    }

    #[tokio::test]
    async fn update_missing_confession_returns_none() {
        let store = Store::new();
        let patch = ConfessionPatch {
            ai_analysis: Some(ModerationResult::fail_open()),
            ..Default::default()
        };
        assert!(store.update_confession("missing", patch).await.is_none());
        assert!(store.increment_views("missing").await.is_none());
    }

    #[tokio::test]
    async fn increment_views_counts_each_read() {
        let store = Store::new();
        let confession = store.create_confession(new_confession("DU", "hi")).await;
        store.increment_views(&confession.id).await;
        let confession = store.increment_views(&confession.id).await.unwrap();
        assert_eq!(confession.views, 2);
    }

    #[tokio::test]
    async fn delete_cascades_to_dependents() {
        let store = Store::new();
        let confession = store.create_confession(new_confession("DU", "hi")).await;
        store
            .create_comment(NewComment {
                confession_id: confession.id.clone(),
                content: "c".into(),
                anonymous_name: "Bold Fox".into(),
            })
            .await
            .unwrap();
        store
            .cast_vote(Some("u1"), &confession.id, VoteType::Up)
            .await
            .unwrap();
        store
            .create_report(
                Some("u1"),
                NewReport {
                    confession_id: confession.id.clone(),
                    reason: "spam".into(),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert!(store.delete_confession(&confession.id).await);
        assert!(!store.delete_confession(&confession.id).await);
        assert!(store.get_confession(&confession.id).await.is_none());
        assert!(store.get_comments_by_confession(&confession.id).await.is_empty());
        assert!(store.get_user_vote("u1", &confession.id).await.is_none());
        assert!(store.get_reports(None).await.is_empty());
    }
}
