use chrono::{DateTime, Utc};

use super::Store;
use crate::models::Confession;

/// 热度分：`round(100 × engagement / (age_hours + 1)^1.5)`，
/// 其中 `engagement = upvotes + comment_count + 0.1 × views`。
pub fn trending_score(confession: &Confession, now: DateTime<Utc>) -> i64 {
    let age_hours = ((now - confession.created_at).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
    let engagement =
        confession.upvotes as f64 + confession.comment_count as f64 + confession.views as f64 * 0.1;

    (100.0 * engagement / (age_hours + 1.0).powf(1.5)).round() as i64
}

impl Store {
    pub async fn recompute_trending_scores(&self) {
        self.recompute_trending_scores_at(Utc::now()).await
    }

    pub async fn recompute_trending_scores_at(&self, now: DateTime<Utc>) {
        let mut tables = self.tables.write().await;
        for confession in tables.confessions.values_mut() {
            confession.trending_score = trending_score(confession, now);
        }
    }

    /// 按热度分倒序，分数相同按创建顺序
    pub async fn get_trending(&self, limit: usize) -> Vec<Confession> {
        let tables = self.tables.read().await;
        let mut confessions: Vec<Confession> = tables
            .confessions
            .values()
            .filter(|c| c.is_visible())
            .cloned()
            .collect();
        confessions.sort_by(|a, b| {
            b.trending_score
                .cmp(&a.trending_score)
                .then(a.seq.cmp(&b.seq))
        });
        confessions.truncate(limit);
        confessions
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::{ConfessionPatch, NewComment, VoteType};
    use crate::store::confession::tests::new_confession;

    fn confession_at(created_at: DateTime<Utc>, upvotes: i64, comments: i64, views: i64) -> Confession {
        Confession {
            id: "c".into(),
            content: "x".into(),
            college: "DU".into(),
            anonymous_name: "Shy Deer".into(),
            tags: vec![],
            upvotes,
            downvotes: 0,
            comment_count: comments,
            views,
            is_approved: true,
            is_flagged: false,
            ai_analysis: None,
            trending_score: 0,
            created_at,
            seq: 0,
        }
    }

    #[test]
    fn one_hour_old_post_scores_778() {
        let now = Utc::now();
        let confession = confession_at(now - Duration::hours(1), 10, 2, 100);
        assert_eq!(trending_score(&confession, now), 778);
    }

    #[test]
    fn fresh_post_is_not_divided_by_zero() {
        let now = Utc::now();
        let confession = confession_at(now, 3, 0, 0);
        assert_eq!(trending_score(&confession, now), 300);
    }

    #[test]
    fn recent_modest_post_outranks_old_popular_post() {
        let now = Utc::now();
        let recent = confession_at(now - Duration::minutes(30), 5, 1, 20);
        let old = confession_at(now - Duration::hours(48), 100, 20, 500);
        assert!(trending_score(&recent, now) > trending_score(&old, now));
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let store = Store::new();
        let confession = store.create_confession(new_confession("DU", "hi")).await;
        store.cast_vote(Some("u1"), &confession.id, VoteType::Up).await.unwrap();
        store.increment_views(&confession.id).await;

        let now = Utc::now();
        store.recompute_trending_scores_at(now).await;
        let first = store.get_confession(&confession.id).await.unwrap().trending_score;
        store.recompute_trending_scores_at(now).await;
        let second = store.get_confession(&confession.id).await.unwrap().trending_score;
        assert_eq!(first, second);
        assert!(first > 0);
    }

    #[tokio::test]
    async fn trending_sorted_limited_and_ties_keep_creation_order() {
        let store = Store::new();
        let quiet_first = store.create_confession(new_confession("DU", "a")).await;
        let popular = store.create_confession(new_confession("DU", "b")).await;
        let quiet_second = store.create_confession(new_confession("DU", "c")).await;
        let hidden = store.create_confession(new_confession("DU", "d")).await;

        for user in ["u1", "u2", "u3"] {
            store.cast_vote(Some(user), &popular.id, VoteType::Up).await.unwrap();
            store.cast_vote(Some(user), &hidden.id, VoteType::Up).await.unwrap();
        }
        store
            .create_comment(NewComment {
                confession_id: hidden.id.clone(),
                content: "x".into(),
                anonymous_name: "Bold Fox".into(),
            })
            .await
            .unwrap();
        store
            .update_confession(
                &hidden.id,
                ConfessionPatch {
                    is_flagged: Some(true),
                    ..Default::default()
                },
            )
            .await;

        store.recompute_trending_scores_at(Utc::now()).await;

        let trending = store.get_trending(10).await;
        let ids: Vec<_> = trending.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![popular.id.clone(), quiet_first.id, quiet_second.id]);
        assert!(trending.windows(2).all(|w| w[0].trending_score >= w[1].trending_score));

        let top = store.get_trending(1).await;
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, popular.id);
        assert!(store.get_trending(0).await.is_empty());
    }
}
