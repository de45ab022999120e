use chrono::Utc;

use super::{Store, new_id};
use crate::error::AppError;
use crate::models::{Comment, NewComment};

impl Store {
    /// 按时间正序返回，便于按阅读顺序展示
    pub async fn get_comments_by_confession(&self, confession_id: &str) -> Vec<Comment> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.confession_id == confession_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.seq.cmp(&b.seq)));
        comments
    }

    /// 写入评论并在同一临界区内增加帖子的评论数
    pub async fn create_comment(&self, new: NewComment) -> Result<Comment, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.confessions.contains_key(&new.confession_id) {
            return Err(AppError::NotFound("confession"));
        }

        let comment = Comment {
            id: new_id(),
            confession_id: new.confession_id,
            content: new.content,
            anonymous_name: new.anonymous_name,
            upvotes: 0,
            created_at: Utc::now(),
            seq: tables.next_seq(),
        };
        tables.comments.insert(comment.id.clone(), comment.clone());
        if let Some(confession) = tables.confessions.get_mut(&comment.confession_id) {
            confession.comment_count += 1;
        }

        Ok(comment)
    }

    pub async fn upvote_comment(&self, id: &str) -> Option<Comment> {
        let mut tables = self.tables.write().await;
        let comment = tables.comments.get_mut(id)?;
        comment.upvotes += 1;
        Some(comment.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::confession::tests::new_confession;

    fn new_comment(confession_id: &str, content: &str) -> NewComment {
        NewComment {
            confession_id: confession_id.into(),
            content: content.into(),
            anonymous_name: "Wise Koala".into(),
        }
    }

    #[tokio::test]
    async fn comments_are_listed_oldest_first() {
        let store = Store::new();
        let confession = store.create_confession(new_confession("DU", "hi")).await;
        let first = store.create_comment(new_comment(&confession.id, "1")).await.unwrap();
        let second = store.create_comment(new_comment(&confession.id, "2")).await.unwrap();

        let comments = store.get_comments_by_confession(&confession.id).await;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, first.id);
        assert_eq!(comments[1].id, second.id);
    }

    #[tokio::test]
    async fn comment_on_missing_confession_is_not_found() {
        let store = Store::new();
        let result = store.create_comment(new_comment("missing", "x")).await;
        assert!(matches!(result, Err(AppError::NotFound("confession"))));
    }

    #[tokio::test]
    async fn concurrent_comments_count_exactly() {
        let store = Arc::new(Store::new());
        let confession = store.create_confession(new_confession("DU", "hi")).await;

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let store = store.clone();
                let id = confession.id.clone();
                tokio::spawn(async move {
                    store
                        .create_comment(new_comment(&id, &format!("comment {}", i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let confession = store.get_confession(&confession.id).await.unwrap();
        assert_eq!(confession.comment_count, 2);
        assert_eq!(store.get_comments_by_confession(&confession.id).await.len(), 2);
    }

    #[tokio::test]
    async fn upvote_comment_increments() {
        let store = Store::new();
        let confession = store.create_confession(new_confession("DU", "hi")).await;
        let comment = store.create_comment(new_comment(&confession.id, "x")).await.unwrap();
        store.upvote_comment(&comment.id).await;
        assert_eq!(store.upvote_comment(&comment.id).await.unwrap().upvotes, 2);
        assert!(store.upvote_comment("missing").await.is_none());
    }
}
