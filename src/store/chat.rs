use chrono::Utc;

use super::{Store, Tables, new_id};
use crate::error::AppError;
use crate::models::{ChatMessage, ChatRole, ChatSession};

impl Store {
    pub async fn get_session(&self, session_id: &str) -> Option<ChatSession> {
        self.tables.read().await.chat_sessions.get(session_id).cloned()
    }

    /// 取回调用方自己的会话，找不到时新建。
    ///
    /// 指定的 `session_id` 只有归属一致（同一用户或都为匿名）才会被复用；
    /// 已登录用户没有指定会话时复用其最近的会话。
    pub async fn get_or_create_session(
        &self,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> ChatSession {
        let mut tables = self.tables.write().await;

        if let Some(session) = session_id
            .and_then(|id| tables.chat_sessions.get(id))
            .filter(|session| session.user_id.as_deref() == user_id)
        {
            return session.clone();
        }

        if let Some(session) = user_id
            .and_then(|user_id| tables.user_sessions.get(user_id))
            .and_then(|id| tables.chat_sessions.get(id))
        {
            return session.clone();
        }

        create_session(&mut tables, user_id)
    }

    /// 追加一条消息，会话不存在时返回 NotFound 且不产生任何修改
    pub async fn append_message(
        &self,
        session_id: &str,
        role: ChatRole,
        content: String,
    ) -> Result<ChatSession, AppError> {
        let mut tables = self.tables.write().await;
        let session = tables
            .chat_sessions
            .get_mut(session_id)
            .ok_or(AppError::NotFound("chat session"))?;

        let now = Utc::now();
        session.messages.push(ChatMessage {
            role,
            content,
            timestamp: now.timestamp_millis(),
        });
        session.updated_at = now;

        Ok(session.clone())
    }
}

fn create_session(tables: &mut Tables, user_id: Option<&str>) -> ChatSession {
    let now = Utc::now();
    let session = ChatSession {
        id: new_id(),
        user_id: user_id.map(str::to_string),
        messages: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    tables
        .chat_sessions
        .insert(session.id.clone(), session.clone());
    if let Some(user_id) = user_id {
        tables
            .user_sessions
            .insert(user_id.to_string(), session.id.clone());
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_to_unknown_session_is_not_found_without_side_effect() {
        let store = Store::new();
        let result = store
            .append_message("missing", ChatRole::User, "hello".into())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.get_session("missing").await.is_none());
    }

    #[tokio::test]
    async fn messages_append_in_order() {
        let store = Store::new();
        let session = store.get_or_create_session(None, None).await;
        store
            .append_message(&session.id, ChatRole::User, "hi".into())
            .await
            .unwrap();
        let session = store
            .append_message(&session.id, ChatRole::Assistant, "hello".into())
            .await
            .unwrap();

        let roles: Vec<_> = session.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
        assert!(session.messages[0].timestamp <= session.messages[1].timestamp);
        assert!(session.updated_at >= session.created_at);
    }

    #[tokio::test]
    async fn user_gets_their_latest_session_back() {
        let store = Store::new();
        let first = store.get_or_create_session(Some("u1"), None).await;
        let again = store.get_or_create_session(Some("u1"), None).await;
        assert_eq!(first.id, again.id);

        let other = store.get_or_create_session(Some("u2"), None).await;
        assert_ne!(first.id, other.id);
    }

    #[tokio::test]
    async fn foreign_session_id_is_not_reused() {
        let store = Store::new();
        let owned = store.get_or_create_session(Some("u1"), None).await;

        let intruder = store.get_or_create_session(Some("u2"), Some(&owned.id)).await;
        assert_ne!(intruder.id, owned.id);
        assert_eq!(intruder.user_id.as_deref(), Some("u2"));

        let anonymous = store.get_or_create_session(None, Some(&owned.id)).await;
        assert_ne!(anonymous.id, owned.id);
        assert!(anonymous.user_id.is_none());
    }

    #[tokio::test]
    async fn anonymous_sessions_resume_by_id_only() {
        let store = Store::new();
        let session = store.get_or_create_session(None, None).await;
        let resumed = store.get_or_create_session(None, Some(&session.id)).await;
        assert_eq!(resumed.id, session.id);

        let fresh = store.get_or_create_session(None, None).await;
        assert_ne!(fresh.id, session.id);
    }
}
