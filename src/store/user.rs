use chrono::Utc;

use super::{Store, Tables, new_id};
use crate::models::{NewUser, User};

fn find_by_email<'a>(tables: &'a Tables, email: &str) -> Option<&'a User> {
    tables
        .users
        .values()
        .find(|user| !user.email.is_empty() && user.email.eq_ignore_ascii_case(email))
}

impl Store {
    /// 创建管理员账号。账号没有邮箱，登录接口无法解析到这些账号，
    /// 只能用以账号 id 为 sub 签发的 token 访问
    pub fn with_admins(mut self, ids: &[String]) -> Self {
        let tables = self.tables.get_mut();
        for id in ids {
            let user = User {
                id: id.clone(),
                email: String::new(),
                name: "Administrator".into(),
                college: "Other".into(),
                avatar_url: None,
                is_premium: false,
                is_admin: true,
                created_at: Utc::now(),
            };
            tables.users.insert(user.id.clone(), user);
        }
        self
    }

    pub async fn get_user(&self, id: &str) -> Option<User> {
        self.tables.read().await.users.get(id).cloned()
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        find_by_email(&*self.tables.read().await, email).cloned()
    }

    /// 按邮箱查找用户，不存在时创建。返回值的第二项表示是否新建
    pub async fn find_or_create_user(&self, new: NewUser) -> (User, bool) {
        let mut tables = self.tables.write().await;
        if let Some(user) = find_by_email(&tables, &new.email) {
            return (user.clone(), false);
        }

        let user = User {
            id: new_id(),
            email: new.email,
            name: new.name,
            college: new.college,
            avatar_url: new.avatar_url,
            is_premium: false,
            is_admin: false,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id.clone(), user.clone());
        tracing::info!("Created user {} for college {}", user.id, user.college);
        (user, true)
    }

    pub async fn update_user_flags(
        &self,
        id: &str,
        is_premium: Option<bool>,
        is_admin: Option<bool>,
    ) -> Option<User> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(id)?;
        if let Some(is_premium) = is_premium {
            user.is_premium = is_premium;
        }
        if let Some(is_admin) = is_admin {
            user.is_admin = is_admin;
        }
        Some(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            name: "Test".into(),
            college: "IIT Delhi".into(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn email_is_unique() {
        let store = Store::new();
        let (first, created) = store.find_or_create_user(new_user("a@iitd.ac.in")).await;
        assert!(created);
        let (second, created) = store.find_or_create_user(new_user("A@iitd.ac.in")).await;
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.stats().await.active_users, 1);
    }

    #[tokio::test]
    async fn flags_update_and_missing_user() {
        let store = Store::new();
        let (user, _) = store.find_or_create_user(new_user("b@du.ac.in")).await;
        assert!(!user.is_premium);

        let updated = store.update_user_flags(&user.id, Some(true), None).await.unwrap();
        assert!(updated.is_premium);
        assert!(!updated.is_admin);

        assert!(store.update_user_flags("missing", Some(true), Some(true)).await.is_none());
        assert!(store.get_user_by_email("b@du.ac.in").await.unwrap().is_premium);
    }

    #[tokio::test]
    async fn seeded_admins_cannot_be_reached_by_email() {
        let store = Store::new().with_admins(&["admin-1".to_string()]);
        let admin = store.get_user("admin-1").await.unwrap();
        assert!(admin.is_admin);
        assert!(store.get_user_by_email("").await.is_none());

        let (user, created) = store.find_or_create_user(new_user("dean@iitd.ac.in")).await;
        assert!(created);
        assert!(!user.is_admin);
        assert_ne!(user.id, admin.id);
    }
}
