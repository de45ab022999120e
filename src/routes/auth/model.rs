use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{NewUser, User};

#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    pub profile: Option<GoogleProfile>,
}

/// 外部身份提供方返回的用户资料
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub expires_at: i64,
}

// 邮箱域名 -> 学校
const COLLEGE_DOMAINS: &[(&str, &str)] = &[
    ("srmist.edu.in", "SRM University"),
    ("srm.edu.in", "SRM University"),
    ("du.ac.in", "Delhi University"),
    ("iitd.ac.in", "IIT Delhi"),
    ("amity.edu", "Amity University"),
    ("vit.ac.in", "VIT University"),
    ("bits-pilani.ac.in", "BITS Pilani"),
    ("jadavpuruniversity.in", "Jadavpur University"),
];

/// 根据邮箱域名（含子域名）推断学校，未知域名归为 "Other"
pub fn college_from_email(email: &str) -> String {
    let domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim().to_lowercase())
        .unwrap_or_default();

    COLLEGE_DOMAINS
        .iter()
        .find(|(known, _)| domain == *known || domain.ends_with(&format!(".{}", known)))
        .map(|(_, college)| college.to_string())
        .unwrap_or_else(|| "Other".to_string())
}

impl GoogleProfile {
    /// 资料由客户端提交、未经验证，因此登录创建的用户永远不是管理员
    pub fn into_new_user(self) -> Result<NewUser, AppError> {
        let email = self
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| {
                email
                    .split_once('@')
                    .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
            })
            .ok_or_else(|| AppError::validation("invalid Google profile"))?;

        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Ok(NewUser {
            college: college_from_email(&email),
            avatar_url: self.picture,
            name,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_domains_map_to_colleges() {
        assert_eq!(college_from_email("a@iitd.ac.in"), "IIT Delhi");
        assert_eq!(college_from_email("a@cse.iitd.ac.in"), "IIT Delhi");
        assert_eq!(college_from_email("a@SRMIST.edu.in"), "SRM University");
        assert_eq!(college_from_email("a@gmail.com"), "Other");
        assert_eq!(college_from_email("not-an-email"), "Other");
    }
}
