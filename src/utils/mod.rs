use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing;

use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // 用户ID
    pub exp: i64,       // 过期时间
    pub iat: i64,       // 签发时间
    pub is_admin: bool, // 签发时的管理员标识，管理接口仍以存储为准
}

pub fn generate_token(
    user_id: &str,
    is_admin: bool,
    config: &Config,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    tracing::debug!("Generating token for user: {}", user_id);
    let now = Utc::now();
    let expiration = (now + Duration::seconds(config.jwt_expiration().as_secs() as i64)).timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
        iat: now.timestamp(),
        is_admin,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok((token, expiration))
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

const ADJECTIVES: &[&str] = &[
    "Anonymous", "Mysterious", "Secret", "Hidden", "Quiet", "Shy", "Bold", "Brave", "Wise",
    "Curious", "Thoughtful", "Hopeful", "Dreamy", "Creative", "Artistic", "Musical", "Sporty",
    "Academic", "Social", "Friendly",
];

const ANIMALS: &[&str] = &[
    "Panda", "Tiger", "Eagle", "Bear", "Wolf", "Fox", "Owl", "Lion", "Butterfly", "Dolphin",
    "Phoenix", "Dragon", "Unicorn", "Rabbit", "Deer", "Falcon", "Shark", "Turtle", "Penguin",
    "Koala",
];

/// 随机生成“形容词 + 动物”形式的匿名昵称，每条帖子/评论各自生成
pub fn generate_anonymous_name() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("Anonymous");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("Panda");
    format!("{} {}", adjective, animal)
}

/// 通用的API响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 错误码，0表示成功
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const RATE_LIMIT: i32 = 1005;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            jwt_secret: "test-secret".into(),
            jwt_expiration_secs: 3600,
            server_host: "127.0.0.1".into(),
            server_port: 0,
            api_base_uri: "/api".into(),
            redis_url: None,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            openai_api_key: String::new(),
            openai_base_url: "http://localhost".into(),
            openai_model: "test".into(),
            ai_timeout_secs: 1,
            moderation_cache_ttl_secs: 60,
            moderation_hold: false,
            admin_user_ids: vec![],
        }
    }

    #[test]
    fn token_carries_user_and_admin_flag() {
        let config = config();
        let (token, exp) = generate_token("user-1", true, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.is_admin);
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = config();
        let (token, _) = generate_token("user-1", false, &config).unwrap();
        let other = Config {
            jwt_secret: "other".into(),
            ..config
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn anonymous_name_is_adjective_and_animal() {
        let name = generate_anonymous_name();
        let (adjective, animal) = name.split_once(' ').unwrap();
        assert!(ADJECTIVES.contains(&adjective));
        assert!(ANIMALS.contains(&animal));
    }
}
