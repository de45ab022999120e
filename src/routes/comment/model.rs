use serde::Deserialize;

use crate::{error::AppError, models::NewComment, utils::generate_anonymous_name};

pub const MAX_COMMENT_LEN: usize = 500;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
}

impl CreateCommentRequest {
    pub fn into_new_comment(self, confession_id: String) -> Result<NewComment, AppError> {
        let content = self.content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::validation("content is required"));
        }
        if content.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::validation(format!(
                "comment must be at most {} characters",
                MAX_COMMENT_LEN
            )));
        }

        Ok(NewComment {
            confession_id,
            content,
            anonymous_name: generate_anonymous_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_content_is_validated() {
        let ok = CreateCommentRequest { content: " nice ".into() }
            .into_new_comment("c1".into())
            .unwrap();
        assert_eq!(ok.content, "nice");
        assert_eq!(ok.confession_id, "c1");

        let empty = CreateCommentRequest { content: "".into() };
        assert!(empty.into_new_comment("c1".into()).is_err());

        let long = CreateCommentRequest {
            content: "x".repeat(MAX_COMMENT_LEN + 1),
        };
        assert!(long.into_new_comment("c1".into()).is_err());
    }
}
