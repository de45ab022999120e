use serde::Deserialize;

use crate::{error::AppError, infrastructure::Urgency};

pub const MAX_PROBLEM_LEN: usize = 2000;
pub const MAX_CATEGORY_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub problem: String,
    pub category: Option<String>,
    pub urgency: Option<String>,
}

/// 校验后的建议请求
#[derive(Debug)]
pub struct ValidAdviceRequest {
    pub problem: String,
    pub category: Option<String>,
    pub urgency: Option<Urgency>,
}

impl AdviceRequest {
    pub fn validate(self) -> Result<ValidAdviceRequest, AppError> {
        let problem = self.problem.trim().to_string();
        if problem.is_empty() {
            return Err(AppError::validation("problem is required"));
        }
        if problem.chars().count() > MAX_PROBLEM_LEN {
            return Err(AppError::validation(format!(
                "problem must be at most {} characters",
                MAX_PROBLEM_LEN
            )));
        }

        let category = self
            .category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());
        if category
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_CATEGORY_LEN)
        {
            return Err(AppError::validation("category is too long"));
        }

        let urgency = self
            .urgency
            .as_deref()
            .map(str::parse::<Urgency>)
            .transpose()?;

        Ok(ValidAdviceRequest {
            problem,
            category,
            urgency,
        })
    }
}
