use serde::Deserialize;

use crate::{error::AppError, models::NewReport};

pub const MAX_REASON_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    #[serde(default)]
    pub reason: String,
    pub description: Option<String>,
}

impl CreateReportRequest {
    pub fn into_new_report(self, confession_id: String) -> Result<NewReport, AppError> {
        let reason = self.reason.trim().to_string();
        if reason.is_empty() {
            return Err(AppError::validation("reason is required"));
        }
        if reason.chars().count() > MAX_REASON_LEN {
            return Err(AppError::validation(format!(
                "reason must be at most {} characters",
                MAX_REASON_LEN
            )));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(AppError::validation(format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }

        Ok(NewReport {
            confession_id,
            reason,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_is_dropped() {
        let report = CreateReportRequest {
            reason: "spam".into(),
            description: Some("   ".into()),
        }
        .into_new_report("c1".into())
        .unwrap();
        assert_eq!(report.reason, "spam");
        assert!(report.description.is_none());
    }

    #[test]
    fn reason_is_required_and_bounded() {
        let missing = CreateReportRequest {
            reason: " ".into(),
            description: None,
        };
        assert!(missing.into_new_report("c1".into()).is_err());

        let long = CreateReportRequest {
            reason: "r".repeat(MAX_REASON_LEN + 1),
            description: None,
        };
        assert!(long.into_new_report("c1".into()).is_err());
    }
}
