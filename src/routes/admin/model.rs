use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::ReportStatus};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub status: Option<String>,
}

impl ReportQuery {
    /// 空字符串和 "all" 表示不过滤
    pub fn status(&self) -> Result<Option<ReportStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(status) => status.parse().map(Some),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateReportRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub is_premium: Option<bool>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_status_filter() {
        let query = |s: Option<&str>| ReportQuery {
            status: s.map(String::from),
        };
        assert_eq!(query(None).status().unwrap(), None);
        assert_eq!(query(Some("all")).status().unwrap(), None);
        assert_eq!(
            query(Some("pending")).status().unwrap(),
            Some(ReportStatus::Pending)
        );
        assert!(query(Some("closed")).status().is_err());
    }
}
