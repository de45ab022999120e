use chrono::Utc;

use super::{Store, new_id};
use crate::error::AppError;
use crate::models::{NewReport, Report, ReportStatus};

impl Store {
    /// 按创建时间倒序，可按状态过滤
    pub async fn get_reports(&self, status: Option<ReportStatus>) -> Vec<Report> {
        let tables = self.tables.read().await;
        let mut reports: Vec<Report> = tables
            .reports
            .values()
            .filter(|report| status.is_none_or(|status| report.status == status))
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.seq.cmp(&a.seq)));
        reports
    }

    pub async fn create_report(
        &self,
        user_id: Option<&str>,
        new: NewReport,
    ) -> Result<Report, AppError> {
        let user_id = user_id.ok_or(AppError::Unauthorized)?;
        let mut tables = self.tables.write().await;
        if !tables.confessions.contains_key(&new.confession_id) {
            return Err(AppError::NotFound("confession"));
        }

        let report = Report {
            id: new_id(),
            confession_id: new.confession_id,
            user_id: user_id.to_string(),
            reason: new.reason,
            description: new.description,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            seq: tables.next_seq(),
        };
        tables.reports.insert(report.id.clone(), report.clone());
        tracing::info!(
            "Report {} filed against confession {}",
            report.id,
            report.confession_id
        );
        Ok(report)
    }

    /// 状态只由管理员修改
    pub async fn update_report_status(&self, id: &str, status: ReportStatus) -> Option<Report> {
        let mut tables = self.tables.write().await;
        let report = tables.reports.get_mut(id)?;
        report.status = status;
        Some(report.clone())
    }
}
