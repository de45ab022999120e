use std::collections::HashSet;

use serde::Serialize;

use super::Store;

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub total_confessions: usize,
    pub active_users: usize,
    /// 已有审核结论的帖子百分比
    pub moderated: f64,
    pub colleges: usize,
}

impl Store {
    pub async fn stats(&self) -> PlatformStats {
        let tables = self.tables.read().await;
        let visible = tables.confessions.values().filter(|c| c.is_visible());
        let (total_confessions, colleges) = visible.fold(
            (0, HashSet::new()),
            |(count, mut colleges), confession| {
                colleges.insert(confession.college.as_str());
                (count + 1, colleges)
            },
        );

        let analysed = tables
            .confessions
            .values()
            .filter(|c| c.ai_analysis.is_some())
            .count();
        let moderated = if tables.confessions.is_empty() {
            100.0
        } else {
            (analysed as f64 * 1000.0 / tables.confessions.len() as f64).round() / 10.0
        };

        PlatformStats {
            total_confessions,
            active_users: tables.users.len(),
            moderated,
            colleges: colleges.len(),
        }
    }
}
