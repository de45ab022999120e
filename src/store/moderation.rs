use super::Store;
use crate::models::{Confession, ModerationResult};

impl Store {
    /// 写入审核结论：通过则公开，不通过则标记并隐藏。重复写入同一结论结果不变
    pub async fn apply_moderation(
        &self,
        confession_id: &str,
        verdict: ModerationResult,
    ) -> Option<Confession> {
        let mut tables = self.tables.write().await;
        let confession = tables.confessions.get_mut(confession_id)?;

        confession.is_approved = verdict.is_appropriate;
        confession.is_flagged = !verdict.is_appropriate;
        if !verdict.is_appropriate {
            tracing::info!(
                "Confession {} flagged by moderation: {:?}",
                confession_id,
                verdict.flags
            );
        }
        confession.ai_analysis = Some(verdict);

        Some(confession.clone())
    }
}
