use chrono::Utc;

use super::{Store, new_id};
use crate::error::AppError;
use crate::models::{Confession, Vote, VoteType};

fn bump(confession: &mut Confession, vote_type: VoteType, delta: i64) {
    match vote_type {
        VoteType::Up => confession.upvotes += delta,
        VoteType::Down => confession.downvotes += delta,
    }
}

impl Store {
    pub async fn get_user_vote(&self, user_id: &str, confession_id: &str) -> Option<Vote> {
        let tables = self.tables.read().await;
        tables
            .votes
            .get(&(user_id.to_string(), confession_id.to_string()))
            .cloned()
    }

    /// 投票或改票。同一用户对同一帖子只保留一票，后投覆盖先投。
    ///
    /// 计数在写投票的同一临界区内增量更新，任何时刻都等于对投票集合的全量统计。
    pub async fn cast_vote(
        &self,
        user_id: Option<&str>,
        confession_id: &str,
        vote_type: VoteType,
    ) -> Result<Vote, AppError> {
        let user_id = user_id.ok_or(AppError::Unauthorized)?;
        let mut tables = self.tables.write().await;
        if !tables.confessions.contains_key(confession_id) {
            return Err(AppError::NotFound("confession"));
        }

        let key = (user_id.to_string(), confession_id.to_string());
        let previous = tables.votes.get(&key).map(|vote| vote.vote_type);
        let vote = match tables.votes.get_mut(&key) {
            Some(existing) => {
                existing.vote_type = vote_type;
                existing.clone()
            }
            None => {
                let vote = Vote {
                    id: new_id(),
                    user_id: key.0.clone(),
                    confession_id: key.1.clone(),
                    vote_type,
                    created_at: Utc::now(),
                };
                tables.votes.insert(key, vote.clone());
                vote
            }
        };

        if let Some(confession) = tables.confessions.get_mut(confession_id) {
            if let Some(previous) = previous {
                bump(confession, previous, -1);
            }
            bump(confession, vote_type, 1);
        }

        tracing::debug!(
            "User {} voted {:?} on confession {}",
            user_id,
            vote_type,
            confession_id
        );
        Ok(vote)
    }

    /// 撤销投票，返回是否确实删除了一票
    pub async fn retract_vote(
        &self,
        user_id: Option<&str>,
        confession_id: &str,
    ) -> Result<bool, AppError> {
        let user_id = user_id.ok_or(AppError::Unauthorized)?;
        let mut tables = self.tables.write().await;
        let key = (user_id.to_string(), confession_id.to_string());

        let Some(vote) = tables.votes.remove(&key) else {
            return Ok(false);
        };
        if let Some(confession) = tables.confessions.get_mut(confession_id) {
            bump(confession, vote.vote_type, -1);
        }
        Ok(true)
    }

    /// 对投票集合全量统计 (upvotes, downvotes)
    pub async fn recount_votes(&self, confession_id: &str) -> (i64, i64) {
        let tables = self.tables.read().await;
        tables
            .votes
            .values()
            .filter(|vote| vote.confession_id == confession_id)
            .fold((0, 0), |(up, down), vote| match vote.vote_type {
                VoteType::Up => (up + 1, down),
                VoteType::Down => (up, down + 1),
            })
    }
}
