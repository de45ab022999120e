//! 内存实体存储，包含投票聚合、审核状态、热度排序和聊天会话记录。
//!
//! 所有表放在同一把读写锁之后。每个操作只加一次锁，且临界区内没有
//! `.await`，因此“写投票 + 改计数”“写评论 + 改评论数”都是原子的。

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::{ChatSession, Comment, Confession, Report, User, Vote};

mod chat;
mod comment;
mod confession;
mod moderation;
mod report;
mod stats;
mod trending;
mod user;
mod vote;

pub use stats::PlatformStats;
pub use trending::trending_score;

pub struct Store {
    tables: RwLock<Tables>,
    moderation_hold: bool,
}

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    confessions: HashMap<String, Confession>,
    comments: HashMap<String, Comment>,
    /// 以 (user_id, confession_id) 为键，每对最多一票
    votes: HashMap<(String, String), Vote>,
    reports: HashMap<String, Report>,
    chat_sessions: HashMap<String, ChatSession>,
    /// user_id -> 最近创建的会话
    user_sessions: HashMap<String, String>,
    next_seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_moderation_hold(false)
    }

    /// `hold` 为 true 时，新帖创建后保持未通过状态直到审核结论写入
    pub fn with_moderation_hold(hold: bool) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            moderation_hold: hold,
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}
