//! 应用共享状态。

use std::sync::Arc;

use arena_judge::{Judge, LeaderboardBroker};

use crate::repository::Repositories;

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub judge: Arc<Judge>,
    /// 实时排行榜推送，生命周期与服务进程一致。
    pub broker: Arc<LeaderboardBroker>,
}

impl AppState {
    pub fn new(repos: Repositories, judge: Arc<Judge>, broker: Arc<LeaderboardBroker>) -> Self {
        Self {
            repos,
            judge,
            broker,
        }
    }
}
