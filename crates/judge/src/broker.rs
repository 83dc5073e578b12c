//! 按比赛分发的排行榜推送。
//!
//! 每个观看者拥有独立的小容量有界通道。广播从不等待：
//! 缓冲区已满的观看者直接错过这一次快照。

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arena_core::domain::ContestId;
use serde::Serialize;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tracing::{debug, info};

use crate::config::BrokerConfig;
use crate::error::Result;

/// 序列化后的排行榜快照，一次广播的所有接收者共享同一份。
pub type Payload = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 单个观看者通道的接收端。订阅从 broker 中移除后通道关闭。
#[derive(Debug)]
pub struct Subscription {
    contest_id: ContestId,
    id: SubscriberId,
    receiver: mpsc::Receiver<Payload>,
}

impl Subscription {
    pub fn contest_id(&self) -> ContestId {
        self.contest_id
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// 等待下一份快照；取消订阅后返回 `None`。
    pub async fn recv(&mut self) -> Option<Payload> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> std::result::Result<Payload, TryRecvError> {
        self.receiver.try_recv()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: usize,
}

#[derive(Debug)]
struct Subscriber {
    id: SubscriberId,
    sender: mpsc::Sender<Payload>,
}

#[derive(Debug)]
pub struct LeaderboardBroker {
    capacity: usize,
    next_id: AtomicU64,
    registry: Mutex<HashMap<ContestId, Vec<Subscriber>>>,
}

impl LeaderboardBroker {
    /// `capacity` 为每个观看者可积压的快照数量，超出部分被丢弃。
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            registry: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &BrokerConfig) -> Self {
        Self::new(config.subscriber_buffer)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn subscribe(&self, contest_id: ContestId) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.lock()
            .entry(contest_id)
            .or_default()
            .push(Subscriber { id, sender });

        info!(%contest_id, subscriber = %id, "leaderboard subscriber added");
        Subscription {
            contest_id,
            id,
            receiver,
        }
    }

    /// 移除订阅者并关闭其通道。已移除时返回 `false`，重复调用无副作用。
    pub fn unsubscribe(&self, contest_id: ContestId, id: SubscriberId) -> bool {
        let mut registry = self.lock();
        let Some(subscribers) = registry.get_mut(&contest_id) else {
            return false;
        };
        let Some(position) = subscribers.iter().position(|s| s.id == id) else {
            return false;
        };

        // 唯一的发送端被 drop 后通道即关闭。
        subscribers.remove(position);
        if subscribers.is_empty() {
            registry.remove(&contest_id);
        }
        drop(registry);

        info!(%contest_id, subscriber = %id, "leaderboard subscriber removed");
        true
    }

    /// 序列化 `payload` 一次，非阻塞地投递给该比赛的所有订阅者。
    /// 缓冲区已满则丢弃本次快照；接收端已关闭的订阅者会被清理。
    pub fn broadcast<T>(&self, contest_id: ContestId, payload: &T) -> Result<BroadcastReport>
    where
        T: Serialize + ?Sized,
    {
        let message: Payload = serde_json::to_string(payload)?.into();
        let mut report = BroadcastReport::default();

        let mut registry = self.lock();
        let Some(subscribers) = registry.get_mut(&contest_id) else {
            return Ok(report);
        };

        subscribers.retain(|subscriber| match subscriber.sender.try_send(message.clone()) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                debug!(%contest_id, subscriber = %subscriber.id, "subscriber buffer full; snapshot dropped");
                report.dropped += 1;
                true
            }
            Err(TrySendError::Closed(_)) => {
                debug!(%contest_id, subscriber = %subscriber.id, "subscriber gone; pruning");
                false
            }
        });
        if subscribers.is_empty() {
            registry.remove(&contest_id);
        }

        Ok(report)
    }

    pub fn subscriber_count(&self, contest_id: ContestId) -> usize {
        self.lock().get(&contest_id).map_or(0, Vec::len)
    }

    // 持锁期间不会 panic，中毒的锁内数据仍然一致。
    fn lock(&self) -> MutexGuard<'_, HashMap<ContestId, Vec<Subscriber>>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use arena_core::domain::LeaderboardEntry;

    use super::*;

    fn board(score: i64) -> Vec<LeaderboardEntry> {
        vec![LeaderboardEntry {
            user_id: "alice".to_string(),
            score,
        }]
    }

    #[tokio::test]
    async fn subscribe_then_broadcast_delivers() {
        let broker = LeaderboardBroker::new(5);
        let contest = ContestId::new(1);
        let mut subscription = broker.subscribe(contest);

        let report = broker.broadcast(contest, &board(100)).expect("broadcast");

        assert_eq!(report, BroadcastReport { delivered: 1, dropped: 0 });
        let payload = subscription.recv().await.expect("payload");
        assert_eq!(&*payload, r#"[{"username":"alice","score":100}]"#);
    }

    #[tokio::test]
    async fn broadcasts_stay_within_their_contest() {
        let broker = LeaderboardBroker::new(5);
        let mut first = broker.subscribe(ContestId::new(1));
        let mut second = broker.subscribe(ContestId::new(2));

        broker.broadcast(ContestId::new(2), &board(1)).expect("broadcast");

        assert!(matches!(first.try_recv(), Err(TryRecvError::Empty)));
        assert!(second.try_recv().is_ok());
    }

    #[tokio::test]
    async fn full_buffer_drops_without_blocking() {
        let broker = LeaderboardBroker::new(5);
        let contest = ContestId::new(3);
        let mut subscription = broker.subscribe(contest);

        for score in 0..5 {
            let report = broker.broadcast(contest, &board(score)).expect("broadcast");
            assert_eq!(report.delivered, 1);
        }
        let sixth = tokio::time::timeout(Duration::from_secs(1), async {
            broker.broadcast(contest, &board(5))
        })
        .await
        .expect("broadcast must not block")
        .expect("broadcast");

        assert_eq!(sixth, BroadcastReport { delivered: 0, dropped: 1 });
        for score in 0..5 {
            let payload = subscription.try_recv().expect("buffered snapshot");
            assert!(payload.contains(&format!("\"score\":{score}")));
        }
        assert!(matches!(subscription.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(broker.subscriber_count(contest), 1);
    }

    #[tokio::test]
    async fn slow_viewer_does_not_starve_others() {
        let broker = LeaderboardBroker::new(1);
        let contest = ContestId::new(4);
        let _slow = broker.subscribe(contest);
        let mut fast = broker.subscribe(contest);

        broker.broadcast(contest, &board(1)).expect("broadcast");
        fast.try_recv().expect("first snapshot");
        let report = broker.broadcast(contest, &board(2)).expect("broadcast");

        assert_eq!(report, BroadcastReport { delivered: 1, dropped: 1 });
        assert!(fast.try_recv().expect("second snapshot").contains("\"score\":2"));
    }

    #[tokio::test]
    async fn unsubscribe_closes_channel_and_is_idempotent() {
        let broker = LeaderboardBroker::new(5);
        let contest = ContestId::new(5);
        let mut subscription = broker.subscribe(contest);

        assert!(broker.unsubscribe(contest, subscription.id()));
        let report = broker.broadcast(contest, &board(1)).expect("broadcast");

        assert_eq!(report.delivered, 0);
        assert_eq!(subscription.recv().await, None);
        assert!(!broker.unsubscribe(contest, subscription.id()));
        assert_eq!(broker.subscriber_count(contest), 0);
    }

    #[tokio::test]
    async fn dropped_receivers_are_pruned_on_broadcast() {
        let broker = LeaderboardBroker::new(5);
        let contest = ContestId::new(6);
        let subscription = broker.subscribe(contest);
        let id = subscription.id();
        drop(subscription);

        let report = broker.broadcast(contest, &board(1)).expect("broadcast");

        assert_eq!(report, BroadcastReport::default());
        assert_eq!(broker.subscriber_count(contest), 0);
        assert!(!broker.unsubscribe(contest, id));
    }

    #[test]
    fn broadcast_without_subscribers_is_a_no_op() {
        let broker = LeaderboardBroker::new(5);
        let report = broker
            .broadcast(ContestId::new(9), &Vec::<LeaderboardEntry>::new())
            .expect("broadcast");
        assert_eq!(report, BroadcastReport::default());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        assert_eq!(LeaderboardBroker::new(0).capacity(), 1);
    }
}
