//! 排行榜查询与比赛实时推送。

use std::convert::Infallible;
use std::sync::Arc;

use arena_api_types::{LeaderboardRow, ProblemLeaderboardResponse, SolveRow};
use arena_core::domain::{ContestId, LeaderboardEntry, ProblemId};
use arena_judge::{LeaderboardBroker, Payload, Subscription};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use futures_util::stream;

use super::error::{ApiError, parse_id};
use super::state::AppState;
use crate::repository::leaderboard::ProblemStandings;

pub async fn global(State(state): State<Arc<AppState>>) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let board = state.repos.global_leaderboard().await?;
    Ok(Json(rows(board)))
}

pub async fn contest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let contest_id = ContestId::new(parse_id("contest", &id)?);
    let board = state.repos.contest_leaderboard(contest_id).await?;
    Ok(Json(rows(board)))
}

pub async fn problem(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProblemLeaderboardResponse>, ApiError> {
    let problem_id = ProblemId::new(parse_id("problem", &id)?);
    let problem = state
        .repos
        .problems
        .find_by_id(problem_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Problem {problem_id} not found")))?;

    let response = match state.repos.problem_standings(&problem).await? {
        ProblemStandings::Contest(board) => ProblemLeaderboardResponse::Contest(rows(board)),
        ProblemStandings::Practice(solves) => ProblemLeaderboardResponse::Practice(
            solves
                .into_iter()
                .map(|solve| SolveRow {
                    username: solve.user_id,
                    created_at: solve.created_at,
                    status: solve.status.as_str().to_string(),
                })
                .collect(),
        ),
    };
    Ok(Json(response))
}

/// `GET /contest/{id}/leaderboard/stream`：每次广播推送一个 `message` 事件，直到客户端断开。
pub async fn stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let contest_id = ContestId::new(parse_id("contest", &id)?);
    let guard = SubscriptionGuard::new(state.broker.clone(), contest_id);

    let events = stream::unfold(guard, |mut guard| async move {
        let payload = guard.recv().await?;
        Some((Ok(Event::default().event("message").data(&*payload)), guard))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// 持有一个 broker 订阅，drop 时取消订阅（SSE 连接断开时触发）。
pub struct SubscriptionGuard {
    broker: Arc<LeaderboardBroker>,
    subscription: Subscription,
}

impl SubscriptionGuard {
    pub fn new(broker: Arc<LeaderboardBroker>, contest_id: ContestId) -> Self {
        let subscription = broker.subscribe(contest_id);
        Self {
            broker,
            subscription,
        }
    }

    pub async fn recv(&mut self) -> Option<Payload> {
        self.subscription.recv().await
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.broker
            .unsubscribe(self.subscription.contest_id(), self.subscription.id());
    }
}

fn rows(board: Vec<LeaderboardEntry>) -> Vec<LeaderboardRow> {
    board
        .into_iter()
        .map(|entry| LeaderboardRow {
            username: entry.user_id,
            score: entry.score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guard_receives_broadcasts_and_unsubscribes_on_drop() {
        let broker = Arc::new(LeaderboardBroker::new(5));
        let contest_id = ContestId::new(7);
        let mut guard = SubscriptionGuard::new(broker.clone(), contest_id);
        assert_eq!(broker.subscriber_count(contest_id), 1);

        broker
            .broadcast(contest_id, &vec![LeaderboardRow {
                username: "alice".to_string(),
                score: 10,
            }])
            .expect("broadcast");
        let payload = guard.recv().await.expect("snapshot");
        assert_eq!(&*payload, r#"[{"username":"alice","score":10}]"#);

        drop(guard);
        assert_eq!(broker.subscriber_count(contest_id), 0);
    }
}
