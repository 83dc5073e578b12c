//! API 路由模块。
//!
//! 提供评测、比赛管理与排行榜接口。

pub mod contest;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod problem;
pub mod run;
pub mod state;
pub mod user;


use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/run", post(run::run))
        .route("/user/create", post(user::create))
        .route("/users", get(user::list))
        .route("/contest", post(contest::create).put(contest::update))
        .route("/contests", get(contest::list))
        .route("/contest/register", post(contest::register))
        .route("/contest/status", get(contest::registration_status))
        .route("/contest/{id}", get(contest::get).delete(contest::delete))
        .route("/contest/{id}/registrations", get(contest::registrations))
        .route("/contest/{id}/leaderboard", get(leaderboard::contest))
        .route("/contest/{id}/leaderboard/stream", get(leaderboard::stream))
        .route("/problem", post(problem::create).put(problem::update))
        .route("/problems", get(problem::list_all))
        .route("/problems/practice", get(problem::list_practice))
        .route("/problem/{id}", get(problem::get).delete(problem::delete))
        .route("/problem/{id}/leaderboard", get(leaderboard::problem))
        .route("/leaderboard", get(leaderboard::global))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
