//! Shared request/response types used by API-facing crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Acknowledgement for mutations; `id` is set when a row was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn created(message: impl Into<String>, id: u32) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }
}

/// Problem reference as sent by clients: either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProblemRef {
    Id(u32),
    Text(String),
}

impl ProblemRef {
    pub fn id(&self) -> Option<u32> {
        match self {
            ProblemRef::Id(id) => Some(*id),
            ProblemRef::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub username: String,
    pub problem: ProblemRef,
    pub solution: String,
}

/// Verdict as returned to the submitter. The count fields are only present
/// for function-mode problems; `failed_index` is 1-based and `-1` when every
/// case passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    pub username: String,
    pub message: String,
    pub output: String,
    pub status: String,
    pub expected_output: String,
    pub actual_output: String,
    pub test_case_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_index: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /contest` and `PUT /contest`; `id` is required for updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestRequest {
    #[serde(default)]
    pub id: Option<u32>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub registration_config: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestResponse {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub problems: Vec<ProblemResponse>,
    pub participants: u64,
    pub registration_config: String,
}

/// Body of `POST /problem` and `PUT /problem`. On update a missing
/// `runner_code` keeps the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRequest {
    #[serde(default)]
    pub id: Option<u32>,
    /// `0` or absent for a practice problem.
    #[serde(default)]
    pub contest_id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub runner_code: Option<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub signature_json: String,
    #[serde(default)]
    pub test_cases_json: String,
}

/// Public view of a problem. Hidden runner code is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemResponse {
    pub id: u32,
    pub contest_id: u32,
    pub title: String,
    pub description: String,
    pub input: String,
    pub output: String,
    pub template: String,
    pub difficulty: String,
    pub points: i32,
    pub signature_json: String,
    pub test_cases_json: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub contest_id: u32,
    #[serde(default)]
    pub extra_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStatusQuery {
    pub user_id: String,
    pub contest_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStatusResponse {
    pub registered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub id: u32,
    pub user_id: String,
    pub contest_id: u32,
    pub registered_at: DateTime<Utc>,
    pub extra_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub username: String,
    pub score: i64,
}

/// One passing submission on a practice problem's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRow {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// A contest problem shows its contest's board; a practice problem lists
/// its passing submissions in time order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProblemLeaderboardResponse {
    Contest(Vec<LeaderboardRow>),
    Practice(Vec<SolveRow>),
}
