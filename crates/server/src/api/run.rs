//! `POST /run`：评测提交并推送最新排名。

use std::sync::Arc;

use arena_api_types::{RunRequest, RunResponse};
use arena_core::domain::{ContestId, ProblemId, SubmissionStatus, Verdict};
use arena_judge::JudgeSubmission;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{error, info, warn};

use super::error::ApiError;
use super::state::AppState;
use crate::repository::NewSubmission;

pub async fn run(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> Result<(StatusCode, Json<RunResponse>), ApiError> {
    let problem_id = request
        .problem
        .id()
        .map(ProblemId::new)
        .ok_or_else(|| ApiError::bad_request("INVALID_ID", "Invalid problem ID"))?;

    let problem = state
        .repos
        .problems
        .find_by_id(problem_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Problem {problem_id} not found")))?;

    // 题目写入时已校验，此处失败属于服务端数据问题。
    let task = problem.task().map_err(|err| {
        error!(%problem_id, error = %err, "stored problem cannot be judged");
        ApiError::internal(format!("Invalid problem definition: {err}"))
    })?;

    let submission = JudgeSubmission {
        identity: request.username.clone(),
        solution: request.solution,
        task,
    };
    let verdict = state.judge.judge(&submission).await?;

    if verdict.is_passed() {
        record_pass(&state, &request.username, problem_id, problem.contest_id).await?;
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(run_response(request.username, verdict)),
    ))
}

async fn record_pass(
    state: &AppState,
    username: &str,
    problem_id: ProblemId,
    contest_id: Option<ContestId>,
) -> anyhow::Result<()> {
    state
        .repos
        .submissions
        .create(NewSubmission {
            user_id: username.to_string(),
            problem_id,
            status: SubmissionStatus::Passed,
        })
        .await?;
    info!(%username, %problem_id, "passing submission recorded");

    let Some(contest_id) = contest_id else {
        return Ok(());
    };
    let board = state.repos.contest_leaderboard(contest_id).await?;
    match state.broker.broadcast(contest_id, &board) {
        Ok(report) => info!(
            %contest_id,
            delivered = report.delivered,
            dropped = report.dropped,
            "leaderboard broadcast"
        ),
        Err(err) => warn!(%contest_id, error = %err, "leaderboard broadcast failed"),
    }
    Ok(())
}

fn run_response(username: String, verdict: Verdict) -> RunResponse {
    let tally = verdict.tally;
    RunResponse {
        username,
        message: verdict.message,
        output: verdict.output,
        status: verdict.status.as_str().to_string(),
        expected_output: verdict.expected_output,
        actual_output: verdict.actual_output,
        test_case_input: verdict.test_case_input,
        passed_count: tally.map(|t| t.passed),
        total_count: tally.map(|t| t.total),
        failed_index: tally.map(|t| t.failed_index.map_or(-1, |index| index as i64)),
    }
}
