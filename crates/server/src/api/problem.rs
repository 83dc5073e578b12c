//! Problem administration and public problem reads.

use std::sync::Arc;

use arena_api_types::{MessageResponse, ProblemRequest, ProblemResponse};
use arena_core::domain::{ContestId, Difficulty, JudgeTask, ProblemId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::error::{ApiError, parse_id};
use super::state::AppState;
use crate::repository::{ProblemDraft, ProblemRecord};

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProblemRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let draft = draft(&state, request).await?;
    let created = state.repos.problems.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created(
            "Problem created successfully",
            created.id.value(),
        )),
    ))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProblemRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let problem_id = request
        .id
        .map(ProblemId::new)
        .ok_or_else(|| ApiError::bad_request("MISSING_ID", "Problem id is required"))?;
    let draft = draft(&state, request).await?;

    state
        .repos
        .problems
        .update(problem_id, draft)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Problem {problem_id} not found")))?;

    Ok(Json(MessageResponse::new("Problem updated successfully")))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProblemResponse>, ApiError> {
    let problem_id = ProblemId::new(parse_id("problem", &id)?);
    let problem = state
        .repos
        .problems
        .find_by_id(problem_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Problem {problem_id} not found")))?;

    Ok(Json(problem_response(problem)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let problem_id = ProblemId::new(parse_id("problem", &id)?);
    if !state.repos.problems.delete(problem_id).await? {
        return Err(ApiError::not_found(format!("Problem {problem_id} not found")));
    }

    Ok(Json(MessageResponse::new("Problem deleted successfully")))
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProblemResponse>>, ApiError> {
    let problems = state.repos.problems.list_all().await?;
    Ok(Json(problems.into_iter().map(problem_response).collect()))
}

pub async fn list_practice(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProblemResponse>>, ApiError> {
    let problems = state.repos.problems.list_practice().await?;
    Ok(Json(problems.into_iter().map(problem_response).collect()))
}

/// Public view: runner code is dropped.
pub(crate) fn problem_response(record: ProblemRecord) -> ProblemResponse {
    ProblemResponse {
        id: record.id.value(),
        contest_id: record.contest_id.map_or(0, ContestId::value),
        title: record.title,
        description: record.description,
        input: record.input,
        output: record.output,
        template: record.template,
        difficulty: record.difficulty.to_string(),
        points: record.points,
        signature_json: record.signature_json.unwrap_or_default(),
        test_cases_json: record.test_cases_json.unwrap_or_default(),
    }
}

/// Validates a request into a draft. The stored signature and test cases
/// must already describe a judgeable task.
async fn draft(state: &AppState, request: ProblemRequest) -> Result<ProblemDraft, ApiError> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::bad_request("INVALID_TITLE", "Title must not be empty"));
    }

    let difficulty = if request.difficulty.trim().is_empty() {
        Difficulty::default()
    } else {
        request.difficulty.parse()?
    };

    let contest_id = ContestId::attached(request.contest_id);
    if let Some(contest_id) = contest_id {
        if state.repos.contests.find_by_id(contest_id).await?.is_none() {
            return Err(ApiError::not_found(format!("Contest {contest_id} not found")));
        }
    }

    let signature_json = non_blank(request.signature_json);
    let test_cases_json = non_blank(request.test_cases_json);
    JudgeTask::from_stored(
        &request.input,
        &request.output,
        request.runner_code.as_deref().unwrap_or_default(),
        signature_json.as_deref(),
        test_cases_json.as_deref(),
    )?;

    Ok(ProblemDraft {
        contest_id,
        title,
        description: request.description,
        input: request.input,
        output: request.output,
        template: request.template,
        runner_code: request.runner_code,
        difficulty,
        points: request.points,
        signature_json,
        test_cases_json,
    })
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
