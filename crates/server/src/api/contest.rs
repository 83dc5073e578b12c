//! Contests and registrations.

use std::sync::Arc;

use arena_api_types::{
    ContestRequest, ContestResponse, MessageResponse, RegisterRequest, RegistrationResponse,
    RegistrationStatusQuery, RegistrationStatusResponse,
};
use arena_core::domain::ContestId;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::info;

use super::error::{ApiError, parse_id};
use super::problem::problem_response;
use super::state::AppState;
use crate::repository::{ContestRecord, NewContest};

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContestRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let created = state.repos.contests.create(new_contest(request)?).await?;
    info!(contest_id = %created.id, "contest created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created(
            "Contest created successfully",
            created.id.value(),
        )),
    ))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContestRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let contest_id = request
        .id
        .map(ContestId::new)
        .ok_or_else(|| ApiError::bad_request("MISSING_ID", "Contest id is required"))?;

    state
        .repos
        .contests
        .update(contest_id, new_contest(request)?)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Contest {contest_id} not found")))?;

    Ok(Json(MessageResponse::new("Contest updated successfully")))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ContestResponse>, ApiError> {
    let contest_id = ContestId::new(parse_id("contest", &id)?);
    let contest = state
        .repos
        .contests
        .find_by_id(contest_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Contest {contest_id} not found")))?;

    Ok(Json(contest_response(&state, contest).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let contest_id = ContestId::new(parse_id("contest", &id)?);
    if !state.repos.contests.delete(contest_id).await? {
        return Err(ApiError::not_found(format!("Contest {contest_id} not found")));
    }
    info!(%contest_id, "contest deleted; its problems are now practice problems");

    Ok(Json(MessageResponse::new("Contest deleted successfully")))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContestResponse>>, ApiError> {
    let contests = state.repos.contests.list().await?;

    let mut responses = Vec::with_capacity(contests.len());
    for contest in contests {
        responses.push(contest_response(&state, contest).await?);
    }
    Ok(Json(responses))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let contest_id = ContestId::new(request.contest_id);
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::bad_request("INVALID_USERNAME", "user_id must not be empty"));
    }
    if state.repos.contests.find_by_id(contest_id).await?.is_none() {
        return Err(ApiError::not_found(format!("Contest {contest_id} not found")));
    }
    if state
        .repos
        .registrations
        .is_registered(user_id, contest_id)
        .await?
    {
        return Err(ApiError::conflict("Already registered"));
    }

    state
        .repos
        .registrations
        .register(user_id, contest_id, request.extra_info)
        .await?;
    info!(%user_id, %contest_id, "user registered");

    Ok(Json(MessageResponse::new("Registered successfully")))
}

pub async fn registration_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegistrationStatusQuery>,
) -> Result<Json<RegistrationStatusResponse>, ApiError> {
    let registered = state
        .repos
        .registrations
        .is_registered(&query.user_id, ContestId::new(query.contest_id))
        .await?;

    Ok(Json(RegistrationStatusResponse { registered }))
}

pub async fn registrations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let contest_id = ContestId::new(parse_id("contest", &id)?);
    let registrations = state.repos.registrations.list_by_contest(contest_id).await?;

    Ok(Json(
        registrations
            .into_iter()
            .map(|registration| RegistrationResponse {
                id: registration.id,
                user_id: registration.user_id,
                contest_id: registration.contest_id.value(),
                registered_at: registration.registered_at,
                extra_info: registration.extra_info,
            })
            .collect(),
    ))
}

async fn contest_response(
    state: &AppState,
    contest: ContestRecord,
) -> Result<ContestResponse, ApiError> {
    let problems = state.repos.problems.list_by_contest(contest.id).await?;
    let participants = state.repos.registrations.count_by_contest(contest.id).await?;

    Ok(ContestResponse {
        id: contest.id.value(),
        title: contest.title,
        description: contest.description,
        start_time: contest.start_time,
        end_time: contest.end_time,
        problems: problems.into_iter().map(problem_response).collect(),
        participants,
        registration_config: contest.registration_config,
    })
}

fn new_contest(request: ContestRequest) -> Result<NewContest, ApiError> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::bad_request("INVALID_TITLE", "Title must not be empty"));
    }
    if request.end_time < request.start_time {
        return Err(ApiError::bad_request(
            "INVALID_SCHEDULE",
            "end_time must not be before start_time",
        ));
    }

    Ok(NewContest {
        title,
        description: request.description,
        start_time: request.start_time,
        end_time: request.end_time,
        registration_config: request.registration_config,
    })
}
