use std::sync::Arc;

use arena_api_types::{CreateUserRequest, MessageResponse, UserResponse};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{NewUser, UserRecord};

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::bad_request("INVALID_USERNAME", "Username must not be empty"));
    }
    if state.repos.users.find_by_username(&username).await?.is_some() {
        return Err(ApiError::conflict(format!("User {username:?} already exists")));
    }

    state
        .repos
        .users
        .create(NewUser {
            username,
            email: request.email.trim().to_string(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.repos.users.list().await?;
    Ok(Json(users.into_iter().map(user_response).collect()))
}

fn user_response(record: UserRecord) -> UserResponse {
    UserResponse {
        username: record.username,
        email: record.email,
        created_at: record.created_at,
    }
}
