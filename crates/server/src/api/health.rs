use arena_api_types::HealthCheckResponse;
use axum::Json;

pub async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
