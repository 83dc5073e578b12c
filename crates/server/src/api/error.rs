//! HTTP error mapping.

use arena_api_types::ErrorResponse;
use arena_judge::JudgeError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

/// Parses a numeric path or query id.
pub fn parse_id(kind: &str, raw: &str) -> Result<u32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request("INVALID_ID", format!("Invalid {kind} ID: {raw:?}")))
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = %format!("{err:#}"), "request failed");
        ApiError::internal(format!("{err:#}"))
    }
}

impl From<arena_core::domain::DomainError> for ApiError {
    fn from(err: arena_core::domain::DomainError) -> Self {
        ApiError::bad_request("INVALID_PROBLEM", err.to_string())
    }
}

impl From<JudgeError> for ApiError {
    fn from(err: JudgeError) -> Self {
        match err {
            // Stderr is already stripped of hidden runner code here.
            JudgeError::Execution { stderr, exit_code, .. } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXECUTION_ERROR",
                match exit_code {
                    Some(code) => format!("Execution failed with exit code {code}:\n{stderr}"),
                    None => format!("Execution failed:\n{stderr}"),
                },
            ),
            JudgeError::Timeout(limit) => ApiError::new(
                StatusCode::REQUEST_TIMEOUT,
                "TIME_LIMIT_EXCEEDED",
                format!("Time limit of {}s exceeded", limit.as_secs_f64()),
            ),
            JudgeError::UnsupportedLanguage(_) | JudgeError::InvalidSignature(_) => {
                ApiError::internal(format!("Problem cannot be judged: {err}"))
            }
            JudgeError::MalformedHarnessOutput(detail) => {
                error!(%detail, "harness output could not be parsed");
                ApiError::internal("The judge could not read the test results")
            }
            other => {
                error!(error = %other, "judge failure");
                ApiError::internal("The judge failed to run this submission")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            code: self.code().to_string(),
            message: self.message,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn execution_error_keeps_diagnostic() {
        let err = ApiError::from(JudgeError::Execution {
            stderr: "NameError: name 'x' is not defined".to_string(),
            stdout: String::new(),
            exit_code: Some(1),
        });

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "EXECUTION_ERROR");
        assert!(err.message.contains("NameError"));
    }

    #[test]
    fn malformed_output_is_reported_generically() {
        let err = ApiError::from(JudgeError::MalformedHarnessOutput(
            "expected value at line 1; last line: \"secret\"".to_string(),
        ));

        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn timeout_maps_to_time_limit() {
        let err = ApiError::from(JudgeError::Timeout(Duration::from_secs(10)));
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.code(), "TIME_LIMIT_EXCEEDED");
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("contest", " 12 ").expect("numeric id"), 12);
        assert_eq!(
            parse_id("contest", "abc").expect_err("not numeric").status(),
            StatusCode::BAD_REQUEST
        );
    }
}
