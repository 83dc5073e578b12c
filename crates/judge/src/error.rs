use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("workspace error at {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("execution failed (exit code {exit_code:?}): {stderr}")]
    Execution {
        stderr: String,
        stdout: String,
        exit_code: Option<i32>,
    },

    #[error("execution timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("malformed harness output: {0}")]
    MalformedHarnessOutput(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JudgeError {
    pub(crate) fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JudgeError::Workspace {
            path: path.into(),
            source,
        }
    }

    /// Diagnostic text a submitter may see for this failure.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            JudgeError::Execution { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, JudgeError>;
