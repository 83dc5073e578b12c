use serde::{Deserialize, Serialize};

use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Ok,
    RuntimeError,
    SystemError,
}

/// One harness result per test case, in test-case order. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
    /// Elapsed milliseconds as measured by the harness.
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub traceback: Option<String>,
}

impl RunResult {
    pub fn is_ok(&self) -> bool {
        self.status == RunStatus::Ok
    }

    /// Text shown for a failing case: the error when the call did not return,
    /// the canonical return value otherwise.
    pub fn display_output(&self) -> String {
        if self.is_ok() {
            return self.result.canonical();
        }
        self.error.clone().unwrap_or_default()
    }
}
