use serde::{Deserialize, Serialize};

use super::SubmissionStatus;

/// Per-case counters reported in function mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTally {
    pub passed: usize,
    pub total: usize,
    /// 1-based index of the first failing case.
    pub failed_index: Option<usize>,
}

/// Passed/Failed outcome plus the diagnostics shown to the submitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: SubmissionStatus,
    /// Captured diagnostic text, already stripped of hidden runner code.
    pub message: String,
    pub output: String,
    pub expected_output: String,
    pub actual_output: String,
    pub test_case_input: String,
    pub tally: Option<CaseTally>,
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        self.status.is_passed()
    }
}
