use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Outcome of a judged submission. Only `Passed` submissions are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Passed,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Passed => "Passed",
            SubmissionStatus::Failed => "Failed",
        }
    }

    pub fn is_passed(self) -> bool {
        self == SubmissionStatus::Passed
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Passed" => Ok(SubmissionStatus::Passed),
            "Failed" => Ok(SubmissionStatus::Failed),
            other => Err(DomainError::InvalidSubmissionStatus(other.to_string())),
        }
    }
}
