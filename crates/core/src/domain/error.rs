use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid difficulty: {0}. expected one of Easy, Medium, Hard")]
    InvalidDifficulty(String),
    #[error("invalid submission status: {0}. expected Passed or Failed")]
    InvalidSubmissionStatus(String),
    #[error("invalid problem signature: {0}")]
    InvalidSignature(String),
    #[error("invalid test cases: {0}")]
    InvalidTestCases(String),
}
