use serde::{Deserialize, Serialize};

use super::{DomainError, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Function-mode problem signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub language: String,
    #[serde(default = "default_class_name")]
    pub class_name: String,
    pub function_name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: String,
}

fn default_class_name() -> String {
    "Solution".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamIoTask {
    pub input: String,
    pub expected: String,
    /// Hidden code appended to the submission; never shown to submitters.
    pub runner_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTask {
    pub signature: Signature,
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeMode {
    StreamIo,
    Function,
}

/// What a problem asks the judge to do. Exactly one mode is active per problem.
#[derive(Debug, Clone, PartialEq)]
pub enum JudgeTask {
    StreamIo(StreamIoTask),
    Function(FunctionTask),
}

impl JudgeTask {
    /// Builds the task from stored problem columns. A non-empty signature
    /// selects function mode; otherwise the stream-IO fields are used.
    pub fn from_stored(
        input: &str,
        output: &str,
        runner_code: &str,
        signature_json: Option<&str>,
        test_cases_json: Option<&str>,
    ) -> Result<Self, DomainError> {
        let signature_json = signature_json.map(str::trim).filter(|s| !s.is_empty());

        let Some(signature_json) = signature_json else {
            let runner_code = Some(runner_code)
                .filter(|code| !code.trim().is_empty())
                .map(str::to_string);
            return Ok(JudgeTask::StreamIo(StreamIoTask {
                input: input.to_string(),
                expected: output.to_string(),
                runner_code,
            }));
        };

        let signature: Signature = serde_json::from_str(signature_json)
            .map_err(|e| DomainError::InvalidSignature(e.to_string()))?;
        let test_cases = match test_cases_json.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => serde_json::from_str::<Vec<TestCase>>(raw)
                .map_err(|e| DomainError::InvalidTestCases(e.to_string()))?,
            None => Vec::new(),
        };

        Ok(JudgeTask::Function(FunctionTask {
            signature,
            test_cases,
        }))
    }

    pub fn mode(&self) -> JudgeMode {
        match self {
            JudgeTask::StreamIo(_) => JudgeMode::StreamIo,
            JudgeTask::Function(_) => JudgeMode::Function,
        }
    }
}
