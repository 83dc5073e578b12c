//! Function-harness scoring.

use arena_core::domain::{CaseTally, RunResult, SubmissionStatus, TestCase, Value, Verdict};

use crate::error::{JudgeError, Result};

const MAX_ECHOED_LINE: usize = 200;

/// Parses the harness protocol: the last non-empty stdout line is a JSON array
/// of per-case results. Anything printed before it belongs to the submission.
pub fn parse_harness_output(stdout: &str) -> Result<Vec<RunResult>> {
    let last_line = stdout.trim().lines().next_back().unwrap_or("").trim();

    serde_json::from_str(last_line).map_err(|err| {
        let shown: String = last_line.chars().take(MAX_ECHOED_LINE).collect();
        JudgeError::MalformedHarnessOutput(format!("{err}; last line: {shown:?}"))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseFailure {
    /// 0-based test case index.
    pub index: usize,
    pub actual: String,
    pub expected: Value,
    pub input: Value,
    pub traceback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub passed: usize,
    pub total: usize,
    pub first_failure: Option<CaseFailure>,
}

impl Scorecard {
    pub fn status(&self) -> SubmissionStatus {
        if self.first_failure.is_none() && self.passed == self.total {
            SubmissionStatus::Passed
        } else {
            SubmissionStatus::Failed
        }
    }

    pub fn into_verdict(self, diagnostic: String) -> Verdict {
        let status = self.status();
        let tally = CaseTally {
            passed: self.passed,
            total: self.total,
            failed_index: self.first_failure.as_ref().map(|f| f.index + 1),
        };

        match self.first_failure {
            None => Verdict {
                status,
                message: diagnostic,
                output: String::new(),
                expected_output: String::new(),
                actual_output: String::new(),
                test_case_input: String::new(),
                tally: Some(tally),
            },
            Some(failure) => Verdict {
                status,
                message: failure.traceback.unwrap_or(diagnostic),
                output: failure.actual.clone(),
                expected_output: failure.expected.canonical(),
                actual_output: failure.actual,
                test_case_input: failure.input.canonical(),
                tally: Some(tally),
            },
        }
    }
}

/// A case passes iff it returned normally with a value structurally equal to
/// the expected one. Cases the harness reported nothing for count as failed.
/// Only the lowest-index failure is kept.
pub fn score(results: &[RunResult], test_cases: &[TestCase]) -> Scorecard {
    let mut passed = 0;
    let mut first_failure = None;

    for (index, case) in test_cases.iter().enumerate() {
        let result = results.get(index);
        let ok = result.is_some_and(|r| r.is_ok() && r.result == case.output);

        if ok {
            passed += 1;
            continue;
        }
        if first_failure.is_some() {
            continue;
        }

        let (actual, traceback) = match result {
            Some(r) => (
                r.display_output(),
                r.traceback.clone().filter(|t| !t.trim().is_empty()),
            ),
            None => ("no result reported for this test case".to_string(), None),
        };
        first_failure = Some(CaseFailure {
            index,
            actual,
            expected: case.output.clone(),
            input: case.input.clone(),
            traceback,
        });
    }

    Scorecard {
        passed,
        total: test_cases.len(),
        first_failure,
    }
}
