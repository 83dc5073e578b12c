mod common;

use std::sync::Arc;
use std::time::Duration;

use arena_core::domain::{
    FunctionTask, JudgeTask, Signature, StreamIoTask, SubmissionStatus, TestCase, Value,
};
use arena_judge::{Judge, JudgeConfig, JudgeError, JudgeSubmission, WorkspaceManager};
use common::{Behavior, MockSandbox, workspace_entries};
use tempfile::TempDir;

fn judge_with(sandbox: &MockSandbox) -> (Judge, TempDir) {
    let root = tempfile::tempdir().expect("temp dir");
    let judge = Judge::new(
        WorkspaceManager::new(root.path().join("workspace")),
        Arc::new(sandbox.clone()),
    );
    (judge, root)
}

fn stream_submission(input: &str, expected: &str, runner_code: Option<&str>) -> JudgeSubmission {
    JudgeSubmission {
        identity: "alice".to_string(),
        solution: "def solve(a, b):\n    return a + b".to_string(),
        task: JudgeTask::StreamIo(StreamIoTask {
            input: input.to_string(),
            expected: expected.to_string(),
            runner_code: runner_code.map(str::to_string),
        }),
    }
}

fn value(raw: &str) -> Value {
    serde_json::from_str(raw).expect("valid JSON")
}

fn function_submission(language: &str, cases: &[(&str, &str)]) -> JudgeSubmission {
    JudgeSubmission {
        identity: "bob".to_string(),
        solution: "class Solution:\n    def add(self, a, b):\n        return a + b".to_string(),
        task: JudgeTask::Function(FunctionTask {
            signature: Signature {
                language: language.to_string(),
                class_name: "Solution".to_string(),
                function_name: "add".to_string(),
                parameters: Vec::new(),
                return_type: "int".to_string(),
            },
            test_cases: cases
                .iter()
                .map(|(input, output)| TestCase {
                    input: value(input),
                    output: value(output),
                })
                .collect(),
        }),
    }
}

#[tokio::test]
async fn test_stream_io_pass_cleans_workspace() {
    let sandbox = MockSandbox::new(Behavior::WriteOutput("3\n7\n".to_string()));
    let (judge, root) = judge_with(&sandbox);

    let verdict = judge
        .judge(&stream_submission("1 2\n3 4\n", "3\n7\n", None))
        .await
        .expect("run should complete");

    assert_eq!(verdict.status, SubmissionStatus::Passed);
    assert_eq!(verdict.output, "3\n7\n");
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[tokio::test]
async fn test_stream_io_stages_files_and_appends_runner() {
    let sandbox = MockSandbox::new(Behavior::WriteOutput("3\n".to_string()));
    let (judge, _root) = judge_with(&sandbox);

    judge
        .judge(&stream_submission("1 2\n", "3\n", Some("print(solve(1, 2))")))
        .await
        .expect("run should complete");

    let runs = sandbox.runs();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.command.program, "sh");
    assert_eq!(run.files["input.txt"], "1 2\n");
    assert_eq!(run.files["expected.txt"], "3\n");
    assert_eq!(run.files["output.txt"], "");
    assert_eq!(
        run.files["solution.py"],
        "def solve(a, b):\n    return a + b\n\nprint(solve(1, 2))"
    );
}

#[tokio::test]
async fn test_stream_io_mismatch_reports_first_line() {
    let sandbox = MockSandbox::new(Behavior::WriteOutput("3\n8\n".to_string()));
    let (judge, root) = judge_with(&sandbox);

    let verdict = judge
        .judge(&stream_submission("1 2\n3 4\n", "3\n7\n", None))
        .await
        .expect("run should complete");

    assert_eq!(verdict.status, SubmissionStatus::Failed);
    assert_eq!(verdict.expected_output, "7");
    assert_eq!(verdict.actual_output, "8");
    assert_eq!(verdict.test_case_input, "3 4");
    assert!(verdict.tally.is_none());
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[tokio::test]
async fn test_execution_error_hides_runner_code() {
    let runner = "import sys\nprint(solve(*map(int, sys.stdin.read().split())))";
    let stderr = "Traceback (most recent call last):\n  File \"/code/solution.py\", line 5, in <module>\n    print(solve(*map(int, sys.stdin.read().split())))\n  File \"/code/solution.py\", line 2, in solve\n    return a + c\nNameError: name 'c' is not defined";
    let sandbox = MockSandbox::new(Behavior::Crash {
        stderr: stderr.to_string(),
        stdout: String::new(),
    });
    let (judge, root) = judge_with(&sandbox);

    let err = judge
        .judge(&stream_submission("1 2\n", "3\n", Some(runner)))
        .await
        .expect_err("crash should surface as an error");

    let JudgeError::Execution { stderr, exit_code, .. } = err else {
        panic!("expected execution error, got {err:?}");
    };
    assert_eq!(exit_code, Some(1));
    assert!(!stderr.contains("sys.stdin.read()"));
    assert!(stderr.contains("return a + c"));
    assert!(stderr.contains("NameError"));
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[tokio::test]
async fn test_timeout_propagates_and_cleans_workspace() {
    let sandbox = MockSandbox::new(Behavior::Hang);
    let (judge, root) = judge_with(&sandbox);

    let err = judge
        .judge(&stream_submission("", "1\n", None))
        .await
        .expect_err("timeout should surface");

    assert!(matches!(err, JudgeError::Timeout(_)));
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[tokio::test]
async fn test_function_mode_all_cases_pass() {
    let sandbox = MockSandbox::new(Behavior::Print {
        stdout: "\n[{\"status\": \"ok\", \"result\": 3, \"time\": 0.01}, {\"status\": \"ok\", \"result\": 7.0, \"time\": 0.01}]\n".to_string(),
        stderr: String::new(),
    });
    let (judge, root) = judge_with(&sandbox);

    let verdict = judge
        .judge(&function_submission(
            "python",
            &[(r#"{"a": 1, "b": 2}"#, "3"), (r#"{"a": 3, "b": 4}"#, "7")],
        ))
        .await
        .expect("run should complete");

    assert!(verdict.is_passed());
    let tally = verdict.tally.expect("function mode reports a tally");
    assert_eq!((tally.passed, tally.total, tally.failed_index), (2, 2, None));

    let runs = sandbox.runs();
    let run = &runs[0];
    assert_eq!(run.command.program, "python");
    assert_eq!(run.command.args, vec!["runner.py".to_string()]);
    assert!(run.files["runner.py"].contains("\"Solution\""));
    assert!(run.files["runner.py"].contains("\"add\""));
    let staged: Vec<TestCase> =
        serde_json::from_str(&run.files["testcases.json"]).expect("test cases are JSON");
    assert_eq!(staged.len(), 2);
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[tokio::test]
async fn test_function_mode_reports_first_failing_case() {
    let sandbox = MockSandbox::new(Behavior::Print {
        stdout: "debug line from user\n[{\"status\": \"ok\", \"result\": 3}, {\"status\": \"ok\", \"result\": 8}, {\"status\": \"runtime_error\", \"error\": \"boom\", \"traceback\": \"Traceback: boom\"}]".to_string(),
        stderr: String::new(),
    });
    let (judge, _root) = judge_with(&sandbox);

    let verdict = judge
        .judge(&function_submission(
            "python",
            &[
                (r#"{"a": 1, "b": 2}"#, "3"),
                (r#"{"a": 3, "b": 4}"#, "7"),
                (r#"{"a": 5, "b": 6}"#, "11"),
            ],
        ))
        .await
        .expect("run should complete");

    assert_eq!(verdict.status, SubmissionStatus::Failed);
    assert_eq!(verdict.expected_output, "7");
    assert_eq!(verdict.actual_output, "8");
    assert_eq!(verdict.test_case_input, r#"{"a":3,"b":4}"#);
    let tally = verdict.tally.expect("tally");
    assert_eq!((tally.passed, tally.total, tally.failed_index), (1, 3, Some(2)));
}

#[tokio::test]
async fn test_malformed_harness_output_is_an_error() {
    let sandbox = MockSandbox::new(Behavior::Print {
        stdout: "Segmentation fault".to_string(),
        stderr: String::new(),
    });
    let (judge, root) = judge_with(&sandbox);

    let err = judge
        .judge(&function_submission("python", &[("[1, 2]", "3")]))
        .await
        .expect_err("garbage stdout should not be scored");

    assert!(matches!(err, JudgeError::MalformedHarnessOutput(_)));
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[tokio::test]
async fn test_unsupported_language_never_reaches_sandbox() {
    let sandbox = MockSandbox::new(Behavior::Print {
        stdout: "[]".to_string(),
        stderr: String::new(),
    });
    let (judge, root) = judge_with(&sandbox);

    let err = judge
        .judge(&function_submission("cobol", &[("[1, 2]", "3")]))
        .await
        .expect_err("only python is supported");

    assert!(matches!(err, JudgeError::UnsupportedLanguage(ref lang) if lang == "cobol"));
    assert!(sandbox.runs().is_empty());
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[tokio::test]
async fn test_concurrent_runs_by_same_submitter_are_isolated() {
    let sandbox = MockSandbox::new(Behavior::WriteOutput("3\n".to_string()))
        .with_delay(Duration::from_millis(50));
    let (judge, root) = judge_with(&sandbox);
    let submission = stream_submission("1 2\n", "3\n", None);

    let (first, second) = tokio::join!(judge.judge(&submission), judge.judge(&submission));

    assert!(first.expect("first run").is_passed());
    assert!(second.expect("second run").is_passed());
    let runs = sandbox.runs();
    assert_eq!(runs.len(), 2);
    assert_ne!(runs[0].workspace, runs[1].workspace);
    assert_eq!(workspace_entries(&root.path().join("workspace")), 0);
}

#[test]
fn test_config_parsing() {
    let config = JudgeConfig::from_str(
        r#"
workspace_root = "/tmp/arena"

[sandbox]
image = "python:3.12-slim"
timeout_secs = 5

[broker]
subscriber_buffer = 8
"#,
    )
    .expect("config should parse");

    assert_eq!(config.workspace_root, std::path::PathBuf::from("/tmp/arena"));
    assert_eq!(config.sandbox.image, "python:3.12-slim");
    assert_eq!(config.sandbox.timeout(), Duration::from_secs(5));
    assert_eq!(config.sandbox.runtime, "docker");
    assert_eq!(config.broker.subscriber_buffer, 8);
}
