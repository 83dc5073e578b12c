//! 两种评测方式。
//!
//! 策略负责写入工作目录文件、给出沙箱命令，并把沙箱输出转换为 [`Verdict`]。

use std::collections::HashSet;

use arena_core::domain::{FunctionTask, JudgeTask, StreamIoTask, SubmissionStatus, Verdict};
use async_trait::async_trait;

use crate::compare::compare;
use crate::error::Result;
use crate::harness;
use crate::sandbox::{SandboxCommand, SandboxOutput};
use crate::scorer::{parse_harness_output, score};
use crate::workspace::Workspace;

pub const SOLUTION_FILE: &str = "solution.py";
pub const INPUT_FILE: &str = "input.txt";
pub const EXPECTED_FILE: &str = "expected.txt";
pub const OUTPUT_FILE: &str = "output.txt";
pub const TEST_CASES_FILE: &str = "testcases.json";
pub const HARNESS_FILE: &str = "runner.py";

#[async_trait]
pub trait JudgeStrategy: Send + Sync {
    async fn stage(&self, workspace: &Workspace, solution: &str) -> Result<()>;

    fn command(&self) -> SandboxCommand;

    async fn interpret(&self, workspace: &Workspace, output: SandboxOutput) -> Result<Verdict>;

    /// 从诊断信息中去掉提交者不应看到的内容。
    fn redact(&self, diagnostic: &str) -> String {
        diagnostic.to_string()
    }
}

pub fn for_task(task: &JudgeTask) -> Box<dyn JudgeStrategy + '_> {
    match task {
        JudgeTask::StreamIo(task) => Box::new(StreamIoStrategy { task }),
        JudgeTask::Function(task) => Box::new(FunctionStrategy { task }),
    }
}

pub struct StreamIoStrategy<'a> {
    task: &'a StreamIoTask,
}

impl<'a> StreamIoStrategy<'a> {
    pub fn new(task: &'a StreamIoTask) -> Self {
        Self { task }
    }

    fn full_solution(&self, solution: &str) -> String {
        match &self.task.runner_code {
            Some(runner) => format!("{solution}\n\n{runner}"),
            None => solution.to_string(),
        }
    }
}

#[async_trait]
impl<'a> JudgeStrategy for StreamIoStrategy<'a> {
    async fn stage(&self, workspace: &Workspace, solution: &str) -> Result<()> {
        workspace
            .write(SOLUTION_FILE, self.full_solution(solution))
            .await?;
        workspace.write(INPUT_FILE, &self.task.input).await?;
        workspace.write(EXPECTED_FILE, &self.task.expected).await?;
        workspace.write(OUTPUT_FILE, "").await
    }

    fn command(&self) -> SandboxCommand {
        SandboxCommand::shell(format!(
            "python {SOLUTION_FILE} < {INPUT_FILE} > {OUTPUT_FILE}"
        ))
    }

    async fn interpret(&self, workspace: &Workspace, output: SandboxOutput) -> Result<Verdict> {
        let actual = workspace.read_to_string(OUTPUT_FILE).await?;
        let comparison = compare(&actual, &self.task.expected, &self.task.input);

        let status = if comparison.passed {
            SubmissionStatus::Passed
        } else {
            SubmissionStatus::Failed
        };

        Ok(Verdict {
            status,
            message: self.redact(&output.stderr),
            output: self.redact(&actual),
            expected_output: comparison.expected,
            actual_output: self.redact(&comparison.actual),
            test_case_input: comparison.input,
            tally: None,
        })
    }

    fn redact(&self, diagnostic: &str) -> String {
        match &self.task.runner_code {
            Some(runner) => redact_hidden(diagnostic, runner),
            None => diagnostic.to_string(),
        }
    }
}

pub struct FunctionStrategy<'a> {
    task: &'a FunctionTask,
}

impl<'a> FunctionStrategy<'a> {
    pub fn new(task: &'a FunctionTask) -> Self {
        Self { task }
    }
}

#[async_trait]
impl<'a> JudgeStrategy for FunctionStrategy<'a> {
    async fn stage(&self, workspace: &Workspace, solution: &str) -> Result<()> {
        // 先渲染模板，签名有误时不写入任何文件。
        let harness = harness::render(&self.task.signature)?;
        let test_cases = serde_json::to_string(&self.task.test_cases)?;

        workspace.write(SOLUTION_FILE, solution).await?;
        workspace.write(TEST_CASES_FILE, test_cases).await?;
        workspace.write(HARNESS_FILE, harness).await
    }

    fn command(&self) -> SandboxCommand {
        SandboxCommand::new("python", [HARNESS_FILE])
    }

    async fn interpret(&self, _workspace: &Workspace, output: SandboxOutput) -> Result<Verdict> {
        let results = parse_harness_output(&output.stdout)?;
        Ok(score(&results, &self.task.test_cases).into_verdict(output.stderr))
    }
}

/// 删除与 `hidden` 中某一行相同（去除首尾空白后）的行，
/// 避免隐藏代码通过 traceback 泄露。
pub fn redact_hidden(text: &str, hidden: &str) -> String {
    let hidden_lines: HashSet<&str> = hidden
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if hidden_lines.is_empty() {
        return text.to_string();
    }

    text.lines()
        .filter(|line| !hidden_lines.contains(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
