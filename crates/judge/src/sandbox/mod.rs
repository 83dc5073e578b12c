//! 沙箱抽象。
//!
//! 在隔离且限制资源的环境中，针对已准备好的 [`Workspace`] 运行一条命令并返回输出。
//! 进程退出或被终止后调用才返回。

use async_trait::async_trait;

use crate::error::Result;
use crate::workspace::Workspace;

pub mod docker;

pub use docker::DockerSandbox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SandboxCommand {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 通过 `sh -c` 执行脚本，用于需要重定向的命令。
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("sh", ["-c".to_string(), script.into()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

#[async_trait]
pub trait Sandbox: Send + Sync {
    /// 日志中使用的名称。
    fn name(&self) -> &str;

    /// 以工作目录为当前目录执行 `command`。
    ///
    /// 只尝试一次：启动失败或非零退出返回携带 stderr 的
    /// [`JudgeError::Execution`](crate::JudgeError::Execution)；
    /// 超出时间限制的运行会被终止，并返回 [`JudgeError::Timeout`](crate::JudgeError::Timeout)。
    async fn run(&self, workspace: &Workspace, command: &SandboxCommand) -> Result<SandboxOutput>;
}
