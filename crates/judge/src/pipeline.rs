use std::sync::Arc;

use arena_core::domain::{JudgeTask, RunId, Verdict};
use tracing::{info, warn};

use crate::config::JudgeConfig;
use crate::error::{JudgeError, Result};
use crate::sandbox::{DockerSandbox, Sandbox};
use crate::strategy::{self, JudgeStrategy};
use crate::workspace::{Workspace, WorkspaceManager};

#[derive(Debug, Clone)]
pub struct JudgeSubmission {
    /// 提交者标识，仅用于工作目录命名。
    pub identity: String,
    pub solution: String,
    pub task: JudgeTask,
}

/// 评测流水线：准备工作目录、在沙箱中运行、解析结果，
/// 无论成功与否都会清理工作目录。
pub struct Judge {
    workspaces: WorkspaceManager,
    sandbox: Arc<dyn Sandbox>,
}

impl Judge {
    pub fn new(workspaces: WorkspaceManager, sandbox: Arc<dyn Sandbox>) -> Self {
        Self {
            workspaces,
            sandbox,
        }
    }

    pub fn from_config(config: &JudgeConfig) -> Self {
        info!(
            workspace_root = %config.workspace_root.display(),
            runtime = %config.sandbox.runtime,
            image = %config.sandbox.image,
            cpus = %config.sandbox.cpus,
            memory = %config.sandbox.memory,
            timeout_secs = config.sandbox.timeout_secs,
            "initializing judge"
        );

        Self::new(
            WorkspaceManager::new(&config.workspace_root),
            Arc::new(DockerSandbox::new(config.sandbox.clone())),
        )
    }

    pub fn workspaces(&self) -> &WorkspaceManager {
        &self.workspaces
    }

    #[tracing::instrument(
        skip(self, submission),
        fields(
            identity = %submission.identity,
            mode = ?submission.task.mode(),
            run_id = tracing::field::Empty
        )
    )]
    pub async fn judge(&self, submission: &JudgeSubmission) -> Result<Verdict> {
        let run_id = RunId::new();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let strategy = strategy::for_task(&submission.task);
        let workspace = self.workspaces.prepare(&submission.identity, run_id).await?;

        let outcome = self
            .execute(&workspace, strategy.as_ref(), &submission.solution)
            .await;

        if let Err(err) = workspace.destroy().await {
            warn!(error = %err, "failed to destroy workspace");
        }

        match &outcome {
            Ok(verdict) => info!(status = %verdict.status, "run judged"),
            Err(err) => warn!(error = %err, "run failed"),
        }
        outcome
    }

    async fn execute(
        &self,
        workspace: &Workspace,
        strategy: &dyn JudgeStrategy,
        solution: &str,
    ) -> Result<Verdict> {
        strategy.stage(workspace, solution).await?;

        let output = match self.sandbox.run(workspace, &strategy.command()).await {
            Ok(output) => output,
            Err(JudgeError::Execution {
                stderr,
                stdout,
                exit_code,
            }) => {
                return Err(JudgeError::Execution {
                    stderr: strategy.redact(&stderr),
                    stdout: strategy.redact(&stdout),
                    exit_code,
                });
            }
            Err(err) => return Err(err),
        };

        strategy.interpret(workspace, output).await
    }
}
