use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{Sandbox, SandboxCommand, SandboxOutput};
use crate::config::SandboxConfig;
use crate::error::{JudgeError, Result};
use crate::workspace::Workspace;

/// 每条命令运行在新建且自动删除的容器中，工作目录挂载到配置的挂载点。
#[derive(Debug, Clone)]
pub struct DockerSandbox {
    config: SandboxConfig,
}

impl DockerSandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// 容器名由 run id 生成，超时时可按名称终止。
    pub fn container_name(workspace: &Workspace) -> String {
        format!("arena-run-{}", workspace.run_id())
    }

    pub fn run_args(&self, workspace: &Workspace, command: &SandboxCommand) -> Vec<String> {
        let config = &self.config;
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            Self::container_name(workspace),
            format!("--cpus={}", config.cpus),
            format!("--memory={}", config.memory),
            format!("--memory-swap={}", config.memory),
            format!("--network={}", config.network),
        ];
        if let Some(limit) = config.pids_limit {
            args.push(format!("--pids-limit={limit}"));
        }
        args.extend([
            "-v".to_string(),
            format!("{}:{}", workspace.path().display(), config.mount_point),
            "-w".to_string(),
            config.mount_point.clone(),
            config.image.clone(),
            command.program.clone(),
        ]);
        args.extend(command.args.iter().cloned());
        args
    }

    async fn kill(&self, container: &str) {
        let result = Command::new(&self.config.runtime)
            .args(["kill", container])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                info!(container, "timed-out container killed");
            }
            Ok(output) => warn!(
                container,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "failed to kill timed-out container"
            ),
            Err(err) => warn!(container, error = %err, "failed to run container kill"),
        }
    }
}

#[async_trait]
impl Sandbox for DockerSandbox {
    fn name(&self) -> &str {
        &self.config.runtime
    }

    async fn run(&self, workspace: &Workspace, command: &SandboxCommand) -> Result<SandboxOutput> {
        let container = Self::container_name(workspace);
        let args = self.run_args(workspace, command);
        debug!(runtime = %self.config.runtime, args = ?args, "launching sandbox");

        let child = Command::new(&self.config.runtime)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| JudgeError::Execution {
                stderr: format!("failed to launch sandbox: {err}"),
                stdout: String::new(),
                exit_code: None,
            })?;

        let timeout = self.config.timeout();
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(container = %container, timeout_secs = timeout.as_secs(), "sandbox run timed out");
                self.kill(&container).await;
                return Err(JudgeError::Timeout(timeout));
            }
        };

        let result = SandboxOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        if output.status.success() {
            debug!(container = %container, "sandbox run finished");
            Ok(result)
        } else {
            info!(container = %container, exit_code = ?result.exit_code, "sandbox run failed");
            Err(JudgeError::Execution {
                stderr: result.stderr,
                stdout: result.stdout,
                exit_code: result.exit_code,
            })
        }
    }
}
