use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arena_judge::{JudgeError, Result, Sandbox, SandboxCommand, SandboxOutput, Workspace};
use async_trait::async_trait;

/// What the fake container does when run.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Writes `output.txt` like the stream-IO redirection would.
    WriteOutput(String),
    /// Prints to stdout, as the function harness does.
    Print { stdout: String, stderr: String },
    /// Exits non-zero.
    Crash { stderr: String, stdout: String },
    /// Exceeds the wall-clock limit.
    Hang,
}

#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub workspace: PathBuf,
    pub command: SandboxCommand,
    /// Every staged file, name to contents, as seen at launch.
    pub files: BTreeMap<String, String>,
}

#[derive(Clone)]
pub struct MockSandbox {
    behavior: Behavior,
    delay: Duration,
    runs: Arc<Mutex<Vec<RecordedRun>>>,
}

impl MockSandbox {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            runs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().expect("runs lock").clone()
    }
}

#[async_trait]
impl Sandbox for MockSandbox {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, workspace: &Workspace, command: &SandboxCommand) -> Result<SandboxOutput> {
        let mut files = BTreeMap::new();
        for entry in std::fs::read_dir(workspace.path())? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            files.insert(name, std::fs::read_to_string(entry.path())?);
        }
        self.runs.lock().expect("runs lock").push(RecordedRun {
            workspace: workspace.path().to_path_buf(),
            command: command.clone(),
            files,
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.behavior {
            Behavior::WriteOutput(output) => {
                workspace.write("output.txt", output).await?;
                Ok(SandboxOutput {
                    exit_code: Some(0),
                    ..SandboxOutput::default()
                })
            }
            Behavior::Print { stdout, stderr } => Ok(SandboxOutput {
                stdout: stdout.clone(),
                stderr: stderr.clone(),
                exit_code: Some(0),
            }),
            Behavior::Crash { stderr, stdout } => Err(JudgeError::Execution {
                stderr: stderr.clone(),
                stdout: stdout.clone(),
                exit_code: Some(1),
            }),
            Behavior::Hang => Err(JudgeError::Timeout(Duration::from_secs(10))),
        }
    }
}

pub fn workspace_entries(root: &std::path::Path) -> usize {
    match std::fs::read_dir(root) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}
