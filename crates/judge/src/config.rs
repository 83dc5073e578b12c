use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, ensure};
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
}

impl JudgeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("failed to deserialize judge config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.sandbox.timeout_secs > 0,
            "sandbox.timeout_secs must be greater than zero"
        );
        ensure!(
            self.broker.subscriber_buffer > 0,
            "broker.subscriber_buffer must be greater than zero"
        );
        ensure!(
            self.sandbox.mount_point.starts_with('/'),
            "sandbox.mount_point must be an absolute container path"
        );
        Ok(())
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            sandbox: SandboxConfig::default(),
            broker: BrokerConfig::default(),
        }
    }
}

/// Resource policy for the container each run executes in.
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxConfig {
    #[serde(default = "default_runtime")]
    pub runtime: String,
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_cpus")]
    pub cpus: String,
    #[serde(default = "default_memory")]
    pub memory: String,
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default = "default_pids_limit")]
    pub pids_limit: Option<u32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_mount_point")]
    pub mount_point: String,
}

impl SandboxConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            image: default_image(),
            cpus: default_cpus(),
            memory: default_memory(),
            network: default_network(),
            pids_limit: default_pids_limit(),
            timeout_secs: default_timeout_secs(),
            mount_point: default_mount_point(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: default_subscriber_buffer(),
        }
    }
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from("workspace")
}

fn default_runtime() -> String {
    "docker".to_string()
}

fn default_image() -> String {
    "python:3.11".to_string()
}

fn default_cpus() -> String {
    "0.5".to_string()
}

fn default_memory() -> String {
    "128m".to_string()
}

fn default_network() -> String {
    "none".to_string()
}

fn default_pids_limit() -> Option<u32> {
    Some(64)
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_mount_point() -> String {
    "/code".to_string()
}

fn default_subscriber_buffer() -> usize {
    5
}
