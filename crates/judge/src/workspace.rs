//! 与沙箱共享的单次运行工作目录。
//!
//! 目录以 run id 区分，同一提交者的并发运行互不干扰。
//! [`Workspace`] 在 `destroy` 时删除目录；若运行中途被放弃，drop 时再次清理。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use arena_core::domain::RunId;
use tracing::{debug, warn};

use crate::error::{JudgeError, Result};

const MAX_IDENTITY_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 创建（或复用）`run_id` 对应的目录，并返回持有该目录的句柄。
    #[tracing::instrument(skip(self))]
    pub async fn prepare(&self, identity: &str, run_id: RunId) -> Result<Workspace> {
        let dir = self
            .root
            .join(format!("{}-{}", sanitize_identity(identity), run_id));

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| JudgeError::workspace(&dir, e))?;
        // 容器挂载需要宿主机绝对路径。
        let path = tokio::fs::canonicalize(&dir)
            .await
            .map_err(|e| JudgeError::workspace(&dir, e))?;

        debug!(path = %path.display(), "workspace prepared");
        Ok(Workspace {
            path,
            run_id,
            released: false,
        })
    }
}

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    run_id: RunId,
    released: bool,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub async fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let target = self.path.join(name);
        tokio::fs::write(&target, contents)
            .await
            .map_err(|e| JudgeError::workspace(&target, e))
    }

    pub async fn read_to_string(&self, name: &str) -> Result<String> {
        let target = self.path.join(name);
        tokio::fs::read_to_string(&target)
            .await
            .map_err(|e| JudgeError::workspace(&target, e))
    }

    /// 递归删除目录，目录不存在时视为成功。
    pub async fn destroy(mut self) -> Result<()> {
        self.released = true;
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "workspace destroyed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(JudgeError::workspace(&self.path, e)),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "abandoned workspace removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove abandoned workspace"
            ),
        }
    }
}

/// 防止标识逃逸出工作根目录或生成异常目录名。
fn sanitize_identity(identity: &str) -> String {
    let cleaned: String = identity
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_IDENTITY_LEN)
        .collect();

    if cleaned.is_empty() {
        "anonymous".to_string()
    } else {
        cleaned
    }
}
