//! [`Sandbox`] backed by a directory on the local filesystem.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::SandboxError;
use crate::{Sandbox, SpawnOutput};

/// A sandbox rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalSandbox {
    root: PathBuf,
}

impl LocalSandbox {
    /// Uses `root` as the sandbox root. The directory is created on first
    /// write if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalSandbox { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a sandbox path onto the local filesystem.
    ///
    /// Only plain relative paths are accepted: no root, no drive prefix and
    /// no `..` segments.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, SandboxError> {
        let invalid = |reason: &str| SandboxError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        if path.trim().is_empty() {
            return Err(invalid("path is empty"));
        }
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("path escapes the sandbox root")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("path must be relative"))
                }
            }
        }
        if resolved == self.root {
            return Err(invalid("path names the sandbox root"));
        }
        Ok(resolved)
    }
}

#[async_trait]
impl Sandbox for LocalSandbox {
    async fn write_file(&self, path: &str, contents: &str) -> Result<(), SandboxError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SandboxError::io(path, e))?;
        }
        tokio::fs::write(&target, contents)
            .await
            .map_err(|e| SandboxError::io(path, e))?;
        tracing::trace!(path, bytes = contents.len(), "wrote sandbox file");
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String, SandboxError> {
        let target = self.resolve(path)?;
        tokio::fs::read_to_string(&target)
            .await
            .map_err(|e| SandboxError::io(path, e))
    }

    async fn spawn(&self, command: &str, args: &[String]) -> Result<SpawnOutput, SandboxError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SandboxError::io(self.root.display().to_string(), e))?;
        tracing::debug!(command, ?args, root = %self.root.display(), "spawning");
        let output = Command::new(command)
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|source| SandboxError::Spawn {
                command: command.to_string(),
                source,
            })?;
        Ok(SpawnOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
