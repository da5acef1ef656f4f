//! Sandbox execution environment for scaffolding contract projects.
//!
//! The editor writes generated projects into a [`Sandbox`]: a small async
//! filesystem-and-process surface. [`LocalSandbox`] maps it onto a directory
//! on disk; [`RetryingSandbox`] wraps any sandbox with a fixed retry policy
//! for filesystem calls. [`scaffold`] builds the base project tree and
//! exports contract descriptions into it.

pub mod error;
pub mod local;
pub mod retry;
pub mod scaffold;
pub mod tree;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::SandboxError;
pub use local::LocalSandbox;
pub use retry::{RetryPolicy, RetryingSandbox};
pub use tree::{FileNode, FileTree};

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnOutput {
    /// `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl SpawnOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Filesystem and process access scoped to one sandbox.
///
/// Paths are relative to the sandbox root and use `/` as separator.
#[async_trait]
pub trait Sandbox: Send + Sync {
    /// Writes a file, creating parent directories as needed.
    async fn write_file(&self, path: &str, contents: &str) -> Result<(), SandboxError>;

    /// Reads a whole file as UTF-8.
    async fn read_file(&self, path: &str) -> Result<String, SandboxError>;

    /// Runs a command in the sandbox root and waits for it to finish.
    async fn spawn(&self, command: &str, args: &[String]) -> Result<SpawnOutput, SandboxError>;

    /// Writes every file of `tree` under the sandbox root.
    async fn mount(&self, tree: &FileTree) -> Result<(), SandboxError> {
        for (path, contents) in tree.files() {
            self.write_file(&path, contents).await?;
        }
        Ok(())
    }
}
