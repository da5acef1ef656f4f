//! Sandbox error types.

use std::io;

use thiserror::Error;

/// Errors produced by sandbox operations.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// A filesystem call failed.
    #[error("io error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The path is absolute or escapes the sandbox root.
    #[error("invalid sandbox path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The process could not be started.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SandboxError {
    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        SandboxError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Only filesystem failures are transient; a missing file or a rejected
    /// path will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            SandboxError::Io { source, .. } => !matches!(
                source.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput
            ),
            _ => false,
        }
    }
}
