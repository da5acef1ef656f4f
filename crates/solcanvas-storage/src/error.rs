//! Storage error types for solcanvas-storage.
//!
//! [`StorageError`] covers the failure modes of both backends: encoding,
//! SQLite and migration failures, and the not-found / duplicate cases of
//! projects and contracts.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SQLite driver reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A project with the given ID was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(i64),

    /// The project has no contract with this name.
    #[error("contract not found: project={project}, contract='{name}'")]
    ContractNotFound { project: i64, name: String },

    /// The project already has a contract with this name.
    #[error("duplicate contract: project={project}, contract='{name}'")]
    DuplicateContract { project: i64, name: String },

    /// A project or contract name was empty.
    #[error("invalid name: {reason}")]
    InvalidName { reason: String },

    /// Stored data did not decode to a contract.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
