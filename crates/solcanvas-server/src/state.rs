//! Application state with the shared `EditorService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. Uses `tokio::sync::Mutex` (async-aware) so handlers await
//! the lock without blocking the runtime, and so the lock can be held across
//! the sandbox's async file writes. The editor has a single session: every
//! request runs to completion against it before the next one starts.

use std::sync::Arc;

use solcanvas_storage::{InMemoryStore, SqliteStore};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::EditorService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<tokio::sync::Mutex<EditorService>>,
}

impl AppState {
    /// Creates the state with a SQLite-backed service.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let store = SqliteStore::new(&config.db_path)?;
        let service = EditorService::new(Box::new(store), config.sandbox_dir.clone())?;
        Ok(Self::from_service(service))
    }

    /// Creates the state with an in-memory store and a throwaway sandbox
    /// directory (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let sandbox_dir =
            std::env::temp_dir().join(format!("solcanvas_sandbox_{}", uuid::Uuid::new_v4()));
        let service = EditorService::new(Box::new(InMemoryStore::new()), sandbox_dir)?;
        Ok(Self::from_service(service))
    }

    pub fn from_service(service: EditorService) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        }
    }
}
