//! HTTP handler modules for the solcanvas API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`EditorService`](crate::service::EditorService),
//! and return JSON responses. No business logic lives in handlers.

pub mod drag;
pub mod editor;
pub mod nodes;
pub mod palette;
pub mod projects;
