//! HTTP/JSON API server for the solcanvas contract editor.
//!
//! Exposes the editor session (component graph, drag protocol, detail forms,
//! layout), project persistence, and sandbox export over a REST API. This
//! crate contains the server framework, API schema types, error handling,
//! and route definitions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
