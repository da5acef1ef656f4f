//! Project persistence for solcanvas contracts.
//!
//! Provides the [`ProjectStore`] trait defining the storage contract that all
//! backends implement, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! A project is a named, ordered collection of contracts. Contracts are
//! keyed by their metadata name within a project and stored whole, as the
//! JSON form of [`EthereumContract`](solcanvas_core::EthereumContract)
//! alongside a blake3 content hash used to detect no-op saves. The store
//! also remembers which contract the editor last opened.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: ProjectId, Project, ProjectSummary storage-layer types
//! - [`traits`]: ProjectStore trait definition
//! - [`hash`]: contract encoding and content hashing
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migration setup for the SQLite backend
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod hash;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use hash::{decode_contract, encode_contract, EncodedContract};
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ProjectStore;
pub use types::{Project, ProjectId, ProjectSummary};
