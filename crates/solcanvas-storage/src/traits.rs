//! The [`ProjectStore`] trait defining the storage contract for projects.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait with
//! identical semantics, so they are fully swappable without changing the
//! editor service.

use solcanvas_core::EthereumContract;

use crate::error::StorageError;
use crate::types::{Project, ProjectId, ProjectSummary};

/// The storage contract for projects and their contracts.
///
/// The trait is synchronous (not async) for simplicity; the server holds the
/// store behind its session mutex.
pub trait ProjectStore {
    // -------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------

    /// Creates a new empty project with the given name.
    fn create_project(&mut self, name: &str) -> Result<ProjectId, StorageError>;

    /// Lists all stored projects, oldest first.
    fn list_projects(&self) -> Result<Vec<ProjectSummary>, StorageError>;

    /// Loads a project with all of its contracts.
    fn get_project(&self, id: ProjectId) -> Result<Project, StorageError>;

    /// Deletes a project and all of its contracts.
    ///
    /// Clears the current-contract pointer if it pointed into this project.
    fn delete_project(&mut self, id: ProjectId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Contracts
    // -------------------------------------------------------------------

    /// Adds a new contract to a project.
    ///
    /// Fails with [`StorageError::DuplicateContract`] if the project already
    /// has a contract of the same name.
    fn add_contract_to_project(
        &mut self,
        id: ProjectId,
        contract: &EthereumContract,
    ) -> Result<(), StorageError>;

    /// Replaces the stored contract with the same name.
    ///
    /// Returns `false` if the stored content was already identical (by
    /// content hash) and nothing was written.
    fn update_contract(
        &mut self,
        id: ProjectId,
        contract: &EthereumContract,
    ) -> Result<bool, StorageError>;

    /// Loads one contract by name.
    fn get_contract(&self, id: ProjectId, name: &str) -> Result<EthereumContract, StorageError>;

    /// Removes one contract by name.
    fn remove_contract(&mut self, id: ProjectId, name: &str) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Current selection
    // -------------------------------------------------------------------

    /// Records which contract the editor has open.
    fn set_current_contract(&mut self, id: ProjectId, name: &str) -> Result<(), StorageError>;

    /// The project of the open contract, if any.
    fn get_current_project(&self) -> Result<Option<Project>, StorageError>;

    /// The open contract, if any.
    fn get_current_contract(&self) -> Result<Option<EthereumContract>, StorageError>;
}
