//! In-memory implementation of [`ProjectStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, ephemeral editor
//! sessions, and anywhere persistence isn't needed. Contracts are kept in
//! their encoded form so content-hash comparison and decoding behave exactly
//! as in the SQLite backend.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use solcanvas_core::EthereumContract;

use crate::error::StorageError;
use crate::hash::{decode_contract, encode_contract, EncodedContract};
use crate::traits::ProjectStore;
use crate::types::{Project, ProjectId, ProjectSummary};

/// Data stored for a single project.
#[derive(Debug, Clone)]
struct StoredProject {
    name: String,
    /// Contracts keyed by name, in insertion order.
    contracts: IndexMap<String, EncodedContract>,
}

/// In-memory [`ProjectStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    projects: BTreeMap<i64, StoredProject>,
    next_id: i64,
    current: Option<(ProjectId, String)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    fn project(&self, id: ProjectId) -> Result<&StoredProject, StorageError> {
        self.projects
            .get(&id.0)
            .ok_or(StorageError::ProjectNotFound(id.0))
    }

    fn project_mut(&mut self, id: ProjectId) -> Result<&mut StoredProject, StorageError> {
        self.projects
            .get_mut(&id.0)
            .ok_or(StorageError::ProjectNotFound(id.0))
    }

    fn decode_project(id: ProjectId, stored: &StoredProject) -> Result<Project, StorageError> {
        let contracts = stored
            .contracts
            .values()
            .map(|c| decode_contract(&c.body))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Project {
            id,
            name: stored.name.clone(),
            contracts,
        })
    }
}

fn contract_not_found(id: ProjectId, name: &str) -> StorageError {
    StorageError::ContractNotFound {
        project: id.0,
        name: name.to_string(),
    }
}

impl ProjectStore for InMemoryStore {
    fn create_project(&mut self, name: &str) -> Result<ProjectId, StorageError> {
        if name.trim().is_empty() {
            return Err(StorageError::InvalidName {
                reason: "project name must not be empty".to_string(),
            });
        }
        self.next_id += 1;
        let id = ProjectId(self.next_id);
        self.projects.insert(
            id.0,
            StoredProject {
                name: name.to_string(),
                contracts: IndexMap::new(),
            },
        );
        Ok(id)
    }

    fn list_projects(&self) -> Result<Vec<ProjectSummary>, StorageError> {
        Ok(self
            .projects
            .iter()
            .map(|(&id, p)| ProjectSummary {
                id: ProjectId(id),
                name: p.name.clone(),
                contracts: p.contracts.keys().cloned().collect(),
            })
            .collect())
    }

    fn get_project(&self, id: ProjectId) -> Result<Project, StorageError> {
        Self::decode_project(id, self.project(id)?)
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), StorageError> {
        self.projects
            .remove(&id.0)
            .ok_or(StorageError::ProjectNotFound(id.0))?;
        if matches!(&self.current, Some((current, _)) if *current == id) {
            self.current = None;
        }
        Ok(())
    }

    fn add_contract_to_project(
        &mut self,
        id: ProjectId,
        contract: &EthereumContract,
    ) -> Result<(), StorageError> {
        let encoded = encode_contract(contract)?;
        let project = self.project_mut(id)?;
        if project.contracts.contains_key(&encoded.name) {
            return Err(StorageError::DuplicateContract {
                project: id.0,
                name: encoded.name,
            });
        }
        project.contracts.insert(encoded.name.clone(), encoded);
        Ok(())
    }

    fn update_contract(
        &mut self,
        id: ProjectId,
        contract: &EthereumContract,
    ) -> Result<bool, StorageError> {
        let encoded = encode_contract(contract)?;
        let project = self.project_mut(id)?;
        let stored = project
            .contracts
            .get_mut(&encoded.name)
            .ok_or_else(|| contract_not_found(id, &encoded.name))?;
        if stored.hash == encoded.hash {
            return Ok(false);
        }
        *stored = encoded;
        Ok(true)
    }

    fn get_contract(&self, id: ProjectId, name: &str) -> Result<EthereumContract, StorageError> {
        let stored = self
            .project(id)?
            .contracts
            .get(name)
            .ok_or_else(|| contract_not_found(id, name))?;
        decode_contract(&stored.body)
    }

    fn remove_contract(&mut self, id: ProjectId, name: &str) -> Result<(), StorageError> {
        self.project_mut(id)?
            .contracts
            .shift_remove(name)
            .ok_or_else(|| contract_not_found(id, name))?;
        if matches!(&self.current, Some((p, c)) if *p == id && c == name) {
            self.current = None;
        }
        Ok(())
    }

    fn set_current_contract(&mut self, id: ProjectId, name: &str) -> Result<(), StorageError> {
        if !self.project(id)?.contracts.contains_key(name) {
            return Err(contract_not_found(id, name));
        }
        self.current = Some((id, name.to_string()));
        Ok(())
    }

    fn get_current_project(&self) -> Result<Option<Project>, StorageError> {
        match &self.current {
            Some((id, _)) => self.get_project(*id).map(Some),
            None => Ok(None),
        }
    }

    fn get_current_contract(&self) -> Result<Option<EthereumContract>, StorageError> {
        match &self.current {
            Some((id, name)) => self.get_contract(*id, name).map(Some),
            None => Ok(None),
        }
    }
}
