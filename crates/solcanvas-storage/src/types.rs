//! Storage-layer types for project identity and metadata.
//!
//! [`ProjectId`] is defined here (not in solcanvas-core) because project
//! identity is a storage concern: projects only gain an ID when persisted.

use std::fmt;

use serde::{Deserialize, Serialize};
use solcanvas_core::EthereumContract;

/// Unique identifier for a stored project.
///
/// The inner `i64` aligns with SQLite's `INTEGER PRIMARY KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub i64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

/// Summary of a stored project (for listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    /// Contract names, in the order they were added.
    pub contracts: Vec<String>,
}

/// A project with all of its contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub contracts: Vec<EthereumContract>,
}

impl Project {
    pub fn contract(&self, name: &str) -> Option<&EthereumContract> {
        self.contracts.iter().find(|c| c.name() == name)
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            name: self.name.clone(),
            contracts: self.contracts.iter().map(|c| c.name().to_string()).collect(),
        }
    }
}
