//! Project and contract management request/response types.

use serde::{Deserialize, Serialize};
use solcanvas_core::EthereumContract;
use solcanvas_storage::{ProjectId, ProjectSummary};

/// Request to create a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    /// The name for the new project.
    pub name: String,
}

/// Response from creating a project.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectResponse {
    /// The assigned project identifier.
    pub id: ProjectId,
    /// The project name.
    pub name: String,
}

/// Response for listing all projects.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
}

/// Request to add a contract to a project.
///
/// With only `name`, an empty contract is created. With `contract`, the full
/// description is stored as given (its own name wins).
#[derive(Debug, Clone, Deserialize)]
pub struct AddContractRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contract: Option<EthereumContract>,
}

/// Response from adding a contract.
#[derive(Debug, Clone, Serialize)]
pub struct AddContractResponse {
    pub project: ProjectId,
    pub name: String,
    pub components: usize,
}
