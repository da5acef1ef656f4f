//! Project management handlers (create, list, delete, add and open contracts).

use axum::extract::{Path, State};
use axum::Json;
use solcanvas_storage::ProjectId;

use crate::error::ApiError;
use crate::schema::editor::EditorSummary;
use crate::schema::projects::{
    AddContractRequest, AddContractResponse, CreateProjectRequest, CreateProjectResponse,
    ProjectListResponse,
};
use crate::state::AppState;

/// Lists all projects.
///
/// `GET /projects`
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let service = state.service.lock().await;
    let projects = service.list_projects()?;
    Ok(Json(ProjectListResponse { projects }))
}

/// Creates a new project.
///
/// `POST /projects`
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<CreateProjectResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let id = service.create_project(&req.name)?;
    Ok(Json(CreateProjectResponse { id, name: req.name }))
}

/// Deletes a project with all of its contracts.
///
/// `DELETE /projects/{id}`
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_project(ProjectId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Adds a contract to a project.
///
/// `POST /projects/{id}/contracts`
pub async fn add_contract(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AddContractRequest>,
) -> Result<Json<AddContractResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.add_contract(ProjectId(id), req)?;
    Ok(Json(response))
}

/// Opens a contract in the editor.
///
/// `POST /projects/{id}/contracts/{name}/open`
pub async fn open_contract(
    State(state): State<AppState>,
    Path((id, name)): Path<(i64, String)>,
) -> Result<Json<EditorSummary>, ApiError> {
    let mut service = state.service.lock().await;
    let summary = service.open_contract(ProjectId(id), &name)?;
    Ok(Json(summary))
}
