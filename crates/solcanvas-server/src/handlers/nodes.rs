//! Node and connection edit handlers.

use axum::extract::{Path, State};
use axum::Json;
use solcanvas_core::ComponentId;

use crate::error::ApiError;
use crate::schema::editor::{
    ConnectionRequest, ConnectionResponse, NodeResponse, UpdateNodeRequest,
};
use crate::state::AppState;

/// Updates a node's data, position or size. Data is validated first.
///
/// `PUT /editor/nodes/{id}`
pub async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNodeRequest>,
) -> Result<Json<NodeResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let node = service.update_node(&ComponentId::from(id), req)?;
    Ok(Json(NodeResponse { node }))
}

/// Deletes a node and every connection touching it.
///
/// `DELETE /editor/nodes/{id}`
pub async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_node(&ComponentId::from(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `POST /editor/connections`
pub async fn connect(
    State(state): State<AppState>,
    Json(req): Json<ConnectionRequest>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let changed = service.connect(&req.from, &req.to)?;
    Ok(Json(ConnectionResponse { changed }))
}

/// `DELETE /editor/connections`
pub async fn disconnect(
    State(state): State<AppState>,
    Json(req): Json<ConnectionRequest>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let changed = service.disconnect(&req.from, &req.to)?;
    Ok(Json(ConnectionResponse { changed }))
}
