//! Editor session handlers: summary, rendering, layout, save and export.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::editor::{
    EditorSummary, ExportResponse, LayoutResponse, RenderRequest, RenderResponse, SaveResponse,
};
use crate::state::AppState;

/// Returns the editor session summary.
///
/// `GET /editor`
pub async fn summary(State(state): State<AppState>) -> Json<EditorSummary> {
    let service = state.service.lock().await;
    Json(service.summary())
}

/// Returns the nodes inside a viewport.
///
/// `POST /editor/render`
pub async fn render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Json<RenderResponse> {
    let service = state.service.lock().await;
    Json(RenderResponse {
        nodes: service.render(&req.viewport),
        total: service.node_count(),
    })
}

/// Places every unpositioned node in its default grid slot.
///
/// `POST /editor/layout`
pub async fn apply_layout(
    State(state): State<AppState>,
) -> Result<Json<LayoutResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let placed = service.apply_layout()?;
    Ok(Json(LayoutResponse { placed }))
}

/// Writes the canvas back to the project store.
///
/// `POST /editor/save`
pub async fn save(State(state): State<AppState>) -> Result<Json<SaveResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let changed = service.save()?;
    Ok(Json(SaveResponse { changed }))
}

/// Exports the open contract into its project's sandbox directory.
///
/// `POST /editor/export`
pub async fn export(State(state): State<AppState>) -> Result<Json<ExportResponse>, ApiError> {
    let job = {
        let service = state.service.lock().await;
        service.prepare_export()?
    };
    Ok(Json(job.run().await?))
}
