//! Drag protocol handlers.
//!
//! A drag is `start`, any number of `move`s, then `end` or `cancel`. Events
//! that arrive out of order are rejected with 409.

use axum::extract::State;
use axum::Json;
use solcanvas_core::DropOutcome;

use crate::error::ApiError;
use crate::schema::editor::{DragEndRequest, DragMoveRequest, DragMoveResponse, DragStartRequest};
use crate::state::AppState;

/// `POST /editor/drag/start`
pub async fn start(
    State(state): State<AppState>,
    Json(req): Json<DragStartRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.drag_start(req.payload, req.pointer)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `POST /editor/drag/move`
pub async fn move_to(
    State(state): State<AppState>,
    Json(req): Json<DragMoveRequest>,
) -> Result<Json<DragMoveResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let preview = service.drag_move(req.pointer)?;
    Ok(Json(DragMoveResponse { preview }))
}

/// `POST /editor/drag/end`
pub async fn end(
    State(state): State<AppState>,
    Json(req): Json<DragEndRequest>,
) -> Result<Json<DropOutcome>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.drag_end(req.drop)?))
}

/// `POST /editor/drag/cancel`
pub async fn cancel(State(state): State<AppState>) -> Json<DropOutcome> {
    let mut service = state.service.lock().await;
    Json(service.drag_cancel())
}
