//! Editor session request/response types: canvas state, rendering, drag
//! events, node edits, connections, save and export.

use serde::{Deserialize, Serialize};
use solcanvas_core::{
    ComponentData, ComponentId, DragPayload, GraphIssue, NodeView, Position, RenderNode, Viewport,
};
use solcanvas_storage::ProjectId;

/// Snapshot of the editor session.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSummary {
    /// Project of the open contract, if any.
    pub project: Option<ProjectId>,
    /// Name of the open contract, if any.
    pub contract: Option<String>,
    /// Whether the canvas has unsaved changes.
    pub dirty: bool,
    pub components: usize,
    pub connections: usize,
    pub dragging: bool,
    pub nodes: Vec<NodeView>,
    /// Contract-level validation problems.
    pub issues: Vec<GraphIssue>,
}

/// Request to render the visible part of the canvas.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    pub viewport: Viewport,
}

/// Nodes inside the (overscanned) viewport.
#[derive(Debug, Clone, Serialize)]
pub struct RenderResponse {
    pub nodes: Vec<RenderNode>,
    /// Number of nodes on the whole canvas.
    pub total: usize,
}

/// Pointer-down on a palette entry or an existing node.
#[derive(Debug, Clone, Deserialize)]
pub struct DragStartRequest {
    pub payload: DragPayload,
    pub pointer: Position,
}

/// Pointer movement during a drag.
#[derive(Debug, Clone, Deserialize)]
pub struct DragMoveRequest {
    pub pointer: Position,
}

/// Where the dragged item would land.
#[derive(Debug, Clone, Serialize)]
pub struct DragMoveResponse {
    pub preview: Position,
}

/// Pointer release. `drop` is absent when released outside the canvas.
#[derive(Debug, Clone, Deserialize)]
pub struct DragEndRequest {
    #[serde(default)]
    pub drop: Option<Position>,
}

/// Edit of a single node. Every part is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNodeRequest {
    #[serde(default)]
    pub data: Option<ComponentData>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeResponse {
    pub node: NodeView,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionRequest {
    pub from: ComponentId,
    pub to: ComponentId,
}

/// `changed` is false when the request was a no-op.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionResponse {
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutResponse {
    /// Number of nodes that received a default position.
    pub placed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    /// Whether the stored contract content changed.
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    /// Directory of the scaffolded project on disk.
    pub directory: String,
    /// Path of the exported contract, relative to `directory`.
    pub file: String,
}
