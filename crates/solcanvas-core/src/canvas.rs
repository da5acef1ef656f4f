//! Canvas render list with viewport culling.
//!
//! [`render`] turns the graph into the flat list of nodes a frontend has to
//! draw for the current viewport: effective positions (default grid slots for
//! unset nodes), labels, categories and connections. Nodes entirely outside
//! the viewport (plus an overscan margin) are culled.

use serde::{Deserialize, Serialize};

use crate::component::{Category, ComponentKind};
use crate::graph::ComponentGraph;
use crate::id::ComponentId;
use crate::layout::effective_positions;
use crate::node::ConnectionList;
use crate::types::Rect;

/// Extra canvas pixels kept around the viewport so nodes entering the view
/// during a pan are already rendered.
pub const OVERSCAN: f64 = 200.0;

/// The visible region of the canvas, in screen pixels, and the zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Viewport {
            x,
            y,
            width,
            height,
            zoom: 1.0,
        }
    }

    /// The viewport expressed in canvas coordinates.
    pub fn canvas_rect(&self) -> Rect {
        let zoom = if self.zoom > 0.0 && self.zoom.is_finite() {
            self.zoom
        } else {
            1.0
        };
        Rect::new(
            self.x / zoom,
            self.y / zoom,
            self.width / zoom,
            self.height / zoom,
        )
    }
}

/// A node as drawn on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub category: Category,
    pub label: String,
    pub rect: Rect,
    pub connections: ConnectionList,
}

/// Builds the render list for `viewport`, in store order.
pub fn render(graph: &ComponentGraph, viewport: &Viewport) -> Vec<RenderNode> {
    let visible = viewport.canvas_rect().expand(OVERSCAN);
    let positions = effective_positions(graph);
    graph
        .nodes()
        .filter_map(|node| {
            let position = positions.get(&node.id).copied().unwrap_or(node.position);
            let rect = node.rect_at(position);
            if !rect.intersects(&visible) {
                return None;
            }
            Some(RenderNode {
                id: node.id.clone(),
                kind: node.kind(),
                category: node.kind().category(),
                label: node.data.label(),
                rect,
                connections: graph.connections_of(&node.id).unwrap_or_default(),
            })
        })
        .collect()
}
