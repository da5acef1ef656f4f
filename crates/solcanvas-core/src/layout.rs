//! Grid snapping and default placement.
//!
//! Drops snap to a 20 px grid. Nodes still at the unset `(0, 0)` position
//! are placed in the canvas column of their category, stacked top to bottom
//! in store order.

use std::collections::HashMap;

use crate::graph::ComponentGraph;
use crate::id::ComponentId;
use crate::types::Position;

/// Snap grid size in canvas pixels.
pub const GRID_SIZE: f64 = 20.0;
/// Left/top margin of the default grid.
pub const GRID_ORIGIN: f64 = 40.0;
/// Horizontal distance between category columns.
pub const COLUMN_SPACING: f64 = 300.0;
/// Vertical distance between stacked nodes within a column.
pub const ROW_SPACING: f64 = 160.0;

/// Rounds a coordinate to the nearest grid line, never below zero.
pub fn snap(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    ((value / GRID_SIZE).round() * GRID_SIZE).max(0.0)
}

/// Snaps both coordinates of a position to the grid.
pub fn snap_to_grid(position: Position) -> Position {
    Position::new(snap(position.x), snap(position.y))
}

/// Snaps to the grid, keeping each coordinate at least one cell from the
/// edge so the result is never the unset origin.
pub fn snap_to_placed(position: Position) -> Position {
    let snapped = snap_to_grid(position);
    Position::new(snapped.x.max(GRID_SIZE), snapped.y.max(GRID_SIZE))
}

/// Default grid slot for the `row`-th unset node of a column.
pub fn grid_slot(column: u32, row: u32) -> Position {
    Position::new(
        GRID_ORIGIN + f64::from(column) * COLUMN_SPACING,
        GRID_ORIGIN + f64::from(row) * ROW_SPACING,
    )
}

/// Computes where every unset node would be placed, without mutating.
///
/// Nodes that already have a position are not included.
pub fn default_positions(graph: &ComponentGraph) -> HashMap<ComponentId, Position> {
    let mut rows: HashMap<u32, u32> = HashMap::new();
    let mut placed = HashMap::new();
    for node in graph.nodes() {
        if !node.position.is_unset() {
            continue;
        }
        let column = node.kind().category().column();
        let row = rows.entry(column).or_insert(0);
        placed.insert(node.id.clone(), grid_slot(column, *row));
        *row += 1;
    }
    placed
}

/// The position a node is rendered at: its own, or its default grid slot.
pub fn effective_positions(graph: &ComponentGraph) -> HashMap<ComponentId, Position> {
    let defaults = default_positions(graph);
    graph
        .nodes()
        .map(|node| {
            let position = defaults.get(&node.id).copied().unwrap_or(node.position);
            (node.id.clone(), position)
        })
        .collect()
}

/// The position a single node is rendered at.
pub fn effective_position(graph: &ComponentGraph, id: &ComponentId) -> Option<Position> {
    let node = graph.get(id)?;
    if !node.position.is_unset() {
        return Some(node.position);
    }
    default_positions(graph).get(id).copied()
}

/// Writes default grid positions into every unset node.
///
/// Returns the number of nodes moved. The graph is only marked dirty when at
/// least one node was placed.
pub fn apply_default_layout(graph: &mut ComponentGraph) -> usize {
    let placements = default_positions(graph);
    graph.place(&placements)
}
