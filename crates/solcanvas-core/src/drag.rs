//! Two-phase drag protocol for the canvas.
//!
//! A drag starts from either a palette template or an existing node. While
//! dragging, the session only tracks the pointer; nothing touches the graph
//! until [`DragSession::end`], which snaps the drop point to the grid and
//! then inserts or moves exactly one node.

use serde::{Deserialize, Serialize};

use crate::component::ComponentKind;
use crate::error::CoreError;
use crate::graph::ComponentGraph;
use crate::id::ComponentId;
use crate::layout::{effective_position, snap_to_placed};
use crate::template;
use crate::types::Position;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DragPayload {
    /// A palette entry; dropping it creates a new node.
    Template { kind: ComponentKind },
    /// A node already on the canvas; dropping it moves the node.
    Existing { id: ComponentId },
}

/// Result of finishing a drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Inserted {
        id: ComponentId,
        position: Position,
    },
    Moved {
        id: ComponentId,
        from: Position,
        to: Position,
    },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        payload: DragPayload,
        /// Pointer position at `start`.
        anchor: Position,
        /// Latest pointer position.
        pointer: Position,
        /// Position of the dragged node at `start` (existing nodes only).
        origin: Option<Position>,
    },
}

/// Drag state machine: `Idle -> Dragging -> Idle`.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    state: DragState,
}

impl Default for DragSession {
    fn default() -> Self {
        DragSession {
            state: DragState::Idle,
        }
    }
}

impl DragSession {
    pub fn new() -> Self {
        DragSession::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The payload of the drag in progress, if any.
    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Dragging { payload, .. } => Some(payload),
            DragState::Idle => None,
        }
    }

    /// Begins a drag at `pointer` (canvas coordinates).
    pub fn start(
        &mut self,
        graph: &ComponentGraph,
        payload: DragPayload,
        pointer: Position,
    ) -> Result<(), CoreError> {
        if self.is_dragging() {
            return Err(CoreError::InvalidDrag {
                reason: "a drag is already in progress".to_string(),
            });
        }
        let origin = match &payload {
            DragPayload::Template { .. } => None,
            DragPayload::Existing { id } => {
                // Unplaced nodes move from where they are drawn.
                let drawn = effective_position(graph, id).ok_or_else(|| {
                    CoreError::ComponentNotFound { id: id.clone() }
                })?;
                Some(drawn)
            }
        };
        self.state = DragState::Dragging {
            payload,
            anchor: pointer,
            pointer,
            origin,
        };
        Ok(())
    }

    /// Tracks the pointer and returns where the dragged item would land.
    pub fn move_to(&mut self, to: Position) -> Result<Position, CoreError> {
        match &mut self.state {
            DragState::Dragging { pointer, .. } => *pointer = to,
            DragState::Idle => return Err(not_dragging()),
        }
        self.preview().ok_or_else(not_dragging)
    }

    /// Snapped landing position for the current pointer.
    pub fn preview(&self) -> Option<Position> {
        match &self.state {
            DragState::Dragging {
                anchor,
                pointer,
                origin,
                ..
            } => Some(landing(*anchor, *pointer, *origin)),
            DragState::Idle => None,
        }
    }

    /// Finishes the drag. `drop` is the release point, or `None` when the
    /// pointer was released outside the canvas.
    ///
    /// The session is idle afterwards, whatever the outcome.
    pub fn end(
        &mut self,
        graph: &mut ComponentGraph,
        drop: Option<Position>,
    ) -> Result<DropOutcome, CoreError> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let DragState::Dragging {
            payload,
            anchor,
            origin,
            ..
        } = state
        else {
            return Err(not_dragging());
        };
        let Some(drop) = drop else {
            return Ok(DropOutcome::Cancelled);
        };
        let position = landing(anchor, drop, origin);
        match payload {
            DragPayload::Template { kind } => {
                let data = template::instantiate(kind, graph);
                let id = graph.add(data, position);
                tracing::debug!(%id, x = position.x, y = position.y, "dropped template");
                Ok(DropOutcome::Inserted { id, position })
            }
            DragPayload::Existing { id } => {
                let stored = graph.reposition(&id, position)?;
                Ok(DropOutcome::Moved {
                    id,
                    from: origin.unwrap_or(stored),
                    to: position,
                })
            }
        }
    }

    /// Abandons the drag without touching the graph.
    pub fn cancel(&mut self) -> DropOutcome {
        self.state = DragState::Idle;
        DropOutcome::Cancelled
    }
}

/// Templates land under the pointer; existing nodes move by the pointer delta.
/// Either way the result is a placed position, never the unset origin.
fn landing(anchor: Position, pointer: Position, origin: Option<Position>) -> Position {
    match origin {
        Some(origin) => snap_to_placed(origin.offset(pointer.x - anchor.x, pointer.y - anchor.y)),
        None => snap_to_placed(pointer),
    }
}

fn not_dragging() -> CoreError {
    CoreError::InvalidDrag {
        reason: "no drag in progress".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use proptest::prelude::*;

    #[test]
    fn payload_wire_format() {
        let t = DragPayload::Template {
            kind: ComponentKind::ExternalCall,
        };
        insta::assert_snapshot!(
            serde_json::to_string(&t).unwrap(),
            @r#"{"type":"template","kind":"external-call"}"#
        );
        let e: DragPayload = serde_json::from_str(r#"{"type":"existing","id":"function-1"}"#).unwrap();
        assert_eq!(
            e,
            DragPayload::Existing {
                id: "function-1".into()
            }
        );
    }

    #[test]
    fn template_drop_inserts_snapped_node() {
        let mut graph = ComponentGraph::new();
        let mut drag = DragSession::new();
        drag.start(
            &graph,
            DragPayload::Template {
                kind: ComponentKind::Function,
            },
            Position::new(0.0, 0.0),
        )
        .unwrap();
        assert_eq!(drag.move_to(Position::new(133.0, 71.0)).unwrap(), Position::new(140.0, 80.0));

        let outcome = drag.end(&mut graph, Some(Position::new(133.0, 71.0))).unwrap();
        let DropOutcome::Inserted { id, position } = outcome else {
            panic!("expected insert, got {:?}", outcome);
        };
        assert_eq!(position, Position::new(140.0, 80.0));
        assert_eq!(graph.get(&id).unwrap().position, position);
        assert_eq!(graph.get(&id).unwrap().data.name(), Some("newFunction"));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn existing_drop_moves_by_pointer_delta() {
        let mut graph = ComponentGraph::new();
        let data = template::instantiate(ComponentKind::Event, &graph);
        let id = graph.add(data, Position::new(200.0, 200.0));
        graph.mark_clean();

        let mut drag = DragSession::new();
        drag.start(&graph, DragPayload::Existing { id: id.clone() }, Position::new(210.0, 215.0))
            .unwrap();
        drag.move_to(Position::new(300.0, 250.0)).unwrap();
        let outcome = drag.end(&mut graph, Some(Position::new(312.0, 258.0))).unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Moved {
                id: id.clone(),
                from: Position::new(200.0, 200.0),
                to: Position::new(300.0, 240.0),
            }
        );
        assert!(graph.is_dirty());
    }

    #[test]
    fn drop_near_origin_stays_placed() {
        let mut graph = ComponentGraph::new();
        let mut drag = DragSession::new();
        drag.start(
            &graph,
            DragPayload::Template {
                kind: ComponentKind::Variable,
            },
            Position::ORIGIN,
        )
        .unwrap();
        let outcome = drag.end(&mut graph, Some(Position::new(6.0, 4.0))).unwrap();
        let DropOutcome::Inserted { id, position } = outcome else {
            panic!("expected insert, got {:?}", outcome);
        };
        assert_eq!(position, Position::new(20.0, 20.0));
        assert!(!graph.get(&id).unwrap().position.is_unset());

        drag.start(&graph, DragPayload::Existing { id: id.clone() }, Position::new(25.0, 25.0))
            .unwrap();
        let outcome = drag.end(&mut graph, Some(Position::new(125.0, 125.0))).unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Moved {
                id,
                from: Position::new(20.0, 20.0),
                to: Position::new(120.0, 120.0),
            }
        );
    }

    #[test]
    fn unplaced_node_moves_from_drawn_position() {
        let mut graph = ComponentGraph::new();
        let data = template::instantiate(ComponentKind::Variable, &graph);
        let id = graph.add(data, Position::ORIGIN);
        let drawn = crate::layout::grid_slot(0, 0);
        assert_eq!(effective_position(&graph, &id), Some(drawn));

        let mut drag = DragSession::new();
        drag.start(&graph, DragPayload::Existing { id: id.clone() }, Position::new(50.0, 50.0))
            .unwrap();
        assert_eq!(
            drag.move_to(Position::new(150.0, 150.0)).unwrap(),
            drawn.offset(100.0, 100.0)
        );
        let outcome = drag.end(&mut graph, Some(Position::new(150.0, 150.0))).unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Moved {
                id: id.clone(),
                from: drawn,
                to: drawn.offset(100.0, 100.0),
            }
        );
        assert_eq!(graph.get(&id).unwrap().position, drawn.offset(100.0, 100.0));
    }

    #[test]
    fn release_outside_canvas_cancels() {
        let mut graph = ComponentGraph::new();
        let mut drag = DragSession::new();
        drag.start(
            &graph,
            DragPayload::Template {
                kind: ComponentKind::Variable,
            },
            Position::ORIGIN,
        )
        .unwrap();
        assert_eq!(drag.end(&mut graph, None).unwrap(), DropOutcome::Cancelled);
        assert!(graph.is_empty());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn protocol_errors() {
        let mut graph = ComponentGraph::new();
        let mut drag = DragSession::new();
        assert!(matches!(
            drag.move_to(Position::ORIGIN),
            Err(CoreError::InvalidDrag { .. })
        ));
        assert!(matches!(
            drag.end(&mut graph, Some(Position::ORIGIN)),
            Err(CoreError::InvalidDrag { .. })
        ));
        assert!(matches!(
            drag.start(&graph, DragPayload::Existing { id: "ghost".into() }, Position::ORIGIN),
            Err(CoreError::ComponentNotFound { .. })
        ));
        assert!(!drag.is_dragging());

        let payload = DragPayload::Template {
            kind: ComponentKind::Enum,
        };
        drag.start(&graph, payload.clone(), Position::ORIGIN).unwrap();
        let err = drag.start(&graph, payload, Position::ORIGIN).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"invalid drag transition: a drag is already in progress");

        assert_eq!(drag.cancel(), DropOutcome::Cancelled);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn repeated_template_drops_get_unique_ids_and_names() {
        let mut graph = ComponentGraph::new();
        let mut drag = DragSession::new();
        for i in 0..5 {
            drag.start(
                &graph,
                DragPayload::Template {
                    kind: ComponentKind::Mapping,
                },
                Position::ORIGIN,
            )
            .unwrap();
            drag.end(&mut graph, Some(Position::new(i as f64 * 37.0, 90.0))).unwrap();
        }
        let ids: HashSet<_> = graph.nodes().map(|n| n.id.clone()).collect();
        let names: HashSet<_> = graph.nodes().filter_map(|n| n.data.name()).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(names.len(), 5);
    }

    fn any_kind() -> impl Strategy<Value = ComponentKind> {
        (0..ComponentKind::ALL.len()).prop_map(|i| ComponentKind::ALL[i])
    }

    proptest! {
        #[test]
        fn dropped_nodes_land_on_grid(
            drops in prop::collection::vec((any_kind(), -500.0f64..3000.0, -500.0f64..3000.0), 1..20)
        ) {
            let mut graph = ComponentGraph::new();
            let mut drag = DragSession::new();
            for (kind, x, y) in drops {
                drag.start(&graph, DragPayload::Template { kind }, Position::ORIGIN).unwrap();
                drag.end(&mut graph, Some(Position::new(x, y))).unwrap();
            }
            let mut seen = HashSet::new();
            for node in graph.nodes() {
                prop_assert!(seen.insert(node.id.clone()));
                prop_assert_eq!(node.position.x % 20.0, 0.0);
                prop_assert_eq!(node.position.y % 20.0, 0.0);
                prop_assert!(!node.position.is_unset());
            }
        }
    }
}
