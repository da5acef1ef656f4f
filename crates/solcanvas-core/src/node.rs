//! Canvas nodes.
//!
//! [`ComponentNode`] is the weight stored in the graph arena: identity, data,
//! position and size. [`NodeView`] is the detached, serializable snapshot
//! handed to renderers and API clients; it additionally lists the node's
//! outgoing connections, which the graph itself stores as edges.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::component::{ComponentData, ComponentKind};
use crate::id::ComponentId;
use crate::types::{Position, Rect};

/// Default node width in canvas pixels.
pub const DEFAULT_WIDTH: f64 = 240.0;
/// Default node height in canvas pixels.
pub const DEFAULT_HEIGHT: f64 = 120.0;

/// Outgoing connection targets of a node. Most nodes have only a handful.
pub type ConnectionList = SmallVec<[ComponentId; 4]>;

/// A component placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: ComponentId,
    pub data: ComponentData,
    pub position: Position,
    pub width: f64,
    pub height: f64,
}

impl ComponentNode {
    /// Creates a node with the default size.
    pub fn new(id: ComponentId, data: ComponentData, position: Position) -> Self {
        ComponentNode {
            id,
            data,
            position,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.data.kind()
    }

    /// The node's rectangle at its stored position.
    pub fn rect(&self) -> Rect {
        self.rect_at(self.position)
    }

    /// The node's rectangle if it were placed at `position`.
    pub fn rect_at(&self, position: Position) -> Rect {
        Rect::new(position.x, position.y, self.width, self.height)
    }
}

/// Snapshot of a node together with its outgoing connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub data: ComponentData,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub connections: ConnectionList,
}

impl NodeView {
    /// Builds a view from a stored node and its connection targets.
    pub fn new(node: &ComponentNode, connections: ConnectionList) -> Self {
        NodeView {
            id: node.id.clone(),
            kind: node.kind(),
            data: node.data.clone(),
            position: node.position,
            width: node.width,
            height: node.height,
            connections,
        }
    }

    /// Splits the view back into a storable node and its connection list.
    pub fn into_parts(self) -> (ComponentNode, ConnectionList) {
        (
            ComponentNode {
                id: self.id,
                data: self.data,
                position: self.position,
                width: self.width,
                height: self.height,
            },
            self.connections,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::EnumComponent;
    use smallvec::smallvec;

    fn status_enum() -> ComponentNode {
        ComponentNode::new(
            "enum-1".into(),
            ComponentData::Enum(EnumComponent {
                name: "Status".into(),
                values: vec!["Open".into(), "Closed".into()],
            }),
            Position::new(40.0, 60.0),
        )
    }

    #[test]
    fn new_node_uses_default_size() {
        let node = status_enum();
        assert_eq!(node.width, DEFAULT_WIDTH);
        assert_eq!(node.height, DEFAULT_HEIGHT);
        assert_eq!(node.kind(), ComponentKind::Enum);
        assert_eq!(node.rect(), Rect::new(40.0, 60.0, DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn view_serializes_type_field() {
        let view = NodeView::new(&status_enum(), smallvec!["variable-1".into()]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "enum");
        assert_eq!(json["data"]["type"], "enum");
        assert_eq!(json["connections"][0], "variable-1");
    }

    #[test]
    fn view_into_parts_preserves_node() {
        let node = status_enum();
        let view = NodeView::new(&node, smallvec!["a".into(), "b".into()]);
        let (back, connections) = view.into_parts();
        assert_eq!(back, node);
        assert_eq!(connections.len(), 2);
    }
}
