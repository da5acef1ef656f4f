//! Identifier newtypes for graph entities.
//!
//! [`ComponentId`] is the user-facing identity of a component (a string that
//! survives save/load). [`NodeHandle`] is the arena slot backing a component
//! inside a [`ComponentGraph`](crate::graph::ComponentGraph); handles are
//! stable across removals of other nodes but are never persisted.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::ComponentKind;

/// Stable, persisted identity of a contract component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    /// Allocates a fresh id of the form `<kind-slug>-<8 hex chars>`.
    pub fn generate(kind: ComponentKind) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        ComponentId(format!("{}-{}", kind.slug(), &uuid[..8]))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        ComponentId(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        ComponentId(s)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arena slot of a component. Maps to a petgraph `NodeIndex<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle(pub u32);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridge between NodeHandle and petgraph's NodeIndex<u32>.

impl From<NodeIndex<u32>> for NodeHandle {
    fn from(idx: NodeIndex<u32>) -> Self {
        NodeHandle(idx.index() as u32)
    }
}

impl From<NodeHandle> for NodeIndex<u32> {
    fn from(handle: NodeHandle) -> Self {
        NodeIndex::new(handle.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(42);
        let handle = NodeHandle::from(idx);
        assert_eq!(handle.0, 42);

        let back: NodeIndex<u32> = handle.into();
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn generated_ids_carry_kind_slug() {
        let id = ComponentId::generate(ComponentKind::ExternalCall);
        assert!(id.as_str().starts_with("external-call-"));
        assert_eq!(id.as_str().len(), "external-call-".len() + 8);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = ComponentId::generate(ComponentKind::Variable);
        let b = ComponentId::generate(ComponentKind::Variable);
        assert_ne!(a, b);
    }

    #[test]
    fn component_id_serializes_as_plain_string() {
        let id = ComponentId::from("function-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"function-1\"");
        let back: ComponentId = serde_json::from_str("\"function-1\"").unwrap();
        assert_eq!(back, id);
    }
}
