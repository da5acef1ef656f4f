//! ComponentGraph: the keyed store of every node on the canvas.
//!
//! [`ComponentGraph`] is the single owner of the contract being edited. Nodes
//! live in a petgraph `StableGraph` arena, so a node's handle stays valid
//! while other nodes come and go; an insertion-ordered index maps the
//! persisted [`ComponentId`] onto that handle. Connections are directed
//! arena edges, which means removing a node drops every connection touching
//! it and a connection can never reference a missing node.
//!
//! Every mutation sets the dirty flag. The flag is cleared explicitly with
//! [`mark_clean`](ComponentGraph::mark_clean) once the contents have been
//! saved (or freshly loaded).

use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};

use crate::component::ComponentData;
use crate::edge::{Connection, ConnectionRef};
use crate::error::CoreError;
use crate::id::{ComponentId, NodeHandle};
use crate::node::{ComponentNode, ConnectionList, NodeView};
use crate::types::Position;

/// The in-memory component graph of one contract.
#[derive(Debug, Clone, Default)]
pub struct ComponentGraph {
    /// Node arena. Edge weights carry the creation sequence number.
    graph: StableGraph<ComponentNode, Connection, Directed, u32>,
    /// Component id -> arena slot, in insertion order.
    index: IndexMap<ComponentId, NodeIndex<u32>>,
    /// Set by every mutation, cleared by `mark_clean`.
    dirty: bool,
    /// Sequence number of the next connection.
    next_seq: u64,
}

impl ComponentGraph {
    /// Creates an empty, clean graph.
    pub fn new() -> Self {
        ComponentGraph::default()
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.index.contains_key(id)
    }

    /// Returns `true` if the graph changed since the last `mark_clean`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Looks up a node by id.
    pub fn get(&self, id: &ComponentId) -> Option<&ComponentNode> {
        self.index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Returns the arena handle of a node.
    pub fn handle(&self, id: &ComponentId) -> Option<NodeHandle> {
        self.index.get(id).map(|&idx| NodeHandle::from(idx))
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ComponentNode> + '_ {
        self.index
            .values()
            .filter_map(move |&idx| self.graph.node_weight(idx))
    }

    /// Outgoing connection targets of `id`, oldest connection first.
    pub fn connections_of(&self, id: &ComponentId) -> Result<ConnectionList, CoreError> {
        let idx = self.require(id)?;
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.weight().seq, e.target()))
            .collect();
        edges.sort_by_key(|(seq, _)| *seq);
        Ok(edges
            .into_iter()
            .filter_map(|(_, target)| self.graph.node_weight(target))
            .map(|n| n.id.clone())
            .collect())
    }

    /// All connections, oldest first.
    pub fn connections(&self) -> Vec<ConnectionRef> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| (e.weight().seq, e.source(), e.target()))
            .collect();
        edges.sort_by_key(|(seq, _, _)| *seq);
        edges
            .into_iter()
            .filter_map(|(_, a, b)| {
                let from = self.graph.node_weight(a)?;
                let to = self.graph.node_weight(b)?;
                Some(ConnectionRef::new(from.id.clone(), to.id.clone()))
            })
            .collect()
    }

    /// Snapshot of a single node with its connections.
    pub fn view(&self, id: &ComponentId) -> Result<NodeView, CoreError> {
        let node = self.get(id).ok_or_else(|| not_found(id))?;
        Ok(NodeView::new(node, self.connections_of(id)?))
    }

    /// Snapshots of every node, in insertion order.
    pub fn views(&self) -> Vec<NodeView> {
        self.nodes()
            .map(|node| {
                let connections = self.connections_of(&node.id).unwrap_or_default();
                NodeView::new(node, connections)
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Node mutations
    // -----------------------------------------------------------------------

    /// Adds a new component with a freshly generated id.
    pub fn add(&mut self, data: ComponentData, position: Position) -> ComponentId {
        let kind = data.kind();
        let mut id = ComponentId::generate(kind);
        while self.contains(&id) {
            id = ComponentId::generate(kind);
        }
        let idx = self
            .graph
            .add_node(ComponentNode::new(id.clone(), data, position));
        self.index.insert(id.clone(), idx);
        self.dirty = true;
        id
    }

    /// Inserts a node under its own id.
    pub fn insert(&mut self, node: ComponentNode) -> Result<NodeHandle, CoreError> {
        if self.contains(&node.id) {
            return Err(CoreError::DuplicateComponent { id: node.id });
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        self.dirty = true;
        Ok(NodeHandle::from(idx))
    }

    /// Replaces a node's data, returning the previous data.
    ///
    /// The variant must not change: a function stays a function.
    pub fn update(
        &mut self,
        id: &ComponentId,
        data: ComponentData,
    ) -> Result<ComponentData, CoreError> {
        let node = self.node_mut(id)?;
        if node.kind() != data.kind() {
            return Err(CoreError::KindMismatch {
                id: id.clone(),
                expected: node.kind(),
                found: data.kind(),
            });
        }
        let old = std::mem::replace(&mut node.data, data);
        self.dirty = true;
        Ok(old)
    }

    /// Moves a node, returning its previous position.
    pub fn reposition(
        &mut self,
        id: &ComponentId,
        position: Position,
    ) -> Result<Position, CoreError> {
        let node = self.node_mut(id)?;
        let old = std::mem::replace(&mut node.position, position);
        self.dirty = true;
        Ok(old)
    }

    /// Writes the given positions into the nodes they name, skipping ids
    /// that are not in the graph. Returns the number of nodes moved.
    pub fn place(&mut self, positions: &HashMap<ComponentId, Position>) -> usize {
        let mut moved = 0;
        for (id, &idx) in &self.index {
            let Some(&position) = positions.get(id) else {
                continue;
            };
            if let Some(node) = self.graph.node_weight_mut(idx) {
                node.position = position;
                moved += 1;
            }
        }
        if moved > 0 {
            self.dirty = true;
        }
        moved
    }

    /// Changes a node's rendered size.
    pub fn resize(&mut self, id: &ComponentId, width: f64, height: f64) -> Result<(), CoreError> {
        let node = self.node_mut(id)?;
        node.width = width;
        node.height = height;
        self.dirty = true;
        Ok(())
    }

    /// Removes a node and every connection touching it.
    pub fn remove(&mut self, id: &ComponentId) -> Result<ComponentNode, CoreError> {
        let idx = self.index.shift_remove(id).ok_or_else(|| not_found(id))?;
        let node = self.graph.remove_node(idx).ok_or_else(|| not_found(id))?;
        self.dirty = true;
        Ok(node)
    }

    // -----------------------------------------------------------------------
    // Connection mutations
    // -----------------------------------------------------------------------

    /// Connects `from` to `to`. Returns `false` if the connection already
    /// existed.
    pub fn connect(&mut self, from: &ComponentId, to: &ComponentId) -> Result<bool, CoreError> {
        if from == to {
            return Err(CoreError::InvalidConnection {
                from: from.clone(),
                to: to.clone(),
                reason: "a component cannot connect to itself".to_string(),
            });
        }
        let a = self.require_endpoint(from, from, to)?;
        let b = self.require_endpoint(to, from, to)?;
        if self.graph.find_edge(a, b).is_some() {
            return Ok(false);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.graph.add_edge(a, b, Connection { seq });
        self.dirty = true;
        Ok(true)
    }

    /// Removes the connection `from -> to`. Returns `false` if there was none.
    pub fn disconnect(&mut self, from: &ComponentId, to: &ComponentId) -> Result<bool, CoreError> {
        let a = self.require(from)?;
        let b = self.require(to)?;
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                self.dirty = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // -----------------------------------------------------------------------
    // Bulk operations
    // -----------------------------------------------------------------------

    /// Replaces the whole graph with the given node snapshots.
    ///
    /// Nodes are inserted first, then their connections, so connections may
    /// point forward. On error the graph is left untouched.
    pub fn import(&mut self, views: Vec<NodeView>) -> Result<(), CoreError> {
        let mut fresh = ComponentGraph::new();
        let mut pending = Vec::new();
        for view in views {
            let (node, connections) = view.into_parts();
            let from = node.id.clone();
            fresh.insert(node)?;
            pending.extend(connections.into_iter().map(|to| (from.clone(), to)));
        }
        for (from, to) in pending {
            fresh.connect(&from, &to)?;
        }
        fresh.dirty = true;
        *self = fresh;
        Ok(())
    }

    /// Removes every node and connection.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.index.clear();
        self.dirty = true;
    }

    /// Clears the dirty flag.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn require(&self, id: &ComponentId) -> Result<NodeIndex<u32>, CoreError> {
        self.index.get(id).copied().ok_or_else(|| not_found(id))
    }

    fn require_endpoint(
        &self,
        id: &ComponentId,
        from: &ComponentId,
        to: &ComponentId,
    ) -> Result<NodeIndex<u32>, CoreError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| CoreError::InvalidConnection {
                from: from.clone(),
                to: to.clone(),
                reason: format!("unknown component '{}'", id),
            })
    }

    fn node_mut(&mut self, id: &ComponentId) -> Result<&mut ComponentNode, CoreError> {
        let idx = self.require(id)?;
        self.graph
            .node_weight_mut(idx)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &ComponentId) -> CoreError {
    CoreError::ComponentNotFound { id: id.clone() }
}
