//! Connection edges between canvas nodes.
//!
//! A connection is directed: `from` depends on or refers to `to` (a function
//! that reads a variable, a function guarded by a modifier, a function that
//! emits an event). The graph stores connections as petgraph edges whose
//! weight is [`Connection`]; the serializable form used by contract layouts
//! is [`ConnectionRef`].

use serde::{Deserialize, Serialize};

use crate::id::ComponentId;

/// Edge weight in the component graph.
///
/// `seq` orders connections by creation. Edge slots are reused after a
/// disconnect, so the edge index cannot be used for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Connection {
    pub seq: u64,
}

/// A connection addressed by component ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionRef {
    pub from: ComponentId,
    pub to: ComponentId,
}

impl ConnectionRef {
    pub fn new(from: impl Into<ComponentId>, to: impl Into<ComponentId>) -> Self {
        ConnectionRef {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns `true` if either endpoint is `id`.
    pub fn touches(&self, id: &ComponentId) -> bool {
        &self.from == id || &self.to == id
    }
}
