pub mod types;
pub mod id;
pub mod error;
pub mod component;
pub mod edge;
pub mod node;
pub mod graph;
pub mod layout;
pub mod canvas;
pub mod drag;
pub mod form;
pub mod template;
pub mod contract;
pub mod convert;

// Re-export commonly used types
pub use types::{Parameter, Position, Rect, StructField, Visibility};
pub use id::{ComponentId, NodeHandle};
pub use error::CoreError;
pub use component::{Category, ComponentData, ComponentKind};
pub use edge::ConnectionRef;
pub use node::{ComponentNode, NodeView};
pub use graph::ComponentGraph;
pub use canvas::{RenderNode, Viewport};
pub use drag::{DragPayload, DragSession, DropOutcome};
pub use form::{FieldError, FieldSpec, GraphIssue};
pub use contract::{ContractMetadata, EthereumContract};
pub use convert::{components_to_contract, contract_to_components};
