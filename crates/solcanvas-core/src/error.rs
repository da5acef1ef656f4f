//! Core error types for solcanvas-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the component graph, the drag protocol, and the form
//! editors.

use thiserror::Error;

use crate::component::ComponentKind;
use crate::form::FieldError;
use crate::id::ComponentId;

/// Core errors produced by the solcanvas-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No component with this id exists in the graph.
    #[error("component not found: '{id}'")]
    ComponentNotFound { id: ComponentId },

    /// A component with this id already exists in the graph.
    #[error("duplicate component id: '{id}'")]
    DuplicateComponent { id: ComponentId },

    /// An update tried to change the variant of an existing component.
    #[error("component '{id}' is a {expected} and cannot become a {found}")]
    KindMismatch {
        id: ComponentId,
        expected: ComponentKind,
        found: ComponentKind,
    },

    /// A connection failed validation.
    #[error("invalid connection {from} -> {to}: {reason}")]
    InvalidConnection {
        from: ComponentId,
        to: ComponentId,
        reason: String,
    },

    /// A drag event arrived in a state that cannot accept it.
    #[error("invalid drag transition: {reason}")]
    InvalidDrag { reason: String },

    /// Form validation rejected the component data.
    #[error("validation failed with {} field error(s)", errors.len())]
    Validation { errors: Vec<FieldError> },
}
