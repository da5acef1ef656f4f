//! Solidity-facing value types shared by the component variants, plus the
//! canvas geometry types.
//!
//! Enum variants serialize in lowercase so that contract descriptions read
//! like Solidity source (`"visibility": "public"`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Visibility of a state variable, mapping or array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Internal,
}

/// Visibility of a function. Only functions may be `external`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionVisibility {
    #[default]
    Public,
    Private,
    Internal,
    External,
}

/// Solidity state mutability of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    #[default]
    Nonpayable,
    View,
    Pure,
    Payable,
}

/// Storage mutability of a state variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableMutability {
    #[default]
    Mutable,
    Constant,
    Immutable,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
        })
    }
}

impl fmt::Display for FunctionVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FunctionVisibility::Public => "public",
            FunctionVisibility::Private => "private",
            FunctionVisibility::Internal => "internal",
            FunctionVisibility::External => "external",
        })
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateMutability::Nonpayable => "nonpayable",
            StateMutability::View => "view",
            StateMutability::Pure => "pure",
            StateMutability::Payable => "payable",
        })
    }
}

/// A named, typed parameter of a function, constructor, modifier, event or
/// custom error. `indexed` is only meaningful for event parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
}

impl Parameter {
    /// Creates a non-indexed parameter.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            data_type: data_type.into(),
            indexed: false,
        }
    }

    /// Creates an indexed event parameter.
    pub fn indexed(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            data_type: data_type.into(),
            indexed: true,
        }
    }
}

/// A member of a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub data_type: String,
}

impl StructField {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        StructField {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas geometry
// ---------------------------------------------------------------------------

/// A point on the canvas, in canvas pixels.
///
/// The origin `(0, 0)` doubles as "not yet placed"; see
/// [`layout::apply_default_layout`](crate::layout::apply_default_layout).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Returns `true` if this is the unset `(0, 0)` position.
    pub fn is_unset(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Translates by the given delta.
    pub fn offset(&self, dx: f64, dy: f64) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` if the two rectangles overlap (touching edges count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }
}
