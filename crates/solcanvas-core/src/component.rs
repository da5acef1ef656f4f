//! Contract building blocks: the fourteen component variants.
//!
//! [`ComponentData`] is the sum type carried by every canvas node. Each
//! variant wraps a plain record describing one Solidity contract member (or,
//! for the integration-style kinds, one piece of wiring to an external
//! standard or service). [`ComponentKind`] is the fieldless discriminant used
//! for dispatch, palette entries and drag payloads.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{
    FunctionVisibility, Parameter, StateMutability, StructField, VariableMutability, Visibility,
};

/// Discriminant of [`ComponentData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Variable,
    Constructor,
    Function,
    Event,
    Modifier,
    Error,
    Struct,
    Enum,
    Mapping,
    Array,
    Integration,
    Security,
    Oracle,
    ExternalCall,
}

impl ComponentKind {
    /// All kinds, in canonical order. Contract flattening and loading follow
    /// this order.
    pub const ALL: [ComponentKind; 14] = [
        ComponentKind::Variable,
        ComponentKind::Constructor,
        ComponentKind::Function,
        ComponentKind::Event,
        ComponentKind::Modifier,
        ComponentKind::Error,
        ComponentKind::Struct,
        ComponentKind::Enum,
        ComponentKind::Mapping,
        ComponentKind::Array,
        ComponentKind::Integration,
        ComponentKind::Security,
        ComponentKind::Oracle,
        ComponentKind::ExternalCall,
    ];

    /// Kebab-case slug, used as the id prefix and the serde tag.
    pub fn slug(&self) -> &'static str {
        match self {
            ComponentKind::Variable => "variable",
            ComponentKind::Constructor => "constructor",
            ComponentKind::Function => "function",
            ComponentKind::Event => "event",
            ComponentKind::Modifier => "modifier",
            ComponentKind::Error => "error",
            ComponentKind::Struct => "struct",
            ComponentKind::Enum => "enum",
            ComponentKind::Mapping => "mapping",
            ComponentKind::Array => "array",
            ComponentKind::Integration => "integration",
            ComponentKind::Security => "security",
            ComponentKind::Oracle => "oracle",
            ComponentKind::ExternalCall => "external-call",
        }
    }

    /// Parses a slug produced by [`slug`](Self::slug).
    pub fn from_slug(slug: &str) -> Option<ComponentKind> {
        ComponentKind::ALL.into_iter().find(|k| k.slug() == slug)
    }

    /// The canvas column this kind is laid out in.
    pub fn category(&self) -> Category {
        match self {
            ComponentKind::Variable
            | ComponentKind::Mapping
            | ComponentKind::Array
            | ComponentKind::Struct
            | ComponentKind::Enum => Category::State,
            ComponentKind::Constructor | ComponentKind::Function | ComponentKind::Modifier => {
                Category::Logic
            }
            ComponentKind::Event | ComponentKind::Error => Category::Signals,
            ComponentKind::Integration
            | ComponentKind::Security
            | ComponentKind::Oracle
            | ComponentKind::ExternalCall => Category::Integrations,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Palette / canvas grouping of component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    State,
    Logic,
    Signals,
    Integrations,
}

impl Category {
    /// Zero-based canvas column.
    pub fn column(&self) -> u32 {
        match self {
            Category::State => 0,
            Category::Logic => 1,
            Category::Signals => 2,
            Category::Integrations => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Variant records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableComponent {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub mutability: VariableMutability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructorComponent {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub payable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionComponent {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub returns: Vec<Parameter>,
    #[serde(default)]
    pub visibility: FunctionVisibility,
    #[serde(default)]
    pub state_mutability: StateMutability,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_override: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventComponent {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierComponent {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorComponent {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructComponent {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumComponent {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingComponent {
    pub name: String,
    pub key_type: String,
    pub value_type: String,
    #[serde(default)]
    pub visibility: Visibility,
}

/// A state array. `length == None` declares a dynamic array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayComponent {
    pub name: String,
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Token and access standards an integration component can pull in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenStandard {
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "ERC721")]
    Erc721,
    #[serde(rename = "ERC1155")]
    Erc1155,
    Ownable,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationComponent {
    pub name: String,
    pub standard: TokenStandard,
    #[serde(default)]
    pub import_path: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, String>,
}

/// Security building blocks offered by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityFeature {
    ReentrancyGuard,
    Pausable,
    AccessControl,
    Ownable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityComponent {
    pub name: String,
    pub feature: SecurityFeature,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OracleProvider {
    Chainlink,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleComponent {
    pub name: String,
    pub provider: OracleProvider,
    pub feed_address: String,
    #[serde(default = "default_oracle_decimals")]
    pub decimals: u8,
}

fn default_oracle_decimals() -> u8 {
    8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCallComponent {
    pub name: String,
    pub target_address: String,
    pub interface_name: String,
    pub function_signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_wei: Option<String>,
}

// ---------------------------------------------------------------------------
// ComponentData
// ---------------------------------------------------------------------------

/// The data carried by a canvas node: one variant per [`ComponentKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ComponentData {
    Variable(VariableComponent),
    Constructor(ConstructorComponent),
    Function(FunctionComponent),
    Event(EventComponent),
    Modifier(ModifierComponent),
    Error(ErrorComponent),
    Struct(StructComponent),
    Enum(EnumComponent),
    Mapping(MappingComponent),
    Array(ArrayComponent),
    Integration(IntegrationComponent),
    Security(SecurityComponent),
    Oracle(OracleComponent),
    ExternalCall(ExternalCallComponent),
}

impl ComponentData {
    /// Returns the discriminant.
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentData::Variable(_) => ComponentKind::Variable,
            ComponentData::Constructor(_) => ComponentKind::Constructor,
            ComponentData::Function(_) => ComponentKind::Function,
            ComponentData::Event(_) => ComponentKind::Event,
            ComponentData::Modifier(_) => ComponentKind::Modifier,
            ComponentData::Error(_) => ComponentKind::Error,
            ComponentData::Struct(_) => ComponentKind::Struct,
            ComponentData::Enum(_) => ComponentKind::Enum,
            ComponentData::Mapping(_) => ComponentKind::Mapping,
            ComponentData::Array(_) => ComponentKind::Array,
            ComponentData::Integration(_) => ComponentKind::Integration,
            ComponentData::Security(_) => ComponentKind::Security,
            ComponentData::Oracle(_) => ComponentKind::Oracle,
            ComponentData::ExternalCall(_) => ComponentKind::ExternalCall,
        }
    }

    /// The member name, or `None` for the (anonymous) constructor.
    pub fn name(&self) -> Option<&str> {
        match self {
            ComponentData::Variable(c) => Some(&c.name),
            ComponentData::Constructor(_) => None,
            ComponentData::Function(c) => Some(&c.name),
            ComponentData::Event(c) => Some(&c.name),
            ComponentData::Modifier(c) => Some(&c.name),
            ComponentData::Error(c) => Some(&c.name),
            ComponentData::Struct(c) => Some(&c.name),
            ComponentData::Enum(c) => Some(&c.name),
            ComponentData::Mapping(c) => Some(&c.name),
            ComponentData::Array(c) => Some(&c.name),
            ComponentData::Integration(c) => Some(&c.name),
            ComponentData::Security(c) => Some(&c.name),
            ComponentData::Oracle(c) => Some(&c.name),
            ComponentData::ExternalCall(c) => Some(&c.name),
        }
    }

    /// Human-readable label shown on the canvas.
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => self.kind().slug().to_string(),
        }
    }

    /// Returns `true` if two components with this kind may share a name
    /// (Solidity overloading).
    pub fn is_overloadable(&self) -> bool {
        matches!(
            self.kind(),
            ComponentKind::Function | ComponentKind::Event
        )
    }
}
