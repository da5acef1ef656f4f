//! The component palette: what can be dragged onto the canvas.
//!
//! Each entry describes one kind; [`instantiate`] builds the default data a
//! freshly dropped template starts with, picking a member name that is not
//! yet used in the graph.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::component::{
    ArrayComponent, Category, ComponentData, ComponentKind, ConstructorComponent, EnumComponent,
    ErrorComponent, EventComponent, ExternalCallComponent, FunctionComponent,
    IntegrationComponent, MappingComponent, ModifierComponent, OracleComponent, OracleProvider,
    SecurityComponent, SecurityFeature, StructComponent, TokenStandard, VariableComponent,
};
use crate::graph::ComponentGraph;
use crate::types::{
    FunctionVisibility, StateMutability, StructField, VariableMutability, Visibility,
};

/// A palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub kind: ComponentKind,
    pub label: &'static str,
    pub category: Category,
    pub description: &'static str,
}

/// Lists every template, in canonical kind order.
pub fn catalog() -> Vec<TemplateInfo> {
    ComponentKind::ALL.into_iter().map(info).collect()
}

/// Palette entry of a single kind.
pub fn info(kind: ComponentKind) -> TemplateInfo {
    let (label, description) = match kind {
        ComponentKind::Variable => ("State Variable", "A value stored in contract storage"),
        ComponentKind::Constructor => ("Constructor", "Runs once when the contract is deployed"),
        ComponentKind::Function => ("Function", "Callable contract logic"),
        ComponentKind::Event => ("Event", "A log entry emitted for off-chain listeners"),
        ComponentKind::Modifier => ("Modifier", "A reusable precondition for functions"),
        ComponentKind::Error => ("Custom Error", "A typed revert reason"),
        ComponentKind::Struct => ("Struct", "A named group of fields"),
        ComponentKind::Enum => ("Enum", "A fixed set of named values"),
        ComponentKind::Mapping => ("Mapping", "A key-value table in storage"),
        ComponentKind::Array => ("Array", "A list stored in contract storage"),
        ComponentKind::Integration => ("Token Standard", "Inherit an ERC or ownership standard"),
        ComponentKind::Security => ("Security", "Reentrancy, pausing and access control"),
        ComponentKind::Oracle => ("Price Feed", "Read prices from an oracle"),
        ComponentKind::ExternalCall => ("External Call", "Call a function on another contract"),
    };
    TemplateInfo {
        kind,
        label,
        category: kind.category(),
        description,
    }
}

/// Builds default data for `kind`, named so it does not clash with any
/// component already in `graph`.
pub fn instantiate(kind: ComponentKind, graph: &ComponentGraph) -> ComponentData {
    let taken: HashSet<&str> = graph.nodes().filter_map(|n| n.data.name()).collect();
    let name = unique_name(base_name(kind), &taken);
    default_data(kind, name)
}

/// The name a template starts from before de-duplication.
pub fn base_name(kind: ComponentKind) -> &'static str {
    match kind {
        ComponentKind::Variable => "newVariable",
        ComponentKind::Constructor => "constructor",
        ComponentKind::Function => "newFunction",
        ComponentKind::Event => "NewEvent",
        ComponentKind::Modifier => "newModifier",
        ComponentKind::Error => "NewError",
        ComponentKind::Struct => "NewStruct",
        ComponentKind::Enum => "NewEnum",
        ComponentKind::Mapping => "newMapping",
        ComponentKind::Array => "newArray",
        ComponentKind::Integration => "token",
        ComponentKind::Security => "guard",
        ComponentKind::Oracle => "priceFeed",
        ComponentKind::ExternalCall => "externalCall",
    }
}

/// Returns `base`, or `base2`, `base3`, ... whichever is free first.
pub fn unique_name(base: &str, taken: &HashSet<&str>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (2u32..)
        .map(|n| format!("{}{}", base, n))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

fn default_data(kind: ComponentKind, name: String) -> ComponentData {
    match kind {
        ComponentKind::Variable => ComponentData::Variable(VariableComponent {
            name,
            data_type: "uint256".into(),
            visibility: Visibility::Public,
            mutability: VariableMutability::Mutable,
            initial_value: None,
        }),
        ComponentKind::Constructor => ComponentData::Constructor(ConstructorComponent::default()),
        ComponentKind::Function => ComponentData::Function(FunctionComponent {
            name,
            parameters: vec![],
            returns: vec![],
            visibility: FunctionVisibility::Public,
            state_mutability: StateMutability::Nonpayable,
            modifiers: vec![],
            body: String::new(),
            is_virtual: false,
            is_override: false,
        }),
        ComponentKind::Event => ComponentData::Event(EventComponent {
            name,
            parameters: vec![],
            anonymous: false,
        }),
        ComponentKind::Modifier => ComponentData::Modifier(ModifierComponent {
            name,
            parameters: vec![],
            body: "_;".into(),
        }),
        ComponentKind::Error => ComponentData::Error(ErrorComponent {
            name,
            parameters: vec![],
        }),
        ComponentKind::Struct => ComponentData::Struct(StructComponent {
            name,
            fields: vec![StructField::new("value", "uint256")],
        }),
        ComponentKind::Enum => ComponentData::Enum(EnumComponent {
            name,
            values: vec!["None".into()],
        }),
        ComponentKind::Mapping => ComponentData::Mapping(MappingComponent {
            name,
            key_type: "address".into(),
            value_type: "uint256".into(),
            visibility: Visibility::Public,
        }),
        ComponentKind::Array => ComponentData::Array(ArrayComponent {
            name,
            element_type: "uint256".into(),
            length: None,
            visibility: Visibility::Public,
        }),
        ComponentKind::Integration => ComponentData::Integration(IntegrationComponent {
            name,
            standard: TokenStandard::Erc20,
            import_path: "@openzeppelin/contracts/token/ERC20/ERC20.sol".into(),
            options: IndexMap::new(),
        }),
        ComponentKind::Security => ComponentData::Security(SecurityComponent {
            name,
            feature: SecurityFeature::ReentrancyGuard,
            roles: vec![],
        }),
        ComponentKind::Oracle => ComponentData::Oracle(OracleComponent {
            name,
            provider: OracleProvider::Chainlink,
            feed_address: "0x0000000000000000000000000000000000000000".into(),
            decimals: 8,
        }),
        ComponentKind::ExternalCall => ComponentData::ExternalCall(ExternalCallComponent {
            name,
            target_address: "0x0000000000000000000000000000000000000000".into(),
            interface_name: "ITarget".into(),
            function_signature: "execute()".into(),
            value_wei: None,
        }),
    }
}
