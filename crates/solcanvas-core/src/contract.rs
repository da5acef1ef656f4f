//! The structured (non-visual) contract description.
//!
//! An [`EthereumContract`] is what gets persisted and exported: contract
//! metadata, one member array per component kind, and the canvas layout
//! (positions and connections) keyed by component id.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::component::{
    ArrayComponent, ComponentData, ConstructorComponent, EnumComponent, ErrorComponent,
    EventComponent, ExternalCallComponent, FunctionComponent, IntegrationComponent,
    MappingComponent, ModifierComponent, OracleComponent, SecurityComponent, StructComponent,
    VariableComponent,
};
use crate::edge::ConnectionRef;
use crate::id::ComponentId;
use crate::types::Position;

/// Contract-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default = "default_solidity_version")]
    pub solidity_version: String,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_license() -> String {
    "MIT".to_string()
}

fn default_solidity_version() -> String {
    "^0.8.20".to_string()
}

impl ContractMetadata {
    /// Metadata with the default version, license and compiler range.
    pub fn new(name: impl Into<String>) -> Self {
        ContractMetadata {
            name: name.into(),
            version: default_version(),
            license: default_license(),
            solidity_version: default_solidity_version(),
        }
    }
}

/// A contract member: the component record plus the id of its canvas node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member<T> {
    pub id: ComponentId,
    #[serde(flatten)]
    pub data: T,
}

/// Canvas layout stored alongside the members.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentLayout {
    #[serde(default)]
    pub positions: IndexMap<ComponentId, Position>,
    #[serde(default)]
    pub connections: Vec<ConnectionRef>,
}

/// A full contract description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthereumContract {
    #[serde(flatten)]
    pub metadata: ContractMetadata,
    #[serde(default)]
    pub variables: Vec<Member<VariableComponent>>,
    #[serde(default)]
    pub constructors: Vec<Member<ConstructorComponent>>,
    #[serde(default)]
    pub functions: Vec<Member<FunctionComponent>>,
    #[serde(default)]
    pub events: Vec<Member<EventComponent>>,
    #[serde(default)]
    pub modifiers: Vec<Member<ModifierComponent>>,
    #[serde(default)]
    pub errors: Vec<Member<ErrorComponent>>,
    #[serde(default)]
    pub structs: Vec<Member<StructComponent>>,
    #[serde(default)]
    pub enums: Vec<Member<EnumComponent>>,
    #[serde(default)]
    pub mappings: Vec<Member<MappingComponent>>,
    #[serde(default)]
    pub arrays: Vec<Member<ArrayComponent>>,
    #[serde(default)]
    pub integrations: Vec<Member<IntegrationComponent>>,
    #[serde(default)]
    pub security: Vec<Member<SecurityComponent>>,
    #[serde(default)]
    pub oracles: Vec<Member<OracleComponent>>,
    #[serde(default)]
    pub external_calls: Vec<Member<ExternalCallComponent>>,
    #[serde(default)]
    pub component_layout: ComponentLayout,
}

fn tagged<T: Clone>(
    members: &[Member<T>],
    wrap: fn(T) -> ComponentData,
) -> impl Iterator<Item = (ComponentId, ComponentData)> + '_ {
    members.iter().map(move |m| (m.id.clone(), wrap(m.data.clone())))
}

fn member<T>(id: ComponentId, data: T) -> Member<T> {
    Member { id, data }
}

impl EthereumContract {
    /// An empty contract.
    pub fn new(metadata: ContractMetadata) -> Self {
        EthereumContract {
            metadata,
            variables: Vec::new(),
            constructors: Vec::new(),
            functions: Vec::new(),
            events: Vec::new(),
            modifiers: Vec::new(),
            errors: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
            mappings: Vec::new(),
            arrays: Vec::new(),
            integrations: Vec::new(),
            security: Vec::new(),
            oracles: Vec::new(),
            external_calls: Vec::new(),
            component_layout: ComponentLayout::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Every member, in canonical kind order and then array order.
    pub fn members(&self) -> Vec<(ComponentId, ComponentData)> {
        tagged(&self.variables, ComponentData::Variable)
            .chain(tagged(&self.constructors, ComponentData::Constructor))
            .chain(tagged(&self.functions, ComponentData::Function))
            .chain(tagged(&self.events, ComponentData::Event))
            .chain(tagged(&self.modifiers, ComponentData::Modifier))
            .chain(tagged(&self.errors, ComponentData::Error))
            .chain(tagged(&self.structs, ComponentData::Struct))
            .chain(tagged(&self.enums, ComponentData::Enum))
            .chain(tagged(&self.mappings, ComponentData::Mapping))
            .chain(tagged(&self.arrays, ComponentData::Array))
            .chain(tagged(&self.integrations, ComponentData::Integration))
            .chain(tagged(&self.security, ComponentData::Security))
            .chain(tagged(&self.oracles, ComponentData::Oracle))
            .chain(tagged(&self.external_calls, ComponentData::ExternalCall))
            .collect()
    }

    /// Number of members across all kinds.
    pub fn member_count(&self) -> usize {
        self.variables.len()
            + self.constructors.len()
            + self.functions.len()
            + self.events.len()
            + self.modifiers.len()
            + self.errors.len()
            + self.structs.len()
            + self.enums.len()
            + self.mappings.len()
            + self.arrays.len()
            + self.integrations.len()
            + self.security.len()
            + self.oracles.len()
            + self.external_calls.len()
    }

    /// Appends a member to the array of its kind.
    pub fn push(&mut self, id: ComponentId, data: ComponentData) {
        match data {
            ComponentData::Variable(d) => self.variables.push(member(id, d)),
            ComponentData::Constructor(d) => self.constructors.push(member(id, d)),
            ComponentData::Function(d) => self.functions.push(member(id, d)),
            ComponentData::Event(d) => self.events.push(member(id, d)),
            ComponentData::Modifier(d) => self.modifiers.push(member(id, d)),
            ComponentData::Error(d) => self.errors.push(member(id, d)),
            ComponentData::Struct(d) => self.structs.push(member(id, d)),
            ComponentData::Enum(d) => self.enums.push(member(id, d)),
            ComponentData::Mapping(d) => self.mappings.push(member(id, d)),
            ComponentData::Array(d) => self.arrays.push(member(id, d)),
            ComponentData::Integration(d) => self.integrations.push(member(id, d)),
            ComponentData::Security(d) => self.security.push(member(id, d)),
            ComponentData::Oracle(d) => self.oracles.push(member(id, d)),
            ComponentData::ExternalCall(d) => self.external_calls.push(member(id, d)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;
    use crate::types::{Parameter, VariableMutability, Visibility};

    const SAMPLE: &str = r#"{
        "name": "Token",
        "variables": [
            {"id": "variable-1", "name": "totalSupply", "data_type": "uint256"}
        ],
        "events": [
            {"id": "event-1", "name": "Transfer", "parameters": [
                {"name": "from", "data_type": "address", "indexed": true},
                {"name": "value", "data_type": "uint256"}
            ]}
        ],
        "component_layout": {
            "positions": {"variable-1": {"x": 40.0, "y": 40.0}},
            "connections": [{"from": "event-1", "to": "variable-1"}]
        }
    }"#;

    #[test]
    fn parses_with_defaults() {
        let contract: EthereumContract = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(contract.name(), "Token");
        assert_eq!(contract.metadata.license, "MIT");
        assert_eq!(contract.metadata.solidity_version, "^0.8.20");
        assert_eq!(contract.member_count(), 2);
        assert_eq!(contract.variables[0].data.visibility, Visibility::Public);
        assert_eq!(contract.variables[0].data.mutability, VariableMutability::Mutable);
        assert_eq!(
            contract.events[0].data.parameters[0],
            Parameter::indexed("from", "address")
        );
        assert_eq!(contract.component_layout.connections.len(), 1);
    }

    #[test]
    fn members_follow_canonical_kind_order() {
        let contract: EthereumContract = serde_json::from_str(SAMPLE).unwrap();
        let kinds: Vec<_> = contract.members().iter().map(|(_, d)| d.kind()).collect();
        assert_eq!(kinds, vec![ComponentKind::Variable, ComponentKind::Event]);
    }

    #[test]
    fn push_routes_by_kind() {
        let mut contract = EthereumContract::new(ContractMetadata::new("Vault"));
        let contract_json: EthereumContract = serde_json::from_str(SAMPLE).unwrap();
        for (id, data) in contract_json.members().into_iter().rev() {
            contract.push(id, data);
        }
        assert_eq!(contract.variables, contract_json.variables);
        assert_eq!(contract.events, contract_json.events);
    }

    #[test]
    fn member_fields_are_flattened() {
        let mut contract = EthereumContract::new(ContractMetadata::new("Vault"));
        contract.push(
            "constructor-1".into(),
            ComponentData::Constructor(ConstructorComponent::default()),
        );
        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["name"], "Vault");
        assert_eq!(json["constructors"][0]["id"], "constructor-1");
        assert_eq!(json["constructors"][0]["payable"], false);
        assert!(json["functions"].as_array().unwrap().is_empty());
    }
}
