//! Detail editors: per-variant form schemas and validation.
//!
//! A frontend renders one form per component kind from [`fields`] and
//! submits the edited [`ComponentData`] through [`apply`], which validates
//! it and only then writes it back into the graph. Validation never stops at
//! the first problem; every failing field is reported so the form can show
//! all messages inline.
//!
//! [`validate_graph`] adds the contract-level checks that no single form can
//! see: member names shared across components, and more than one
//! constructor.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::component::{ComponentData, ComponentKind, SecurityFeature, TokenStandard};
use crate::error::CoreError;
use crate::graph::ComponentGraph;
use crate::id::ComponentId;
use crate::types::{FunctionVisibility, Parameter, VariableMutability};

// ---------------------------------------------------------------------------
// Form schema
// ---------------------------------------------------------------------------

/// How a form field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "input", content = "options", rename_all = "snake_case")]
pub enum InputKind {
    Identifier,
    SolidityType,
    Text,
    Code,
    Address,
    Number,
    Toggle,
    Select(&'static [&'static str]),
    ParameterList,
    FieldList,
    StringList,
    KeyValue,
}

/// One field of a component form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub input: InputKind,
    pub required: bool,
}

const fn field(
    name: &'static str,
    label: &'static str,
    input: InputKind,
    required: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        input,
        required,
    }
}

const VISIBILITY: InputKind = InputKind::Select(&["public", "private", "internal"]);

const VARIABLE_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("data_type", "Type", InputKind::SolidityType, true),
    field("visibility", "Visibility", VISIBILITY, true),
    field(
        "mutability",
        "Mutability",
        InputKind::Select(&["mutable", "constant", "immutable"]),
        true,
    ),
    field("initial_value", "Initial value", InputKind::Text, false),
];

const CONSTRUCTOR_FIELDS: &[FieldSpec] = &[
    field("parameters", "Parameters", InputKind::ParameterList, false),
    field("modifiers", "Modifiers", InputKind::StringList, false),
    field("body", "Body", InputKind::Code, false),
    field("payable", "Payable", InputKind::Toggle, false),
];

const FUNCTION_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("parameters", "Parameters", InputKind::ParameterList, false),
    field("returns", "Returns", InputKind::ParameterList, false),
    field(
        "visibility",
        "Visibility",
        InputKind::Select(&["public", "private", "internal", "external"]),
        true,
    ),
    field(
        "state_mutability",
        "State mutability",
        InputKind::Select(&["nonpayable", "view", "pure", "payable"]),
        true,
    ),
    field("modifiers", "Modifiers", InputKind::StringList, false),
    field("body", "Body", InputKind::Code, false),
    field("is_virtual", "Virtual", InputKind::Toggle, false),
    field("is_override", "Override", InputKind::Toggle, false),
];

const EVENT_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("parameters", "Parameters", InputKind::ParameterList, false),
    field("anonymous", "Anonymous", InputKind::Toggle, false),
];

const MODIFIER_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("parameters", "Parameters", InputKind::ParameterList, false),
    field("body", "Body", InputKind::Code, true),
];

const ERROR_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("parameters", "Parameters", InputKind::ParameterList, false),
];

const STRUCT_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("fields", "Fields", InputKind::FieldList, true),
];

const ENUM_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("values", "Values", InputKind::StringList, true),
];

const MAPPING_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("key_type", "Key type", InputKind::SolidityType, true),
    field("value_type", "Value type", InputKind::SolidityType, true),
    field("visibility", "Visibility", VISIBILITY, true),
];

const ARRAY_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("element_type", "Element type", InputKind::SolidityType, true),
    field("length", "Fixed length", InputKind::Number, false),
    field("visibility", "Visibility", VISIBILITY, true),
];

const INTEGRATION_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field(
        "standard",
        "Standard",
        InputKind::Select(&["ERC20", "ERC721", "ERC1155", "Ownable", "Custom"]),
        true,
    ),
    field("import_path", "Import path", InputKind::Text, false),
    field("options", "Options", InputKind::KeyValue, false),
];

const SECURITY_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field(
        "feature",
        "Feature",
        InputKind::Select(&["ReentrancyGuard", "Pausable", "AccessControl", "Ownable"]),
        true,
    ),
    field("roles", "Roles", InputKind::StringList, false),
];

const ORACLE_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field(
        "provider",
        "Provider",
        InputKind::Select(&["Chainlink", "Custom"]),
        true,
    ),
    field("feed_address", "Feed address", InputKind::Address, true),
    field("decimals", "Decimals", InputKind::Number, true),
];

const EXTERNAL_CALL_FIELDS: &[FieldSpec] = &[
    field("name", "Name", InputKind::Identifier, true),
    field("target_address", "Target address", InputKind::Address, true),
    field("interface_name", "Interface", InputKind::Identifier, true),
    field("function_signature", "Function signature", InputKind::Text, true),
    field("value_wei", "Value (wei)", InputKind::Number, false),
];

/// The form schema of a component kind.
pub fn fields(kind: ComponentKind) -> &'static [FieldSpec] {
    match kind {
        ComponentKind::Variable => VARIABLE_FIELDS,
        ComponentKind::Constructor => CONSTRUCTOR_FIELDS,
        ComponentKind::Function => FUNCTION_FIELDS,
        ComponentKind::Event => EVENT_FIELDS,
        ComponentKind::Modifier => MODIFIER_FIELDS,
        ComponentKind::Error => ERROR_FIELDS,
        ComponentKind::Struct => STRUCT_FIELDS,
        ComponentKind::Enum => ENUM_FIELDS,
        ComponentKind::Mapping => MAPPING_FIELDS,
        ComponentKind::Array => ARRAY_FIELDS,
        ComponentKind::Integration => INTEGRATION_FIELDS,
        ComponentKind::Security => SECURITY_FIELDS,
        ComponentKind::Oracle => ORACLE_FIELDS,
        ComponentKind::ExternalCall => EXTERNAL_CALL_FIELDS,
    }
}

// ---------------------------------------------------------------------------
// Validation results
// ---------------------------------------------------------------------------

/// A validation message attached to one form field.
///
/// `field` is a path into the component data, e.g. `name` or
/// `parameters[1].data_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A contract-level problem attributed to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphIssue {
    pub id: ComponentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validates component data against its form rules.
pub fn validate(data: &ComponentData) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match data {
        ComponentData::Variable(v) => {
            check_identifier("name", &v.name, &mut errors);
            check_type("data_type", &v.data_type, &mut errors);
            if v.data_type.trim_start().starts_with("mapping") {
                errors.push(FieldError::new(
                    "data_type",
                    "use a mapping component for mapping types",
                ));
            }
            match (&v.initial_value, v.mutability) {
                (None, VariableMutability::Constant) => errors.push(FieldError::new(
                    "initial_value",
                    "constant variables need an initial value",
                )),
                (Some(value), _) if value.trim().is_empty() => errors.push(FieldError::new(
                    "initial_value",
                    "initial value must not be blank",
                )),
                _ => {}
            }
        }
        ComponentData::Constructor(c) => {
            check_parameters("parameters", &c.parameters, NamePolicy::Required, &mut errors);
            check_modifier_calls("modifiers", &c.modifiers, &mut errors);
        }
        ComponentData::Function(f) => {
            check_identifier("name", &f.name, &mut errors);
            check_parameters("parameters", &f.parameters, NamePolicy::Required, &mut errors);
            check_parameters("returns", &f.returns, NamePolicy::Optional, &mut errors);
            check_modifier_calls("modifiers", &f.modifiers, &mut errors);
            if f.is_virtual && f.visibility == FunctionVisibility::Private {
                errors.push(FieldError::new(
                    "is_virtual",
                    "private functions cannot be virtual",
                ));
            }
        }
        ComponentData::Event(e) => {
            check_identifier("name", &e.name, &mut errors);
            check_parameters("parameters", &e.parameters, NamePolicy::Required, &mut errors);
            let indexed = e.parameters.iter().filter(|p| p.indexed).count();
            let limit = if e.anonymous { 4 } else { 3 };
            if indexed > limit {
                errors.push(FieldError::new(
                    "parameters",
                    format!("at most {} parameters can be indexed", limit),
                ));
            }
        }
        ComponentData::Modifier(m) => {
            check_identifier("name", &m.name, &mut errors);
            check_parameters("parameters", &m.parameters, NamePolicy::Required, &mut errors);
            if !has_placeholder(&m.body) {
                errors.push(FieldError::new(
                    "body",
                    "modifier body must contain the `_;` placeholder",
                ));
            }
        }
        ComponentData::Error(e) => {
            check_identifier("name", &e.name, &mut errors);
            check_parameters("parameters", &e.parameters, NamePolicy::Optional, &mut errors);
        }
        ComponentData::Struct(s) => {
            check_identifier("name", &s.name, &mut errors);
            if s.fields.is_empty() {
                errors.push(FieldError::new("fields", "a struct needs at least one field"));
            }
            let mut seen = HashSet::new();
            for (i, f) in s.fields.iter().enumerate() {
                let path = format!("fields[{}]", i);
                check_identifier(&format!("{}.name", path), &f.name, &mut errors);
                check_type(&format!("{}.data_type", path), &f.data_type, &mut errors);
                if !seen.insert(f.name.as_str()) {
                    errors.push(FieldError::new(
                        format!("{}.name", path),
                        format!("duplicate field name '{}'", f.name),
                    ));
                }
                if f.data_type.trim() == s.name {
                    errors.push(FieldError::new(
                        format!("{}.data_type", path),
                        "a struct cannot contain itself",
                    ));
                }
            }
        }
        ComponentData::Enum(e) => {
            check_identifier("name", &e.name, &mut errors);
            if e.values.is_empty() {
                errors.push(FieldError::new("values", "an enum needs at least one value"));
            }
            if e.values.len() > 256 {
                errors.push(FieldError::new("values", "an enum can have at most 256 values"));
            }
            let mut seen = HashSet::new();
            for (i, value) in e.values.iter().enumerate() {
                let path = format!("values[{}]", i);
                check_identifier(&path, value, &mut errors);
                if !seen.insert(value.as_str()) {
                    errors.push(FieldError::new(path, format!("duplicate value '{}'", value)));
                }
            }
        }
        ComponentData::Mapping(m) => {
            check_identifier("name", &m.name, &mut errors);
            let key = m.key_type.trim();
            if is_elementary_type(key) || is_user_defined_type(key) {
                // Valid key.
            } else {
                errors.push(FieldError::new(
                    "key_type",
                    format!("'{}' cannot be used as a mapping key", m.key_type),
                ));
            }
            check_type("value_type", &m.value_type, &mut errors);
        }
        ComponentData::Array(a) => {
            check_identifier("name", &a.name, &mut errors);
            check_type("element_type", &a.element_type, &mut errors);
            if a.length == Some(0) {
                errors.push(FieldError::new("length", "fixed-size arrays need a length above zero"));
            }
        }
        ComponentData::Integration(i) => {
            check_identifier("name", &i.name, &mut errors);
            let path = i.import_path.trim();
            if path.is_empty() && i.standard == TokenStandard::Custom {
                errors.push(FieldError::new(
                    "import_path",
                    "custom integrations need an import path",
                ));
            }
            if !path.is_empty() && !path.ends_with(".sol") {
                errors.push(FieldError::new(
                    "import_path",
                    "import path must point at a .sol file",
                ));
            }
        }
        ComponentData::Security(s) => {
            check_identifier("name", &s.name, &mut errors);
            if s.feature == SecurityFeature::AccessControl && s.roles.is_empty() {
                errors.push(FieldError::new("roles", "access control needs at least one role"));
            }
            let mut seen = HashSet::new();
            for (i, role) in s.roles.iter().enumerate() {
                let path = format!("roles[{}]", i);
                check_identifier(&path, role, &mut errors);
                if !seen.insert(role.as_str()) {
                    errors.push(FieldError::new(path, format!("duplicate role '{}'", role)));
                }
            }
        }
        ComponentData::Oracle(o) => {
            check_identifier("name", &o.name, &mut errors);
            check_address("feed_address", &o.feed_address, &mut errors);
            if o.decimals > 36 {
                errors.push(FieldError::new("decimals", "decimals must be at most 36"));
            }
        }
        ComponentData::ExternalCall(c) => {
            check_identifier("name", &c.name, &mut errors);
            check_address("target_address", &c.target_address, &mut errors);
            check_identifier("interface_name", &c.interface_name, &mut errors);
            if !is_function_signature(&c.function_signature) {
                errors.push(FieldError::new(
                    "function_signature",
                    "expected a signature like `transfer(address,uint256)`",
                ));
            }
            if let Some(value) = &c.value_wei {
                if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                    errors.push(FieldError::new("value_wei", "value must be a whole number of wei"));
                }
            }
        }
    }
    errors
}

/// Validates `data` and, if it passes, writes it into the graph.
///
/// Returns the data that was replaced.
pub fn apply(
    graph: &mut ComponentGraph,
    id: &ComponentId,
    data: ComponentData,
) -> Result<ComponentData, CoreError> {
    let errors = validate(&data);
    if !errors.is_empty() {
        return Err(CoreError::Validation { errors });
    }
    graph.update(id, data)
}

/// Runs every form check plus the contract-level checks over the graph.
pub fn validate_graph(graph: &ComponentGraph) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    for node in graph.nodes() {
        for error in validate(&node.data) {
            issues.push(GraphIssue {
                id: node.id.clone(),
                field: Some(error.field),
                message: error.message,
            });
        }
    }

    let mut constructors = graph
        .nodes()
        .filter(|n| n.kind() == ComponentKind::Constructor);
    if constructors.next().is_some() {
        for extra in constructors {
            issues.push(GraphIssue {
                id: extra.id.clone(),
                field: None,
                message: "a contract can only have one constructor".to_string(),
            });
        }
    }

    let mut by_name: HashMap<&str, Vec<(&ComponentId, &ComponentData)>> = HashMap::new();
    for node in graph.nodes() {
        if let Some(name) = node.data.name() {
            by_name.entry(name).or_default().push((&node.id, &node.data));
        }
    }
    let mut names: Vec<_> = by_name.into_iter().filter(|(_, v)| v.len() > 1).collect();
    names.sort_by_key(|(name, _)| *name);
    for (name, members) in names {
        let first_kind = members[0].1.kind();
        let overloads = members
            .iter()
            .all(|(_, data)| data.kind() == first_kind && data.is_overloadable());
        if overloads {
            continue;
        }
        for (id, _) in members.iter().skip(1) {
            issues.push(GraphIssue {
                id: (*id).clone(),
                field: Some("name".to_string()),
                message: format!("name '{}' is already used by another component", name),
            });
        }
    }

    issues
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum NamePolicy {
    Required,
    Optional,
}

fn check_identifier(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.is_empty() {
        errors.push(FieldError::new(field, "name is required"));
    } else if !is_identifier(value) {
        errors.push(FieldError::new(
            field,
            format!("'{}' is not a valid identifier", value),
        ));
    } else if is_reserved(value) {
        errors.push(FieldError::new(
            field,
            format!("'{}' is a reserved word", value),
        ));
    }
}

fn check_type(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "type is required"));
    } else if !is_valid_type(value) {
        errors.push(FieldError::new(
            field,
            format!("'{}' is not a valid Solidity type", value),
        ));
    }
}

fn check_address(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if !is_address(value) {
        errors.push(FieldError::new(
            field,
            "expected a 0x-prefixed 20-byte hex address",
        ));
    }
}

fn check_parameters(
    field: &str,
    params: &[Parameter],
    names: NamePolicy,
    errors: &mut Vec<FieldError>,
) {
    let mut seen = HashSet::new();
    for (i, p) in params.iter().enumerate() {
        let path = format!("{}[{}]", field, i);
        if !(p.name.is_empty() && names == NamePolicy::Optional) {
            check_identifier(&format!("{}.name", path), &p.name, errors);
            if !p.name.is_empty() && !seen.insert(p.name.as_str()) {
                errors.push(FieldError::new(
                    format!("{}.name", path),
                    format!("duplicate parameter name '{}'", p.name),
                ));
            }
        }
        check_type(&format!("{}.data_type", path), strip_location(&p.data_type), errors);
    }
}

fn check_modifier_calls(field: &str, modifiers: &[String], errors: &mut Vec<FieldError>) {
    for (i, m) in modifiers.iter().enumerate() {
        let name = match m.find('(') {
            Some(open) if m.ends_with(')') => &m[..open],
            Some(_) => "",
            None => m.as_str(),
        };
        if !is_identifier(name.trim()) {
            errors.push(FieldError::new(
                format!("{}[{}]", field, i),
                format!("'{}' is not a modifier invocation", m),
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Lexical helpers
// ---------------------------------------------------------------------------

const RESERVED: &[&str] = &[
    "abstract", "after", "alias", "anonymous", "apply", "as", "assembly", "auto", "break",
    "calldata", "case", "catch", "constant", "constructor", "continue", "contract", "copyof",
    "days", "default", "define", "delete", "do", "else", "emit", "enum", "error", "ether",
    "event", "external", "fallback", "false", "final", "for", "function", "gwei", "hours", "if",
    "immutable", "implements", "import", "in", "indexed", "inline", "interface", "internal",
    "is", "let", "library", "macro", "mapping", "match", "memory", "minutes", "modifier",
    "mutable", "new", "null", "of", "override", "partial", "payable", "pragma", "private",
    "promise", "public", "pure", "receive", "reference", "relocatable", "return", "returns",
    "revert", "sealed", "seconds", "sizeof", "static", "storage", "struct", "super", "supports",
    "switch", "this", "throw", "true", "try", "type", "typedef", "typeof", "unchecked", "var",
    "view", "virtual", "weeks", "wei", "while", "years",
];

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Returns `true` for Solidity keywords and elementary type names.
pub fn is_reserved(s: &str) -> bool {
    RESERVED.contains(&s) || is_elementary_type(s)
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Elementary value types: `bool`, `address`, `address payable`, `string`,
/// `bytes`, `bytes1`..`bytes32`, `int`/`uint` and their 8..256 bit widths.
pub fn is_elementary_type(s: &str) -> bool {
    match s {
        "bool" | "address" | "address payable" | "string" | "bytes" | "int" | "uint" => true,
        _ => {
            if let Some(n) = s.strip_prefix("bytes") {
                return parse_width(n).is_some_and(|w| (1..=32).contains(&w));
            }
            let bits = s.strip_prefix("uint").or_else(|| s.strip_prefix("int"));
            match bits.and_then(parse_width) {
                Some(w) => (8..=256).contains(&w) && w % 8 == 0,
                None => false,
            }
        }
    }
}

fn parse_width(s: &str) -> Option<u32> {
    if s.is_empty() || s.starts_with('0') || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A (possibly qualified) user-defined type name such as `Order` or
/// `IERC20.Permit`.
pub fn is_user_defined_type(s: &str) -> bool {
    !s.is_empty()
        && s
            .split('.')
            .all(|part| is_identifier(part) && !is_reserved(part))
}

/// Any type usable for a state variable, field or parameter: elementary,
/// user-defined, arrays of those, and mappings.
pub fn is_valid_type(s: &str) -> bool {
    let s = s.trim();
    if let Some(inner) = s
        .strip_prefix("mapping")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return match inner.split_once("=>") {
            Some((key, value)) => {
                let key = key.trim();
                (is_elementary_type(key) || is_user_defined_type(key)) && is_valid_type(value)
            }
            None => false,
        };
    }
    if let Some(base) = s.strip_suffix(']') {
        return match base.rfind('[') {
            Some(open) => {
                let len = base[open + 1..].trim();
                let len_ok = len.is_empty() || parse_width(len).is_some();
                len_ok && is_valid_type(&base[..open])
            }
            None => false,
        };
    }
    is_elementary_type(s) || is_user_defined_type(s)
}

/// `name(type,type,...)` with elementary or user-defined argument types.
pub fn is_function_signature(s: &str) -> bool {
    let Some((name, rest)) = s.split_once('(') else {
        return false;
    };
    let Some(args) = rest.strip_suffix(')') else {
        return false;
    };
    if !is_identifier(name) {
        return false;
    }
    args.is_empty() || args.split(',').all(|a| is_valid_type(a.trim()))
}

/// Whether a modifier body contains a standalone `_;` statement.
fn has_placeholder(body: &str) -> bool {
    let bytes = body.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'_' {
            return false;
        }
        let standalone = i == 0 || !(bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'_');
        standalone && body[i + 1..].trim_start().starts_with(';')
    })
}

/// Drops a trailing data location (`memory`, `calldata`, `storage`).
fn strip_location(ty: &str) -> &str {
    let ty = ty.trim();
    for location in [" memory", " calldata", " storage"] {
        if let Some(base) = ty.strip_suffix(location) {
            return base.trim_end();
        }
    }
    ty
}
