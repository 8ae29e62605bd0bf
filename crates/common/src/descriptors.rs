//! Intermediate representation of a proxy listing
//!
//! The analyzer derives these descriptors from a parsed listing; the generator
//! synthesizes output declarations from them. All collections keep the order of
//! the source listing, which is also the emission order.

use crate::TypeName;
use serde::{Deserialize, Serialize};

/// Everything the synthesizer needs for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationModel {
    pub services: Vec<ServiceDescriptor>,
    pub contracts: Vec<ContractDescriptor>,
    pub enums: Vec<EnumDescriptor>,
}

/// A service contract interface and its qualifying operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    /// Asynchronous, annotation-marked operations only
    pub operations: Vec<OperationDescriptor>,
}

/// One remotely callable operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
    /// Full asynchronous return type (`Task<Response>`)
    pub return_type: TypeName,
    /// Type argument of the asynchronous return type
    pub response_type: TypeName,
    /// Wire action identifier
    pub action: String,
    /// Body field of the request parameter's type, if it declares one
    pub request_body: Option<BodyMember>,
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_name: TypeName,
}

/// The field carrying the wire payload of a message contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMember {
    pub field_name: String,
    pub type_name: TypeName,
}

/// A data or message contract class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    pub name: String,
    /// Base class; `None` when the base is the root object type
    pub base_type: Option<TypeName>,
    /// Types named by include annotations, re-emitted as-is
    pub includes: Vec<TypeName>,
    /// Root element annotation, when the contract shape requires one
    pub root: Option<RootElement>,
    pub fields: Vec<MemberDescriptor>,
    pub properties: Vec<MemberDescriptor>,
}

/// Root element name and namespace of a contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootElement {
    pub element_name: Option<String>,
    pub namespace: Option<String>,
}

/// A field or property that survives exclusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub type_name: TypeName,
    pub placement: Placement,
}

/// How a member is serialized; exactly one applies per member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Child element(s); more than one entry describes a choice
    Element(Vec<ElementMetadata>),
    AnyElement(AnyElementMetadata),
    Attribute(AttributeMetadata),
    Text(TextMetadata),
    Array(ArrayMetadata),
}

impl Placement {
    /// Short label used in logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Placement::Element(_) => "element",
            Placement::AnyElement(_) => "any-element",
            Placement::Attribute(_) => "attribute",
            Placement::Text(_) => "text",
            Placement::Array(_) => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// Explicit name, positional name, or the member name
    pub element_name: String,
    pub namespace: Option<String>,
    pub data_type: Option<String>,
    /// Zero means unordered
    pub order: i32,
    pub is_nullable: bool,
    /// Whether the source stated nullability (element or array-item annotation)
    pub nullability_declared: bool,
    /// `Type = typeof(..)` of a choice element
    pub item_type: Option<TypeName>,
    /// Schema form (`Qualified`/`Unqualified`), `None` is dropped
    pub form: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyElementMetadata {
    pub element_name: Option<String>,
    pub namespace: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    pub attribute_name: Option<String>,
    pub namespace: Option<String>,
    pub data_type: Option<String>,
    pub form: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMetadata {
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayMetadata {
    pub element_name: Option<String>,
    pub namespace: Option<String>,
    pub order: i32,
    pub items: Vec<ArrayItemMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayItemMetadata {
    pub element_name: Option<String>,
    pub namespace: Option<String>,
    pub data_type: Option<String>,
    pub is_nullable: bool,
    pub item_type: Option<TypeName>,
    pub form: Option<String>,
}

/// An enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub name: String,
    /// Carries a flags annotation
    pub is_flags: bool,
    pub members: Vec<EnumMemberDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMemberDescriptor {
    pub name: String,
    /// Explicit wire value from the member's own annotation
    pub wire_value: Option<String>,
    /// Explicit numeric initializer, verbatim
    pub value: Option<String>,
}
