//! Serialization metadata extraction
//!
//! Reads the annotations of contract members and derives the facts the
//! synthesizer re-emits: element names, namespaces, ordering, nullability and
//! placement. Every fallback chain goes through [`first_present`], with sources
//! listed from highest to lowest precedence. Absent metadata never fails; it
//! falls back to the documented defaults.

use crate::type_resolver::resolve;
use soap_client_generator_common::{
    AnyElementMetadata, ArrayItemMetadata, ArrayMetadata, AttributeMetadata, ElementMetadata,
    MemberDescriptor, Placement, RootElement, TextMetadata, TypeName,
};
use soap_client_generator_parser::{
    Annotated, Annotation, AnnotationKind, Expr, FieldDeclaration, PropertyDeclaration,
    TypeDeclaration, TypeSyntax,
};

/// Property types that are dropped from generated contracts
const EXCLUDED_PROPERTY_TYPES: &[&str] = &["XmlNode", "ExtensionDataObject"];

/// First present value among sources ordered by precedence
pub fn first_present<T>(sources: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    sources.into_iter().flatten().next()
}

/// Element name: explicit `ElementName`, then the positional name, then the member name
pub fn element_name(element: Option<&Annotation>, member_name: &str) -> String {
    first_present([
        element.and_then(|a| a.named_non_empty("ElementName")),
        element.and_then(positional_name),
        Some(member_name),
    ])
    .unwrap_or(member_name)
    .to_string()
}

/// Namespace: member-level annotation, then the body-member annotation
pub fn namespace(element: Option<&Annotation>, body: Option<&Annotation>) -> Option<String> {
    first_present([
        element.and_then(|a| a.named_str("Namespace")),
        body.and_then(|a| a.named_str("Namespace")),
    ])
    .map(str::to_string)
}

/// Order: first positive of member-level and body-member annotations, else 0
pub fn order(element: Option<&Annotation>, body: Option<&Annotation>) -> i32 {
    first_present([positive_order(element), positive_order(body)]).unwrap_or(0)
}

/// Data type hint of the member-level annotation
pub fn data_type(element: Option<&Annotation>) -> Option<String> {
    element
        .and_then(|a| a.named_non_empty("DataType"))
        .map(str::to_string)
}

fn positive_order(annotation: Option<&Annotation>) -> Option<i32> {
    annotation
        .and_then(|a| a.named_int("Order"))
        .and_then(|order| i32::try_from(order).ok())
        .filter(|order| *order > 0)
}

fn positional_name(annotation: &Annotation) -> Option<&str> {
    annotation.positional_str().filter(|name| !name.is_empty())
}

/// Schema form; `None` reads as absent
fn form(annotation: &Annotation) -> Option<String> {
    annotation
        .named("Form")
        .and_then(Expr::path_tail)
        .filter(|form| *form != "None")
        .map(str::to_string)
}

fn item_type(annotation: &Annotation) -> Option<TypeName> {
    annotation
        .named_type("Type")
        .or_else(|| annotation.positional_type())
        .map(resolve)
}

/// Members marked "any attribute" or "ignore" never reach the output
pub fn is_excluded(member: &impl Annotated) -> bool {
    member.has_annotation(&AnnotationKind::XmlAnyAttribute)
        || member.has_annotation(&AnnotationKind::XmlIgnore)
}

/// The field carrying a message contract's body, if any
pub fn body_member(declaration: &TypeDeclaration) -> Option<&FieldDeclaration> {
    declaration
        .fields()
        .find(|field| field.has_annotation(&AnnotationKind::MessageBodyMember))
}

/// Root element of a contract
///
/// Required when the contract carries a type annotation or a message-contract
/// annotation. The type annotation supplies a namespace, otherwise the
/// message contract supplies its wrapper name and namespace. The body member's
/// own annotation overrides both.
pub fn root_element(declaration: &TypeDeclaration) -> Option<RootElement> {
    let xml_type = declaration.annotation(&AnnotationKind::XmlType);
    let message = declaration.annotation(&AnnotationKind::MessageContract);

    let (type_name, type_namespace) = match (xml_type, message) {
        (Some(xml_type), _) => (None, xml_type.named_str("Namespace")),
        (None, Some(message)) => (
            message.named_non_empty("WrapperName"),
            message.named_str("WrapperNamespace"),
        ),
        (None, None) => return None,
    };

    let body = body_member(declaration);
    let body_annotation = body.and_then(|field| field.annotation(&AnnotationKind::MessageBodyMember));

    let element_name = first_present([
        body_annotation.and_then(|a| a.named_non_empty("Name")),
        body.map(|field| field.name.as_str()),
        type_name,
    ]);
    let namespace = first_present([
        body_annotation.and_then(|a| a.named_str("Namespace")),
        type_namespace,
    ]);

    Some(RootElement {
        element_name: element_name.map(str::to_string),
        namespace: namespace.map(str::to_string),
    })
}

/// Metadata of a message-contract field
///
/// Only body-member fields qualify. Fields always carry exactly one element
/// annotation with nullability stated.
pub fn extract_field(field: &FieldDeclaration) -> Option<MemberDescriptor> {
    let body = field.annotation(&AnnotationKind::MessageBodyMember)?;
    if is_excluded(field) {
        return None;
    }

    if let Some(any) = field.annotation(&AnnotationKind::XmlAnyElement) {
        return Some(MemberDescriptor {
            name: field.name.clone(),
            type_name: TypeName::array_of(TypeName::named("XElement")),
            placement: Placement::AnyElement(AnyElementMetadata {
                element_name: any.named_non_empty("Name").map(str::to_string),
                namespace: namespace(Some(any), Some(body)),
                order: order(Some(any), Some(body)),
            }),
        });
    }

    let placement = shared_placement(field).unwrap_or_else(|| {
        let element = field.annotation(&AnnotationKind::XmlElement);
        let array_item = field.annotation(&AnnotationKind::XmlArrayItem);
        let is_nullable = array_item
            .filter(|_| is_collection(&field.type_syntax))
            .and_then(|item| item.named_bool("IsNullable"))
            .unwrap_or(true);

        Placement::Element(vec![ElementMetadata {
            element_name: element_name(element, &field.name),
            namespace: namespace(element, Some(body)),
            data_type: data_type(element),
            order: order(element, Some(body)),
            is_nullable,
            nullability_declared: true,
            item_type: element.and_then(item_type),
            form: element.and_then(form),
        }])
    });

    Some(MemberDescriptor {
        name: field.name.clone(),
        type_name: resolve(&field.type_syntax),
        placement,
    })
}

/// Metadata of a contract property
///
/// Excluded kinds and raw XML node / extension data properties yield `None`.
pub fn extract_property(property: &PropertyDeclaration) -> Option<MemberDescriptor> {
    if is_excluded(property) {
        return None;
    }
    if EXCLUDED_PROPERTY_TYPES.contains(&innermost_short_name(&property.type_syntax)) {
        return None;
    }

    let placement = match property.annotation(&AnnotationKind::XmlAnyElement) {
        Some(any) => Placement::AnyElement(AnyElementMetadata {
            element_name: any.named_non_empty("Name").map(str::to_string),
            namespace: namespace(Some(any), None),
            order: order(Some(any), None),
        }),
        None => shared_placement(property)
            .or_else(|| array_placement(property))
            .unwrap_or_else(|| {
                Placement::Element(
                    property
                        .annotations_of(&AnnotationKind::XmlElement)
                        .map(|element| property_element(element, &property.name))
                        .collect(),
                )
            }),
    };

    Some(MemberDescriptor {
        name: property.name.clone(),
        type_name: resolve(&property.type_syntax),
        placement,
    })
}

/// Attribute and text placements, shared by fields and properties
fn shared_placement(member: &impl Annotated) -> Option<Placement> {
    if let Some(attribute) = member.annotation(&AnnotationKind::XmlAttribute) {
        return Some(Placement::Attribute(AttributeMetadata {
            attribute_name: first_present([
                attribute.named_non_empty("AttributeName"),
                positional_name(attribute),
            ])
            .map(str::to_string),
            namespace: attribute.named_str("Namespace").map(str::to_string),
            data_type: data_type(Some(attribute)),
            form: form(attribute),
        }));
    }
    if let Some(text) = member.annotation(&AnnotationKind::XmlText) {
        return Some(Placement::Text(TextMetadata {
            data_type: data_type(Some(text)),
        }));
    }
    None
}

fn array_placement(property: &PropertyDeclaration) -> Option<Placement> {
    let array = property.annotation(&AnnotationKind::XmlArray);
    let items: Vec<_> = property
        .annotations_of(&AnnotationKind::XmlArrayItem)
        .map(|item| ArrayItemMetadata {
            element_name: first_present([item.named_non_empty("ElementName"), positional_name(item)])
                .map(str::to_string),
            namespace: item.named_str("Namespace").map(str::to_string),
            data_type: data_type(Some(item)),
            is_nullable: item.named_bool("IsNullable").unwrap_or(true),
            item_type: item_type(item),
            form: form(item),
        })
        .collect();

    if array.is_none() && items.is_empty() {
        return None;
    }

    Some(Placement::Array(ArrayMetadata {
        element_name: array
            .and_then(|a| first_present([a.named_non_empty("ElementName"), positional_name(a)]))
            .map(str::to_string),
        namespace: namespace(array, None),
        order: order(array, None),
        items,
    }))
}

fn property_element(element: &Annotation, member_name: &str) -> ElementMetadata {
    let declared = element.named_bool("IsNullable");
    ElementMetadata {
        element_name: element_name(Some(element), member_name),
        namespace: namespace(Some(element), None),
        data_type: data_type(Some(element)),
        order: order(Some(element), None),
        is_nullable: declared.unwrap_or(true),
        nullability_declared: declared.is_some(),
        item_type: item_type(element),
        form: form(element),
    }
}

fn is_collection(ty: &TypeSyntax) -> bool {
    matches!(ty, TypeSyntax::Array { .. }) || ty.is_generic()
}

fn innermost_short_name(ty: &TypeSyntax) -> &str {
    match ty {
        TypeSyntax::Array { element, .. } => innermost_short_name(element),
        TypeSyntax::Nullable(inner) => innermost_short_name(inner),
        named => named.short_name(),
    }
}
