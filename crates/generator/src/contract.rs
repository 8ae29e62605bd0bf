//! Data class synthesis
//!
//! Every member keeps the serialization annotations needed to reproduce the
//! wire shape of the source contract.

use crate::syntax::{Attribute, ClassDecl, Expr, FieldDecl, Member, Modifier, PropertyDecl};
use soap_client_generator_common::{
    AnyElementMetadata, ArrayItemMetadata, ArrayMetadata, AttributeMetadata, ContractDescriptor,
    ElementMetadata, MemberDescriptor, Placement, RootElement, TextMetadata,
};
use tracing::debug;

/// Public class with root, include and member annotations
pub fn synthesize_contract(contract: &ContractDescriptor) -> ClassDecl {
    let mut attributes: Vec<Attribute> = contract
        .includes
        .iter()
        .map(|include| Attribute::new("XmlInclude").positional(Expr::TypeOf(include.clone())))
        .collect();
    if let Some(root) = &contract.root {
        attributes.push(root_attribute(root));
    }

    let fields = contract.fields.iter().map(|field| {
        Member::Field(FieldDecl {
            attributes: placement_attributes(&field.placement),
            type_name: field.type_name.clone(),
            name: field.name.clone(),
        })
    });
    let properties = contract.properties.iter().map(|property| {
        debug!(
            contract = %contract.name,
            property = %property.name,
            placement = property.placement.kind(),
            "synthesized property"
        );
        Member::Property(property_decl(property))
    });

    ClassDecl {
        attributes,
        modifiers: vec![Modifier::Public],
        name: contract.name.clone(),
        base_types: contract.base_type.iter().cloned().collect(),
        members: fields.chain(properties).collect(),
    }
}

fn property_decl(property: &MemberDescriptor) -> PropertyDecl {
    PropertyDecl {
        attributes: placement_attributes(&property.placement),
        type_name: property.type_name.clone(),
        name: property.name.clone(),
    }
}

fn root_attribute(root: &RootElement) -> Attribute {
    Attribute::new("XmlRoot")
        .named_str("ElementName", root.element_name.as_deref())
        .named_str("Namespace", root.namespace.as_deref())
}

/// Serialization annotations for one placement
pub fn placement_attributes(placement: &Placement) -> Vec<Attribute> {
    match placement {
        Placement::Element(elements) => elements.iter().map(element_attribute).collect(),
        Placement::AnyElement(any) => vec![any_element_attribute(any)],
        Placement::Attribute(attribute) => vec![attribute_attribute(attribute)],
        Placement::Text(text) => vec![text_attribute(text)],
        Placement::Array(array) => array_attributes(array),
    }
}

fn element_attribute(element: &ElementMetadata) -> Attribute {
    let mut attribute =
        Attribute::new("XmlElement").named("ElementName", Expr::string(&element.element_name));
    if let Some(item_type) = &element.item_type {
        attribute = attribute.named("Type", Expr::TypeOf(item_type.clone()));
    }
    if element.nullability_declared {
        attribute = attribute.named("IsNullable", Expr::Bool(element.is_nullable));
    }
    with_form(
        attribute
            .named_str("Namespace", element.namespace.as_deref())
            .named_str("DataType", element.data_type.as_deref()),
        element.form.as_deref(),
    )
    .named("Order", Expr::Int(i64::from(element.order)))
}

fn any_element_attribute(any: &AnyElementMetadata) -> Attribute {
    Attribute::new("XmlAnyElement")
        .named_str("Name", any.element_name.as_deref())
        .named_str("Namespace", any.namespace.as_deref())
        .named("Order", Expr::Int(i64::from(any.order)))
}

fn attribute_attribute(attribute: &AttributeMetadata) -> Attribute {
    with_form(
        Attribute::new("XmlAttribute")
            .named_str("AttributeName", attribute.attribute_name.as_deref())
            .named_str("Namespace", attribute.namespace.as_deref())
            .named_str("DataType", attribute.data_type.as_deref()),
        attribute.form.as_deref(),
    )
}

fn text_attribute(text: &TextMetadata) -> Attribute {
    Attribute::new("XmlText").named_str("DataType", text.data_type.as_deref())
}

fn array_attributes(array: &ArrayMetadata) -> Vec<Attribute> {
    let container = Attribute::new("XmlArray")
        .named_str("ElementName", array.element_name.as_deref())
        .named_str("Namespace", array.namespace.as_deref())
        .named("Order", Expr::Int(i64::from(array.order)));

    std::iter::once(container)
        .chain(array.items.iter().map(array_item_attribute))
        .collect()
}

fn array_item_attribute(item: &ArrayItemMetadata) -> Attribute {
    let mut attribute =
        Attribute::new("XmlArrayItem").named_str("ElementName", item.element_name.as_deref());
    if let Some(item_type) = &item.item_type {
        attribute = attribute.named("Type", Expr::TypeOf(item_type.clone()));
    }
    with_form(
        attribute
            .named_str("Namespace", item.namespace.as_deref())
            .named_str("DataType", item.data_type.as_deref())
            .named("IsNullable", Expr::Bool(item.is_nullable)),
        item.form.as_deref(),
    )
}

fn with_form(attribute: Attribute, form: Option<&str>) -> Attribute {
    match form {
        Some(form) => attribute.named("Form", Expr::Path(format!("XmlSchemaForm.{}", form))),
        None => attribute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::print_attribute;
    use soap_client_generator_common::TypeName;

    fn printed(attributes: &[Attribute]) -> Vec<String> {
        attributes.iter().map(print_attribute).collect()
    }

    fn element(name: &str) -> ElementMetadata {
        ElementMetadata {
            element_name: name.into(),
            namespace: None,
            data_type: None,
            order: 0,
            is_nullable: true,
            nullability_declared: false,
            item_type: None,
            form: None,
        }
    }

    fn contract(fields: Vec<MemberDescriptor>, properties: Vec<MemberDescriptor>) -> ContractDescriptor {
        ContractDescriptor {
            name: "Payload".into(),
            base_type: None,
            includes: vec![],
            root: None,
            fields,
            properties,
        }
    }

    #[test]
    fn test_body_field_round_trip() {
        let value = MemberDescriptor {
            name: "Value".into(),
            type_name: TypeName::named("string"),
            placement: Placement::Element(vec![ElementMetadata {
                namespace: Some("urn:test".into()),
                order: 1,
                nullability_declared: true,
                ..element("Value")
            }]),
        };
        let class = synthesize_contract(&contract(vec![value], vec![]));

        let field = class.fields().next().unwrap();
        assert_eq!(field.name, "Value");
        assert_eq!(field.type_name, TypeName::named("string"));
        assert_eq!(
            printed(&field.attributes),
            vec![
                "[XmlElement(ElementName = \"Value\", IsNullable = true, Namespace = \"urn:test\", Order = 1)]"
            ]
        );
    }

    #[test]
    fn test_class_shape() {
        let mut descriptor = contract(vec![], vec![]);
        descriptor.base_type = Some(TypeName::named("BaseRecord"));
        descriptor.includes = vec![TypeName::named("DerivedRecord")];
        descriptor.root = Some(RootElement {
            element_name: Some("payload".into()),
            namespace: Some("urn:p".into()),
        });
        let class = synthesize_contract(&descriptor);

        assert_eq!(class.modifiers, vec![Modifier::Public]);
        assert_eq!(class.base_types, vec![TypeName::named("BaseRecord")]);
        assert_eq!(
            printed(&class.attributes),
            vec![
                "[XmlInclude(typeof(DerivedRecord))]",
                "[XmlRoot(ElementName = \"payload\", Namespace = \"urn:p\")]"
            ]
        );
    }

    #[test]
    fn test_root_without_element_name() {
        let root = RootElement {
            element_name: None,
            namespace: Some("urn:p".into()),
        };
        assert_eq!(
            print_attribute(&root_attribute(&root)),
            "[XmlRoot(Namespace = \"urn:p\")]"
        );
    }

    #[test]
    fn test_choice_elements() {
        let placement = Placement::Element(vec![
            ElementMetadata {
                item_type: Some(TypeName::named("int")),
                ..element("count")
            },
            ElementMetadata {
                item_type: Some(TypeName::named("string")),
                form: Some("Unqualified".into()),
                ..element("label")
            },
        ]);
        assert_eq!(
            printed(&placement_attributes(&placement)),
            vec![
                "[XmlElement(ElementName = \"count\", Type = typeof(int), Order = 0)]",
                "[XmlElement(ElementName = \"label\", Type = typeof(string), Form = XmlSchemaForm.Unqualified, Order = 0)]"
            ]
        );
    }

    #[test]
    fn test_bare_property_has_no_attributes() {
        assert!(placement_attributes(&Placement::Element(vec![])).is_empty());
    }

    #[test]
    fn test_attribute_text_and_any_placements() {
        let attribute = Placement::Attribute(AttributeMetadata {
            attribute_name: Some("unit".into()),
            namespace: None,
            data_type: Some("token".into()),
            form: Some("Qualified".into()),
        });
        assert_eq!(
            printed(&placement_attributes(&attribute)),
            vec!["[XmlAttribute(AttributeName = \"unit\", DataType = \"token\", Form = XmlSchemaForm.Qualified)]"]
        );

        let text = Placement::Text(TextMetadata::default());
        assert_eq!(printed(&placement_attributes(&text)), vec!["[XmlText]"]);

        let any = Placement::AnyElement(AnyElementMetadata {
            element_name: None,
            namespace: Some("##other".into()),
            order: 5,
        });
        assert_eq!(
            printed(&placement_attributes(&any)),
            vec!["[XmlAnyElement(Namespace = \"##other\", Order = 5)]"]
        );
    }

    #[test]
    fn test_array_placement() {
        let array = Placement::Array(ArrayMetadata {
            element_name: None,
            namespace: None,
            order: 4,
            items: vec![ArrayItemMetadata {
                element_name: Some("alert".into()),
                namespace: None,
                data_type: None,
                is_nullable: false,
                item_type: None,
                form: None,
            }],
        });
        assert_eq!(
            printed(&placement_attributes(&array)),
            vec![
                "[XmlArray(Order = 4)]",
                "[XmlArrayItem(ElementName = \"alert\", IsNullable = false)]"
            ]
        );
    }

    #[test]
    fn test_fields_precede_properties() {
        let field = MemberDescriptor {
            name: "Body".into(),
            type_name: TypeName::named("PingBody"),
            placement: Placement::Element(vec![element("Ping")]),
        };
        let property = MemberDescriptor {
            name: "fixed".into(),
            type_name: TypeName::named("bool"),
            placement: Placement::Element(vec![]),
        };
        let class = synthesize_contract(&contract(vec![field], vec![property]));

        assert!(matches!(class.members[0], Member::Field(_)));
        assert!(matches!(class.members[1], Member::Property(_)));
        assert_eq!(class.properties().next().unwrap().name, "fixed");
    }
}
