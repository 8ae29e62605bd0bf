//! Enum synthesis

use crate::syntax::{Attribute, EnumDecl, EnumMemberDecl, Expr};
use soap_client_generator_common::EnumDescriptor;

pub fn synthesize_enum(descriptor: &EnumDescriptor) -> EnumDecl {
    let attributes = if descriptor.is_flags {
        vec![Attribute::new("System.Flags")]
    } else {
        vec![]
    };

    let members = descriptor
        .members
        .iter()
        .map(|member| EnumMemberDecl {
            // only members with their own wire value are annotated
            attributes: member
                .wire_value
                .iter()
                .map(|wire| Attribute::new("XmlEnum").positional(Expr::string(wire.as_str())))
                .collect(),
            name: member.name.clone(),
            value: member.value.clone(),
        })
        .collect();

    EnumDecl {
        attributes,
        name: descriptor.name.clone(),
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::print_attribute;
    use soap_client_generator_common::EnumMemberDescriptor;

    fn member(name: &str, wire: Option<&str>, value: Option<&str>) -> EnumMemberDescriptor {
        EnumMemberDescriptor {
            name: name.into(),
            wire_value: wire.map(str::to_string),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_only_explicit_wire_values_are_annotated() {
        let descriptor = EnumDescriptor {
            name: "Letter".into(),
            is_flags: false,
            members: vec![member("A", None, None), member("B", Some("b-value"), None)],
        };
        let decl = synthesize_enum(&descriptor);

        assert_eq!(decl.members.len(), 2);
        assert!(decl.attributes.is_empty());
        assert!(decl.members[0].attributes.is_empty());
        assert_eq!(decl.members[1].attributes.len(), 1);
        assert_eq!(
            print_attribute(&decl.members[1].attributes[0]),
            "[XmlEnum(\"b-value\")]"
        );
    }

    #[test]
    fn test_flags_and_initializers() {
        let descriptor = EnumDescriptor {
            name: "Access".into(),
            is_flags: true,
            members: vec![member("Read", None, Some("1")), member("Write", None, Some("1<<1"))],
        };
        let decl = synthesize_enum(&descriptor);

        assert_eq!(decl.attributes, vec![Attribute::new("System.Flags")]);
        assert_eq!(decl.members[1].value.as_deref(), Some("1<<1"));
    }
}
