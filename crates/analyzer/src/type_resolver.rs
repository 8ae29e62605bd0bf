//! Type name resolution for emitted code
//!
//! Maps a type reference from the listing to the name written in generated
//! source. Resolution is total: anything unrecognised falls through to its
//! short name.

use soap_client_generator_common::TypeName;
use soap_client_generator_parser::TypeSyntax;

/// Built-in types emitted by keyword
const PRIMITIVES: &[&str] = &[
    "byte", "sbyte", "short", "ushort", "int", "uint", "long", "ulong", "float", "double",
    "decimal", "char", "string", "bool", "object",
];

/// Placeholder XML node types and their linq-style replacement
const XML_NODE_RENAMES: &[(&str, &str)] = &[("XmlElement", "XElement")];

/// Resolve a listing type reference to its emitted name
pub fn resolve(ty: &TypeSyntax) -> TypeName {
    resolve_canonical(&ty.canonicalize())
}

fn resolve_canonical(ty: &TypeSyntax) -> TypeName {
    match ty {
        TypeSyntax::Array { element, rank } => TypeName::Array {
            element: Box::new(resolve_canonical(element)),
            rank: *rank,
        },
        TypeSyntax::Nullable(inner) => TypeName::Nullable(Box::new(resolve_canonical(inner))),
        TypeSyntax::Named { path, args } => {
            if args.is_empty() && path.len() == 1 && is_primitive(&path[0]) {
                return TypeName::named(path[0].as_str());
            }

            let short = ty.short_name();
            if let Some((_, renamed)) = XML_NODE_RENAMES.iter().find(|(from, _)| *from == short) {
                return TypeName::named(*renamed);
            }

            if args.is_empty() {
                TypeName::named(short)
            } else {
                TypeName::generic(short, args.iter().map(resolve_canonical).collect())
            }
        }
    }
}

/// Whether a canonical type name is one of the built-in keyword types
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}
