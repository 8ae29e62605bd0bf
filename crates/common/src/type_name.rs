//! Structural type names for emitted code

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type reference as it appears in generated source
///
/// Built structurally by the analyzer's type resolver and printed verbatim by
/// the generator. Never produced by formatting and re-parsing text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeName {
    /// Keyword, simple or qualified name (`string`, `Foo`, `SoapServices.SoapClientBase`)
    Named(String),
    /// Generic instantiation (`Task<Foo>`)
    Generic { name: String, args: Vec<TypeName> },
    /// Array of the given rank (`Foo[]`, `Foo[,]`)
    Array { element: Box<TypeName>, rank: usize },
    /// Nullable value type (`int?`)
    Nullable(Box<TypeName>),
}

impl TypeName {
    /// Create a plain named type
    pub fn named(name: impl Into<String>) -> Self {
        TypeName::Named(name.into())
    }

    /// Create a generic instantiation
    pub fn generic(name: impl Into<String>, args: Vec<TypeName>) -> Self {
        TypeName::Generic {
            name: name.into(),
            args,
        }
    }

    /// Create a single-dimension array of `element`
    pub fn array_of(element: TypeName) -> Self {
        TypeName::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// The innermost non-array, non-nullable type
    pub fn innermost(&self) -> &TypeName {
        match self {
            TypeName::Array { element, .. } => element.innermost(),
            TypeName::Nullable(inner) => inner.innermost(),
            other => other,
        }
    }

    /// Whether this is an array type
    pub fn is_array(&self) -> bool {
        matches!(self, TypeName::Array { .. })
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Named(name) => write!(f, "{}", name),
            TypeName::Generic { name, args } => {
                write!(f, "{}<", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
            TypeName::Array { element, rank } => {
                write!(f, "{}[{}]", element, ",".repeat(rank.saturating_sub(1)))
            }
            TypeName::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TypeName::named("string").to_string(), "string");
        assert_eq!(
            TypeName::generic("Task", vec![TypeName::named("Foo")]).to_string(),
            "Task<Foo>"
        );
        assert_eq!(
            TypeName::array_of(TypeName::named("XElement")).to_string(),
            "XElement[]"
        );
        assert_eq!(
            TypeName::Array {
                element: Box::new(TypeName::named("int")),
                rank: 2
            }
            .to_string(),
            "int[,]"
        );
        assert_eq!(
            TypeName::Nullable(Box::new(TypeName::named("System.DateTime"))).to_string(),
            "System.DateTime?"
        );
    }

    #[test]
    fn test_innermost() {
        let ty = TypeName::array_of(TypeName::array_of(TypeName::named("Foo")));
        assert_eq!(ty.innermost(), &TypeName::named("Foo"));
        assert!(ty.is_array());
    }
}
