//! Attribute binding
//!
//! Attribute names are resolved once, while parsing, into a closed set of
//! [`AnnotationKind`]s. Namespace qualification and the `Attribute` suffix are
//! irrelevant: `System.Xml.Serialization.XmlElementAttribute` and `XmlElement`
//! bind to the same kind.

use crate::syntax::{Expr, TypeSyntax};

/// The annotations the generator understands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    ServiceContract,
    OperationContract,
    DataContract,
    MessageContract,
    MessageBodyMember,
    MessageHeader,
    XmlType,
    XmlRoot,
    XmlElement,
    XmlArray,
    XmlArrayItem,
    XmlAttribute,
    XmlAnyElement,
    XmlAnyAttribute,
    XmlText,
    XmlIgnore,
    XmlEnum,
    XmlInclude,
    Flags,
    /// Anything else, by unqualified name without the `Attribute` suffix
    Other(String),
}

impl AnnotationKind {
    /// Resolve an attribute name as written in source
    pub fn from_name(written: &str) -> Self {
        let short = written.rsplit(['.', ':']).next().unwrap_or(written);
        let short = short.strip_suffix("Attribute").unwrap_or(short);

        match short {
            "ServiceContract" => AnnotationKind::ServiceContract,
            "OperationContract" => AnnotationKind::OperationContract,
            "DataContract" => AnnotationKind::DataContract,
            "MessageContract" => AnnotationKind::MessageContract,
            "MessageBodyMember" => AnnotationKind::MessageBodyMember,
            "MessageHeader" => AnnotationKind::MessageHeader,
            "XmlType" => AnnotationKind::XmlType,
            "XmlRoot" => AnnotationKind::XmlRoot,
            "XmlElement" => AnnotationKind::XmlElement,
            "XmlArray" => AnnotationKind::XmlArray,
            "XmlArrayItem" => AnnotationKind::XmlArrayItem,
            "XmlAttribute" => AnnotationKind::XmlAttribute,
            "XmlAnyElement" => AnnotationKind::XmlAnyElement,
            "XmlAnyAttribute" => AnnotationKind::XmlAnyAttribute,
            "XmlText" => AnnotationKind::XmlText,
            "XmlIgnore" => AnnotationKind::XmlIgnore,
            "XmlEnum" => AnnotationKind::XmlEnum,
            "XmlInclude" => AnnotationKind::XmlInclude,
            "Flags" => AnnotationKind::Flags,
            other => AnnotationKind::Other(other.to_string()),
        }
    }
}

/// A bound attribute with its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// `return`, `field`, ... when the attribute list names a target
    pub target: Option<String>,
    pub positional: Vec<Expr>,
    pub named: Vec<(String, Expr)>,
    pub line: usize,
}

impl Annotation {
    /// Named argument by key
    pub fn named(&self, key: &str) -> Option<&Expr> {
        self.named
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Named string argument; `null` and non-strings read as absent
    pub fn named_str(&self, key: &str) -> Option<&str> {
        self.named(key).and_then(Expr::as_str)
    }

    /// Named string argument, treating the empty string as absent
    pub fn named_non_empty(&self, key: &str) -> Option<&str> {
        self.named_str(key).filter(|s| !s.is_empty())
    }

    pub fn named_int(&self, key: &str) -> Option<i64> {
        self.named(key).and_then(Expr::as_int)
    }

    pub fn named_bool(&self, key: &str) -> Option<bool> {
        self.named(key).and_then(Expr::as_bool)
    }

    /// `typeof(..)` given for a named argument
    pub fn named_type(&self, key: &str) -> Option<&TypeSyntax> {
        self.named(key).and_then(Expr::as_type)
    }

    /// First positional string argument
    pub fn positional_str(&self) -> Option<&str> {
        self.positional.iter().find_map(Expr::as_str)
    }

    /// First positional `typeof(..)` argument
    pub fn positional_type(&self) -> Option<&TypeSyntax> {
        self.positional.iter().find_map(Expr::as_type)
    }
}

/// Typed annotation lookup for anything that carries attributes
pub trait Annotated {
    fn annotations(&self) -> &[Annotation];

    /// First annotation of the given kind, ignoring targeted ones
    fn annotation(&self, kind: &AnnotationKind) -> Option<&Annotation> {
        self.annotations_of(kind).next()
    }

    /// All annotations of the given kind, in source order
    fn annotations_of<'a>(
        &'a self,
        kind: &AnnotationKind,
    ) -> Box<dyn Iterator<Item = &'a Annotation> + 'a> {
        let kind = kind.clone();
        Box::new(
            self.annotations()
                .iter()
                .filter(move |a| a.kind == kind && !is_foreign_target(a)),
        )
    }

    fn has_annotation(&self, kind: &AnnotationKind) -> bool {
        self.annotation(kind).is_some()
    }
}

/// Attributes aimed at a return value or parameter do not describe the member
fn is_foreign_target(annotation: &Annotation) -> bool {
    matches!(annotation.target.as_deref(), Some("return") | Some("param"))
}
