//! Declaration tree produced by the parser
//!
//! Only the declaration level of a listing is modelled. Method bodies,
//! accessor bodies and initializers other than constants are skipped.

use crate::annotations::{Annotated, Annotation};
use std::fmt;

/// Kind of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

/// A class, struct, interface, enum or delegate declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Enclosing namespace, if any
    pub namespace: Option<String>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub base_list: Vec<TypeSyntax>,
    pub members: Vec<MemberDeclaration>,
    pub enum_members: Vec<EnumMemberDeclaration>,
    pub nested: Vec<TypeDeclaration>,
    pub line: usize,
}

impl TypeDeclaration {
    /// Namespace-qualified name
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.members.iter().filter_map(|m| match m {
            MemberDeclaration::Field(field) => Some(field),
            _ => None,
        })
    }

    /// Properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDeclaration> {
        self.members.iter().filter_map(|m| match m {
            MemberDeclaration::Property(property) => Some(property),
            _ => None,
        })
    }

    /// Methods in declaration order
    pub fn methods(&self) -> impl Iterator<Item = &MethodDeclaration> {
        self.members.iter().filter_map(|m| match m {
            MemberDeclaration::Method(method) => Some(method),
            _ => None,
        })
    }
}

impl Annotated for TypeDeclaration {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// A member of a class, struct or interface
#[derive(Debug, Clone, PartialEq)]
pub enum MemberDeclaration {
    Field(FieldDeclaration),
    Property(PropertyDeclaration),
    Method(MethodDeclaration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<String>,
    pub type_syntax: TypeSyntax,
    pub name: String,
    pub initializer: Option<Expr>,
}

impl Annotated for FieldDeclaration {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDeclaration {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<String>,
    pub type_syntax: TypeSyntax,
    pub name: String,
}

impl Annotated for PropertyDeclaration {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<String>,
    pub return_type: TypeSyntax,
    pub name: String,
    pub parameters: Vec<ParameterSyntax>,
}

impl Annotated for MethodDeclaration {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSyntax {
    pub annotations: Vec<Annotation>,
    /// `ref`, `out`, `in`, `params`, `this`
    pub modifiers: Vec<String>,
    pub type_syntax: TypeSyntax,
    pub name: String,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMemberDeclaration {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub value: Option<Expr>,
}

impl Annotated for EnumMemberDeclaration {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// A type reference as written in the listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSyntax {
    /// Dotted name; generic arguments belong to the last segment
    Named {
        path: Vec<String>,
        args: Vec<TypeSyntax>,
    },
    Array {
        element: Box<TypeSyntax>,
        rank: usize,
    },
    Nullable(Box<TypeSyntax>),
}

/// Keyword aliases of the runtime's built-in types
const KEYWORD_ALIASES: &[(&str, &str)] = &[
    ("System.Boolean", "bool"),
    ("System.Byte", "byte"),
    ("System.SByte", "sbyte"),
    ("System.Int16", "short"),
    ("System.UInt16", "ushort"),
    ("System.Int32", "int"),
    ("System.UInt32", "uint"),
    ("System.Int64", "long"),
    ("System.UInt64", "ulong"),
    ("System.Single", "float"),
    ("System.Double", "double"),
    ("System.Decimal", "decimal"),
    ("System.Char", "char"),
    ("System.String", "string"),
    ("System.Object", "object"),
];

impl TypeSyntax {
    /// Build a non-generic named type from a dotted name
    pub fn simple(name: &str) -> Self {
        TypeSyntax::Named {
            path: name.split('.').map(str::to_string).collect(),
            args: Vec::new(),
        }
    }

    /// Unqualified name of a named type; empty for arrays and nullables
    pub fn short_name(&self) -> &str {
        match self {
            TypeSyntax::Named { path, .. } => path.last().map(String::as_str).unwrap_or(""),
            _ => "",
        }
    }

    /// Dotted name without generic arguments
    pub fn dotted_name(&self) -> Option<String> {
        match self {
            TypeSyntax::Named { path, .. } => Some(path.join(".")),
            _ => None,
        }
    }

    /// Generic type arguments of a named type
    pub fn type_args(&self) -> &[TypeSyntax] {
        match self {
            TypeSyntax::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Whether this is a named type with generic arguments
    pub fn is_generic(&self) -> bool {
        !self.type_args().is_empty()
    }

    /// Canonical display name with built-in types shown as keywords
    ///
    /// `System.String` and `string` both canonicalize to `string`;
    /// `System.Nullable<T>` canonicalizes to `T?`.
    pub fn canonical_name(&self) -> String {
        self.canonicalize().to_string()
    }

    /// Structural form of [`canonical_name`](Self::canonical_name)
    pub fn canonicalize(&self) -> TypeSyntax {
        match self {
            TypeSyntax::Named { path, args } => {
                let dotted = path.join(".");
                if args.is_empty() {
                    if let Some((_, keyword)) =
                        KEYWORD_ALIASES.iter().find(|(full, _)| *full == dotted)
                    {
                        return TypeSyntax::simple(keyword);
                    }
                }
                if args.len() == 1 && (dotted == "System.Nullable" || dotted == "Nullable") {
                    return TypeSyntax::Nullable(Box::new(args[0].canonicalize()));
                }
                TypeSyntax::Named {
                    path: path.clone(),
                    args: args.iter().map(TypeSyntax::canonicalize).collect(),
                }
            }
            TypeSyntax::Array { element, rank } => TypeSyntax::Array {
                element: Box::new(element.canonicalize()),
                rank: *rank,
            },
            TypeSyntax::Nullable(inner) => TypeSyntax::Nullable(Box::new(inner.canonicalize())),
        }
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Named { path, args } => {
                write!(f, "{}", path.join("."))?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeSyntax::Array { element, rank } => {
                write!(f, "{}[{}]", element, ",".repeat(rank.saturating_sub(1)))
            }
            TypeSyntax::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

/// Constant expression in an attribute argument or initializer
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Char(char),
    Int(i64),
    /// Numeric literal that is not a plain integer (`1.5`, `0xFFu`)
    Number(String),
    Bool(bool),
    Null,
    TypeOf(TypeSyntax),
    /// Dotted name such as an enum value
    Path(Vec<String>),
    Neg(Box<Expr>),
    /// Anything else, as source text
    Raw(String),
}

impl Expr {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int(i) => Some(*i),
            Expr::Neg(inner) => inner.as_int().map(|i| -i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expr::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeSyntax> {
        match self {
            Expr::TypeOf(ty) => Some(ty),
            _ => None,
        }
    }

    /// Last segment of a dotted name (`XmlSchemaForm.Qualified` → `Qualified`)
    pub fn path_tail(&self) -> Option<&str> {
        match self {
            Expr::Path(path) => path.last().map(String::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Str(s) => write!(f, "{:?}", s),
            Expr::Char(c) => write!(f, "{:?}", c),
            Expr::Int(i) => write!(f, "{}", i),
            Expr::Number(n) | Expr::Raw(n) => write!(f, "{}", n),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Null => write!(f, "null"),
            Expr::TypeOf(ty) => write!(f, "typeof({})", ty),
            Expr::Path(path) => write!(f, "{}", path.join(".")),
            Expr::Neg(inner) => write!(f, "-{}", inner),
        }
    }
}
