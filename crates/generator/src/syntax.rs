//! Output syntax tree
//!
//! Synthesized code is built from these nodes and turned into text only by
//! the [`printer`](crate::printer). Nothing here is ever produced by
//! formatting source text and parsing it back.

use soap_client_generator_common::TypeName;

/// A top-level declaration inside the output namespace
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Interface(InterfaceDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Interface(decl) => &decl.name,
            Declaration::Class(decl) => &decl.name,
            Declaration::Enum(decl) => &decl.name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Partial,
    Virtual,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Partial => "partial",
            Modifier::Virtual => "virtual",
        }
    }
}

/// `[Name(args)]`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<AttributeArg>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn positional(mut self, value: Expr) -> Self {
        self.args.push(AttributeArg::Positional(value));
        self
    }

    pub fn named(mut self, key: &str, value: Expr) -> Self {
        self.args.push(AttributeArg::Named(key.to_string(), value));
        self
    }

    /// Add a named string argument when a value is present
    pub fn named_str(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.named(key, Expr::string(value)),
            None => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArg {
    Positional(Expr),
    Named(String, Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Bool(bool),
    TypeOf(TypeName),
    /// Dotted name such as `XmlSchemaForm.Qualified`
    Path(String),
    /// Local identifier, escaped on output when it is a keyword
    Identifier(String),
    This,
    MemberAccess {
        target: Box<Expr>,
        member: String,
    },
    Invocation {
        target: Box<Expr>,
        type_args: Vec<TypeName>,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn member(self, member: impl Into<String>) -> Self {
        Expr::MemberAccess {
            target: Box::new(self),
            member: member.into(),
        }
    }

    pub fn invoke(self, type_args: Vec<TypeName>, args: Vec<Expr>) -> Self {
        Expr::Invocation {
            target: Box::new(self),
            type_args,
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Return(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_name: TypeName,
}

/// Method signature, with a body for class members
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeName,
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// `None` prints a bodiless signature ending in `;`
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub attributes: Vec<Attribute>,
    pub type_name: TypeName,
    pub name: String,
}

/// Auto-property with `get; set;`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub attributes: Vec<Attribute>,
    pub type_name: TypeName,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Property(PropertyDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub base_types: Vec<TypeName>,
    pub members: Vec<Member>,
}

impl ClassDecl {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Property(property) => Some(property),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub attributes: Vec<Attribute>,
    pub name: String,
    pub members: Vec<EnumMemberDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMemberDecl {
    pub attributes: Vec<Attribute>,
    pub name: String,
    /// Initializer text, printed verbatim
    pub value: Option<String>,
}
