//! Deterministic source printer
//!
//! Prints an output syntax tree with four-space indentation and `\n` line
//! endings. The same tree always prints to the same text.

use crate::syntax::{
    Attribute, AttributeArg, ClassDecl, Declaration, EnumDecl, Expr, FieldDecl, InterfaceDecl,
    Member, MethodDecl, Modifier, PropertyDecl, Stmt,
};
use soap_client_generator_common::TypeName;

const INDENT: &str = "    ";

/// Reserved words that need a verbatim `@` prefix when used as identifiers
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Identifier as it must be written in source
pub fn identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}

/// Regular string literal with escapes
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Print declarations one after another, separated by blank lines
///
/// `level` is the indentation depth of the declarations themselves.
pub fn print_declarations(declarations: &[Declaration], level: usize) -> String {
    let mut printer = Printer::new(level);
    for (i, declaration) in declarations.iter().enumerate() {
        if i > 0 {
            printer.blank();
        }
        printer.declaration(declaration);
    }
    printer.finish()
}

pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Str(value) => string_literal(value),
        Expr::Int(value) => value.to_string(),
        Expr::Bool(value) => value.to_string(),
        Expr::TypeOf(ty) => format!("typeof({})", ty),
        Expr::Path(path) => path.clone(),
        Expr::Identifier(name) => identifier(name),
        Expr::This => "this".to_string(),
        Expr::MemberAccess { target, member } => {
            format!("{}.{}", print_expr(target), identifier(member))
        }
        Expr::Invocation {
            target,
            type_args,
            args,
        } => {
            let mut out = print_expr(target);
            if !type_args.is_empty() {
                out.push('<');
                out.push_str(&join(type_args.iter().map(TypeName::to_string)));
                out.push('>');
            }
            out.push('(');
            out.push_str(&join(args.iter().map(print_expr)));
            out.push(')');
            out
        }
    }
}

pub fn print_attribute(attribute: &Attribute) -> String {
    if attribute.args.is_empty() {
        return format!("[{}]", attribute.name);
    }
    let args = join(attribute.args.iter().map(|arg| match arg {
        AttributeArg::Positional(value) => print_expr(value),
        AttributeArg::Named(key, value) => format!("{} = {}", key, print_expr(value)),
    }));
    format!("[{}({})]", attribute.name, args)
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn modifiers(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .map(|m| format!("{} ", m.keyword()))
        .collect()
}

struct Printer {
    out: String,
    level: usize,
}

impl Printer {
    fn new(level: usize) -> Self {
        Self {
            out: String::new(),
            level,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self) {
        self.line("{");
        self.level += 1;
    }

    fn close(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.line("}");
    }

    fn attributes(&mut self, attributes: &[Attribute]) {
        for attribute in attributes {
            self.line(&print_attribute(attribute));
        }
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Interface(decl) => self.interface(decl),
            Declaration::Class(decl) => self.class(decl),
            Declaration::Enum(decl) => self.enumeration(decl),
        }
    }

    fn interface(&mut self, decl: &InterfaceDecl) {
        self.line(&format!("public interface {}", identifier(&decl.name)));
        self.open();
        for method in &decl.methods {
            self.method(method);
        }
        self.close();
    }

    fn class(&mut self, decl: &ClassDecl) {
        self.attributes(&decl.attributes);
        let mut header = format!("{}class {}", modifiers(&decl.modifiers), identifier(&decl.name));
        if !decl.base_types.is_empty() {
            header.push_str(" : ");
            header.push_str(&join(decl.base_types.iter().map(TypeName::to_string)));
        }
        self.line(&header);
        self.open();
        for (i, member) in decl.members.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            match member {
                Member::Field(field) => self.field(field),
                Member::Property(property) => self.property(property),
                Member::Method(method) => self.method(method),
            }
        }
        self.close();
    }

    fn field(&mut self, field: &FieldDecl) {
        self.attributes(&field.attributes);
        self.line(&format!(
            "public {} {};",
            field.type_name,
            identifier(&field.name)
        ));
    }

    fn property(&mut self, property: &PropertyDecl) {
        self.attributes(&property.attributes);
        self.line(&format!(
            "public {} {} {{ get; set; }}",
            property.type_name,
            identifier(&property.name)
        ));
    }

    fn method(&mut self, method: &MethodDecl) {
        let parameters = join(
            method
                .parameters
                .iter()
                .map(|p| format!("{} {}", p.type_name, identifier(&p.name))),
        );
        let signature = format!(
            "{}{} {}({})",
            modifiers(&method.modifiers),
            method.return_type,
            identifier(&method.name),
            parameters
        );

        match &method.body {
            None => self.line(&format!("{};", signature)),
            Some(statements) => {
                self.line(&signature);
                self.open();
                for statement in statements {
                    match statement {
                        Stmt::Return(expr) => self.line(&format!("return {};", print_expr(expr))),
                    }
                }
                self.close();
            }
        }
    }

    fn enumeration(&mut self, decl: &EnumDecl) {
        self.attributes(&decl.attributes);
        self.line(&format!("public enum {}", identifier(&decl.name)));
        self.open();
        let last = decl.members.len().saturating_sub(1);
        for (i, member) in decl.members.iter().enumerate() {
            self.attributes(&member.attributes);
            let mut text = identifier(&member.name);
            if let Some(value) = &member.value {
                text.push_str(" = ");
                text.push_str(value);
            }
            if i < last {
                text.push(',');
            }
            self.line(&text);
        }
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{EnumMemberDecl, Parameter};

    #[test]
    fn test_identifier_escapes_keywords() {
        assert_eq!(identifier("fixed"), "@fixed");
        assert_eq!(identifier("class"), "@class");
        assert_eq!(identifier("Fixed"), "Fixed");
        assert_eq!(identifier("value"), "value");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("urn:test"), "\"urn:test\"");
        assert_eq!(string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn test_print_attribute() {
        let attribute = Attribute::new("XmlElement")
            .named("ElementName", Expr::string("Value"))
            .named("IsNullable", Expr::Bool(true))
            .named("Order", Expr::Int(1));
        assert_eq!(
            print_attribute(&attribute),
            "[XmlElement(ElementName = \"Value\", IsNullable = true, Order = 1)]"
        );
        assert_eq!(print_attribute(&Attribute::new("XmlText")), "[XmlText]");
        assert_eq!(
            print_attribute(
                &Attribute::new("XmlInclude")
                    .positional(Expr::TypeOf(TypeName::named("Derived")))
            ),
            "[XmlInclude(typeof(Derived))]"
        );
    }

    #[test]
    fn test_print_call_expression() {
        let call = Expr::This.member("CallAsync").invoke(
            vec![TypeName::named("string"), TypeName::named("Response")],
            vec![
                Expr::string("urn:DoWork"),
                Expr::identifier("request").member("city"),
            ],
        );
        assert_eq!(
            print_expr(&call),
            "this.CallAsync<string, Response>(\"urn:DoWork\", request.city)"
        );
    }

    #[test]
    fn test_print_class_with_method() {
        let class = ClassDecl {
            attributes: vec![],
            modifiers: vec![Modifier::Public, Modifier::Partial],
            name: "IWorkerClient".into(),
            base_types: vec![TypeName::named("ClientBase"), TypeName::named("IWorker")],
            members: vec![Member::Method(MethodDecl {
                modifiers: vec![Modifier::Public, Modifier::Virtual],
                return_type: TypeName::generic("Task", vec![TypeName::named("Response")]),
                name: "DoWork".into(),
                parameters: vec![Parameter {
                    name: "request".into(),
                    type_name: TypeName::named("Request"),
                }],
                body: Some(vec![Stmt::Return(Expr::identifier("request"))]),
            })],
        };

        let text = print_declarations(&[Declaration::Class(class)], 1);
        let expected = "    public partial class IWorkerClient : ClientBase, IWorker\n\
                        \x20   {\n\
                        \x20       public virtual Task<Response> DoWork(Request request)\n\
                        \x20       {\n\
                        \x20           return request;\n\
                        \x20       }\n\
                        \x20   }\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_print_enum() {
        let decl = EnumDecl {
            attributes: vec![Attribute::new("System.Flags")],
            name: "Access".into(),
            members: vec![
                EnumMemberDecl {
                    attributes: vec![],
                    name: "Read".into(),
                    value: Some("1".into()),
                },
                EnumMemberDecl {
                    attributes: vec![Attribute::new("XmlEnum").positional(Expr::string("w"))],
                    name: "Write".into(),
                    value: Some("2".into()),
                },
            ],
        };

        let text = print_declarations(&[Declaration::Enum(decl)], 0);
        assert_eq!(
            text,
            "[System.Flags]\npublic enum Access\n{\n    Read = 1,\n    [XmlEnum(\"w\")]\n    Write = 2\n}\n"
        );
    }

    #[test]
    fn test_declarations_separated_by_blank_line() {
        let a = Declaration::Interface(InterfaceDecl {
            name: "IA".into(),
            methods: vec![],
        });
        let b = Declaration::Interface(InterfaceDecl {
            name: "IB".into(),
            methods: vec![],
        });
        let text = print_declarations(&[a, b], 0);
        assert_eq!(
            text,
            "public interface IA\n{\n}\n\npublic interface IB\n{\n}\n"
        );
    }
}
