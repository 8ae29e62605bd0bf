//! Recursive-descent parser for proxy listings
//!
//! Understands the declaration level of generated proxy code: namespaces,
//! attribute lists, type declarations and their member signatures. Bodies are
//! skipped by brace matching.

use crate::annotations::{Annotation, AnnotationKind};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::syntax::{
    DeclarationKind, EnumMemberDeclaration, Expr, FieldDeclaration, MemberDeclaration,
    MethodDeclaration, ParameterSyntax, PropertyDeclaration, TypeDeclaration, TypeSyntax,
};
use soap_client_generator_common::{GeneratorError, Result};

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "static",
    "partial",
    "abstract",
    "sealed",
    "virtual",
    "override",
    "readonly",
    "const",
    "new",
    "extern",
    "unsafe",
    "volatile",
    "async",
    "required",
    "file",
];

const PARAMETER_MODIFIERS: &[&str] = &["ref", "out", "in", "params", "this"];

/// Parse listing source into its namespace-level type declarations
pub fn parse_declarations(source: &str) -> Result<Vec<TypeDeclaration>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut declarations = Vec::new();
    parser.namespace_body(None, &mut declarations, true)?;
    Ok(declarations)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    // ----- token helpers -----

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek().is_punct(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, name: &str) -> bool {
        if self.peek().is_ident(name) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<()> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", c)))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("expected identifier")),
        }
    }

    fn error(&self, message: &str) -> GeneratorError {
        let token = self.peek();
        GeneratorError::Parse(format!(
            "{}:{}: {}, found '{}'",
            token.line, token.column, message, token.kind
        ))
    }

    /// Skip a bracketed group starting at the current opening token
    fn skip_balanced(&mut self, open: char, close: char) -> Result<()> {
        self.expect_punct(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.advance();
            match token.kind {
                TokenKind::Punct(c) if c == open => depth += 1,
                TokenKind::Punct(c) if c == close => depth -= 1,
                TokenKind::Eof => return Err(self.error(&format!("unbalanced '{}'", open))),
                _ => {}
            }
        }
        Ok(())
    }

    /// Skip tokens up to and including a `;` at nesting depth zero
    fn skip_statement(&mut self) -> Result<()> {
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Punct(';') => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Punct('{') => self.skip_balanced('{', '}')?,
                TokenKind::Punct('(') => self.skip_balanced('(', ')')?,
                TokenKind::Punct('[') => self.skip_balanced('[', ']')?,
                TokenKind::Eof => return Err(self.error("expected ';'")),
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip a member body: `;`, `{ .. }` or `=> ..;`
    fn skip_body(&mut self) -> Result<()> {
        if self.eat_punct(';') {
            return Ok(());
        }
        if self.peek().kind == TokenKind::Arrow {
            self.advance();
            return self.skip_statement();
        }
        if self.peek().is_punct('{') {
            return self.skip_balanced('{', '}');
        }
        Err(self.error("expected member body"))
    }

    /// Skip `where T : ...` clauses ahead of a body
    fn skip_constraints(&mut self) {
        while self.peek().is_ident("where") {
            while !self.at_eof()
                && !self.peek().is_punct('{')
                && !self.peek().is_punct(';')
                && self.peek().kind != TokenKind::Arrow
            {
                self.advance();
            }
        }
    }

    fn skip_generic_parameters(&mut self) -> Result<()> {
        if self.peek().is_punct('<') {
            self.skip_balanced('<', '>')?;
        }
        Ok(())
    }

    // ----- namespaces -----

    fn namespace_body(
        &mut self,
        namespace: Option<&str>,
        out: &mut Vec<TypeDeclaration>,
        top_level: bool,
    ) -> Result<()> {
        loop {
            if self.at_eof() {
                if top_level {
                    return Ok(());
                }
                return Err(self.error("expected '}'"));
            }
            if !top_level && self.eat_punct('}') {
                self.eat_punct(';');
                return Ok(());
            }

            if self.peek().is_ident("using") || self.peek().is_ident("extern") {
                self.skip_statement()?;
                continue;
            }
            if self.eat_punct(';') {
                continue;
            }
            if self.eat_ident("namespace") {
                let name = self.dotted_name()?;
                let full = match namespace {
                    Some(outer) => format!("{}.{}", outer, name),
                    None => name,
                };
                if self.eat_punct(';') {
                    // file-scoped: the rest of the file belongs to it
                    return self.namespace_body(Some(&full), out, top_level);
                }
                self.expect_punct('{')?;
                self.namespace_body(Some(&full), out, false)?;
                continue;
            }

            let start = self.pos;
            let annotations = self.attribute_lists()?;
            if annotations.is_empty() && self.pos != start {
                // only assembly or module lists
                continue;
            }
            let modifiers = self.modifiers();
            match self.type_declaration(namespace, annotations, modifiers)? {
                Some(declaration) => out.push(declaration),
                None => return Err(self.error("expected type declaration")),
            }
        }
    }

    fn dotted_name(&mut self) -> Result<String> {
        let mut name = self.expect_ident()?;
        while self.peek().is_punct('.') {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    // ----- attributes -----

    /// Attribute lists ahead of a declaration; assembly/module lists are dropped
    fn attribute_lists(&mut self) -> Result<Vec<Annotation>> {
        let mut annotations = Vec::new();
        while self.peek().is_punct('[') {
            self.advance();

            let mut target = None;
            if let TokenKind::Ident(name) = &self.peek().kind {
                if self.peek_at(1).is_punct(':') {
                    target = Some(name.clone());
                    self.advance();
                    self.advance();
                }
            }

            let mut list = Vec::new();
            loop {
                if self.eat_punct(']') {
                    break;
                }
                list.push(self.attribute(target.clone())?);
                if !self.eat_punct(',') {
                    self.expect_punct(']')?;
                    break;
                }
            }

            if !matches!(target.as_deref(), Some("assembly") | Some("module")) {
                annotations.extend(list);
            }
        }
        Ok(annotations)
    }

    fn attribute(&mut self, target: Option<String>) -> Result<Annotation> {
        let line = self.peek().line;
        let name = self.qualified_name()?.join(".");
        let mut positional = Vec::new();
        let mut named = Vec::new();

        if self.eat_punct('(') {
            while !self.eat_punct(')') {
                let is_named = matches!(self.peek().kind, TokenKind::Ident(_))
                    && (self.peek_at(1).is_punct('=') || self.peek_at(1).is_punct(':'))
                    && !self.peek_at(2).is_punct('=');
                if is_named {
                    let key = self.expect_ident()?;
                    self.advance();
                    named.push((key, self.expression()?));
                } else {
                    positional.push(self.expression()?);
                }
                if !self.eat_punct(',') {
                    self.expect_punct(')')?;
                    break;
                }
            }
        }

        Ok(Annotation {
            kind: AnnotationKind::from_name(&name),
            target,
            positional,
            named,
            line,
        })
    }

    // ----- expressions -----

    fn is_expression_end(token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::Punct(',' | ')' | ']' | '}' | ';') | TokenKind::Eof
        )
    }

    /// Parse a constant expression; unknown shapes are kept as raw text
    fn expression(&mut self) -> Result<Expr> {
        let start = self.pos;
        let primary = self.primary()?;
        if Self::is_expression_end(self.peek()) {
            if let Some(expr) = primary {
                return Ok(expr);
            }
        }

        self.pos = start;
        let mut text = String::new();
        let mut previous_is_word = false;
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            if depth == 0 && Self::is_expression_end(token) {
                break;
            }
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
                TokenKind::Eof => break,
                _ => {}
            }
            let kind = self.advance().kind;
            // words only need separating from other words
            let is_word = matches!(kind, TokenKind::Ident(_) | TokenKind::Number(_));
            if is_word && previous_is_word {
                text.push(' ');
            }
            text.push_str(&kind.to_string());
            previous_is_word = is_word;
        }
        if text.is_empty() {
            return Err(self.error("expected expression"));
        }
        Ok(Expr::Raw(text))
    }

    fn primary(&mut self) -> Result<Option<Expr>> {
        let token = self.peek().clone();
        let expr = match token.kind {
            TokenKind::Str(s) => {
                self.advance();
                Expr::Str(s)
            }
            TokenKind::Char(c) => {
                self.advance();
                Expr::Char(c)
            }
            TokenKind::Number(n) => {
                self.advance();
                match n.parse::<i64>() {
                    Ok(i) => Expr::Int(i),
                    Err(_) => Expr::Number(n),
                }
            }
            TokenKind::Punct('-') => {
                self.advance();
                match self.primary()? {
                    Some(inner) => Expr::Neg(Box::new(inner)),
                    None => return Ok(None),
                }
            }
            TokenKind::Ident(ref id) if id == "true" || id == "false" => {
                self.advance();
                Expr::Bool(id == "true")
            }
            TokenKind::Ident(ref id) if id == "null" => {
                self.advance();
                Expr::Null
            }
            TokenKind::Ident(ref id) if id == "typeof" && self.peek_at(1).is_punct('(') => {
                self.advance();
                self.advance();
                let ty = self.type_syntax()?;
                self.expect_punct(')')?;
                Expr::TypeOf(ty)
            }
            TokenKind::Ident(_) => Expr::Path(self.qualified_name()?),
            _ => return Ok(None),
        };
        Ok(Some(expr))
    }

    // ----- types -----

    /// Dotted name with an optional `global::` prefix
    fn qualified_name(&mut self) -> Result<Vec<String>> {
        if self.peek().is_ident("global") && self.peek_at(1).kind == TokenKind::ColonColon {
            self.advance();
            self.advance();
        }
        let mut path = vec![self.expect_ident()?];
        while self.peek().is_punct('.') && matches!(self.peek_at(1).kind, TokenKind::Ident(_)) {
            self.advance();
            path.push(self.expect_ident()?);
        }
        Ok(path)
    }

    fn type_syntax(&mut self) -> Result<TypeSyntax> {
        if self.peek().is_ident("global") && self.peek_at(1).kind == TokenKind::ColonColon {
            self.advance();
            self.advance();
        }

        let mut path = vec![self.expect_ident()?];
        let mut args = Vec::new();
        loop {
            if self.peek().is_punct('<') {
                self.advance();
                args = Vec::new();
                loop {
                    args.push(self.type_syntax()?);
                    if !self.eat_punct(',') {
                        break;
                    }
                }
                self.expect_punct('>')?;
            }
            let separator = self.peek().is_punct('.') || self.peek().kind == TokenKind::ColonColon;
            if separator && matches!(self.peek_at(1).kind, TokenKind::Ident(_)) {
                self.advance();
                path.push(self.expect_ident()?);
                args = Vec::new();
            } else {
                break;
            }
        }

        let mut ty = TypeSyntax::Named { path, args };
        loop {
            if self.peek().is_punct('?') {
                self.advance();
                ty = TypeSyntax::Nullable(Box::new(ty));
                continue;
            }
            if self.peek().is_punct('[') {
                let mut offset = 1;
                while self.peek_at(offset).is_punct(',') {
                    offset += 1;
                }
                if self.peek_at(offset).is_punct(']') {
                    for _ in 0..=offset {
                        self.advance();
                    }
                    ty = TypeSyntax::Array {
                        element: Box::new(ty),
                        rank: offset,
                    };
                    continue;
                }
            }
            break;
        }
        Ok(ty)
    }

    // ----- declarations -----

    fn modifiers(&mut self) -> Vec<String> {
        let mut modifiers = Vec::new();
        while let TokenKind::Ident(id) = &self.peek().kind {
            if MODIFIERS.contains(&id.as_str()) {
                modifiers.push(id.clone());
                self.advance();
            } else {
                break;
            }
        }
        modifiers
    }

    fn type_declaration(
        &mut self,
        namespace: Option<&str>,
        annotations: Vec<Annotation>,
        modifiers: Vec<String>,
    ) -> Result<Option<TypeDeclaration>> {
        let line = self.peek().line;
        let kind = match &self.peek().kind {
            TokenKind::Ident(id) => match id.as_str() {
                "class" | "record" => DeclarationKind::Class,
                "struct" => DeclarationKind::Struct,
                "interface" => DeclarationKind::Interface,
                "enum" => DeclarationKind::Enum,
                "delegate" => DeclarationKind::Delegate,
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };
        self.advance();
        // `record class` / `record struct`
        if self.peek().is_ident("class") || self.peek().is_ident("struct") {
            self.advance();
        }

        let mut declaration = TypeDeclaration {
            kind,
            name: String::new(),
            namespace: namespace.map(str::to_string),
            modifiers,
            annotations,
            base_list: Vec::new(),
            members: Vec::new(),
            enum_members: Vec::new(),
            nested: Vec::new(),
            line,
        };

        if kind == DeclarationKind::Delegate {
            self.type_syntax()?;
            declaration.name = self.expect_ident()?;
            self.skip_statement()?;
            return Ok(Some(declaration));
        }

        declaration.name = self.expect_ident()?;
        self.skip_generic_parameters()?;
        if self.peek().is_punct('(') {
            // record primary constructor
            self.skip_balanced('(', ')')?;
        }

        if self.eat_punct(':') {
            loop {
                declaration.base_list.push(self.type_syntax()?);
                if self.peek().is_punct('(') {
                    self.skip_balanced('(', ')')?;
                }
                if !self.eat_punct(',') {
                    break;
                }
            }
        }
        self.skip_constraints();

        if self.eat_punct(';') {
            return Ok(Some(declaration));
        }
        self.expect_punct('{')?;

        if kind == DeclarationKind::Enum {
            declaration.enum_members = self.enum_members()?;
        } else {
            self.class_members(&mut declaration)?;
        }
        self.eat_punct(';');

        Ok(Some(declaration))
    }

    fn enum_members(&mut self) -> Result<Vec<EnumMemberDeclaration>> {
        let mut members = Vec::new();
        loop {
            if self.eat_punct('}') {
                return Ok(members);
            }
            let annotations = self.attribute_lists()?;
            let name = self.expect_ident()?;
            let value = if self.eat_punct('=') {
                Some(self.expression()?)
            } else {
                None
            };
            members.push(EnumMemberDeclaration {
                annotations,
                name,
                value,
            });
            if !self.eat_punct(',') {
                self.expect_punct('}')?;
                return Ok(members);
            }
        }
    }

    fn class_members(&mut self, declaration: &mut TypeDeclaration) -> Result<()> {
        loop {
            if self.eat_punct('}') {
                return Ok(());
            }
            if self.at_eof() {
                return Err(self.error("expected '}'"));
            }
            if self.eat_punct(';') {
                continue;
            }

            let annotations = self.attribute_lists()?;
            let modifiers = self.modifiers();

            let nested_namespace = declaration.namespace.clone();
            if let Some(nested) =
                self.type_declaration(nested_namespace.as_deref(), annotations.clone(), modifiers.clone())?
            {
                declaration.nested.push(nested);
                continue;
            }

            if self.eat_ident("event") {
                self.type_syntax()?;
                self.expect_ident()?;
                if self.peek().is_punct('{') {
                    self.skip_balanced('{', '}')?;
                } else {
                    self.skip_statement()?;
                }
                continue;
            }

            if self.peek().is_punct('~') {
                // finalizer
                self.advance();
                self.expect_ident()?;
                self.skip_balanced('(', ')')?;
                self.skip_body()?;
                continue;
            }

            if self.peek().is_ident("implicit") || self.peek().is_ident("explicit") {
                self.advance();
                self.skip_conversion_operator()?;
                continue;
            }

            if self.peek().is_ident(&declaration.name) && self.peek_at(1).is_punct('(') {
                // constructor, possibly chaining to base(..) or this(..)
                self.advance();
                self.skip_balanced('(', ')')?;
                if self.eat_punct(':') {
                    self.expect_ident()?;
                    self.skip_balanced('(', ')')?;
                }
                self.skip_body()?;
                continue;
            }

            let member_type = self.type_syntax()?;

            if self.peek().is_ident("operator") {
                self.skip_conversion_operator()?;
                continue;
            }

            if self.peek().is_ident("this") && self.peek_at(1).is_punct('[') {
                // indexer
                self.advance();
                self.skip_balanced('[', ']')?;
                self.skip_body()?;
                continue;
            }

            // explicit interface implementations name the member `IFoo.Bar`
            let name = self
                .qualified_name()?
                .pop()
                .ok_or_else(|| self.error("expected member name"))?;
            self.skip_generic_parameters()?;

            if self.peek().is_punct('(') {
                let parameters = self.parameters()?;
                self.skip_constraints();
                self.skip_body()?;
                declaration
                    .members
                    .push(MemberDeclaration::Method(MethodDeclaration {
                        annotations,
                        modifiers,
                        return_type: member_type,
                        name,
                        parameters,
                    }));
                continue;
            }

            if self.peek().is_punct('{') || self.peek().kind == TokenKind::Arrow {
                let arrow = self.peek().kind == TokenKind::Arrow;
                if arrow {
                    self.advance();
                    self.skip_statement()?;
                } else {
                    self.skip_balanced('{', '}')?;
                    if self.eat_punct('=') {
                        self.skip_statement()?;
                    }
                }
                declaration
                    .members
                    .push(MemberDeclaration::Property(PropertyDeclaration {
                        annotations,
                        modifiers,
                        type_syntax: member_type,
                        name,
                    }));
                continue;
            }

            // field with one or more declarators
            let mut field_name = name;
            loop {
                let initializer = if self.eat_punct('=') {
                    Some(self.expression()?)
                } else {
                    None
                };
                declaration
                    .members
                    .push(MemberDeclaration::Field(FieldDeclaration {
                        annotations: annotations.clone(),
                        modifiers: modifiers.clone(),
                        type_syntax: member_type.clone(),
                        name: field_name,
                        initializer,
                    }));
                if self.eat_punct(',') {
                    field_name = self.expect_ident()?;
                } else {
                    self.expect_punct(';')?;
                    break;
                }
            }
        }
    }

    fn skip_conversion_operator(&mut self) -> Result<()> {
        while !self.at_eof() && !self.peek().is_punct('(') {
            self.advance();
        }
        self.skip_balanced('(', ')')?;
        self.skip_body()
    }

    fn parameters(&mut self) -> Result<Vec<ParameterSyntax>> {
        self.expect_punct('(')?;
        let mut parameters = Vec::new();
        if self.eat_punct(')') {
            return Ok(parameters);
        }
        loop {
            let annotations = self.attribute_lists()?;
            let mut modifiers = Vec::new();
            while let TokenKind::Ident(id) = &self.peek().kind {
                if PARAMETER_MODIFIERS.contains(&id.as_str()) {
                    modifiers.push(id.clone());
                    self.advance();
                } else {
                    break;
                }
            }
            let type_syntax = self.type_syntax()?;
            let name = self.expect_ident()?;
            let default = if self.eat_punct('=') {
                Some(self.expression()?)
            } else {
                None
            };
            parameters.push(ParameterSyntax {
                annotations,
                modifiers,
                type_syntax,
                name,
                default,
            });
            if !self.eat_punct(',') {
                self.expect_punct(')')?;
                return Ok(parameters);
            }
        }
    }
}
