//! Tokenizer for proxy listings
//!
//! Produces a flat token stream with line/column positions. Comments,
//! whitespace and preprocessor lines never reach the parser.

use soap_client_generator_common::{GeneratorError, Result};
use std::fmt;

/// Token kinds produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword; a verbatim `@name` is stored without the `@`
    Ident(String),
    Str(String),
    Char(char),
    /// Numeric literal exactly as written
    Number(String),
    /// `::`
    ColonColon,
    /// `=>`
    Arrow,
    /// Any other single punctuation character
    Punct(char),
    Eof,
}

/// A token with its source position (1-based)
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Whether this token is the given identifier or keyword
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(id) if id == name)
    }

    /// Whether this token is the given punctuation character
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(id) => write!(f, "{}", id),
            TokenKind::Str(s) => write!(f, "{:?}", s),
            TokenKind::Char(c) => write!(f, "{:?}", c),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::ColonColon => write!(f, "::"),
            TokenKind::Arrow => write!(f, "=>"),
            TokenKind::Punct(c) => write!(f, "{}", c),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// Tokenize a whole listing
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);

            if c == '\u{feff}' {
                self.bump();
                continue;
            }

            if c.is_whitespace() {
                self.bump();
                continue;
            }

            if c == '#' && self.at_line_start {
                self.skip_line();
                continue;
            }

            self.at_line_start = false;

            let kind = match c {
                '/' => {
                    self.bump();
                    match self.chars.peek() {
                        Some('/') => {
                            self.skip_line();
                            continue;
                        }
                        Some('*') => {
                            self.bump();
                            self.skip_block_comment(line, column)?;
                            continue;
                        }
                        _ => TokenKind::Punct('/'),
                    }
                }
                '"' => {
                    self.bump();
                    TokenKind::Str(self.regular_string(line, column)?)
                }
                '\'' => {
                    self.bump();
                    TokenKind::Char(self.char_literal(line, column)?)
                }
                '@' => {
                    self.bump();
                    match self.chars.peek() {
                        Some('"') => {
                            self.bump();
                            TokenKind::Str(self.verbatim_string(line, column)?)
                        }
                        Some(&next) if is_ident_start(next) => TokenKind::Ident(self.identifier()),
                        _ => return Err(lex_error(line, column, "stray '@'")),
                    }
                }
                ':' => {
                    self.bump();
                    if self.chars.peek() == Some(&':') {
                        self.bump();
                        TokenKind::ColonColon
                    } else {
                        TokenKind::Punct(':')
                    }
                }
                '=' => {
                    self.bump();
                    if self.chars.peek() == Some(&'>') {
                        self.bump();
                        TokenKind::Arrow
                    } else {
                        TokenKind::Punct('=')
                    }
                }
                c if c.is_ascii_digit() => TokenKind::Number(self.number()),
                c if is_ident_start(c) => TokenKind::Ident(self.identifier()),
                other => {
                    self.bump();
                    TokenKind::Punct(other)
                }
            };

            self.tokens.push(Token { kind, line, column });
        }

        self.tokens.push(Token {
            kind: TokenKind::Eof,
            line: self.line,
            column: self.column,
        });
        Ok(self.tokens)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self, line: usize, column: usize) -> Result<()> {
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(lex_error(line, column, "unterminated comment")),
            }
        }
    }

    fn identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn number(&mut self) -> String {
        let mut number = String::new();
        while let Some(&c) = self.chars.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && number.ends_with(['e', 'E'])
                && !number.starts_with("0x");
            if c.is_ascii_alphanumeric() || c == '_' || exponent_sign {
                number.push(c);
                self.bump();
            } else if c == '.' && !number.contains('.') {
                // only a decimal point when a digit follows
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if lookahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                    number.push(c);
                    self.bump();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        number
    }

    fn regular_string(&mut self, line: usize, column: usize) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => value.push(self.escape(line, column)?),
                Some('\n') | None => return Err(lex_error(line, column, "unterminated string")),
                Some(c) => value.push(c),
            }
        }
    }

    fn verbatim_string(&mut self, line: usize, column: usize) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') if self.chars.peek() == Some(&'"') => {
                    self.bump();
                    value.push('"');
                }
                Some('"') => return Ok(value),
                Some(c) => value.push(c),
                None => return Err(lex_error(line, column, "unterminated string")),
            }
        }
    }

    fn char_literal(&mut self, line: usize, column: usize) -> Result<char> {
        let c = match self.bump() {
            Some('\\') => self.escape(line, column)?,
            Some(c) if c != '\'' && c != '\n' => c,
            _ => return Err(lex_error(line, column, "malformed character literal")),
        };
        match self.bump() {
            Some('\'') => Ok(c),
            _ => Err(lex_error(line, column, "unterminated character literal")),
        }
    }

    fn escape(&mut self, line: usize, column: usize) -> Result<char> {
        let c = match self.bump() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('0') => '\0',
            Some('a') => '\u{7}',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('v') => '\u{b}',
            Some('u') => self.unicode_escape(4, line, column)?,
            Some('U') => self.unicode_escape(8, line, column)?,
            Some(c @ ('\\' | '"' | '\'')) => c,
            _ => return Err(lex_error(line, column, "unknown escape sequence")),
        };
        Ok(c)
    }

    fn unicode_escape(&mut self, digits: usize, line: usize, column: usize) -> Result<char> {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(lex_error(line, column, "malformed unicode escape")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| lex_error(line, column, "invalid unicode escape"))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn lex_error(line: usize, column: usize, message: &str) -> GeneratorError {
    GeneratorError::Parse(format!("{}:{}: {}", line, column, message))
}
