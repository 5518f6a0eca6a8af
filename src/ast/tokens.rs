use std::fmt;

use crate::value::Value;

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character tokens
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `.` for property access
    Dot,
    /// `-`
    Minus,
    /// `+` for addition or string concatenation
    Plus,
    /// `;`
    Semicolon,
    /// `/`
    Slash,
    /// `*`
    Star,

    // One or two character tokens
    /// `!`
    Bang,
    /// `!=`
    BangEqual,
    /// `=` assignment
    Equal,
    /// `==`
    EqualEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,

    // Literals
    /// Variable, function or property name
    ///
    /// # Examples
    /// ```text
    /// count
    /// _private
    /// point2
    /// ```
    Identifier,

    /// Double-quoted string. The token's literal holds the text without quotes.
    String,

    /// Number literal. The token's literal holds the parsed `f64`.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Keyword lookup for an identifier-shaped lexeme
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "and" => TokenKind::And,
            "class" => TokenKind::Class,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "fun" => TokenKind::Fun,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }
}

/// A lexical unit: category, source text, optional parsed literal and line.
///
/// Tokens are plain values. They are embedded in expression nodes as leaf data and
/// compared by value.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Value>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, literal: Option<Value>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    /// Identifier token, mostly useful when building trees by hand
    pub fn identifier(name: impl Into<String>, line: usize) -> Self {
        Token::new(TokenKind::Identifier, name, None, line)
    }

    /// Operator or punctuation token with the given lexeme
    pub fn symbol(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Token::new(kind, lexeme, None, line)
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::Eof, "", None, line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}
