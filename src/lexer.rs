use thiserror::Error;

use crate::ast::{Token, TokenKind};
use crate::value::Value;

/// Errors raised while scanning source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("[line {line}] Error: Unexpected character '{ch}'.")]
    UnexpectedCharacter { ch: char, line: usize },

    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: usize },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_char(1) == Some('/') {
                while self.current_char().is_some_and(|c| c != '\n') {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme = self.lexeme_from(start);
        match TokenKind::keyword(&lexeme) {
            Some(TokenKind::True) => Token::new(TokenKind::True, lexeme, Some(Value::Boolean(true)), line),
            Some(TokenKind::False) => {
                Token::new(TokenKind::False, lexeme, Some(Value::Boolean(false)), line)
            }
            Some(TokenKind::Nil) => Token::new(TokenKind::Nil, lexeme, Some(Value::Nil), line),
            Some(kind) => Token::new(kind, lexeme, None, line),
            None => Token::new(TokenKind::Identifier, lexeme, None, line),
        }
    }

    /// Strings may span lines and have no escape sequences.
    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let line = self.line;
        self.advance(); // opening quote

        let mut text = String::new();
        loop {
            match self.current_char() {
                Some('"') => {
                    self.advance();
                    let lexeme = self.lexeme_from(start);
                    return Ok(Token::new(TokenKind::String, lexeme, Some(Value::String(text)), line));
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
                None => return Err(LexError::UnterminatedString { line }),
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.position;
        let mut is_fraction = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.'
                && !is_fraction
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_fraction = true;
                self.advance();
            } else {
                break;
            }
        }

        let lexeme = self.lexeme_from(start);
        // Digits with at most one inner dot always parse.
        let number = lexeme.parse::<f64>().unwrap_or_default();
        Token::new(TokenKind::Number, lexeme, Some(Value::Number(number)), self.line)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let line = self.line;
        let start = self.position;
        self.advance();
        Token::symbol(kind, self.lexeme_from(start), line)
    }

    /// `single` unless the next character is `=`, in which case `double`
    fn with_equal(&mut self, single: TokenKind, double: TokenKind) -> Token {
        if self.peek_char(1) == Some('=') {
            let line = self.line;
            let start = self.position;
            self.advance();
            self.advance();
            Token::symbol(double, self.lexeme_from(start), line)
        } else {
            self.single(single)
        }
    }

    /// Scans the next token. Once the input is exhausted, keeps returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let token = match self.current_char() {
            None => Token::eof(self.line),
            Some('(') => self.single(TokenKind::LeftParen),
            Some(')') => self.single(TokenKind::RightParen),
            Some('{') => self.single(TokenKind::LeftBrace),
            Some('}') => self.single(TokenKind::RightBrace),
            Some(',') => self.single(TokenKind::Comma),
            Some('.') => self.single(TokenKind::Dot),
            Some('-') => self.single(TokenKind::Minus),
            Some('+') => self.single(TokenKind::Plus),
            Some(';') => self.single(TokenKind::Semicolon),
            Some('*') => self.single(TokenKind::Star),
            Some('/') => self.single(TokenKind::Slash),
            Some('!') => self.with_equal(TokenKind::Bang, TokenKind::BangEqual),
            Some('=') => self.with_equal(TokenKind::Equal, TokenKind::EqualEqual),
            Some('<') => self.with_equal(TokenKind::Less, TokenKind::LessEqual),
            Some('>') => self.with_equal(TokenKind::Greater, TokenKind::GreaterEqual),
            Some('"') => self.read_string()?,
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.read_identifier(),
            Some(ch) => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    line: self.line,
                });
            }
        };

        log::trace!("scanned {:?} {:?} at line {}", token.kind, token.lexeme, token.line);
        Ok(token)
    }

    /// Scans the whole input. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}
