use std::mem;

use thiserror::Error;

use crate::{
    ast::{Expr, Token, TokenKind},
    lexer::{LexError, Lexer},
    value::Value,
};

/// Upper bound on the number of arguments in a call
pub const MAX_ARGUMENTS: usize = 255;

/// How deeply groupings, call arguments, unary operands and assignment values
/// may nest. The parser recurses once per level, so this bounds its stack use.
pub const MAX_NESTING: usize = 48;

/// Errors raised while building a syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("[line {line}] Error at {found}: Expect {expected}.")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("[line {line}] Error at {found}: Expect expression.")]
    ExpectedExpression { found: String, line: usize },

    #[error("[line {line}] Error at '=': Invalid assignment target.")]
    InvalidAssignmentTarget { line: usize },

    #[error("[line {line}] Error: Can't have more than 255 arguments.")]
    TooManyArguments { line: usize },

    #[error("[line {line}] Error: Expression nested more than 48 levels deep.")]
    TooDeep { line: usize },
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            depth: 0,
        })
    }

    /// Moves to the next token and returns the one just consumed.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    /// Enters one nesting level opened by a token on `line`.
    fn descend(&mut self, line: usize) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep { line });
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> Result<Option<Token>, ParseError> {
        if kinds.contains(&self.current_token.kind) {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current_token.to_string(),
                line: self.current_token.line,
            })
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current_token.kind {
            TokenKind::True | TokenKind::False | TokenKind::Nil | TokenKind::Number | TokenKind::String => {
                let token = self.advance()?;
                Ok(Expr::literal(token.literal.unwrap_or(Value::Nil)))
            }
            TokenKind::Identifier => {
                let name = self.advance()?;
                Ok(Expr::variable(name))
            }
            TokenKind::LeftParen => {
                let open = self.advance()?;
                self.descend(open.line)?;
                let inner = self.parse_expression()?;
                self.ascend();
                self.expect(TokenKind::RightParen, "')' after expression")?;
                Ok(Expr::grouping(inner))
            }
            _ => Err(ParseError::ExpectedExpression {
                found: self.current_token.to_string(),
                line: self.current_token.line,
            }),
        }
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut arguments = vec![];
        self.descend(self.current_token.line)?;

        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    return Err(ParseError::TooManyArguments {
                        line: self.current_token.line,
                    });
                }
                arguments.push(self.parse_expression()?);

                if self.matches(&[TokenKind::Comma])?.is_none() {
                    break;
                }
            }
        }
        self.ascend();

        self.expect(TokenKind::RightParen, "')' after arguments")?;
        Ok(Expr::call(callee, arguments))
    }

    /// Calls and property reads, chained left to right
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.matches(&[TokenKind::LeftParen])?.is_some() {
                expr = self.finish_call(expr)?;
            } else if self.matches(&[TokenKind::Dot])?.is_some() {
                let name = self.expect(TokenKind::Identifier, "property name after '.'")?;
                expr = Expr::get(expr, name);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(operator) = self.matches(&[TokenKind::Bang, TokenKind::Minus])? {
            self.descend(operator.line)?;
            let right = self.parse_unary()?;
            self.ascend();
            return Ok(Expr::unary(operator, right));
        }
        self.parse_call()
    }

    /// One left-associative binary precedence level
    fn parse_binary_level(
        &mut self,
        operators: &[TokenKind],
        next: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let mut left = next(self)?;

        while let Some(operator) = self.matches(operators)? {
            let right = next(self)?;
            left = Expr::binary(left, operator, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[TokenKind::Slash, TokenKind::Star], Self::parse_unary)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[TokenKind::Minus, TokenKind::Plus], Self::parse_factor)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::parse_term,
        )
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::parse_comparison,
        )
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while let Some(operator) = self.matches(&[TokenKind::And])? {
            let right = self.parse_equality()?;
            left = Expr::logical(left, operator, right);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while let Some(operator) = self.matches(&[TokenKind::Or])? {
            let right = self.parse_and()?;
            left = Expr::logical(left, operator, right);
        }
        Ok(left)
    }

    /// Assignment is right-associative. The left side is parsed as an ordinary
    /// expression first and only then checked to be a valid target.
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_or()?;

        let Some(equals) = self.matches(&[TokenKind::Equal])? else {
            return Ok(expr);
        };
        self.descend(equals.line)?;
        let value = self.parse_assignment()?;
        self.ascend();

        match expr {
            Expr::Variable(target) => Ok(Expr::assign(target, equals, value)),
            Expr::Get(get) => Ok(Expr::set(*get.object, get.name, value)),
            // Includes `(x) = 1`: a grouping is never a target.
            _ => Err(ParseError::InvalidAssignmentTarget { line: equals.line }),
        }
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parses a single expression spanning the whole input.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Eof, "end of expression")?;
        log::debug!("parsed {:?}", expr);
        Ok(expr)
    }
}

/// Lexes and parses `source` as one expression.
pub fn parse_str(source: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}
