pub mod ast;
pub mod cli;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod printer;
pub mod resolver;
pub mod value;

pub use ast::{Expr, ExprVisitor, Token, TokenKind};
pub use evaluator::{Evaluator, Instance, Object, RuntimeError};
pub use lexer::{LexError, Lexer};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser};
pub use resolver::{Reference, ResolveError, Resolver};
pub use value::Value;
