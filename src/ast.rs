//! # Lox - Abstract Syntax Tree
//!
//! This module defines the expression syntax tree of the Lox scripting language and
//! the visitor protocol every pass over it implements.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer, embedded in nodes as leaf data
//! - **[expressions]** - The closed set of expression nodes and their constructors
//! - **[visitor]** - [`ExprVisitor`], one handler per expression node
//!
//! ## Double Dispatch
//!
//! A pass implements [`ExprVisitor`] and hands itself to [`Expr::accept`]. The node
//! calls the single handler for its own variant and returns whatever that handler
//! returns. Recursion into children is left to the handler, so each pass chooses
//! its traversal order:
//!
//! ```text
//! expr.accept(&mut pass)
//!   └─> pass.visit_binary(&binary)
//!         ├─> binary.left.accept(&mut pass)
//!         └─> binary.right.accept(&mut pass)
//! ```
//!
//! Failures travel back up through `?`. The tree itself never fails, logs or
//! recovers.
//!
//! ## Passes in this crate
//!
//! - [`AstPrinter`](crate::printer::AstPrinter) - parenthesized rendering
//! - [`JsonEncoder`](crate::output::JsonEncoder) - JSON dump of a tree
//! - [`Resolver`](crate::resolver::Resolver) - static variable references
//! - [`Interpreter`](crate::evaluator::Interpreter) - tree-walking evaluation
//!
//! ## Grammar
//!
//! ```text
//! expression → assignment
//! assignment → ( call "." )? IDENTIFIER "=" assignment | logic_or
//! logic_or   → logic_and ( "or" logic_and )*
//! logic_and  → equality ( "and" equality )*
//! equality   → comparison ( ( "!=" | "==" ) comparison )*
//! comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
//! term       → factor ( ( "-" | "+" ) factor )*
//! factor     → unary ( ( "/" | "*" ) unary )*
//! unary      → ( "!" | "-" ) unary | call
//! call       → primary ( "(" arguments? ")" | "." IDENTIFIER )*
//! primary    → "true" | "false" | "nil" | NUMBER | STRING | IDENTIFIER | "(" expression ")"
//! ```
pub mod expressions;
pub mod tokens;
pub mod visitor;

pub use expressions::Expr;
pub use tokens::{Token, TokenKind};
pub use visitor::ExprVisitor;
