//! Parenthesized rendering of expression trees.
//!
//! Every compound node prints as a prefix list, which makes precedence and
//! grouping visible:
//!
//! ```
//! use lox_lang::parser::parse_str;
//! use lox_lang::printer::print;
//!
//! let expr = parse_str("-a * (b + 1.5)").unwrap();
//! assert_eq!(print(&expr), "(* (- a) (group (+ b 1.500000)))");
//! ```

use std::convert::Infallible;

use crate::ast::{
    Expr, ExprVisitor,
    expressions::{Assign, Binary, Call, Get, Grouping, Literal, Logical, Set, Unary, Variable},
};

/// Writes nodes into an internal buffer. Handlers return nothing.
#[derive(Debug, Default)]
pub struct AstPrinter {
    buffer: String,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the rendering of `expr` to the buffer.
    pub fn print(&mut self, expr: &Expr) {
        let Ok(()) = expr.accept(self);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    fn parenthesize(&mut self, name: &str, parts: &[&Expr]) -> Result<(), Infallible> {
        self.buffer.push('(');
        self.buffer.push_str(name);
        for part in parts {
            self.buffer.push(' ');
            part.accept(self)?;
        }
        self.buffer.push(')');
        Ok(())
    }
}

impl ExprVisitor for AstPrinter {
    type Output = ();
    type Error = Infallible;

    fn visit_assign(&mut self, expr: &Assign) -> Result<(), Infallible> {
        self.buffer.push_str("(= ");
        self.buffer.push_str(&expr.target.name.lexeme);
        self.buffer.push(' ');
        expr.value.accept(self)?;
        self.buffer.push(')');
        Ok(())
    }

    fn visit_binary(&mut self, expr: &Binary) -> Result<(), Infallible> {
        self.parenthesize(&expr.operator.lexeme, &[expr.left.as_ref(), expr.right.as_ref()])
    }

    fn visit_call(&mut self, expr: &Call) -> Result<(), Infallible> {
        let mut parts: Vec<&Expr> = Vec::with_capacity(expr.arguments.len() + 1);
        parts.push(&expr.callee);
        parts.extend(expr.arguments.iter());
        self.parenthesize("call", &parts)
    }

    fn visit_get(&mut self, expr: &Get) -> Result<(), Infallible> {
        self.buffer.push_str("(. ");
        expr.object.accept(self)?;
        self.buffer.push(' ');
        self.buffer.push_str(&expr.name.lexeme);
        self.buffer.push(')');
        Ok(())
    }

    fn visit_grouping(&mut self, expr: &Grouping) -> Result<(), Infallible> {
        self.parenthesize("group", &[expr.inner.as_ref()])
    }

    fn visit_literal(&mut self, expr: &Literal) -> Result<(), Infallible> {
        self.buffer.push_str(&expr.value.to_string());
        Ok(())
    }

    fn visit_logical(&mut self, expr: &Logical) -> Result<(), Infallible> {
        self.parenthesize(&expr.operator.lexeme, &[expr.left.as_ref(), expr.right.as_ref()])
    }

    fn visit_set(&mut self, expr: &Set) -> Result<(), Infallible> {
        self.buffer.push_str("(= (. ");
        expr.object.accept(self)?;
        self.buffer.push(' ');
        self.buffer.push_str(&expr.name.lexeme);
        self.buffer.push_str(") ");
        expr.value.accept(self)?;
        self.buffer.push(')');
        Ok(())
    }

    fn visit_unary(&mut self, expr: &Unary) -> Result<(), Infallible> {
        self.parenthesize(&expr.operator.lexeme, &[expr.right.as_ref()])
    }

    fn visit_variable(&mut self, expr: &Variable) -> Result<(), Infallible> {
        self.buffer.push_str(&expr.name.lexeme);
        Ok(())
    }
}

/// Renders `expr` into a fresh string.
pub fn print(expr: &Expr) -> String {
    let mut printer = AstPrinter::new();
    printer.print(expr);
    printer.finish()
}
