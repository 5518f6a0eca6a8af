//! Static analysis of variable references.
//!
//! The resolver walks a tree without evaluating it and records every variable
//! read and write in the order the interpreter would perform them. References in
//! the right operand of `and`/`or` are flagged as conditional, because
//! short-circuiting may skip them.

use std::collections::HashSet;

use thiserror::Error;

use crate::ast::{
    Expr, ExprVisitor, Token,
    expressions::{Assign, Binary, Call, Get, Grouping, Literal, Logical, Set, Unary, Variable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// One use of a named binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub line: usize,
    pub access: Access,
    /// Inside the right operand of a logical operator, possibly never evaluated
    pub conditional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("[line {line}] Error at '{name}': Undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: usize },
}

/// Collects [`Reference`]s. In strict mode, every referenced name must be one of
/// the declared globals.
#[derive(Debug, Default)]
pub struct Resolver {
    globals: Option<HashSet<String>>,
    references: Vec<Reference>,
    // Depth of enclosing logical right operands
    conditional_depth: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict resolver: names outside `globals` fail with
    /// [`ResolveError::UndefinedVariable`].
    pub fn with_globals<I, S>(globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Resolver {
            globals: Some(globals.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Resolves `expr`, appending to the references gathered so far.
    pub fn resolve(&mut self, expr: &Expr) -> Result<&[Reference], ResolveError> {
        expr.accept(self)?;
        Ok(&self.references)
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn into_references(self) -> Vec<Reference> {
        self.references
    }

    fn record(&mut self, name: &Token, access: Access) -> Result<(), ResolveError> {
        if let Some(globals) = &self.globals
            && !globals.contains(&name.lexeme)
        {
            return Err(ResolveError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            });
        }

        let reference = Reference {
            name: name.lexeme.clone(),
            line: name.line,
            access,
            conditional: self.conditional_depth > 0,
        };
        log::debug!("resolved {:?}", reference);
        self.references.push(reference);
        Ok(())
    }
}

impl ExprVisitor for Resolver {
    type Output = ();
    type Error = ResolveError;

    fn visit_assign(&mut self, expr: &Assign) -> Result<(), ResolveError> {
        expr.value.accept(self)?;
        self.record(&expr.target.name, Access::Write)
    }

    fn visit_binary(&mut self, expr: &Binary) -> Result<(), ResolveError> {
        expr.left.accept(self)?;
        expr.right.accept(self)
    }

    fn visit_call(&mut self, expr: &Call) -> Result<(), ResolveError> {
        expr.callee.accept(self)?;
        for argument in &expr.arguments {
            argument.accept(self)?;
        }
        Ok(())
    }

    fn visit_get(&mut self, expr: &Get) -> Result<(), ResolveError> {
        expr.object.accept(self)
    }

    fn visit_grouping(&mut self, expr: &Grouping) -> Result<(), ResolveError> {
        expr.inner.accept(self)
    }

    fn visit_literal(&mut self, _expr: &Literal) -> Result<(), ResolveError> {
        Ok(())
    }

    fn visit_logical(&mut self, expr: &Logical) -> Result<(), ResolveError> {
        expr.left.accept(self)?;

        self.conditional_depth += 1;
        let right = expr.right.accept(self);
        self.conditional_depth -= 1;
        right
    }

    fn visit_set(&mut self, expr: &Set) -> Result<(), ResolveError> {
        expr.object.accept(self)?;
        expr.value.accept(self)
    }

    fn visit_unary(&mut self, expr: &Unary) -> Result<(), ResolveError> {
        expr.right.accept(self)
    }

    fn visit_variable(&mut self, expr: &Variable) -> Result<(), ResolveError> {
        self.record(&expr.name, Access::Read)
    }
}
