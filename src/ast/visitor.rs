use crate::ast::expressions::{
    Assign, Binary, Call, Get, Grouping, Literal, Logical, Set, Unary, Variable,
};

/// A pass over expression trees.
///
/// One handler per [`Expr`](crate::ast::Expr) variant, none of them defaulted: a
/// pass either handles every kind of expression or does not compile. The pass
/// picks its own result and failure types.
///
/// Handlers are responsible for recursing into children (usually by calling
/// `accept` on them), which leaves traversal order to the pass.
///
/// # Examples
///
/// ```
/// use std::convert::Infallible;
/// use lox_lang::ast::{expressions::*, Expr, ExprVisitor};
///
/// /// Counts the literals in a tree.
/// struct Literals;
///
/// impl ExprVisitor for Literals {
///     type Output = usize;
///     type Error = Infallible;
///
///     fn visit_assign(&mut self, e: &Assign) -> Result<usize, Infallible> { e.value.accept(self) }
///     fn visit_binary(&mut self, e: &Binary) -> Result<usize, Infallible> {
///         Ok(e.left.accept(self)? + e.right.accept(self)?)
///     }
///     fn visit_call(&mut self, e: &Call) -> Result<usize, Infallible> {
///         let mut n = e.callee.accept(self)?;
///         for arg in &e.arguments {
///             n += arg.accept(self)?;
///         }
///         Ok(n)
///     }
///     fn visit_get(&mut self, e: &Get) -> Result<usize, Infallible> { e.object.accept(self) }
///     fn visit_grouping(&mut self, e: &Grouping) -> Result<usize, Infallible> { e.inner.accept(self) }
///     fn visit_literal(&mut self, _: &Literal) -> Result<usize, Infallible> { Ok(1) }
///     fn visit_logical(&mut self, e: &Logical) -> Result<usize, Infallible> {
///         Ok(e.left.accept(self)? + e.right.accept(self)?)
///     }
///     fn visit_set(&mut self, e: &Set) -> Result<usize, Infallible> {
///         Ok(e.object.accept(self)? + e.value.accept(self)?)
///     }
///     fn visit_unary(&mut self, e: &Unary) -> Result<usize, Infallible> { e.right.accept(self) }
///     fn visit_variable(&mut self, _: &Variable) -> Result<usize, Infallible> { Ok(0) }
/// }
///
/// let expr = Expr::grouping(Expr::literal(1.0));
/// assert_eq!(expr.accept(&mut Literals), Ok(1));
/// ```
pub trait ExprVisitor {
    /// Result of visiting one node
    type Output;

    /// Failure a handler may report. Propagated unchanged by `accept`.
    type Error;

    fn visit_assign(&mut self, expr: &Assign) -> Result<Self::Output, Self::Error>;
    fn visit_binary(&mut self, expr: &Binary) -> Result<Self::Output, Self::Error>;
    fn visit_call(&mut self, expr: &Call) -> Result<Self::Output, Self::Error>;
    fn visit_get(&mut self, expr: &Get) -> Result<Self::Output, Self::Error>;
    fn visit_grouping(&mut self, expr: &Grouping) -> Result<Self::Output, Self::Error>;
    fn visit_literal(&mut self, expr: &Literal) -> Result<Self::Output, Self::Error>;
    fn visit_logical(&mut self, expr: &Logical) -> Result<Self::Output, Self::Error>;
    fn visit_set(&mut self, expr: &Set) -> Result<Self::Output, Self::Error>;
    fn visit_unary(&mut self, expr: &Unary) -> Result<Self::Output, Self::Error>;
    fn visit_variable(&mut self, expr: &Variable) -> Result<Self::Output, Self::Error>;
}
