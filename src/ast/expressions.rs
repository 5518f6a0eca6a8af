use crate::ast::{ExprVisitor, Token};
use crate::value::Value;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// The set of variants is closed. Every pass implements [`ExprVisitor`], which has
/// one handler per variant, so adding a variant means extending every pass.
///
/// Nodes are pure syntax: they are never mutated after construction and carry no
/// evaluation state. Children are owned exclusively by their parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Variable assignment
    ///
    /// # Example
    /// ```text
    /// x = 1
    /// ```
    Assign(Assign),

    /// Infix operation (arithmetic, comparison, equality)
    ///
    /// # Example
    /// ```text
    /// a + b * 2
    /// ```
    Binary(Binary),

    /// Function or method invocation
    ///
    /// # Example
    /// ```text
    /// clock()
    /// point.distance(other, 2)
    /// ```
    Call(Call),

    /// Property read
    ///
    /// # Example
    /// ```text
    /// point.x
    /// ```
    Get(Get),

    /// Parenthesized expression.
    ///
    /// Kept as its own node so `(x) = 1` can be told apart from `x = 1`.
    Grouping(Grouping),

    /// Constant value
    Literal(Literal),

    /// Short-circuiting `and` / `or`
    Logical(Logical),

    /// Property write
    ///
    /// # Example
    /// ```text
    /// point.x = 3
    /// ```
    Set(Set),

    /// Prefix operation (`!`, `-`)
    Unary(Unary),

    /// Read of a named binding
    Variable(Variable),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Variable,
    pub operator: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expr>,
    /// Arguments in source order
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Get {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub inner: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: Token,
}

impl Expr {
    /// Routes `visitor` to the handler matching this node's variant.
    ///
    /// Exactly one handler is called, with the typed node. Children are not visited
    /// here; traversal order is up to the handler. The handler's result, success or
    /// failure, is returned as is.
    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) -> Result<V::Output, V::Error> {
        match self {
            Expr::Assign(node) => visitor.visit_assign(node),
            Expr::Binary(node) => visitor.visit_binary(node),
            Expr::Call(node) => visitor.visit_call(node),
            Expr::Get(node) => visitor.visit_get(node),
            Expr::Grouping(node) => visitor.visit_grouping(node),
            Expr::Literal(node) => visitor.visit_literal(node),
            Expr::Logical(node) => visitor.visit_logical(node),
            Expr::Set(node) => visitor.visit_set(node),
            Expr::Unary(node) => visitor.visit_unary(node),
            Expr::Variable(node) => visitor.visit_variable(node),
        }
    }

    /// Source line of the node's own token, which for infix nodes is the
    /// operator. Calls and groupings defer to their callee or inner expression.
    ///
    /// A bare literal has no token and yields `None`.
    pub fn line(&self) -> Option<usize> {
        match self {
            Expr::Assign(node) => Some(node.target.name.line),
            Expr::Binary(node) => Some(node.operator.line),
            Expr::Call(node) => node.callee.line(),
            Expr::Get(node) => Some(node.name.line),
            Expr::Grouping(node) => node.inner.line(),
            Expr::Literal(_) => None,
            Expr::Logical(node) => Some(node.operator.line),
            Expr::Set(node) => Some(node.name.line),
            Expr::Unary(node) => Some(node.operator.line),
            Expr::Variable(node) => Some(node.name.line),
        }
    }

    // Constructors. They box children and perform no validation.

    pub fn assign(target: Variable, operator: Token, value: Expr) -> Self {
        Expr::Assign(Assign {
            target,
            operator,
            value: Box::new(value),
        })
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary(Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Self {
        Expr::Call(Call {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn get(object: Expr, name: Token) -> Self {
        Expr::Get(Get {
            object: Box::new(object),
            name,
        })
    }

    pub fn grouping(inner: Expr) -> Self {
        Expr::Grouping(Grouping {
            inner: Box::new(inner),
        })
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(Literal {
            value: value.into(),
        })
    }

    pub fn logical(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Logical(Logical {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn set(object: Expr, name: Token, value: Expr) -> Self {
        Expr::Set(Set {
            object: Box::new(object),
            name,
            value: Box::new(value),
        })
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary(Unary {
            operator,
            right: Box::new(right),
        })
    }

    pub fn variable(name: Token) -> Self {
        Expr::Variable(Variable { name })
    }
}

// Typed nodes expose the same entry point as `Expr`, so a handler holding e.g.
// `Assign::target` can dispatch it without rewrapping.
macro_rules! typed_accept {
    ($($node:ident => $handler:ident),* $(,)?) => {
        $(
            impl $node {
                pub fn accept<V: ExprVisitor + ?Sized>(
                    &self,
                    visitor: &mut V,
                ) -> Result<V::Output, V::Error> {
                    visitor.$handler(self)
                }
            }
        )*
    };
}

typed_accept! {
    Assign => visit_assign,
    Binary => visit_binary,
    Call => visit_call,
    Get => visit_get,
    Grouping => visit_grouping,
    Literal => visit_literal,
    Logical => visit_logical,
    Set => visit_set,
    Unary => visit_unary,
    Variable => visit_variable,
}

impl From<Variable> for Expr {
    fn from(node: Variable) -> Self {
        Expr::Variable(node)
    }
}

impl From<Literal> for Expr {
    fn from(node: Literal) -> Self {
        Expr::Literal(node)
    }
}
