use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

use thiserror::Error;

use crate::{
    ast::{
        Expr, ExprVisitor, Token, TokenKind,
        expressions::{Assign, Binary, Call, Get, Grouping, Literal, Logical, Set, Unary, Variable},
    },
    value::Value,
};

/// Signature of a function implemented in Rust and callable from Lox
pub type NativeFn = fn(&[Object]) -> Result<Object, RuntimeError>;

/// A function implemented by the host.
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub function: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// An object with named fields, created by the host and exposed to Lox code.
///
/// Instances are reference counted, so storing an instance in its own fields
/// (`p.me = p`) forms a cycle that is never freed.
#[derive(Clone, Default, PartialEq)]
pub struct Instance {
    pub class_name: String,
    pub fields: HashMap<String, Object>,
}

// Fields may point back at the instance, so they are left out.
impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance>", self.class_name)
    }
}

impl Instance {
    pub fn new(class_name: impl Into<String>) -> Self {
        Instance {
            class_name: class_name.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Object>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Wraps the instance into a shareable runtime object
    pub fn into_object(self) -> Object {
        Object::Instance(Rc::new(RefCell::new(self)))
    }
}

/// A runtime value.
///
/// Literal values plus the reference types that only exist while evaluating.
#[derive(Debug, Clone)]
pub enum Object {
    Value(Value),
    Native(Rc<NativeFunction>),
    Instance(Rc<RefCell<Instance>>),
}

impl Object {
    pub fn nil() -> Self {
        Object::Value(Value::Nil)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Value(value) => value.is_truthy(),
            Object::Native(_) | Object::Instance(_) => true,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Object::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Value(value) => value.type_name(),
            Object::Native(_) => "function",
            Object::Instance(_) => "instance",
        }
    }
}

/// Values compare by value, functions and instances by identity.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Value(a), Object::Value(b)) => a == b,
            (Object::Native(a), Object::Native(b)) => Rc::ptr_eq(a, b),
            (Object::Instance(a), Object::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Value(value) => write!(f, "{}", value),
            Object::Native(native) => write!(f, "<native fn {}>", native.name),
            Object::Instance(instance) => write!(f, "{} instance", instance.borrow().class_name),
        }
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        Object::Value(value)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Value(Value::Boolean(b))
    }
}

impl From<f64> for Object {
    fn from(n: f64) -> Self {
        Object::Value(Value::Number(n))
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::Value(Value::from(s))
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Object::Value(Value::String(s))
    }
}

/// Errors that can occur while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("[line {line}] Undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: usize },

    #[error("[line {line}] Operand must be a number.")]
    OperandMustBeNumber { line: usize },

    #[error("[line {line}] Operands must be numbers.")]
    OperandsMustBeNumbers { line: usize },

    #[error("[line {line}] Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings { line: usize },

    #[error("[line {line}] Can only call functions and classes, got {type_name}.")]
    NotCallable { type_name: &'static str, line: usize },

    #[error("[line {line}] Expected {expected} arguments but got {got}.")]
    ArityMismatch {
        expected: usize,
        got: usize,
        line: usize,
    },

    #[error("[line {line}] Only instances have properties.")]
    OnlyInstancesHaveProperties { line: usize },

    #[error("[line {line}] Only instances have fields.")]
    OnlyInstancesHaveFields { line: usize },

    #[error("[line {line}] Undefined property '{name}'.")]
    UndefinedProperty { name: String, line: usize },

    /// A node built by hand around a token no operator handles
    #[error("[line {line}] Unknown operator '{lexeme}'.")]
    UnknownOperator { lexeme: String, line: usize },

    /// Raised by native functions
    #[error("{0}")]
    Native(String),
}

impl RuntimeError {
    fn unknown_operator(operator: &Token) -> Self {
        RuntimeError::UnknownOperator {
            lexeme: operator.lexeme.clone(),
            line: operator.line,
        }
    }
}

/// Global variable bindings.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or overwrites a binding
    pub fn define(&mut self, name: impl Into<String>, value: Object) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        self.values
            .get(&name.lexeme)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            })
    }

    /// Rebinds an existing name. Assignment never creates a variable.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        match self.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

fn native_clock(_args: &[Object]) -> Result<Object, RuntimeError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| RuntimeError::Native(format!("clock: {}", e)))?;
    Ok(Object::from(elapsed.as_secs_f64()))
}

fn native_str(args: &[Object]) -> Result<Object, RuntimeError> {
    Ok(Object::from(args[0].to_string()))
}

/// Natives every evaluator starts with
const NATIVES: &[(&str, usize, NativeFn)] = &[("clock", 0, native_clock), ("str", 1, native_str)];

/// Tree-walking evaluator for expressions.
///
/// Holds the global environment; trees are only read.
///
/// # Examples
///
/// ```
/// use lox_lang::{Evaluator, parser::parse_str};
///
/// let mut evaluator = Evaluator::new();
/// evaluator.define("price", 10.0);
///
/// let expr = parse_str("price = price * 2 + 1").unwrap();
/// let result = evaluator.evaluate(&expr).unwrap();
/// assert_eq!(result.to_string(), "21");
/// ```
#[derive(Debug)]
pub struct Evaluator {
    globals: Environment,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates an evaluator whose globals hold the native functions.
    pub fn new() -> Self {
        let mut globals = Environment::new();
        for (name, arity, function) in NATIVES {
            globals.define(
                *name,
                Object::Native(Rc::new(NativeFunction {
                    name: name.to_string(),
                    arity: *arity,
                    function: *function,
                })),
            );
        }
        Evaluator { globals }
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<Object>) {
        self.globals.define(name, value.into());
    }

    pub fn define_native(&mut self, name: &str, arity: usize, function: NativeFn) {
        self.globals.define(
            name,
            Object::Native(Rc::new(NativeFunction {
                name: name.to_string(),
                arity,
                function,
            })),
        );
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let result = expr.accept(self)?;
        log::debug!("evaluated to {}", result);
        Ok(result)
    }

    fn number_operand(operator: &Token, operand: &Object) -> Result<f64, RuntimeError> {
        operand
            .as_value()
            .and_then(Value::as_number)
            .ok_or(RuntimeError::OperandMustBeNumber {
                line: operator.line,
            })
    }

    fn number_operands(
        operator: &Token,
        left: &Object,
        right: &Object,
    ) -> Result<(f64, f64), RuntimeError> {
        match (
            left.as_value().and_then(Value::as_number),
            right.as_value().and_then(Value::as_number),
        ) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(RuntimeError::OperandsMustBeNumbers {
                line: operator.line,
            }),
        }
    }

    fn add(operator: &Token, left: &Object, right: &Object) -> Result<Object, RuntimeError> {
        match (left.as_value(), right.as_value()) {
            (Some(Value::Number(a)), Some(Value::Number(b))) => Ok(Object::from(a + b)),
            (Some(Value::String(a)), Some(Value::String(b))) => Ok(Object::from(format!("{}{}", a, b))),
            _ => Err(RuntimeError::OperandsMustBeNumbersOrStrings {
                line: operator.line,
            }),
        }
    }
}

impl ExprVisitor for Evaluator {
    type Output = Object;
    type Error = RuntimeError;

    fn visit_assign(&mut self, expr: &Assign) -> Result<Object, RuntimeError> {
        let value = expr.value.accept(self)?;
        self.globals.assign(&expr.target.name, value.clone())?;
        Ok(value)
    }

    fn visit_binary(&mut self, expr: &Binary) -> Result<Object, RuntimeError> {
        let left = expr.left.accept(self)?;
        let right = expr.right.accept(self)?;
        let op = &expr.operator;

        let result = match op.kind {
            TokenKind::Plus => return Self::add(op, &left, &right),
            TokenKind::Minus => {
                let (a, b) = Self::number_operands(op, &left, &right)?;
                Object::from(a - b)
            }
            TokenKind::Star => {
                let (a, b) = Self::number_operands(op, &left, &right)?;
                Object::from(a * b)
            }
            TokenKind::Slash => {
                let (a, b) = Self::number_operands(op, &left, &right)?;
                Object::from(a / b)
            }
            TokenKind::Greater => {
                let (a, b) = Self::number_operands(op, &left, &right)?;
                Object::from(a > b)
            }
            TokenKind::GreaterEqual => {
                let (a, b) = Self::number_operands(op, &left, &right)?;
                Object::from(a >= b)
            }
            TokenKind::Less => {
                let (a, b) = Self::number_operands(op, &left, &right)?;
                Object::from(a < b)
            }
            TokenKind::LessEqual => {
                let (a, b) = Self::number_operands(op, &left, &right)?;
                Object::from(a <= b)
            }
            TokenKind::EqualEqual => Object::from(left == right),
            TokenKind::BangEqual => Object::from(left != right),
            _ => return Err(RuntimeError::unknown_operator(op)),
        };
        Ok(result)
    }

    fn visit_call(&mut self, expr: &Call) -> Result<Object, RuntimeError> {
        let callee = expr.callee.accept(self)?;

        let mut arguments = Vec::with_capacity(expr.arguments.len());
        for argument in &expr.arguments {
            arguments.push(argument.accept(self)?);
        }

        let line = expr.callee.line().unwrap_or_default();
        let Object::Native(function) = callee else {
            return Err(RuntimeError::NotCallable {
                type_name: callee.type_name(),
                line,
            });
        };

        if arguments.len() != function.arity {
            return Err(RuntimeError::ArityMismatch {
                expected: function.arity,
                got: arguments.len(),
                line,
            });
        }
        (function.function)(&arguments)
    }

    fn visit_get(&mut self, expr: &Get) -> Result<Object, RuntimeError> {
        let object = expr.object.accept(self)?;
        let Object::Instance(instance) = object else {
            return Err(RuntimeError::OnlyInstancesHaveProperties {
                line: expr.name.line,
            });
        };

        let instance = instance.borrow();
        instance
            .fields
            .get(&expr.name.lexeme)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedProperty {
                name: expr.name.lexeme.clone(),
                line: expr.name.line,
            })
    }

    fn visit_grouping(&mut self, expr: &Grouping) -> Result<Object, RuntimeError> {
        expr.inner.accept(self)
    }

    fn visit_literal(&mut self, expr: &Literal) -> Result<Object, RuntimeError> {
        Ok(Object::Value(expr.value.clone()))
    }

    fn visit_logical(&mut self, expr: &Logical) -> Result<Object, RuntimeError> {
        let left = expr.left.accept(self)?;

        let short_circuit = match expr.operator.kind {
            TokenKind::Or => left.is_truthy(),
            TokenKind::And => !left.is_truthy(),
            _ => return Err(RuntimeError::unknown_operator(&expr.operator)),
        };
        if short_circuit {
            return Ok(left);
        }
        expr.right.accept(self)
    }

    fn visit_set(&mut self, expr: &Set) -> Result<Object, RuntimeError> {
        let object = expr.object.accept(self)?;
        let Object::Instance(instance) = object else {
            return Err(RuntimeError::OnlyInstancesHaveFields {
                line: expr.name.line,
            });
        };

        let value = expr.value.accept(self)?;
        instance
            .borrow_mut()
            .fields
            .insert(expr.name.lexeme.clone(), value.clone());
        Ok(value)
    }

    fn visit_unary(&mut self, expr: &Unary) -> Result<Object, RuntimeError> {
        let right = expr.right.accept(self)?;

        match expr.operator.kind {
            TokenKind::Minus => Ok(Object::from(-Self::number_operand(&expr.operator, &right)?)),
            TokenKind::Bang => Ok(Object::from(!right.is_truthy())),
            _ => Err(RuntimeError::unknown_operator(&expr.operator)),
        }
    }

    fn visit_variable(&mut self, expr: &Variable) -> Result<Object, RuntimeError> {
        self.globals.get(&expr.name)
    }
}
