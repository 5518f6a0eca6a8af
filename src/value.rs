use std::fmt;

/// A literal value of the Lox language.
///
/// Lox has a single numeric domain: every number is an `f64`, there is no
/// separate integer type.
///
/// # Examples
///
/// ```
/// use lox_lang::Value;
///
/// assert_eq!(Value::Number(3.0).to_string(), "3");
/// assert_eq!(Value::Number(3.5).to_string(), "3.500000");
/// assert!(!Value::Nil.is_truthy());
/// assert!(Value::Number(0.0).is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value (`nil`)
    #[default]
    Nil,

    /// `true` / `false`
    Boolean(bool),

    /// Floating-point number
    Number(f64),

    /// UTF-8 text
    String(String),
}

impl Value {
    /// Truthiness used by conditions and the logical operators.
    ///
    /// Only `nil` and `false` are falsey. Zero and the empty string are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Number(_) | Value::String(_) => true,
        }
    }

    /// Human-readable type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Textual rendering shared by every pass that displays a literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::Number(n) if !n.is_finite() => write!(f, "{}", n),
            // -0.0 renders as "0"
            Value::Number(n) if *n == 0.0 => f.write_str("0"),
            Value::Number(n) if n.trunc() == *n => write!(f, "{:.0}", n),
            Value::Number(n) => write!(f, "{:.6}", n),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}
