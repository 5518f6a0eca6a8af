//! JSON serialization of expression trees.
//!
//! Each node becomes an object tagged with `"type"`. Tokens are written as
//! `{"lexeme": ..., "line": ...}` and literal values as native JSON scalars.
//!
//! # Examples
//!
//! ```
//! use lox_lang::parser::parse_str;
//! use lox_lang::output::to_json;
//!
//! let expr = parse_str("-x").unwrap();
//! assert_eq!(
//!     to_json(&expr),
//!     r#"{"operator":{"lexeme":"-","line":1},"right":{"name":{"lexeme":"x","line":1},"type":"variable"},"type":"unary"}"#
//! );
//! ```

use std::convert::Infallible;

use serde_json::{Value as Json, json};

use crate::ast::{
    Expr, ExprVisitor, Token,
    expressions::{Assign, Binary, Call, Get, Grouping, Literal, Logical, Set, Unary, Variable},
};
use crate::value::Value;

/// Builds a `serde_json::Value` for each node it visits.
#[derive(Debug, Default)]
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        JsonEncoder
    }

    pub fn encode(&mut self, expr: &Expr) -> Json {
        let Ok(json) = expr.accept(self);
        json
    }
}

fn token(token: &Token) -> Json {
    json!({ "lexeme": token.lexeme, "line": token.line })
}

/// Literal values as JSON scalars. Non-finite numbers have no JSON form and
/// fall back to their rendering.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Boolean(b) => Json::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(value.to_string())),
        Value::String(s) => Json::String(s.clone()),
    }
}

impl ExprVisitor for JsonEncoder {
    type Output = Json;
    type Error = Infallible;

    fn visit_assign(&mut self, expr: &Assign) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "assign",
            "target": expr.target.accept(self)?,
            "operator": token(&expr.operator),
            "value": expr.value.accept(self)?,
        }))
    }

    fn visit_binary(&mut self, expr: &Binary) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "binary",
            "left": expr.left.accept(self)?,
            "operator": token(&expr.operator),
            "right": expr.right.accept(self)?,
        }))
    }

    fn visit_call(&mut self, expr: &Call) -> Result<Json, Infallible> {
        let callee = expr.callee.accept(self)?;
        let arguments = expr
            .arguments
            .iter()
            .map(|arg| arg.accept(self))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({
            "type": "call",
            "callee": callee,
            "arguments": arguments,
        }))
    }

    fn visit_get(&mut self, expr: &Get) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "get",
            "object": expr.object.accept(self)?,
            "name": token(&expr.name),
        }))
    }

    fn visit_grouping(&mut self, expr: &Grouping) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "grouping",
            "inner": expr.inner.accept(self)?,
        }))
    }

    fn visit_literal(&mut self, expr: &Literal) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "literal",
            "value": value_to_json(&expr.value),
        }))
    }

    fn visit_logical(&mut self, expr: &Logical) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "logical",
            "left": expr.left.accept(self)?,
            "operator": token(&expr.operator),
            "right": expr.right.accept(self)?,
        }))
    }

    fn visit_set(&mut self, expr: &Set) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "set",
            "object": expr.object.accept(self)?,
            "name": token(&expr.name),
            "value": expr.value.accept(self)?,
        }))
    }

    fn visit_unary(&mut self, expr: &Unary) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "unary",
            "operator": token(&expr.operator),
            "right": expr.right.accept(self)?,
        }))
    }

    fn visit_variable(&mut self, expr: &Variable) -> Result<Json, Infallible> {
        Ok(json!({
            "type": "variable",
            "name": token(&expr.name),
        }))
    }
}

/// Compact JSON for `expr`
pub fn to_json(expr: &Expr) -> String {
    JsonEncoder::new().encode(expr).to_string()
}

/// JSON for `expr` with 2-space indentation
pub fn to_json_pretty(expr: &Expr) -> String {
    let json = JsonEncoder::new().encode(expr);
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
}
