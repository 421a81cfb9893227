//! Nested expression descriptions.
//!
//! The textual form is JSON: a number is a constant, a string is a variable,
//! `[op, operand]` applies a unary operator and `[lhs, op, rhs]` a binary one.
//!
//! ```
//! use dagrad::Expression;
//! let expr: Expression = r#"[["x", "^", 2], "+", ["sin", "y"]]"#.parse().unwrap();
//! assert_eq!(expr.variables(), vec!["x", "y"]);
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    operator::Operator,
};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum Expression {
    Constant(f64),
    Variable(String),
    Unary {
        op: Operator,
        operand: Box<Expression>,
    },
    Binary {
        lhs: Box<Expression>,
        op: Operator,
        rhs: Box<Expression>,
    },
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn unary(op: Operator, operand: Expression) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(lhs: Expression, op: Operator, rhs: Expression) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Names of the variables referenced in this expression, sorted and deduplicated.
    pub fn variables(&self) -> Vec<&str> {
        fn rec<'a>(expr: &'a Expression, names: &mut Vec<&'a str>) {
            match expr {
                Expression::Constant(_) => (),
                Expression::Variable(name) => names.push(name),
                Expression::Unary { operand, .. } => rec(operand, names),
                Expression::Binary { lhs, rhs, .. } => {
                    rec(lhs, names);
                    rec(rhs, names);
                }
            }
        }
        let mut names = vec![];
        rec(self, &mut names);
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Parse the nested-sequence form held in a JSON value.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Number(num) => num
                .as_f64()
                .filter(|v| v.is_finite())
                .map(Self::Constant)
                .ok_or_else(|| Error::Construction(format!("number {num} is not representable"))),
            Value::String(name) => {
                if name.is_empty() {
                    Err(Error::Construction("empty variable name".to_string()))
                } else if Operator::lookup(name).is_some() {
                    Err(Error::Construction(format!(
                        "operator `{name}` used as an operand"
                    )))
                } else {
                    Ok(Self::Variable(name.clone()))
                }
            }
            Value::Array(items) => match items.as_slice() {
                [op, operand] => {
                    let op = operator(op, 1)?;
                    Ok(Self::unary(op, Self::from_json(operand)?))
                }
                [lhs, op, rhs] => {
                    let op = operator(op, 2)?;
                    Ok(Self::binary(Self::from_json(lhs)?, op, Self::from_json(rhs)?))
                }
                _ => Err(Error::Construction(format!(
                    "a sequence must have 2 or 3 elements, got {}",
                    items.len()
                ))),
            },
            _ => Err(Error::Construction(format!(
                "`{value}` is neither a number, a variable name nor a sequence"
            ))),
        }
    }
}

fn operator(value: &Value, arity: usize) -> Result<Operator> {
    let symbol = value
        .as_str()
        .ok_or_else(|| Error::Construction(format!("`{value}` is not an operator symbol")))?;
    let op = Operator::lookup(symbol)
        .ok_or_else(|| Error::Construction(format!("unknown operator `{symbol}`")))?;
    if op.arity() != arity {
        return Err(Error::Construction(format!(
            "operator `{symbol}` takes {} operand(s), used with {arity}",
            op.arity()
        )));
    }
    Ok(op)
}

impl TryFrom<Value> for Expression {
    type Error = Error;
    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(&value)
    }
}

impl TryFrom<&Value> for Expression {
    type Error = Error;
    fn try_from(value: &Value) -> Result<Self> {
        Self::from_json(value)
    }
}

impl std::str::FromStr for Expression {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| Error::Construction(e.to_string()))?;
        Self::from_json(&value)
    }
}
