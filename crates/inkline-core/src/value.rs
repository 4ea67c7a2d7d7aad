//! Concrete values for branch evaluation.
//!
//! The substitution walk never touches these: it builds expressions, not
//! values. Only the branch classifier computes here, with JavaScript-flavored
//! arithmetic, comparison, and truthiness semantics.

use serde::Serialize;

use crate::ast::{BinOp, Lit};
use crate::error::CoreError;

/// A concrete runtime value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Num(f64),
    Bool(bool),
    Str(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn from_lit(lit: &Lit) -> Value {
        match lit {
            Lit::Num(n) => Value::Num(*n),
            Lit::Str(s) => Value::Str(s.clone()),
            Lit::Bool(b) => Value::Bool(*b),
        }
    }

    /// JavaScript truthiness: zero, `false`, and the empty string are falsy;
    /// arrays are always truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Num(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) => true,
        }
    }

    /// Numeric coercion for arithmetic and comparison operands.
    pub fn as_number(&self) -> Result<f64, CoreError> {
        match self {
            Value::Num(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s
                .parse::<f64>()
                .map_err(|_| CoreError::Eval(format!("`{s}` is not a number"))),
            Value::Array(_) => Err(CoreError::Eval("cannot use an array as a number".into())),
        }
    }

    /// Checked array indexing. Anything but an in-range index into an array
    /// value is fatal.
    pub fn index(&self, index: &Value) -> Result<Value, CoreError> {
        let elements = match self {
            Value::Array(elements) => elements,
            other => {
                return Err(CoreError::Eval(format!(
                    "cannot index into {}",
                    other.type_name()
                )))
            }
        };
        let raw = index.as_number()? as i64;
        if raw < 0 || raw as usize >= elements.len() {
            return Err(CoreError::IndexOutOfRange {
                index: raw,
                len: elements.len(),
            });
        }
        Ok(elements[raw as usize].clone())
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Num(_) => "a number",
            Value::Bool(_) => "a boolean",
            Value::Str(_) => "a string",
            Value::Array(_) => "an array",
        }
    }

    /// String coercion, used by `+` concatenation.
    fn to_text(&self) -> String {
        match self {
            Value::Num(n) => format!("{n}"),
            Value::Bool(b) => format!("{b}"),
            Value::Str(s) => s.clone(),
            Value::Array(elements) => elements
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Apply a binary operator with JavaScript semantics: `+` concatenates when
/// either side is a string, comparisons are numeric unless both sides are
/// strings, `==` coerces while `===` does not.
pub fn apply_binary(op: BinOp, left: Value, right: Value) -> Result<Value, CoreError> {
    use BinOp::*;
    match op {
        Add => match (&left, &right) {
            (Value::Str(_), _) | (_, Value::Str(_)) => {
                Ok(Value::Str(format!("{}{}", left.to_text(), right.to_text())))
            }
            _ => Ok(Value::Num(left.as_number()? + right.as_number()?)),
        },
        Sub => Ok(Value::Num(left.as_number()? - right.as_number()?)),
        Mul => Ok(Value::Num(left.as_number()? * right.as_number()?)),
        Div => Ok(Value::Num(left.as_number()? / right.as_number()?)),
        Rem => Ok(Value::Num(left.as_number()? % right.as_number()?)),
        Lt | Le | Gt | Ge => {
            let ordering_holds = match (&left, &right) {
                (Value::Str(a), Value::Str(b)) => compare(op, a.cmp(b)),
                _ => {
                    let (a, b) = (left.as_number()?, right.as_number()?);
                    match op {
                        Lt => a < b,
                        Le => a <= b,
                        Gt => a > b,
                        Ge => a >= b,
                        _ => unreachable!(),
                    }
                }
            };
            Ok(Value::Bool(ordering_holds))
        }
        Eq => Ok(Value::Bool(loose_eq(&left, &right)?)),
        Ne => Ok(Value::Bool(!loose_eq(&left, &right)?)),
        StrictEq => Ok(Value::Bool(strict_eq(&left, &right))),
        StrictNe => Ok(Value::Bool(!strict_eq(&left, &right))),
    }
}

fn compare(op: BinOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinOp::Lt => ordering == Less,
        BinOp::Le => ordering != Greater,
        BinOp::Gt => ordering == Greater,
        BinOp::Ge => ordering != Less,
        _ => unreachable!(),
    }
}

/// `==`: numeric comparison when both sides coerce to numbers, textual
/// comparison otherwise.
fn loose_eq(left: &Value, right: &Value) -> Result<bool, CoreError> {
    match (left, right) {
        (Value::Array(_), _) | (_, Value::Array(_)) => Ok(strict_eq(left, right)),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        _ => Ok(left.as_number()? == right.as_number()?),
    }
}

/// `===`: same variant, equal value.
fn strict_eq(left: &Value, right: &Value) -> bool {
    left == right
}
