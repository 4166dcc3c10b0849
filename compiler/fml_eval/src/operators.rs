//! Operator implementations for the evaluator.
//!
//! Direct enum-based dispatch over `(operator, left, right)`. Each rule is
//! written for one operand order; commutative operators are retried with
//! swapped operands when no rule matches, mirroring the static rules.

use std::cmp::Ordering;
use std::rc::Rc;

use fml_ir::{OperatorId, StringInterner};
use fml_types::temporal::{add_duration, between, parse_date, sub_duration, IsoDuration};
use fml_types::{Type, TypeKind};

use crate::errors::{bug, EvalErrorKind};
use crate::Value;

type OpResult = Result<Value, EvalErrorKind>;

/// Evaluate `left op right`.
pub fn evaluate_binary(op: OperatorId, left: &Value, right: &Value) -> OpResult {
    if let Some(result) = direct(op, left, right) {
        return result;
    }
    if op.is_commutative() {
        if let Some(result) = direct(op, right, left) {
            return result;
        }
    }
    Err(EvalErrorKind::BinaryMismatch {
        op: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    })
}

/// Evaluate a prefix operator.
pub fn evaluate_unary(op: OperatorId, operand: &Value) -> OpResult {
    match (op, operand) {
        (OperatorId::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (OperatorId::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or(EvalErrorKind::Overflow { op: "negation" }),
        (OperatorId::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (OperatorId::Neg, Value::Duration(d)) => d
            .checked_neg()
            .map(Value::Duration)
            .ok_or(EvalErrorKind::Overflow { op: "negation" }),
        (OperatorId::Neg, Value::Array(items)) => items
            .iter()
            .map(|item| evaluate_unary(op, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::array),
        _ => Err(EvalErrorKind::UnaryMismatch {
            op: op.symbol(),
            operand: operand.type_name(),
        }),
    }
}

/// `None` means no rule covers this operand order.
fn direct(op: OperatorId, left: &Value, right: &Value) -> Option<OpResult> {
    match op {
        OperatorId::Add
        | OperatorId::Sub
        | OperatorId::Mul
        | OperatorId::Div
        | OperatorId::Mod => arithmetic(op, left, right),
        OperatorId::And => Some(Ok(Value::Bool(left.is_truthy() && right.is_truthy()))),
        OperatorId::Or => Some(Ok(Value::Bool(left.is_truthy() || right.is_truthy()))),
        OperatorId::Xor => Some(Ok(Value::Bool(left.is_truthy() ^ right.is_truthy()))),
        OperatorId::Eq => Some(Ok(Value::Bool(values_equal(left, right)))),
        OperatorId::NotEq => Some(Ok(Value::Bool(!values_equal(left, right)))),
        OperatorId::Lt | OperatorId::Gt | OperatorId::LtEq | OperatorId::GtEq => {
            let ordering = compare_values(left, right)?;
            let result = match op {
                OperatorId::Lt => ordering == Ordering::Less,
                OperatorId::Gt => ordering == Ordering::Greater,
                OperatorId::LtEq => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Some(Ok(Value::Bool(result)))
        }
        OperatorId::Assign
        | OperatorId::AddAssign
        | OperatorId::SubAssign
        | OperatorId::MulAssign
        | OperatorId::DivAssign
        | OperatorId::TypeCast
        | OperatorId::Index
        | OperatorId::Call
        | OperatorId::Not
        | OperatorId::Neg => Some(Err(bug(format!(
            "operator {} has no value-level rule",
            op.symbol()
        )))),
    }
}

fn arithmetic(op: OperatorId, left: &Value, right: &Value) -> Option<OpResult> {
    let result = match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let (a, b) = (left.as_float()?, right.as_float()?);
            float_arithmetic(op, a, b)
        }
        (Value::Str(a), Value::Str(b)) if op == OperatorId::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        (Value::Date(date), Value::Duration(duration)) => {
            let shifted = match op {
                OperatorId::Add => add_duration(date, *duration),
                OperatorId::Sub => sub_duration(date, *duration),
                _ => return None,
            };
            shifted.map(Value::Date).ok_or(EvalErrorKind::DateOutOfRange)
        }
        (Value::Date(a), Value::Date(b)) if op == OperatorId::Sub => {
            Ok(Value::Duration(between(a, b)))
        }
        (Value::Duration(a), Value::Duration(b)) => {
            let combined = match op {
                OperatorId::Add => a.checked_add(*b),
                OperatorId::Sub => a.checked_sub(*b),
                _ => return None,
            };
            combined
                .map(Value::Duration)
                .ok_or(EvalErrorKind::Overflow { op: "duration" })
        }
        (Value::Duration(d), Value::Int(n)) if op == OperatorId::Mul => d
            .checked_mul(*n)
            .map(Value::Duration)
            .ok_or(EvalErrorKind::Overflow { op: "duration" }),
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(Err(EvalErrorKind::LengthMismatch {
                    left: a.len(),
                    right: b.len(),
                }));
            }
            a.iter()
                .zip(b.iter())
                .map(|(x, y)| evaluate_binary(op, x, y))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::array)
        }
        (Value::Array(items), scalar) => items
            .iter()
            .map(|item| evaluate_binary(op, item, scalar))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::array),
        _ => return None,
    };
    Some(result)
}

/// Integer arithmetic. All operations are checked; `/` always yields a
/// float.
#[expect(
    clippy::cast_precision_loss,
    reason = "`/` on integers is defined as float division"
)]
fn int_arithmetic(op: OperatorId, a: i64, b: i64) -> OpResult {
    let checked = |result: Option<i64>, name: &'static str| {
        result
            .map(Value::Int)
            .ok_or(EvalErrorKind::Overflow { op: name })
    };
    match op {
        OperatorId::Add => checked(a.checked_add(b), "addition"),
        OperatorId::Sub => checked(a.checked_sub(b), "subtraction"),
        OperatorId::Mul => checked(a.checked_mul(b), "multiplication"),
        OperatorId::Div if b == 0 => Err(EvalErrorKind::DivisionByZero),
        OperatorId::Div => Ok(Value::Float(a as f64 / b as f64)),
        OperatorId::Mod if b == 0 => Err(EvalErrorKind::DivisionByZero),
        OperatorId::Mod => checked(a.checked_rem(b), "remainder"),
        _ => Err(bug("integer arithmetic on a non-arithmetic operator")),
    }
}

fn float_arithmetic(op: OperatorId, a: f64, b: f64) -> OpResult {
    let result = match op {
        OperatorId::Add => a + b,
        OperatorId::Sub => a - b,
        OperatorId::Mul => a * b,
        OperatorId::Div => a / b,
        OperatorId::Mod => a % b,
        _ => return Err(bug("float arithmetic on a non-arithmetic operator")),
    };
    Ok(Value::Float(result))
}

/// The language's `==`: numbers compare across `int` and `float`, arrays
/// element-wise, values of unrelated types are unequal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            compare_values(left, right) == Some(Ordering::Equal)
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        _ => left == right,
    }
}

/// Ordering for `< > <= >=`, or `None` for incomparable operands.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            left.as_float()?.partial_cmp(&right.as_float()?)
        }
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Duration(a), Value::Duration(b)) => {
            Some((a.months, a.seconds).cmp(&(b.months, b.seconds)))
        }
        _ => None,
    }
}

/// Convert `value` to `target`, as an explicit or inserted cast does.
pub fn cast(value: &Value, target: &Type, interner: &StringInterner) -> OpResult {
    let converted = match (&target.kind, value) {
        (TypeKind::Mixed, _) => value.clone(),
        (TypeKind::Boolean, _) => Value::Bool(value.is_truthy()),
        (TypeKind::String, Value::Str(_)) => value.clone(),
        (TypeKind::String, _) => Value::string(value.render(interner)),
        (TypeKind::Int, Value::Int(_))
        | (TypeKind::Float, Value::Float(_))
        | (TypeKind::Date, Value::Date(_))
        | (TypeKind::Duration, Value::Duration(_))
        | (TypeKind::Function(_), Value::Function(_)) => value.clone(),
        (TypeKind::Int, Value::Float(x)) => float_to_int(*x).ok_or_else(|| invalid(value, target, interner))?,
        (TypeKind::Int, Value::Bool(b)) => Value::Int(i64::from(*b)),
        (TypeKind::Float, Value::Int(_)) => Value::Float(value.as_float().unwrap_or_default()),
        (TypeKind::Date, Value::Str(text)) => {
            parse_date(text).map(Value::Date).ok_or_else(|| invalid(value, target, interner))?
        }
        (TypeKind::Duration, Value::Str(text)) => IsoDuration::parse(text)
            .map(Value::Duration)
            .ok_or_else(|| invalid(value, target, interner))?,
        (TypeKind::Array { element, .. }, Value::Array(items)) => {
            let items = items
                .iter()
                .map(|item| cast(item, element, interner))
                .collect::<Result<Vec<_>, _>>()?;
            Value::Array(Rc::new(items))
        }
        (TypeKind::Enum(name), Value::Enum { ty, .. }) if ty == name => value.clone(),
        _ => return Err(invalid(value, target, interner)),
    };
    Ok(converted)
}

/// Truncating float to int conversion, `None` when out of range.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "range is checked before the truncating cast"
)]
fn float_to_int(x: f64) -> Option<Value> {
    let truncated = x.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(Value::Int(truncated as i64))
    } else {
        None
    }
}

#[cold]
fn invalid(value: &Value, target: &Type, interner: &StringInterner) -> EvalErrorKind {
    let value = match value {
        Value::Str(_) => value.to_literal(),
        other => other.render(interner),
    };
    EvalErrorKind::InvalidCast {
        value,
        to: target.render(interner),
    }
}

#[cfg(test)]
mod tests;
