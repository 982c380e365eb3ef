// Arithmetic and comparison operators
//
// Native run-time semantics of every unary and binary operator. The VM calls
// into this module for each operator instruction and constant folding uses
// it at compile time. Short-circuiting operators (&&, ||, ??) are handled by
// jumps in the VM; the versions here evaluate both sides and only serve
// folding.

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{Complex, Value};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use parser::ast::{BinaryOp, UnaryOp};
use std::cmp::Ordering;

/// Numeric operand after promotion to a common representation
enum Num {
    Int(i64),
    Float(f64),
    Complex(Complex),
    Decimal(BigDecimal),
}

fn type_error(op: &str, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::Type {
        operation: op.to_string(),
        found: format!("{} and {}", lhs.kind(), rhs.kind()),
    }
}

fn overflow(op: BinaryOp) -> RuntimeError {
    RuntimeError::IntegerOverflow {
        operation: op.symbol().to_string(),
    }
}

fn is_number(v: &Value) -> bool {
    matches!(
        v,
        Value::Int(_) | Value::Uint(_) | Value::Float(_) | Value::Complex(_) | Value::Decimal(_)
    )
}

fn to_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Int(i) => Some(*i),
        Value::Uint(u) => i64::try_from(*u).ok(),
        _ => None,
    }
}

fn to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Uint(u) => Some(*u as f64),
        Value::Float(x) => Some(*x),
        Value::Decimal(d) => d.to_f64(),
        _ => None,
    }
}

fn to_complex(v: &Value) -> Option<Complex> {
    match v {
        Value::Complex(c) => Some(*c),
        other => to_f64(other).map(|re| Complex::new(re, 0.0)),
    }
}

/// Bring two numeric values to the wider of their representations:
/// int < float < complex, and decimal absorbs int and float.
fn promote(op: &str, lhs: &Value, rhs: &Value) -> RuntimeResult<(Num, Num)> {
    if !is_number(lhs) || !is_number(rhs) {
        return Err(type_error(op, lhs, rhs));
    }

    match (lhs, rhs) {
        (Value::Decimal(_), Value::Complex(_)) | (Value::Complex(_), Value::Decimal(_)) => {
            Err(type_error(op, lhs, rhs))
        }
        (Value::Decimal(_), _) | (_, Value::Decimal(_)) => {
            Ok((Num::Decimal(lhs.to_decimal()?), Num::Decimal(rhs.to_decimal()?)))
        }
        (Value::Complex(_), _) | (_, Value::Complex(_)) => match (to_complex(lhs), to_complex(rhs)) {
            (Some(a), Some(b)) => Ok((Num::Complex(a), Num::Complex(b))),
            _ => Err(type_error(op, lhs, rhs)),
        },
        (Value::Float(_), _) | (_, Value::Float(_)) => match (to_f64(lhs), to_f64(rhs)) {
            (Some(a), Some(b)) => Ok((Num::Float(a), Num::Float(b))),
            _ => Err(type_error(op, lhs, rhs)),
        },
        _ => match (to_i64(lhs), to_i64(rhs)) {
            (Some(a), Some(b)) => Ok((Num::Int(a), Num::Int(b))),
            // uint beyond i64 range
            _ => match (to_f64(lhs), to_f64(rhs)) {
                (Some(a), Some(b)) => Ok((Num::Float(a), Num::Float(b))),
                _ => Err(type_error(op, lhs, rhs)),
            },
        },
    }
}

fn complex_div(a: Complex, b: Complex) -> Complex {
    let denom = b.re * b.re + b.im * b.im;
    Complex::new(
        (a.re * b.re + a.im * b.im) / denom,
        (a.im * b.re - a.re * b.im) / denom,
    )
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    let symbol = op.symbol();
    let (a, b) = promote(symbol, lhs, rhs)?;

    let value = match (op, a, b) {
        (BinaryOp::Add, Num::Int(a), Num::Int(b)) => Value::Int(a.checked_add(b).ok_or_else(|| overflow(op))?),
        (BinaryOp::Sub, Num::Int(a), Num::Int(b)) => Value::Int(a.checked_sub(b).ok_or_else(|| overflow(op))?),
        (BinaryOp::Mul, Num::Int(a), Num::Int(b)) => Value::Int(a.checked_mul(b).ok_or_else(|| overflow(op))?),
        // Division of integers yields a float
        (BinaryOp::Div, Num::Int(a), Num::Int(b)) => Value::Float(a as f64 / b as f64),
        (BinaryOp::Mod, Num::Int(a), Num::Int(b)) => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int(a.checked_rem(b).ok_or_else(|| overflow(op))?)
        }

        (BinaryOp::Add, Num::Float(a), Num::Float(b)) => Value::Float(a + b),
        (BinaryOp::Sub, Num::Float(a), Num::Float(b)) => Value::Float(a - b),
        (BinaryOp::Mul, Num::Float(a), Num::Float(b)) => Value::Float(a * b),
        (BinaryOp::Div, Num::Float(a), Num::Float(b)) => Value::Float(a / b),

        (BinaryOp::Add, Num::Complex(a), Num::Complex(b)) => Value::Complex(Complex::new(a.re + b.re, a.im + b.im)),
        (BinaryOp::Sub, Num::Complex(a), Num::Complex(b)) => Value::Complex(Complex::new(a.re - b.re, a.im - b.im)),
        (BinaryOp::Mul, Num::Complex(a), Num::Complex(b)) => Value::Complex(Complex::new(
            a.re * b.re - a.im * b.im,
            a.re * b.im + a.im * b.re,
        )),
        (BinaryOp::Div, Num::Complex(a), Num::Complex(b)) => Value::Complex(complex_div(a, b)),

        (BinaryOp::Add, Num::Decimal(a), Num::Decimal(b)) => Value::Decimal(a + b),
        (BinaryOp::Sub, Num::Decimal(a), Num::Decimal(b)) => Value::Decimal(a - b),
        (BinaryOp::Mul, Num::Decimal(a), Num::Decimal(b)) => Value::Decimal(a * b),
        (BinaryOp::Div, Num::Decimal(a), Num::Decimal(b)) => {
            if b.is_zero() {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Decimal(a / b)
        }
        (BinaryOp::Mod, Num::Decimal(a), Num::Decimal(b)) => {
            if b.is_zero() {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Decimal(a % b)
        }

        _ => return Err(type_error(symbol, lhs, rhs)),
    };

    Ok(value)
}

fn power(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match (to_f64(lhs), to_f64(rhs)) {
        (Some(base), Some(exp)) => Ok(Value::Float(base.powf(exp))),
        _ => Err(type_error("**", lhs, rhs)),
    }
}

/// Ordering of two values, `None` when they are not comparable (NaN included)
pub fn compare(lhs: &Value, rhs: &Value) -> RuntimeResult<Option<Ordering>> {
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return Ok(Some(a.cmp(b)));
    }

    let ordering = match promote("compare", lhs, rhs)? {
        (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
        (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
        (Num::Decimal(a), Num::Decimal(b)) => Some(a.cmp(&b)),
        _ => return Err(type_error("compare", lhs, rhs)),
    };

    Ok(ordering)
}

/// Equality across numeric representations, structural otherwise
pub fn equal(lhs: &Value, rhs: &Value) -> bool {
    if is_number(lhs) && is_number(rhs) {
        return match promote("==", lhs, rhs) {
            Ok((Num::Int(a), Num::Int(b))) => a == b,
            Ok((Num::Float(a), Num::Float(b))) => a == b,
            Ok((Num::Complex(a), Num::Complex(b))) => a == b,
            Ok((Num::Decimal(a), Num::Decimal(b))) => a == b,
            _ => false,
        };
    }

    match (lhs, rhs) {
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal(x, y))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| equal(v, w)))
        }
        _ => lhs == rhs,
    }
}

fn truthy(op: &str, v: &Value) -> RuntimeResult<bool> {
    v.as_bool().ok_or_else(|| RuntimeError::Type {
        operation: op.to_string(),
        found: v.kind().to_string(),
    })
}

fn membership(lhs: &Value, rhs: &Value) -> RuntimeResult<bool> {
    match rhs {
        Value::Array(items) => Ok(items.iter().any(|item| equal(lhs, item))),
        Value::Map(entries) => match lhs {
            Value::String(key) => Ok(entries.contains_key(key)),
            _ => Err(type_error("in", lhs, rhs)),
        },
        _ => Err(type_error("in", lhs, rhs)),
    }
}

fn string_op(op: BinaryOp, lhs: &Value, rhs: &Value) -> RuntimeResult<bool> {
    let (Value::String(a), Value::String(b)) = (lhs, rhs) else {
        return Err(type_error(op.symbol(), lhs, rhs));
    };
    Ok(match op {
        BinaryOp::Contains => a.contains(b.as_str()),
        BinaryOp::StartsWith => a.starts_with(b.as_str()),
        _ => a.ends_with(b.as_str()),
    })
}

/// Apply a binary operator to two evaluated operands.
pub fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match op {
        BinaryOp::Add => match (lhs, rhs) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => arithmetic(op, lhs, rhs),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => arithmetic(op, lhs, rhs),
        BinaryOp::Pow => power(lhs, rhs),
        BinaryOp::Eq => Ok(Value::Bool(equal(lhs, rhs))),
        BinaryOp::NotEq => Ok(Value::Bool(!equal(lhs, rhs))),
        BinaryOp::Lt => Ok(Value::Bool(compare(lhs, rhs)? == Some(Ordering::Less))),
        BinaryOp::Gt => Ok(Value::Bool(compare(lhs, rhs)? == Some(Ordering::Greater))),
        BinaryOp::LtEq => Ok(Value::Bool(matches!(
            compare(lhs, rhs)?,
            Some(Ordering::Less | Ordering::Equal)
        ))),
        BinaryOp::GtEq => Ok(Value::Bool(matches!(
            compare(lhs, rhs)?,
            Some(Ordering::Greater | Ordering::Equal)
        ))),
        BinaryOp::LogicalAnd => Ok(Value::Bool(truthy("&&", lhs)? && truthy("&&", rhs)?)),
        BinaryOp::LogicalOr => Ok(Value::Bool(truthy("||", lhs)? || truthy("||", rhs)?)),
        BinaryOp::In => Ok(Value::Bool(membership(lhs, rhs)?)),
        BinaryOp::Contains | BinaryOp::StartsWith | BinaryOp::EndsWith => {
            Ok(Value::Bool(string_op(op, lhs, rhs)?))
        }
        BinaryOp::NilCoalesce => Ok(if lhs.is_nil() { rhs.clone() } else { lhs.clone() }),
    }
}

/// Apply a unary operator.
pub fn unary(op: UnaryOp, operand: &Value) -> RuntimeResult<Value> {
    let invalid = || RuntimeError::Type {
        operation: op.symbol().to_string(),
        found: operand.kind().to_string(),
    };

    match (op, operand) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Plus, v) if is_number(v) => Ok(v.clone()),
        (UnaryOp::Negate, Value::Int(i)) => i.checked_neg().map(Value::Int).ok_or_else(|| {
            RuntimeError::IntegerOverflow {
                operation: "-".to_string(),
            }
        }),
        (UnaryOp::Negate, Value::Uint(u)) => i64::try_from(*u)
            .map(|i| Value::Int(-i))
            .map_err(|_| RuntimeError::IntegerOverflow {
                operation: "-".to_string(),
            }),
        (UnaryOp::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Negate, Value::Complex(c)) => Ok(Value::Complex(Complex::new(-c.re, -c.im))),
        (UnaryOp::Negate, Value::Decimal(d)) => Ok(Value::Decimal(-(d.clone()))),
        _ => Err(invalid()),
    }
}

/// Boolean test used by conditional jumps
pub fn expect_bool(op: &str, v: &Value) -> RuntimeResult<bool> {
    truthy(op, v)
}
