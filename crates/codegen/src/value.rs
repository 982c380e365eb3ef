// Run-time values
//
// A Value is what the VM pushes on its stack and what callers get back from
// a run. Display gives the generic stringification used everywhere a value
// has to become text (string builtins, decimal coercion, CLI output).

use crate::error::{RuntimeError, RuntimeResult};
use crate::types::{FloatWidth, IntWidth, Type};
use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Complex number as a pair of f64 parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex),
    Decimal(BigDecimal),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Static type a value of this shape gets when bound in an environment
    pub fn type_of(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int(IntWidth::W64),
            Value::Uint(_) => Type::Uint(IntWidth::W64),
            Value::Float(_) => Type::Float(FloatWidth::W64),
            Value::Complex(_) => Type::Complex(FloatWidth::W64),
            Value::Decimal(_) => Type::Decimal,
            Value::String(_) => Type::String,
            Value::Array(items) => {
                let types: Vec<Type> = items.iter().map(Value::type_of).collect();
                Type::Array(Box::new(Type::common(types.iter())))
            }
            Value::Map(entries) => {
                let types: Vec<Type> = entries.values().map(Value::type_of).collect();
                Type::Map(Box::new(Type::common(types.iter())))
            }
        }
    }

    /// Short kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a decimal: decimals pass through, everything else goes
    /// through its string form.
    pub fn to_decimal(&self) -> RuntimeResult<BigDecimal> {
        match self {
            Value::Decimal(d) => Ok(d.clone()),
            Value::Int(i) => Ok(BigDecimal::from(*i)),
            Value::Uint(u) => Ok(BigDecimal::from(*u)),
            other => parse_decimal(&other.to_string()),
        }
    }
}

/// Parse a decimal numeral (`12`, `-0.5`, `1.5e3`). Surrounding
/// whitespace is not a numeral and is rejected.
pub fn parse_decimal(input: &str) -> RuntimeResult<BigDecimal> {
    BigDecimal::from_str(input).map_err(|_| RuntimeError::Parse {
        input: input.to_string(),
    })
}

/// Positional decimal text (never exponent form) without insignificant
/// trailing fractional zeros
pub fn format_decimal(d: &BigDecimal) -> String {
    let (unscaled, scale) = d.as_bigint_and_exponent();
    let text = unscaled.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.as_str()),
    };

    if scale <= 0 {
        if digits == "0" {
            return "0".to_string();
        }
        return format!("{}{}{}", sign, digits, "0".repeat(scale.unsigned_abs() as usize));
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits.to_string()
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        if int_part.trim_start_matches('0').is_empty() {
            return "0".to_string();
        }
        format!("{}{}", sign, int_part)
    } else {
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Complex(c) => {
                if c.im.is_sign_negative() {
                    write!(f, "({}{}i)", c.re, c.im)
                } else {
                    write!(f, "({}+{}i)", c.re, c.im)
                }
            }
            Value::Decimal(d) => write!(f, "{}", format_decimal(d)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::Decimal(d)
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

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
