// Conversion builtins (int, float, decimal)

use super::{arity, invalid};
use crate::error::{RuntimeError, RuntimeResult};
use crate::function::{Function, FunctionTable, Signature};
use crate::types::{FloatWidth, IntWidth, Type};
use crate::value::Value;
use bigdecimal::ToPrimitive;

pub fn register_conversion_functions(table: &mut FunctionTable) {
    table.register(
        Function::new("int", to_int).with_signature(Signature::fixed(vec![Type::Any], Type::Int(IntWidth::W64))),
    );
    table.register(
        Function::new("float", to_float)
            .with_signature(Signature::fixed(vec![Type::Any], Type::Float(FloatWidth::W64))),
    );
    table.register(
        Function::new("decimal", |args: &[Value]| {
            arity("decimal", args, 1)?;
            Ok(Value::Decimal(args[0].to_decimal()?))
        })
        .with_signature(Signature::fixed(vec![Type::Any], Type::Decimal)),
    );
}

fn to_int(args: &[Value]) -> RuntimeResult<Value> {
    arity("int", args, 1)?;
    let overflow = || RuntimeError::IntegerOverflow {
        operation: "int".to_string(),
    };
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Uint(u) => i64::try_from(*u).map(Value::Int).map_err(|_| overflow()),
        Value::Float(x) if x.is_finite() && x.abs() < i64::MAX as f64 => Ok(Value::Int(x.trunc() as i64)),
        Value::Float(_) => Err(overflow()),
        Value::Decimal(d) => d.with_scale(0).to_i64().map(Value::Int).ok_or_else(overflow),
        Value::String(s) => s.trim().parse().map(Value::Int).map_err(|_| RuntimeError::Function {
            function: "int".to_string(),
            message: format!("cannot parse {:?} as an integer", s),
        }),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => Err(invalid("int", other)),
    }
}

fn to_float(args: &[Value]) -> RuntimeResult<Value> {
    arity("float", args, 1)?;
    match &args[0] {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Uint(u) => Ok(Value::Float(*u as f64)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Decimal(d) => d.to_f64().map(Value::Float).ok_or_else(|| invalid("float", &args[0])),
        Value::String(s) => s.trim().parse().map(Value::Float).map_err(|_| RuntimeError::Function {
            function: "float".to_string(),
            message: format!("cannot parse {:?} as a float", s),
        }),
        other => Err(invalid("float", other)),
    }
}
