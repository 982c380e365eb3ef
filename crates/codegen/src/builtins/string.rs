// String builtins (len, string, upper, lower, trim)

use super::{arity, invalid};
use crate::error::RuntimeResult;
use crate::function::{Function, FunctionTable, Signature};
use crate::types::{IntWidth, Type};
use crate::value::Value;

pub fn register_string_functions(table: &mut FunctionTable) {
    table.register(
        Function::new("len", len).with_signature(Signature::fixed(vec![Type::Any], Type::Int(IntWidth::W64))),
    );
    table.register(
        Function::new("string", |args: &[Value]| {
            arity("string", args, 1)?;
            Ok(Value::String(args[0].to_string()))
        })
        .with_signature(Signature::fixed(vec![Type::Any], Type::String)),
    );
    for (name, transform) in [
        ("upper", str::to_uppercase as fn(&str) -> String),
        ("lower", str::to_lowercase),
        ("trim", |s: &str| s.trim().to_string()),
    ] {
        table.register(
            Function::new(name, move |args: &[Value]| {
                arity(name, args, 1)?;
                match &args[0] {
                    Value::String(s) => Ok(Value::String(transform(s))),
                    other => Err(invalid(name, other)),
                }
            })
            .with_signature(Signature::fixed(vec![Type::String], Type::String)),
        );
    }
}

fn len(args: &[Value]) -> RuntimeResult<Value> {
    arity("len", args, 1)?;
    let n = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Map(entries) => entries.len(),
        other => return Err(invalid("len", other)),
    };
    Ok(Value::Int(n as i64))
}
