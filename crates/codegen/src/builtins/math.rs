// Math builtins (abs, max, min)

use super::{arity, invalid};
use crate::error::{RuntimeError, RuntimeResult};
use crate::function::{Function, FunctionTable, Signature};
use crate::operators;
use crate::types::Type;
use crate::value::Value;
use std::cmp::Ordering;

pub fn register_math_functions(table: &mut FunctionTable) {
    table.register(Function::new("abs", abs).with_signature(Signature::fixed(vec![Type::Any], Type::Any)));
    table.register(Function::new("max", |args: &[Value]| extreme("max", args, Ordering::Greater)));
    table.register(Function::new("min", |args: &[Value]| extreme("min", args, Ordering::Less)));
}

fn abs(args: &[Value]) -> RuntimeResult<Value> {
    arity("abs", args, 1)?;
    match &args[0] {
        Value::Int(i) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::IntegerOverflow {
                operation: "abs".to_string(),
            }),
        Value::Uint(u) => Ok(Value::Uint(*u)),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        Value::Complex(c) => Ok(Value::Float(c.re.hypot(c.im))),
        Value::Decimal(d) => Ok(Value::Decimal(d.abs())),
        other => Err(invalid("abs", other)),
    }
}

/// Largest (`Greater`) or smallest (`Less`) of one or more comparable values
fn extreme(name: &str, args: &[Value], wanted: Ordering) -> RuntimeResult<Value> {
    let Some((first, rest)) = args.split_first() else {
        return Err(RuntimeError::ArgumentCount {
            function: name.to_string(),
            expected: 1,
            found: 0,
        });
    };

    let mut best = first;
    for candidate in rest {
        match operators::compare(candidate, best)? {
            Some(ordering) if ordering == wanted => best = candidate,
            Some(_) => {}
            None => return Err(invalid(name, candidate)),
        }
    }
    Ok(best.clone())
}
