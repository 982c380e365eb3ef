// Built-in functions
//
// Every compiler starts with these registered. Caller-registered functions
// with the same name replace them.

pub mod convert;
pub mod math;
pub mod string;

use crate::error::{RuntimeError, RuntimeResult};
use crate::function::FunctionTable;
use crate::value::Value;

/// Register all built-in functions
pub fn register(table: &mut FunctionTable) {
    math::register_math_functions(table);
    string::register_string_functions(table);
    convert::register_conversion_functions(table);
}

/// Fail unless exactly `expected` arguments were passed
pub(crate) fn arity(function: &str, args: &[Value], expected: usize) -> RuntimeResult<()> {
    if args.len() != expected {
        return Err(RuntimeError::ArgumentCount {
            function: function.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

pub(crate) fn invalid(function: &str, value: &Value) -> RuntimeError {
    RuntimeError::Type {
        operation: function.to_string(),
        found: value.kind().to_string(),
    }
}
