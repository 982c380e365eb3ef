// Callable functions
//
// Builtins and caller-registered functions share one shape: a name, a native
// implementation over a slice of values, and an optional signature the
// checker uses for arity and return types.

use crate::error::RuntimeResult;
use crate::types::Type;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Native implementation of a function
pub type NativeFn = dyn Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync;

/// Static description of a function for the checker
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// Parameter types; `None` accepts any number of arguments of any type
    pub params: Option<Vec<Type>>,
    pub ret: Type,
}

impl Signature {
    pub fn fixed(params: Vec<Type>, ret: Type) -> Self {
        Self {
            params: Some(params),
            ret,
        }
    }

    pub fn variadic(ret: Type) -> Self {
        Self { params: None, ret }
    }
}

#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub func: Arc<NativeFn>,
    pub signature: Option<Signature>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn call(&self, args: &[Value]) -> RuntimeResult<Value> {
        (self.func)(args)
    }

    /// Static return type, `Any` without a signature
    pub fn return_type(&self) -> Type {
        self.signature
            .as_ref()
            .map(|s| s.ret.clone())
            .unwrap_or(Type::Any)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Name-keyed registry of callable functions
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function`, replacing any previous one with the same name
    pub fn register(&mut self, function: Function) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
