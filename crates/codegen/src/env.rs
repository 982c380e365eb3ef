// Variable environment
//
// Binds names to values. The checker asks it for static types, the VM for
// values. A declared type overrides the one derived from the value, which is
// how narrow integer widths and references enter the type system.

use crate::types::Type;
use crate::value::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env {
    values: BTreeMap<String, Value>,
    declared: BTreeMap<String, Type>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Env::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder form of [`Env::declare`]
    pub fn typed(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.declare(name, ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Fix the static type of `name` regardless of the bound value
    pub fn declare(&mut self, name: impl Into<String>, ty: Type) {
        self.declared.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn type_of(&self, name: &str) -> Option<Type> {
        self.declared
            .get(name)
            .cloned()
            .or_else(|| self.values.get(name).map(Value::type_of))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name) || self.declared.contains_key(name)
    }

    /// Copy every binding and declaration of `other` into `self`, `other` wins
    pub fn extend(&mut self, other: &Env) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
        for (name, ty) in &other.declared {
            self.declared.insert(name.clone(), ty.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.declared.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Env::new();
        for (name, value) in iter {
            env.insert(name, value);
        }
        env
    }
}
