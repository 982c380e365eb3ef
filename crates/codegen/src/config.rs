// Compiler configuration
//
// Collects what a compilation needs besides the source text: the variable
// environment used for type checking, the function table, the tree visitors
// to run after the first check, and whether to fold constants.

use crate::builtins;
use crate::env::Env;
use crate::function::{Function, FunctionTable};
use crate::visitor::Visitor;
use std::fmt;

pub struct Config {
    pub env: Env,
    pub functions: FunctionTable,
    pub visitors: Vec<Box<dyn Visitor>>,
    pub constant_folding: bool,
}

impl Config {
    /// Builtins registered, no visitors, folding on
    pub fn new() -> Self {
        let mut functions = FunctionTable::new();
        builtins::register(&mut functions);
        Self {
            env: Env::new(),
            functions,
            visitors: Vec::new(),
            constant_folding: true,
        }
    }

    /// Merge `env` into the checking environment
    pub fn with_env(mut self, env: &Env) -> Self {
        self.env.extend(env);
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.register(function);
        self
    }

    /// Visitors run in registration order, each over the whole tree
    pub fn with_visitor(mut self, visitor: impl Visitor + 'static) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    pub fn constant_folding(mut self, enabled: bool) -> Self {
        self.constant_folding = enabled;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("env", &self.env)
            .field("functions", &self.functions.len())
            .field("visitors", &self.visitors.len())
            .field("constant_folding", &self.constant_folding)
            .finish()
    }
}
