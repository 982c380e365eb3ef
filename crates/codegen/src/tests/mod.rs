// Codegen Test Modules

mod fold_tests;

use crate::{Compiler, Config, Env, Program, RuntimeResult, Value};

/// Compile `source` against `env` with the default configuration
pub(crate) fn compile_with(source: &str, env: &Env) -> Program {
    let mut compiler = Compiler::new(Config::new().with_env(env));
    match compiler.compile(source) {
        Ok(program) => program,
        Err(e) => panic!("failed to compile {:?}: {}", source, e),
    }
}

pub(crate) fn eval_with(source: &str, env: &Env) -> RuntimeResult<Value> {
    crate::run(&compile_with(source, env), env)
}

pub(crate) fn eval(source: &str) -> Value {
    match eval_with(source, &Env::new()) {
        Ok(value) => value,
        Err(e) => panic!("failed to run {:?}: {}", source, e),
    }
}
