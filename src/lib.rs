// decexpr: typed expression evaluation with an optional exact decimal mode
//
// `compile`/`eval` use the language's native numeric semantics.
// `compile_decimal`/`eval_decimal` additionally install the decimal
// operator functions and the rewrite that routes numeric binary operators
// through them (see `decimal`).

pub mod decimal;

pub use codegen::bigdecimal::BigDecimal;
pub use codegen::{
    format_decimal, parse_decimal, CodegenError, Complex, Config, Env, FloatWidth, Function,
    IntWidth, Node, NodeKind, Program, RuntimeError, Signature, Type, Value, Visitor,
};

use codegen::Compiler;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CodegenError),

    #[error(transparent)]
    Run(#[from] RuntimeError),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Compile(e) => e.exit_code(),
            Error::Run(e) => e.exit_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Extra configuration for a compilation, applied in order
pub enum CompileOption {
    /// Additional variables (types only matter at compile time)
    Env(Env),
    /// Register a function, replacing any with the same name
    Function(Function),
    Visitor(Box<dyn Visitor>),
    ConstantFolding(bool),
}

impl CompileOption {
    fn apply(self, mut config: Config) -> Config {
        match self {
            CompileOption::Env(env) => config.with_env(&env),
            CompileOption::Function(function) => config.with_function(function),
            CompileOption::Visitor(visitor) => {
                config.visitors.push(visitor);
                config
            }
            CompileOption::ConstantFolding(enabled) => config.constant_folding(enabled),
        }
    }
}

/// Compile with native semantics.
pub fn compile(source: &str, env: &Env) -> Result<Program> {
    compile_with(source, env, Vec::new())
}

/// Compile with native semantics plus caller options.
pub fn compile_with(source: &str, env: &Env, options: Vec<CompileOption>) -> Result<Program> {
    let config = options
        .into_iter()
        .fold(Config::new().with_env(env), |config, option| option.apply(config));
    Ok(Compiler::new(config).compile(source)?)
}

/// Compile in decimal mode. Caller options come after the decimal ones, so
/// a caller function named like an operator function replaces it.
pub fn compile_decimal(source: &str, env: &Env, options: Vec<CompileOption>) -> Result<Program> {
    let mut all = decimal::options();
    all.extend(options);
    compile_with(source, env, all)
}

pub fn run(program: &Program, env: &Env) -> Result<Value> {
    Ok(codegen::run(program, env)?)
}

pub fn eval(source: &str, env: &Env) -> Result<Value> {
    run(&compile(source, env)?, env)
}

pub fn eval_decimal(source: &str, env: &Env) -> Result<Value> {
    run(&compile_decimal(source, env, Vec::new())?, env)
}
