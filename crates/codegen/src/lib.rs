// Expression compiler
//
// Turns source text into a Program in five stages:
//
//   1. parse and lower the AST into a typed Node tree
//   2. type check (leniently when visitors are registered)
//   3. run the registered visitors, each a post-order walk over the tree
//   4. type check again; this result is final
//   5. fold constants and emit bytecode
//
// Programs run on the stack machine in `vm`.

mod builtins;
mod checker;
mod config;
mod env;
mod error;
mod error_report;
mod expr;
mod fold;
mod function;
mod node;
mod operators;
mod program;
mod types;
mod value;
mod visitor;
mod vm;

pub use checker::check;
pub use config::Config;
pub use env::Env;
pub use error::{CodegenError, CodegenResult, RuntimeError, RuntimeResult, Span};
pub use error_report::{render_codegen_error, report_codegen_error};
pub use fold::ConstantFolder;
pub use function::{Function, FunctionTable, NativeFn, Signature};
pub use node::{Node, NodeKind};
pub use program::{Opcode, Program};
pub use types::{FloatWidth, IntWidth, Type};
pub use value::{format_decimal, parse_decimal, Complex, Value};
pub use visitor::{walk, Visitor};
pub use vm::run;

// Re-export bigdecimal so callers can build decimal values without a direct dependency
pub use bigdecimal;

use expr::{Emitter, ExpressionCompiler};
use parser::error::describe;
use tracing::debug;

#[cfg(test)]
mod tests;

pub struct Compiler {
    pub config: Config,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse `source` and lower it into an unchecked tree.
    pub fn parse(&self, source: &str) -> CodegenResult<Node> {
        let expr = parser::parse(source).map_err(|errors| CodegenError::Syntax {
            message: errors
                .first()
                .map(describe)
                .unwrap_or_else(|| "invalid expression".to_string()),
            errors,
        })?;
        Ok(Node::from(expr))
    }

    /// Type check `node` and run the configured visitors over it. Returns
    /// the static type of the result.
    pub fn analyze(&mut self, node: &mut Node) -> CodegenResult<Type> {
        let Config {
            env,
            functions,
            visitors,
            ..
        } = &mut self.config;

        if !visitors.is_empty() {
            // A rewrite may repair what the first pass rejects
            if let Err(error) = check(node, env, functions) {
                debug!(%error, "first check failed, running visitors anyway");
            }
            for visitor in visitors.iter_mut() {
                walk(node, visitor.as_mut());
            }
        }

        check(node, env, functions)
    }

    pub fn compile(&mut self, source: &str) -> CodegenResult<Program> {
        let mut node = self.parse(source)?;
        let output = self.analyze(&mut node)?;

        if self.config.constant_folding {
            let mut folder = ConstantFolder::default();
            walk(&mut node, &mut folder);
            debug!(folded = folder.folded, "constant folding done");
        }

        let mut emitter = Emitter::new(&self.config.functions);
        emitter.compile_expr(&node)?;
        let program = emitter.finish(output, source);

        debug!(
            instructions = program.code.len(),
            constants = program.constants.len(),
            output = %program.output,
            "compiled expression"
        );
        Ok(program)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
