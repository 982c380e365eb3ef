// Expression compilation
//
// Lowers a checked Node tree into stack-machine bytecode. Operands are
// emitted before their operator; `&&`, `||`, `??` and the ternary operator
// compile to jumps so the unused branch is never evaluated.

use crate::function::{Function, FunctionTable};
use crate::program::{Opcode, Program};
use crate::types::Type;
use crate::value::Value;
use crate::{CodegenError, CodegenResult};
use crate::node::{Node, NodeKind};
use parser::ast::BinaryOp;
use std::collections::HashMap;

/// Bytecode under construction
pub struct Emitter<'a> {
    functions: &'a FunctionTable,
    code: Vec<Opcode>,
    constants: Vec<Value>,
    names: Vec<String>,
    called: Vec<Function>,
    name_index: HashMap<String, usize>,
    call_index: HashMap<String, usize>,
}

/// Trait for expression compilation helper methods
pub trait ExpressionCompiler {
    /// Emit code that leaves the value of `node` on the stack
    fn compile_expr(&mut self, node: &Node) -> CodegenResult<()>;

    /// Compile `&&` / `||` with short-circuit jumps
    fn compile_logical_expr(&mut self, op: BinaryOp, left: &Node, right: &Node) -> CodegenResult<()>;

    /// Compile `left ?? right`
    fn compile_coalesce_expr(&mut self, left: &Node, right: &Node) -> CodegenResult<()>;

    /// Compile ternary expression (condition ? then : else)
    fn compile_ternary_expr(
        &mut self,
        condition: &Node,
        then_node: &Node,
        else_node: &Node,
    ) -> CodegenResult<()>;

    /// Compile a call to a registered function
    fn compile_call_expr(&mut self, callee: &str, args: &[Node]) -> CodegenResult<()>;
}

impl<'a> Emitter<'a> {
    pub fn new(functions: &'a FunctionTable) -> Self {
        Self {
            functions,
            code: Vec::new(),
            constants: Vec::new(),
            names: Vec::new(),
            called: Vec::new(),
            name_index: HashMap::new(),
            call_index: HashMap::new(),
        }
    }

    pub fn finish(self, output: Type, source: &str) -> Program {
        Program {
            code: self.code,
            constants: self.constants,
            names: self.names,
            functions: self.called,
            output,
            source: source.to_string(),
        }
    }

    fn emit(&mut self, op: Opcode) -> usize {
        self.code.push(op);
        self.code.len() - 1
    }

    /// Point the jump at `at` to the next instruction
    fn patch_jump(&mut self, at: usize) {
        let target = self.code.len();
        match &mut self.code[at] {
            Opcode::JumpIfFalse(t)
            | Opcode::JumpIfTrue(t)
            | Opcode::JumpIfNotNil(t)
            | Opcode::JumpUnless(t)
            | Opcode::Jump(t) => *t = target,
            _ => {}
        }
    }

    fn constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    fn name(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.name_index.get(name) {
            return idx;
        }
        self.names.push(name.to_string());
        let idx = self.names.len() - 1;
        self.name_index.insert(name.to_string(), idx);
        idx
    }
}

impl<'a> ExpressionCompiler for Emitter<'a> {
    fn compile_expr(&mut self, node: &Node) -> CodegenResult<()> {
        match &node.kind {
            NodeKind::Literal(value) => {
                let idx = self.constant(value.clone());
                self.emit(Opcode::Push(idx));
            }

            NodeKind::Identifier(name) => {
                let idx = self.name(name);
                self.emit(Opcode::Load(idx));
            }

            NodeKind::Unary { op, operand } => {
                self.compile_expr(operand)?;
                self.emit(Opcode::Unary(*op));
            }

            NodeKind::Binary { op, left, right } => match op {
                BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
                    self.compile_logical_expr(*op, left, right)?
                }
                BinaryOp::NilCoalesce => self.compile_coalesce_expr(left, right)?,
                _ => {
                    self.compile_expr(left)?;
                    self.compile_expr(right)?;
                    self.emit(Opcode::Binary(*op));
                }
            },

            NodeKind::Call { callee, args } => self.compile_call_expr(callee, args)?,

            NodeKind::Member {
                target,
                field,
                optional,
            } => {
                self.compile_expr(target)?;
                let field = self.name(field);
                self.emit(Opcode::Member {
                    field,
                    optional: *optional,
                });
            }

            NodeKind::Index { target, index } => {
                self.compile_expr(target)?;
                self.compile_expr(index)?;
                self.emit(Opcode::Index);
            }

            NodeKind::Array(items) => {
                for item in items {
                    self.compile_expr(item)?;
                }
                self.emit(Opcode::MakeArray(items.len()));
            }

            NodeKind::Map(entries) => {
                for (_, value) in entries {
                    self.compile_expr(value)?;
                }
                let keys = entries.iter().map(|(key, _)| key.clone()).collect();
                self.emit(Opcode::MakeMap(keys));
            }

            NodeKind::Ternary {
                condition,
                then_node,
                else_node,
            } => self.compile_ternary_expr(condition, then_node, else_node)?,
        }
        Ok(())
    }

    fn compile_logical_expr(&mut self, op: BinaryOp, left: &Node, right: &Node) -> CodegenResult<()> {
        self.compile_expr(left)?;
        self.emit(Opcode::AssertBool);
        let jump = match op {
            BinaryOp::LogicalAnd => self.emit(Opcode::JumpIfFalse(0)),
            _ => self.emit(Opcode::JumpIfTrue(0)),
        };
        self.emit(Opcode::Pop);
        self.compile_expr(right)?;
        self.emit(Opcode::AssertBool);
        self.patch_jump(jump);
        Ok(())
    }

    fn compile_coalesce_expr(&mut self, left: &Node, right: &Node) -> CodegenResult<()> {
        self.compile_expr(left)?;
        let jump = self.emit(Opcode::JumpIfNotNil(0));
        self.emit(Opcode::Pop);
        self.compile_expr(right)?;
        self.patch_jump(jump);
        Ok(())
    }

    fn compile_ternary_expr(
        &mut self,
        condition: &Node,
        then_node: &Node,
        else_node: &Node,
    ) -> CodegenResult<()> {
        self.compile_expr(condition)?;
        let to_else = self.emit(Opcode::JumpUnless(0));
        self.compile_expr(then_node)?;
        let to_end = self.emit(Opcode::Jump(0));
        self.patch_jump(to_else);
        self.compile_expr(else_node)?;
        self.patch_jump(to_end);
        Ok(())
    }

    fn compile_call_expr(&mut self, callee: &str, args: &[Node]) -> CodegenResult<()> {
        let func = match self.call_index.get(callee) {
            Some(&idx) => idx,
            None => {
                let function = self.functions.get(callee).ok_or_else(|| {
                    CodegenError::UndefinedSymbol {
                        name: callee.to_string(),
                        context: "function call".to_string(),
                        span: None,
                    }
                })?;
                self.called.push(function.clone());
                let idx = self.called.len() - 1;
                self.call_index.insert(callee.to_string(), idx);
                idx
            }
        };

        for arg in args {
            self.compile_expr(arg)?;
        }
        self.emit(Opcode::Call {
            func,
            argc: args.len(),
        });
        Ok(())
    }
}
