// Compiled programs
//
// A Program is a flat list of stack-machine instructions plus the constant
// pool, name pool and function table they reference. It owns everything it
// needs to run and can be shared across threads.

use crate::function::Function;
use crate::types::Type;
use crate::value::Value;
use parser::ast::{BinaryOp, UnaryOp};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    /// Push constant `n`
    Push(usize),
    /// Push the environment value named by name `n`
    Load(usize),
    Unary(UnaryOp),
    Binary(BinaryOp),
    /// Pop `argc` arguments and call function `func`
    Call { func: usize, argc: usize },
    /// Replace the top map with its field named by name `field`
    Member { field: usize, optional: bool },
    /// Pop index and target, push the element
    Index,
    /// Pop `n` values into an array
    MakeArray(usize),
    /// Pop one value per key into a map
    MakeMap(Vec<String>),
    /// Jump if the top of stack is false, leaving it in place
    JumpIfFalse(usize),
    /// Jump if the top of stack is true, leaving it in place
    JumpIfTrue(usize),
    /// Jump if the top of stack is not nil, leaving it in place
    JumpIfNotNil(usize),
    /// Pop a bool and jump if it is false
    JumpUnless(usize),
    Jump(usize),
    /// Check the top of stack is a bool
    AssertBool,
    Pop,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub code: Vec<Opcode>,
    pub constants: Vec<Value>,
    pub names: Vec<String>,
    pub functions: Vec<Function>,
    /// Static type of the whole expression
    pub output: Type,
    pub source: String,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, op) in self.code.iter().enumerate() {
            write!(f, "{:04} ", pc)?;
            match op {
                Opcode::Push(n) => write!(f, "PUSH {} ({})", n, self.constants[*n])?,
                Opcode::Load(n) => write!(f, "LOAD {}", self.names[*n])?,
                Opcode::Unary(op) => write!(f, "UNARY {}", op.symbol())?,
                Opcode::Binary(op) => write!(f, "BINARY {}", op.symbol())?,
                Opcode::Call { func, argc } => {
                    write!(f, "CALL {}/{}", self.functions[*func].name, argc)?
                }
                Opcode::Member { field, optional } => write!(
                    f,
                    "{} {}",
                    if *optional { "MEMBER?" } else { "MEMBER" },
                    self.names[*field]
                )?,
                Opcode::Index => write!(f, "INDEX")?,
                Opcode::MakeArray(n) => write!(f, "ARRAY {}", n)?,
                Opcode::MakeMap(keys) => write!(f, "MAP {}", keys.join(","))?,
                Opcode::JumpIfFalse(t) => write!(f, "JUMP_IF_FALSE {:04}", t)?,
                Opcode::JumpIfTrue(t) => write!(f, "JUMP_IF_TRUE {:04}", t)?,
                Opcode::JumpIfNotNil(t) => write!(f, "JUMP_IF_NOT_NIL {:04}", t)?,
                Opcode::JumpUnless(t) => write!(f, "JUMP_UNLESS {:04}", t)?,
                Opcode::Jump(t) => write!(f, "JUMP {:04}", t)?,
                Opcode::AssertBool => write!(f, "ASSERT_BOOL")?,
                Opcode::Pop => write!(f, "POP")?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
