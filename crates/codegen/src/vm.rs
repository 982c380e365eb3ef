// Stack machine
//
// Executes a Program against an environment. Each run gets its own stack,
// so one Program can be run concurrently from several threads.

use crate::env::Env;
use crate::error::{RuntimeError, RuntimeResult};
use crate::operators;
use crate::program::{Opcode, Program};
use crate::value::Value;

/// Evaluate `program` with the variables bound in `env`.
pub fn run(program: &Program, env: &Env) -> RuntimeResult<Value> {
    Vm::new(program, env).execute()
}

struct Vm<'a> {
    program: &'a Program,
    env: &'a Env,
    stack: Vec<Value>,
}

impl<'a> Vm<'a> {
    fn new(program: &'a Program, env: &'a Env) -> Self {
        Self {
            program,
            env,
            stack: Vec::with_capacity(16),
        }
    }

    fn pop(&mut self) -> RuntimeResult<Value> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    fn peek(&self) -> RuntimeResult<&Value> {
        self.stack.last().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pop the top `n` values, oldest first
    fn pop_n(&mut self, n: usize) -> RuntimeResult<Vec<Value>> {
        if self.stack.len() < n {
            return Err(RuntimeError::StackUnderflow);
        }
        let at = self.stack.len() - n;
        Ok(self.stack.split_off(at))
    }

    fn execute(mut self) -> RuntimeResult<Value> {
        let program = self.program;
        let code = &program.code;
        let mut pc = 0;

        while pc < code.len() {
            let mut next = pc + 1;

            match &code[pc] {
                Opcode::Push(idx) => self.stack.push(program.constants[*idx].clone()),

                Opcode::Load(idx) => {
                    let name = &program.names[*idx];
                    let value = self
                        .env
                        .get(name)
                        .cloned()
                        .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone() })?;
                    self.stack.push(value);
                }

                Opcode::Unary(op) => {
                    let operand = self.pop()?;
                    self.stack.push(operators::unary(*op, &operand)?);
                }

                Opcode::Binary(op) => {
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    self.stack.push(operators::binary(*op, &lhs, &rhs)?);
                }

                Opcode::Call { func, argc } => {
                    let args = self.pop_n(*argc)?;
                    let result = program.functions[*func].call(&args)?;
                    self.stack.push(result);
                }

                Opcode::Member { field, optional } => {
                    let target = self.pop()?;
                    let field = &program.names[*field];
                    self.stack.push(member(target, field, *optional)?);
                }

                Opcode::Index => {
                    let index = self.pop()?;
                    let target = self.pop()?;
                    self.stack.push(index_value(target, &index)?);
                }

                Opcode::MakeArray(n) => {
                    let items = self.pop_n(*n)?;
                    self.stack.push(Value::Array(items));
                }

                Opcode::MakeMap(keys) => {
                    let values = self.pop_n(keys.len())?;
                    self.stack.push(keys.iter().cloned().zip(values).collect());
                }

                Opcode::JumpIfFalse(target) => {
                    if !operators::expect_bool("&&", self.peek()?)? {
                        next = *target;
                    }
                }

                Opcode::JumpIfTrue(target) => {
                    if operators::expect_bool("||", self.peek()?)? {
                        next = *target;
                    }
                }

                Opcode::JumpIfNotNil(target) => {
                    if !self.peek()?.is_nil() {
                        next = *target;
                    }
                }

                Opcode::JumpUnless(target) => {
                    let condition = self.pop()?;
                    if !operators::expect_bool("?:", &condition)? {
                        next = *target;
                    }
                }

                Opcode::Jump(target) => next = *target,

                Opcode::AssertBool => {
                    operators::expect_bool("logical operator", self.peek()?)?;
                }

                Opcode::Pop => {
                    self.pop()?;
                }
            }

            pc = next;
        }

        self.pop()
    }
}

fn member(target: Value, field: &str, optional: bool) -> RuntimeResult<Value> {
    match target {
        Value::Map(mut entries) => Ok(entries.remove(field).unwrap_or(Value::Nil)),
        Value::Nil if optional => Ok(Value::Nil),
        other => Err(RuntimeError::Type {
            operation: format!(".{}", field),
            found: other.kind().to_string(),
        }),
    }
}

/// Resolve a possibly negative index against `len`
fn position(index: i64, len: usize) -> RuntimeResult<usize> {
    let resolved = if index < 0 { index + len as i64 } else { index };
    if resolved < 0 || resolved as usize >= len {
        return Err(RuntimeError::IndexOutOfBounds { index, len });
    }
    Ok(resolved as usize)
}

fn index_value(target: Value, index: &Value) -> RuntimeResult<Value> {
    let invalid = |target: &Value| RuntimeError::Type {
        operation: "[]".to_string(),
        found: format!("{} with {} index", target.kind(), index.kind()),
    };

    match (target, index) {
        (Value::Array(mut items), Value::Int(i)) => {
            let at = position(*i, items.len())?;
            Ok(items.swap_remove(at))
        }
        (Value::String(s), Value::Int(i)) => {
            let chars: Vec<char> = s.chars().collect();
            let at = position(*i, chars.len())?;
            Ok(Value::String(chars[at].to_string()))
        }
        (Value::Map(mut entries), Value::String(key)) => {
            Ok(entries.remove(key).unwrap_or(Value::Nil))
        }
        (target, _) => Err(invalid(&target)),
    }
}
