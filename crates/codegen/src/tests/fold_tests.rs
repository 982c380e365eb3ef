// Constant Folding Tests

use crate::{Compiler, Config, Env, Opcode, Value};

fn compile(source: &str, folding: bool) -> crate::Program {
    Compiler::new(Config::new().constant_folding(folding))
        .compile(source)
        .unwrap()
}

#[test]
fn test_literal_arithmetic_folds_to_one_push() {
    let program = compile("1 + 2 * 3", true);
    assert_eq!(program.code, vec![Opcode::Push(0)]);
    assert_eq!(program.constants, vec![Value::Int(7)]);
}

#[test]
fn test_folding_disabled() {
    let program = compile("1 + 2", false);
    assert_eq!(program.code.len(), 3);
    assert_eq!(program.code[2], Opcode::Binary(parser::ast::BinaryOp::Add));
}

#[test]
fn test_identifiers_block_folding() {
    let env = Env::new().with("x", 1);
    let program = Compiler::new(Config::new().with_env(&env))
        .compile("x + (2 * 3)")
        .unwrap();
    // only the literal subtree folds
    assert_eq!(program.constants, vec![Value::Int(6)]);
    assert_eq!(program.code.len(), 3);
}

#[test]
fn test_calls_are_not_folded() {
    let program = compile("abs(-2)", true);
    assert!(matches!(program.code.last(), Some(Opcode::Call { argc: 1, .. })));
}

#[test]
fn test_failing_operation_left_for_runtime() {
    let program = compile("1 % 0", true);
    assert_eq!(program.code.len(), 3);
    assert_eq!(
        crate::run(&program, &Env::new()),
        Err(crate::RuntimeError::DivisionByZero)
    );
}

#[test]
fn test_ternary_with_literal_condition_folds() {
    let program = compile("true ? 1 : 2", true);
    assert_eq!(program.constants, vec![Value::Int(1)]);
}
