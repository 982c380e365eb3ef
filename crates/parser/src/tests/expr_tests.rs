// Expression Parser Tests
//
// Tests AST construction for every expression form.

use crate::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use crate::parse;

fn parse_expr(input: &str) -> ExprKind {
    parse(input).expect("parse failed").kind
}

fn lit(expr: &Expr) -> &Literal {
    match &expr.kind {
        ExprKind::Literal(l) => l,
        other => panic!("Expected literal, got {:?}", other),
    }
}

// ==================== LITERALS ====================

#[test]
fn test_int_literal() {
    assert_eq!(parse_expr("42"), ExprKind::Literal(Literal::Int(42)));
}

#[test]
fn test_float_literal() {
    assert_eq!(parse_expr("0.1"), ExprKind::Literal(Literal::Float(0.1)));
}

#[test]
fn test_float_exponent_literal() {
    assert_eq!(parse_expr("1e3"), ExprKind::Literal(Literal::Float(1000.0)));
}

#[test]
fn test_string_literal() {
    assert_eq!(
        parse_expr(r#""Hello ""#),
        ExprKind::Literal(Literal::String("Hello ".to_string()))
    );
}

#[test]
fn test_bool_and_nil_literals() {
    assert_eq!(parse_expr("true"), ExprKind::Literal(Literal::Bool(true)));
    assert_eq!(parse_expr("false"), ExprKind::Literal(Literal::Bool(false)));
    assert_eq!(parse_expr("nil"), ExprKind::Literal(Literal::Nil));
}

// ==================== IDENTIFIERS & CALLS ====================

#[test]
fn test_identifier() {
    assert_eq!(parse_expr("GMV"), ExprKind::Identifier("GMV".to_string()));
}

#[test]
fn test_call_two_args() {
    match parse_expr("_Add(1, 2)") {
        ExprKind::Call { func, args } => {
            assert_eq!(func, "_Add");
            assert_eq!(args.len(), 2);
            assert_eq!(lit(&args[0]), &Literal::Int(1));
            assert_eq!(lit(&args[1]), &Literal::Int(2));
        }
        other => panic!("Expected call, got {:?}", other),
    }
}

#[test]
fn test_call_no_args() {
    assert_eq!(
        parse_expr("now()"),
        ExprKind::Call {
            func: "now".to_string(),
            args: vec![]
        }
    );
}

#[test]
fn test_call_trailing_comma() {
    match parse_expr("max(1, 2,)") {
        ExprKind::Call { args, .. } => assert_eq!(args.len(), 2),
        other => panic!("Expected call, got {:?}", other),
    }
}

// ==================== ACCESS ====================

#[test]
fn test_member_access() {
    match parse_expr("v.name") {
        ExprKind::Member {
            target,
            field,
            optional,
        } => {
            assert_eq!(target.kind, ExprKind::Identifier("v".to_string()));
            assert_eq!(field, "name");
            assert!(!optional);
        }
        other => panic!("Expected member, got {:?}", other),
    }
}

#[test]
fn test_optional_member_access() {
    match parse_expr("v?.name") {
        ExprKind::Member { optional, .. } => assert!(optional),
        other => panic!("Expected member, got {:?}", other),
    }
}

#[test]
fn test_index_then_member() {
    // v[1].name is Member(Index(v, 1), name)
    match parse_expr("v[1].name") {
        ExprKind::Member { target, field, .. } => {
            assert_eq!(field, "name");
            match target.kind {
                ExprKind::Index { target, index } => {
                    assert_eq!(target.kind, ExprKind::Identifier("v".to_string()));
                    assert_eq!(lit(&index), &Literal::Int(1));
                }
                other => panic!("Expected index, got {:?}", other),
            }
        }
        other => panic!("Expected member, got {:?}", other),
    }
}

// ==================== COLLECTIONS ====================

#[test]
fn test_array_literal() {
    match parse_expr("[1, 2.5, \"x\"]") {
        ExprKind::Array(items) => assert_eq!(items.len(), 3),
        other => panic!("Expected array, got {:?}", other),
    }
}

#[test]
fn test_empty_array() {
    assert_eq!(parse_expr("[]"), ExprKind::Array(vec![]));
}

#[test]
fn test_map_literal() {
    match parse_expr(r#"{name: "one", "two": 2, 3: true}"#) {
        ExprKind::Map(entries) => {
            let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(keys, vec!["name", "two", "3"]);
        }
        other => panic!("Expected map, got {:?}", other),
    }
}

// ==================== OPERATORS ====================

#[test]
fn test_binary_mul() {
    match parse_expr("GMV*Platform") {
        ExprKind::Binary { op, lhs, rhs } => {
            assert_eq!(op, BinaryOp::Mul);
            assert_eq!(lhs.kind, ExprKind::Identifier("GMV".to_string()));
            assert_eq!(rhs.kind, ExprKind::Identifier("Platform".to_string()));
        }
        other => panic!("Expected binary, got {:?}", other),
    }
}

#[test]
fn test_every_comparison_operator() {
    for (src, expected) in [
        ("a == b", BinaryOp::Eq),
        ("a != b", BinaryOp::NotEq),
        ("a < b", BinaryOp::Lt),
        ("a > b", BinaryOp::Gt),
        ("a <= b", BinaryOp::LtEq),
        ("a >= b", BinaryOp::GtEq),
        ("a in b", BinaryOp::In),
        ("a contains b", BinaryOp::Contains),
        ("a startsWith b", BinaryOp::StartsWith),
        ("a endsWith b", BinaryOp::EndsWith),
    ] {
        match parse_expr(src) {
            ExprKind::Binary { op, .. } => assert_eq!(op, expected, "{}", src),
            other => panic!("Expected binary for {}, got {:?}", src, other),
        }
    }
}

#[test]
fn test_word_logical_operators() {
    match parse_expr("a and b or c") {
        ExprKind::Binary { op, .. } => assert_eq!(op, BinaryOp::LogicalOr),
        other => panic!("Expected binary, got {:?}", other),
    }
}

#[test]
fn test_unary_not() {
    match parse_expr("not ok") {
        ExprKind::Unary { op, .. } => assert_eq!(op, UnaryOp::Not),
        other => panic!("Expected unary, got {:?}", other),
    }
}

#[test]
fn test_ternary() {
    match parse_expr("a > b ? 1 : 2") {
        ExprKind::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            assert!(matches!(condition.kind, ExprKind::Binary { op: BinaryOp::Gt, .. }));
            assert_eq!(lit(&then_expr), &Literal::Int(1));
            assert_eq!(lit(&else_expr), &Literal::Int(2));
        }
        other => panic!("Expected ternary, got {:?}", other),
    }
}

#[test]
fn test_nil_coalesce() {
    match parse_expr("a ?? 0") {
        ExprKind::Binary { op, .. } => assert_eq!(op, BinaryOp::NilCoalesce),
        other => panic!("Expected binary, got {:?}", other),
    }
}

// ==================== SPANS ====================

#[test]
fn test_binary_span_covers_operands() {
    let expr = parse("a + bc").unwrap();
    assert_eq!(expr.span, 0..6);
}

#[test]
fn test_call_span() {
    let expr = parse("  f(x)").unwrap();
    assert_eq!(expr.span, 2..6);
}
