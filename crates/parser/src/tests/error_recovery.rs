// Error Reporting Tests
//
// Tests for parser failures and their descriptions.

use crate::error::{describe, render_errors};
use crate::parse;

fn parse_fails(input: &str) -> String {
    let errors = parse(input).expect_err("expected a parse error");
    assert!(!errors.is_empty());
    describe(&errors[0])
}

#[test]
fn test_missing_rhs() {
    let msg = parse_fails("1 +");
    assert!(msg.starts_with("unexpected"), "{}", msg);
}

#[test]
fn test_unclosed_paren() {
    parse_fails("(1 + 2");
}

#[test]
fn test_two_expressions() {
    let msg = parse_fails("1 2");
    assert!(msg.contains('2'), "{}", msg);
}

#[test]
fn test_invalid_character() {
    let msg = parse_fails("a # b");
    assert_eq!(msg, "invalid character");
}

#[test]
fn test_invalid_character_span() {
    let errors = parse("a # b").unwrap_err();
    assert_eq!(errors[0].span(), 2..3);
}

#[test]
fn test_dangling_ternary() {
    parse_fails("a ? 1");
}

#[test]
fn test_member_needs_name() {
    parse_fails("v.");
}

#[test]
fn test_render_mentions_code() {
    let source = "1 +* 2";
    let errors = parse(source).unwrap_err();
    let rendered = render_errors("input", source, &errors);
    assert!(rendered.contains("E001"), "{}", rendered);
}
