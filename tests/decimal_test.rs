// End-to-end tests for decimal mode
//
// Every expression is compiled from source, rewritten, checked and run.

use decexpr::{
    compile, compile_decimal, eval, eval_decimal, parse_decimal, CodegenError, CompileOption,
    Env, Error, Function, RuntimeError, Type, Value,
};
use std::collections::BTreeMap;

fn dec(s: &str) -> Value {
    Value::Decimal(parse_decimal(s).unwrap())
}

fn dec_raw(s: &str) -> decexpr::BigDecimal {
    parse_decimal(s).unwrap()
}

/// Run in decimal mode and expect success
fn decimal(source: &str, env: &Env) -> Value {
    match eval_decimal(source, env) {
        Ok(value) => value,
        Err(e) => panic!("\n❌ {:?} failed in decimal mode: {}", source, e),
    }
}

fn runtime_error(source: &str, env: &Env) -> RuntimeError {
    match eval_decimal(source, env) {
        Err(Error::Run(e)) => e,
        other => panic!("\n❌ {:?}: expected a runtime error, got {:?}", source, other),
    }
}

fn precise_env() -> Env {
    Env::new()
        .with("a", parse_decimal("8.32500499700179891").unwrap())
        .with("b", parse_decimal("8.3250049970017989").unwrap())
        .with("c", parse_decimal("1.000000000000000000321").unwrap())
}

// ==========================================
// ARITHMETIC
// ==========================================

#[test]
fn test_float_times_int_is_exact() {
    let env = Env::new().with("GMV", 0.1).with("Platform", 3);
    let value = decimal("GMV * Platform", &env);
    assert_eq!(value, dec("0.3"));
    assert_eq!(value.to_string(), "0.3");
}

#[test]
fn test_native_mode_keeps_binary_floats() {
    let env = Env::new().with("GMV", 0.1).with("Platform", 3);
    let value = eval("GMV * Platform", &env).unwrap();
    assert_eq!(value, Value::Float(0.30000000000000004));
}

#[test]
fn test_int_literals_become_decimal() {
    assert_eq!(decimal("1 + 1", &Env::new()), dec("2"));
}

#[test]
fn test_high_precision_addition() {
    let value = decimal("a + c", &precise_env());
    assert_eq!(value.to_string(), "9.325004997001798910321");
}

#[test]
fn test_each_arithmetic_operator() {
    let env = Env::new().with("x", dec_raw("7.5")).with("y", 2);
    assert_eq!(decimal("x + y", &env), dec("9.5"));
    assert_eq!(decimal("x - y", &env), dec("5.5"));
    assert_eq!(decimal("x * y", &env), dec("15"));
    assert_eq!(decimal("x / y", &env), dec("3.75"));
    assert_eq!(decimal("x % y", &env), dec("1.5"));
}

#[test]
fn test_float_modulo_int_is_rewritten() {
    // native `%` rejects a float operand; the rewrite makes it valid
    let env = Env::new().with("GMV", 0.1).with("Platform", 3);
    assert!(matches!(
        compile("GMV % Platform", &env),
        Err(Error::Compile(CodegenError::InvalidOperation { .. }))
    ));
    assert_eq!(decimal("GMV % Platform", &env), dec("0.1"));
}

#[test]
fn test_small_results_print_positionally() {
    let env = Env::new().with("tiny", dec_raw("0.00000001"));
    assert_eq!(decimal("tiny * 1", &env).to_string(), "0.00000001");
}

#[test]
fn test_mixed_operands_match_all_decimal() {
    let mixed = Env::new().with("p", 0.7).with("q", dec_raw("0.1"));
    let exact = Env::new().with("p", dec_raw("0.7")).with("q", dec_raw("0.1"));
    for source in ["p + q", "p - q", "p * q", "p / q"] {
        assert_eq!(decimal(source, &mixed), decimal(source, &exact), "{}", source);
    }
}

#[test]
fn test_integer_division_is_decimal() {
    assert!(decimal("1 / 3 * 3", &Env::new()).to_string().starts_with("0.99"));
    assert_eq!(decimal("10 / 4", &Env::new()), dec("2.5"));
}

// ==========================================
// COMPARISONS
// ==========================================

#[test]
fn test_precise_comparisons() {
    let env = precise_env();
    assert_eq!(decimal("a < b", &env), Value::Bool(false));
    assert_eq!(decimal("a > b", &env), Value::Bool(true));
    assert_eq!(decimal("a >= b", &env), Value::Bool(true));
    assert_eq!(decimal("a <= b", &env), Value::Bool(false));
    assert_eq!(decimal("a == b", &env), Value::Bool(false));
}

#[test]
fn test_comparison_table() {
    let cases = [
        ("1 > 1", false),
        ("2 > 1", true),
        ("1 < 1 + 3", true),
        ("1 + 1 > 1", true),
        ("2 >= 1", true),
        ("2 >= 2", true),
        ("1 <= 2", true),
        ("2 <= 2", true),
        ("3 <= 2", false),
        ("0.1 + 0.2 == 0.3", true),
    ];
    for (source, expected) in cases {
        assert_eq!(decimal(source, &Env::new()), Value::Bool(expected), "{}", source);
    }
}

#[test]
fn test_exactly_one_ordering_holds() {
    let env = precise_env();
    for (l, r) in [("a", "b"), ("b", "a"), ("a", "a"), ("c", "b")] {
        let holds = ["<", "==", ">"]
            .iter()
            .filter(|op| decimal(&format!("{} {} {}", l, op, r), &env) == Value::Bool(true))
            .count();
        assert_eq!(holds, 1, "{} vs {}", l, r);
        assert_eq!(
            decimal(&format!("{} >= {}", l, r), &env),
            decimal(&format!("!({} < {})", l, r), &env)
        );
        assert_eq!(
            decimal(&format!("{} <= {}", l, r), &env),
            decimal(&format!("!({} > {})", l, r), &env)
        );
    }
}

#[test]
fn test_native_float_comparison_differs() {
    // as f64 the two numerals are the same number
    let env = Env::new().with("a", 8.32500499700179891).with("b", 8.3250049970017989);
    assert_eq!(eval("a > b", &env).unwrap(), Value::Bool(false));
}

#[test]
fn test_rewritten_comparisons_feed_logic() {
    assert_eq!(decimal("1 < 2 && 3 > 2", &Env::new()), Value::Bool(true));
    assert_eq!(decimal("1 > 2 ? \"big\" : \"small\"", &Env::new()), Value::from("small"));
    assert_eq!(decimal("!(0.1 + 0.2 > 0.3)", &Env::new()), Value::Bool(true));
}

#[test]
fn test_unsupported_operators_stay_native() {
    assert_eq!(decimal("1 != 2", &Env::new()), Value::Bool(true));
    assert_eq!(decimal("2 ** 3", &Env::new()), Value::Float(8.0));
}

// ==========================================
// NON-NUMERIC EXPRESSIONS
// ==========================================

#[test]
fn test_strings_stay_native() {
    let env = Env::new().with("name", "World");
    assert_eq!(decimal("\"Hello \" + name", &env), Value::from("Hello World"));
    assert_eq!(decimal("name == \"World\"", &env), Value::Bool(true));
    assert_eq!(decimal("\"a\" + \"b\"", &Env::new()), Value::from("ab"));
}

#[test]
fn test_member_and_index_access() {
    let v: BTreeMap<String, Value> = [("name".to_string(), Value::from("v"))].into();
    let items = Value::Array(vec![
        [("name", "zero")].into_iter().collect(),
        [("name", "one")].into_iter().collect(),
    ]);
    let env = Env::new().with("v", v).with("items", items);
    assert_eq!(decimal("v.name", &env), Value::from("v"));
    assert_eq!(decimal("items[1].name", &env), Value::from("one"));
}

#[test]
fn test_map_field_arithmetic() {
    let order: BTreeMap<String, Value> =
        [("price".to_string(), Value::Float(0.1)), ("qty".to_string(), Value::Int(3))].into();
    let env = Env::new().with("order", order);
    // fields of a mixed map are typed any, so this stays native
    assert_eq!(
        decimal("order.price * order.qty", &env),
        Value::Float(0.30000000000000004)
    );
    let env = Env::new()
        .with("order", Value::Map(BTreeMap::new()))
        .typed("order", Type::Map(Box::new(Type::Float(decexpr::FloatWidth::W64))));
    let program = compile_decimal("order.price * 2", &env, Vec::new()).unwrap();
    assert_eq!(program.output, Type::Decimal);
}

// ==========================================
// ERRORS
// ==========================================

#[test]
fn test_direct_call_with_three_arguments() {
    assert_eq!(
        runtime_error("_Add(1, 2, 3)", &Env::new()),
        RuntimeError::ArgumentCount {
            function: "_Add".to_string(),
            expected: 2,
            found: 3,
        }
    );
}

#[test]
fn test_direct_call_with_two_arguments() {
    assert_eq!(decimal("_Mul(0.1, 3)", &Env::new()), dec("0.3"));
}

#[test]
fn test_rewritten_comparison_in_arithmetic_fails_to_parse() {
    // the comparison yields a bool, whose string form is not a numeral
    let env = precise_env();
    assert!(matches!(
        runtime_error("(a > b) + 1", &env),
        RuntimeError::Parse { ref input } if input == "true"
    ));
}

#[test]
fn test_padded_string_operand_fails_to_parse() {
    assert_eq!(
        runtime_error("_Add(\" 1\", 2)", &Env::new()),
        RuntimeError::Parse {
            input: " 1".to_string()
        }
    );
}

#[test]
fn test_division_by_zero() {
    assert_eq!(runtime_error("1 / 0", &Env::new()), RuntimeError::DivisionByZero);
    assert_eq!(runtime_error("5 % 0", &Env::new()), RuntimeError::DivisionByZero);
}

#[test]
fn test_type_errors_still_reported() {
    let result = compile_decimal("\"a\" - 1", &Env::new(), Vec::new());
    assert!(matches!(
        result,
        Err(Error::Compile(CodegenError::InvalidOperation { .. }))
    ));
    let result = compile_decimal("missing + 1", &Env::new(), Vec::new());
    assert!(matches!(
        result,
        Err(Error::Compile(CodegenError::UndefinedSymbol { .. }))
    ));
}

#[test]
fn test_operator_functions_absent_in_native_mode() {
    assert!(matches!(
        compile("_Add(1, 2)", &Env::new()),
        Err(Error::Compile(CodegenError::UndefinedSymbol { .. }))
    ));
}

// ==========================================
// OPTIONS & PROGRAMS
// ==========================================

#[test]
fn test_caller_function_overrides_operator() {
    let options = vec![CompileOption::Function(Function::new("_Add", |_: &[Value]| {
        Ok(Value::from("custom"))
    }))];
    let program = compile_decimal("1 + 2", &Env::new(), options).unwrap();
    assert_eq!(decexpr::run(&program, &Env::new()).unwrap(), Value::from("custom"));
}

#[test]
fn test_extra_env_option() {
    let options = vec![CompileOption::Env(Env::new().with("rate", 0.2))];
    let program = compile_decimal("rate * 10", &Env::new(), options).unwrap();
    let env = Env::new().with("rate", 0.2);
    assert_eq!(decexpr::run(&program, &env).unwrap(), dec("2"));
}

#[test]
fn test_program_runs_with_new_values() {
    let env = Env::new().with("x", 0.1);
    let program = compile_decimal("x + 0.2", &env, Vec::new()).unwrap();
    for (x, expected) in [(0.1, "0.3"), (0.7, "0.9"), (1.25, "1.45")] {
        let value = decexpr::run(&program, &Env::new().with("x", x)).unwrap();
        assert_eq!(value.to_string(), expected);
    }
}

#[test]
fn test_program_shared_across_threads() {
    let env = Env::new().with("x", 1);
    let program = std::sync::Arc::new(compile_decimal("x / 8", &env, Vec::new()).unwrap());
    let handles: Vec<_> = (1..=4i64)
        .map(|i| {
            let program = std::sync::Arc::clone(&program);
            std::thread::spawn(move || decexpr::run(&program, &Env::new().with("x", i)).unwrap())
        })
        .collect();
    let results: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().to_string())
        .collect();
    assert_eq!(results, vec!["0.125", "0.25", "0.375", "0.5"]);
}

#[test]
fn test_folding_option_has_no_effect_on_rewritten_calls() {
    let options = vec![CompileOption::ConstantFolding(false)];
    let folded = compile_decimal("1 + 2", &Env::new(), Vec::new()).unwrap();
    let unfolded = compile_decimal("1 + 2", &Env::new(), options).unwrap();
    assert_eq!(folded.code, unfolded.code);
}
