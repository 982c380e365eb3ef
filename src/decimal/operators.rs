// Decimal operator library
//
// One entry per rewritable operator. Each function takes exactly two
// arguments, coerces both to decimals and applies the operation.

use bigdecimal::{BigDecimal, Zero};
use codegen::{Function, RuntimeError, RuntimeResult, Signature, Value};
use parser::ast::BinaryOp;
use std::cmp::Ordering;

use super::REWRITTEN_TYPE;

type Apply = fn(&BigDecimal, &BigDecimal) -> RuntimeResult<Value>;

#[derive(Debug)]
pub struct DecimalOperator {
    /// Native operator this function replaces
    pub op: BinaryOp,
    /// Name the rewritten call uses
    pub name: &'static str,
    apply: Apply,
}

pub static OPERATORS: [DecimalOperator; 10] = [
    DecimalOperator::new(BinaryOp::Add, "_Add", add),
    DecimalOperator::new(BinaryOp::Sub, "_Sub", sub),
    DecimalOperator::new(BinaryOp::Mul, "_Mul", mul),
    DecimalOperator::new(BinaryOp::Div, "_Div", div),
    DecimalOperator::new(BinaryOp::Mod, "_Mod", rem),
    DecimalOperator::new(BinaryOp::Gt, "_Gt", gt),
    DecimalOperator::new(BinaryOp::Lt, "_Lt", lt),
    DecimalOperator::new(BinaryOp::Eq, "_Eq", eq),
    DecimalOperator::new(BinaryOp::GtEq, "_Gte", gte),
    DecimalOperator::new(BinaryOp::LtEq, "_Lte", lte),
];

/// Decimal function for `op`, if it has one
pub fn lookup(op: BinaryOp) -> Option<&'static DecimalOperator> {
    OPERATORS.iter().find(|operator| operator.op == op)
}

/// Check the argument count and coerce both arguments. A decimal is used
/// as is; any other value goes through its string form.
pub fn operands(function: &str, args: &[Value]) -> RuntimeResult<(BigDecimal, BigDecimal)> {
    let [x, y] = args else {
        return Err(RuntimeError::ArgumentCount {
            function: function.to_string(),
            expected: 2,
            found: args.len(),
        });
    };
    Ok((x.to_decimal()?, y.to_decimal()?))
}

impl DecimalOperator {
    const fn new(op: BinaryOp, name: &'static str, apply: Apply) -> Self {
        Self { op, name, apply }
    }

    pub fn call(&self, args: &[Value]) -> RuntimeResult<Value> {
        let (x, y) = operands(self.name, args)?;
        (self.apply)(&x, &y)
    }

    /// Registration entry. The signature is variadic so that a wrong
    /// argument count is reported by the call itself.
    pub fn function(&'static self) -> Function {
        Function::new(self.name, move |args: &[Value]| self.call(args))
            .with_signature(Signature::variadic(REWRITTEN_TYPE))
    }
}

fn add(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Decimal(x + y))
}

fn sub(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Decimal(x - y))
}

fn mul(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Decimal(x * y))
}

fn div(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    if y.is_zero() {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Decimal(x / y))
}

fn rem(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    if y.is_zero() {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Decimal(x % y))
}

fn gt(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Bool(x.cmp(y) == Ordering::Greater))
}

fn lt(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Bool(x.cmp(y) == Ordering::Less))
}

fn eq(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Bool(x.cmp(y) == Ordering::Equal))
}

fn gte(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Bool(x.cmp(y) != Ordering::Less))
}

fn lte(x: &BigDecimal, y: &BigDecimal) -> RuntimeResult<Value> {
    Ok(Value::Bool(x.cmp(y) != Ordering::Greater))
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegen::parse_decimal;

    fn dec(s: &str) -> Value {
        Value::Decimal(parse_decimal(s).unwrap())
    }

    fn call(name: &str, args: &[Value]) -> RuntimeResult<Value> {
        let operator = OPERATORS.iter().find(|o| o.name == name).unwrap();
        operator.call(args)
    }

    #[test]
    fn test_every_rewritable_operator_has_a_function() {
        for op in [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Mod,
            BinaryOp::Gt,
            BinaryOp::Lt,
            BinaryOp::Eq,
            BinaryOp::GtEq,
            BinaryOp::LtEq,
        ] {
            assert!(lookup(op).is_some(), "{} has no decimal function", op.symbol());
        }
        for op in [BinaryOp::NotEq, BinaryOp::Pow, BinaryOp::LogicalAnd, BinaryOp::In] {
            assert!(lookup(op).is_none());
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(call("_Add", &[dec("0.1"), dec("0.2")]), Ok(dec("0.3")));
        assert_eq!(call("_Sub", &[dec("1"), dec("0.9")]), Ok(dec("0.1")));
        assert_eq!(call("_Mul", &[dec("0.1"), Value::Int(3)]), Ok(dec("0.3")));
        assert_eq!(call("_Div", &[Value::Int(1), Value::Int(4)]), Ok(dec("0.25")));
        assert_eq!(call("_Mod", &[dec("7.5"), Value::Int(2)]), Ok(dec("1.5")));
    }

    #[test]
    fn test_comparisons_at_boundary() {
        let two = || Value::Int(2);
        assert_eq!(call("_Gte", &[two(), two()]), Ok(Value::Bool(true)));
        assert_eq!(call("_Lte", &[two(), two()]), Ok(Value::Bool(true)));
        assert_eq!(call("_Gt", &[two(), two()]), Ok(Value::Bool(false)));
        assert_eq!(call("_Lt", &[two(), two()]), Ok(Value::Bool(false)));
        assert_eq!(call("_Eq", &[two(), dec("2.000")]), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_float_goes_through_its_string_form() {
        assert_eq!(call("_Add", &[Value::Float(0.1), Value::Float(0.2)]), Ok(dec("0.3")));
    }

    #[test]
    fn test_argument_count() {
        assert_eq!(
            call("_Add", &[Value::Int(1), Value::Int(2), Value::Int(3)]),
            Err(RuntimeError::ArgumentCount {
                function: "_Add".to_string(),
                expected: 2,
                found: 3,
            })
        );
        assert!(matches!(
            call("_Eq", &[Value::Int(1)]),
            Err(RuntimeError::ArgumentCount { found: 1, .. })
        ));
    }

    #[test]
    fn test_padded_string_is_not_a_numeral() {
        for padded in [" 1", "1 ", "\t1"] {
            assert_eq!(
                call("_Add", &[Value::from(padded), Value::Int(2)]),
                Err(RuntimeError::Parse {
                    input: padded.to_string()
                }),
                "{:?}",
                padded
            );
        }
    }

    #[test]
    fn test_unparseable_operand() {
        assert_eq!(
            call("_Add", &[Value::from("abc"), Value::Int(1)]),
            Err(RuntimeError::Parse {
                input: "abc".to_string()
            })
        );
        assert!(matches!(
            call("_Gt", &[Value::Bool(true), Value::Int(1)]),
            Err(RuntimeError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_divisor() {
        assert_eq!(call("_Div", &[Value::Int(1), Value::Int(0)]), Err(RuntimeError::DivisionByZero));
        assert_eq!(call("_Mod", &[Value::Int(1), dec("0.0")]), Err(RuntimeError::DivisionByZero));
    }
}
