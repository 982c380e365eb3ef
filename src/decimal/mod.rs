// Exact decimal mode
//
// Binary operators whose operands are both numeric are rewritten into calls
// to named decimal functions before code generation, so `0.1 * 3` evaluates
// to exactly `0.3` without changing what the expression author writes.
//
// The two halves are installed together by `options()`: the operator
// functions in `operators` and the tree rewrite in `patcher`.

mod operators;
mod patcher;

pub use operators::{lookup, operands, DecimalOperator, OPERATORS};
pub use patcher::{decide, DecimalPatcher};

use crate::CompileOption;
use codegen::{Function, Type};

/// Static type given to every rewritten node, comparisons included.
/// Enclosing operators see this type when deciding whether they are
/// rewritten too, so `(a > b) + 1` becomes `_Add(_Gt(a, b), 1)`.
pub const REWRITTEN_TYPE: Type = Type::Decimal;

/// The ten operator functions, ready to register
pub fn functions() -> Vec<Function> {
    OPERATORS.iter().map(DecimalOperator::function).collect()
}

/// Everything decimal mode installs: the operator functions followed by
/// the rewrite visitor.
pub fn options() -> Vec<CompileOption> {
    functions()
        .into_iter()
        .map(CompileOption::Function)
        .chain(std::iter::once(CompileOption::Visitor(Box::new(DecimalPatcher))))
        .collect()
}
