// Operator rewrite
//
// Runs once per node, children first. A binary node whose operands both
// have a numeric static type, and whose operator has a decimal function, is
// replaced in place by a call to that function with the original operands
// as arguments.

use codegen::{Node, NodeKind, Visitor};
use tracing::{debug, trace};

use super::operators::{lookup, DecimalOperator};
use super::REWRITTEN_TYPE;

/// Decimal function `node` should be rewritten into, if any
pub fn decide(node: &Node) -> Option<&'static DecimalOperator> {
    let NodeKind::Binary { op, left, right } = &node.kind else {
        return None;
    };
    if !left.ty.is_numeric() || !right.ty.is_numeric() {
        return None;
    }

    let operator = lookup(*op);
    if operator.is_none() {
        debug!(operator = op.symbol(), "no decimal function for operator, left native");
    }
    operator
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalPatcher;

impl Visitor for DecimalPatcher {
    fn visit(&mut self, node: &mut Node) {
        let Some(operator) = decide(node) else {
            return;
        };

        node.patch_with(|old| match old {
            NodeKind::Binary { left, right, .. } => NodeKind::Call {
                callee: operator.name.to_string(),
                args: vec![*left, *right],
            },
            other => other,
        });
        node.ty = REWRITTEN_TYPE;
        trace!(callee = operator.name, span = ?node.span, "rewrote binary operator");
    }
}
