// Constant folding
//
// Collapses operator nodes whose operands are all literals into a single
// literal. Calls are never folded: a registered function may have effects
// or be replaced between compilation and run. Operations that fail (for
// example `1 % 0`) are left in place so the error surfaces at run time.

use crate::node::{Node, NodeKind};
use crate::operators;
use crate::value::Value;
use crate::visitor::Visitor;

#[derive(Debug, Default)]
pub struct ConstantFolder {
    /// Number of nodes collapsed so far
    pub folded: usize,
}

impl ConstantFolder {
    fn fold(node: &Node) -> Option<Value> {
        match &node.kind {
            NodeKind::Unary { op, operand } => {
                operators::unary(*op, operand.as_literal()?).ok()
            }
            NodeKind::Binary { op, left, right } => {
                operators::binary(*op, left.as_literal()?, right.as_literal()?).ok()
            }
            NodeKind::Ternary {
                condition,
                then_node,
                else_node,
            } => match condition.as_literal()? {
                Value::Bool(true) => then_node.as_literal().cloned(),
                Value::Bool(false) => else_node.as_literal().cloned(),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Visitor for ConstantFolder {
    fn visit(&mut self, node: &mut Node) {
        if let Some(value) = Self::fold(node) {
            // The static type stays: `1 / 2` is still a float node
            node.kind = NodeKind::Literal(value);
            self.folded += 1;
        }
    }
}
