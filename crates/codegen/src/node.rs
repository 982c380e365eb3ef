// Typed expression tree
//
// The parser's AST is lowered into Nodes, which carry a static type slot.
// The checker fills the slot, visitors may rewrite nodes in place, constant
// folding collapses literal subtrees, and the emitter turns the result into
// bytecode.

use crate::types::Type;
use crate::value::Value;
use parser::ast::{BinaryOp, Expr, ExprKind, Literal, Span, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Literal or folded constant
    Literal(Value),

    Identifier(String),

    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    Call {
        callee: String,
        args: Vec<Node>,
    },

    Member {
        target: Box<Node>,
        field: String,
        optional: bool,
    },

    Index {
        target: Box<Node>,
        index: Box<Node>,
    },

    Array(Vec<Node>),

    Map(Vec<(String, Node)>),

    Ternary {
        condition: Box<Node>,
        then_node: Box<Node>,
        else_node: Box<Node>,
    },
}

impl Node {
    /// Untyped node; the checker assigns the real type
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            ty: Type::Any,
            span,
        }
    }

    pub fn literal(value: impl Into<Value>, span: Span) -> Self {
        let value = value.into();
        let ty = value.type_of();
        Self {
            kind: NodeKind::Literal(value),
            ty,
            span,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Replace this node's kind in place. `f` receives the old kind by value
    /// so its children can be moved into the replacement.
    pub fn patch_with(&mut self, f: impl FnOnce(NodeKind) -> NodeKind) {
        let old = std::mem::replace(&mut self.kind, NodeKind::Literal(Value::Nil));
        self.kind = f(old);
    }

    /// Direct children in evaluation order
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        match &mut self.kind {
            NodeKind::Literal(_) | NodeKind::Identifier(_) => Vec::new(),
            NodeKind::Unary { operand, .. } => vec![operand.as_mut()],
            NodeKind::Binary { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            NodeKind::Call { args, .. } => args.iter_mut().collect(),
            NodeKind::Member { target, .. } => vec![target.as_mut()],
            NodeKind::Index { target, index } => vec![target.as_mut(), index.as_mut()],
            NodeKind::Array(items) => items.iter_mut().collect(),
            NodeKind::Map(entries) => entries.iter_mut().map(|(_, node)| node).collect(),
            NodeKind::Ternary {
                condition,
                then_node,
                else_node,
            } => vec![condition.as_mut(), then_node.as_mut(), else_node.as_mut()],
        }
    }
}

fn lower_literal(literal: Literal) -> Value {
    match literal {
        Literal::Int(i) => Value::Int(i),
        Literal::Float(x) => Value::Float(x),
        Literal::String(s) => Value::String(s),
        Literal::Bool(b) => Value::Bool(b),
        Literal::Nil => Value::Nil,
    }
}

impl From<Expr> for Node {
    fn from(expr: Expr) -> Self {
        let span = expr.span;
        let lower = |e: Box<Expr>| Box::new(Node::from(*e));

        let kind = match expr.kind {
            ExprKind::Literal(literal) => return Node::literal(lower_literal(literal), span),
            ExprKind::Identifier(name) => NodeKind::Identifier(name),
            ExprKind::Unary { op, expr } => NodeKind::Unary {
                op,
                operand: lower(expr),
            },
            ExprKind::Binary { op, lhs, rhs } => NodeKind::Binary {
                op,
                left: lower(lhs),
                right: lower(rhs),
            },
            ExprKind::Call { func, args } => NodeKind::Call {
                callee: func,
                args: args.into_iter().map(Node::from).collect(),
            },
            ExprKind::Member {
                target,
                field,
                optional,
            } => NodeKind::Member {
                target: lower(target),
                field,
                optional,
            },
            ExprKind::Index { target, index } => NodeKind::Index {
                target: lower(target),
                index: lower(index),
            },
            ExprKind::Array(items) => NodeKind::Array(items.into_iter().map(Node::from).collect()),
            ExprKind::Map(entries) => NodeKind::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => NodeKind::Ternary {
                condition: lower(condition),
                then_node: lower(then_expr),
                else_node: lower(else_expr),
            },
        };

        Node::new(kind, span)
    }
}
