// Type inference
//
// Assigns a static type to every node. The checker does not stop at the
// first problem: it records the first error, types the offending node as
// `Any` and keeps going, so a tree that fails checking is still fully
// annotated. The compiler relies on that to run visitors over a tree whose
// first check failed (a rewrite may make it valid).

use crate::env::Env;
use crate::error::{CodegenError, CodegenResult};
use crate::function::FunctionTable;
use crate::node::{Node, NodeKind};
use crate::types::{FloatWidth, IntWidth, Type};
use parser::ast::{BinaryOp, Span, UnaryOp};

const INT: Type = Type::Int(IntWidth::W64);
const FLOAT: Type = Type::Float(FloatWidth::W64);

/// Type-check `node` in place and return its type, or the first error found.
pub fn check(node: &mut Node, env: &Env, functions: &FunctionTable) -> CodegenResult<Type> {
    let mut checker = Checker::new(env, functions);
    let ty = checker.infer(node);
    match checker.error {
        Some(error) => Err(error),
        None => Ok(ty),
    }
}

pub struct Checker<'a> {
    env: &'a Env,
    functions: &'a FunctionTable,
    error: Option<CodegenError>,
}

impl<'a> Checker<'a> {
    pub fn new(env: &'a Env, functions: &'a FunctionTable) -> Self {
        Self {
            env,
            functions,
            error: None,
        }
    }

    /// Remember `error` if it is the first one and type the node as `Any`
    fn fail(&mut self, error: CodegenError) -> Type {
        if self.error.is_none() {
            self.error = Some(error);
        }
        Type::Any
    }

    fn invalid(&mut self, op: &str, left: &Type, right: &Type, span: &Span) -> Type {
        self.fail(CodegenError::InvalidOperation {
            operation: op.to_string(),
            reason: format!("mismatched types {} and {}", left, right),
            span: Some(span.clone()),
        })
    }

    pub fn infer(&mut self, node: &mut Node) -> Type {
        let span = node.span.clone();
        let ty = match &mut node.kind {
            NodeKind::Literal(value) => value.type_of(),

            NodeKind::Identifier(name) => match self.env.type_of(name) {
                Some(ty) => ty,
                None if self.functions.contains(name) => Type::Func,
                None => self.fail(CodegenError::UndefinedSymbol {
                    name: name.clone(),
                    context: "expression".to_string(),
                    span: Some(span.clone()),
                }),
            },

            NodeKind::Unary { op, operand } => {
                let op = *op;
                let operand_ty = self.infer(operand);
                self.infer_unary(op, &operand_ty, &span)
            }

            NodeKind::Binary { op, left, right } => {
                let op = *op;
                let left_ty = self.infer(left);
                let right_ty = self.infer(right);
                self.infer_binary(op, &left_ty, &right_ty, &span)
            }

            NodeKind::Call { callee, args } => {
                let arg_types: Vec<Type> = args.iter_mut().map(|arg| self.infer(arg)).collect();
                let callee = callee.clone();
                self.infer_call(&callee, &arg_types, &span)
            }

            NodeKind::Member {
                target,
                field,
                optional,
            } => {
                let optional = *optional;
                let field = field.clone();
                let target_ty = self.infer(target);
                match target_ty.dereferenced() {
                    Type::Map(elem) => elem.as_ref().clone(),
                    Type::Any => Type::Any,
                    Type::Nil if optional => Type::Nil,
                    other => self.fail(CodegenError::InvalidOperation {
                        operation: format!(".{}", field),
                        reason: format!("type {} has no fields", other),
                        span: Some(span.clone()),
                    }),
                }
            }

            NodeKind::Index { target, index } => {
                let target_ty = self.infer(target);
                let index_ty = self.infer(index);
                self.infer_index(&target_ty, &index_ty, &span)
            }

            NodeKind::Array(items) => {
                let types: Vec<Type> = items.iter_mut().map(|item| self.infer(item)).collect();
                Type::Array(Box::new(Type::common(types.iter())))
            }

            NodeKind::Map(entries) => {
                let types: Vec<Type> = entries
                    .iter_mut()
                    .map(|(_, value)| self.infer(value))
                    .collect();
                Type::Map(Box::new(Type::common(types.iter())))
            }

            NodeKind::Ternary {
                condition,
                then_node,
                else_node,
            } => {
                let condition_ty = self.infer(condition);
                if !is_bool_like(&condition_ty) {
                    self.fail(CodegenError::TypeError {
                        expected: "bool".to_string(),
                        found: condition_ty.to_string(),
                        context: "ternary condition".to_string(),
                        span: Some(condition.span.clone()),
                    });
                }
                let then_ty = self.infer(then_node);
                let else_ty = self.infer(else_node);
                if then_ty == else_ty { then_ty } else { Type::Any }
            }
        };

        node.ty = ty.clone();
        ty
    }

    fn infer_unary(&mut self, op: UnaryOp, operand: &Type, span: &Span) -> Type {
        let operand = operand.dereferenced();
        match op {
            UnaryOp::Not if is_bool_like(operand) => Type::Bool,
            UnaryOp::Negate | UnaryOp::Plus if operand.is_numeric() || operand.is_any() => {
                operand.clone()
            }
            _ => self.fail(CodegenError::InvalidOperation {
                operation: op.symbol().to_string(),
                reason: format!("not defined on {}", operand),
                span: Some(span.clone()),
            }),
        }
    }

    fn infer_binary(&mut self, op: BinaryOp, left: &Type, right: &Type, span: &Span) -> Type {
        let (l, r) = (left.dereferenced(), right.dereferenced());
        let numeric_or_any = |t: &Type| t.is_numeric() || t.is_any();

        match op {
            BinaryOp::Add if *l == Type::String && *r == Type::String => Type::String,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => {
                if numeric_or_any(l) && numeric_or_any(r) {
                    arithmetic_result(l, r)
                } else {
                    self.invalid(op.symbol(), l, r, span)
                }
            }
            BinaryOp::Div => {
                if !(numeric_or_any(l) && numeric_or_any(r)) {
                    self.invalid(op.symbol(), l, r, span)
                } else if *l == Type::Decimal || *r == Type::Decimal {
                    Type::Decimal
                } else if l.is_complex() || r.is_complex() {
                    Type::Complex(FloatWidth::W64)
                } else {
                    FLOAT
                }
            }
            BinaryOp::Mod => {
                let modulo_operand = |t: &Type| t.is_integer() || *t == Type::Decimal || t.is_any();
                if !(modulo_operand(l) && modulo_operand(r)) {
                    self.invalid(op.symbol(), l, r, span)
                } else if *l == Type::Decimal || *r == Type::Decimal {
                    Type::Decimal
                } else if l.is_any() || r.is_any() {
                    Type::Any
                } else {
                    INT
                }
            }
            BinaryOp::Pow => {
                if numeric_or_any(l) && numeric_or_any(r) && !l.is_complex() && !r.is_complex() {
                    FLOAT
                } else {
                    self.invalid(op.symbol(), l, r, span)
                }
            }
            BinaryOp::Eq | BinaryOp::NotEq => Type::Bool,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => {
                let ordered = |t: &Type| (t.is_numeric() && !t.is_complex()) || t.is_any();
                let both_strings = *l == Type::String && *r == Type::String;
                let string_and_any = (*l == Type::String && r.is_any()) || (l.is_any() && *r == Type::String);
                if (ordered(l) && ordered(r)) || both_strings || string_and_any {
                    Type::Bool
                } else {
                    self.invalid(op.symbol(), l, r, span)
                }
            }
            BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
                if is_bool_like(l) && is_bool_like(r) {
                    Type::Bool
                } else {
                    self.invalid(op.symbol(), l, r, span)
                }
            }
            BinaryOp::In => match r {
                Type::Array(_) | Type::Any => Type::Bool,
                Type::Map(_) if *l == Type::String || l.is_any() => Type::Bool,
                _ => self.invalid(op.symbol(), l, r, span),
            },
            BinaryOp::Contains | BinaryOp::StartsWith | BinaryOp::EndsWith => {
                let stringy = |t: &Type| *t == Type::String || t.is_any();
                if stringy(l) && stringy(r) {
                    Type::Bool
                } else {
                    self.invalid(op.symbol(), l, r, span)
                }
            }
            BinaryOp::NilCoalesce => {
                if *l == Type::Nil || l == r {
                    r.clone()
                } else {
                    Type::Any
                }
            }
        }
    }

    fn infer_call(&mut self, callee: &str, arg_types: &[Type], span: &Span) -> Type {
        let Some(function) = self.functions.get(callee) else {
            return self.fail(CodegenError::UndefinedSymbol {
                name: callee.to_string(),
                context: "function call".to_string(),
                span: Some(span.clone()),
            });
        };

        let Some(signature) = &function.signature else {
            return Type::Any;
        };

        if let Some(params) = &signature.params {
            if params.len() != arg_types.len() {
                return self.fail(CodegenError::ArgumentCount {
                    name: callee.to_string(),
                    expected: params.len(),
                    found: arg_types.len(),
                    span: Some(span.clone()),
                });
            }
            for (i, (param, arg)) in params.iter().zip(arg_types).enumerate() {
                if !accepts(param, arg) {
                    return self.fail(CodegenError::TypeError {
                        expected: param.to_string(),
                        found: arg.to_string(),
                        context: format!("argument {} of {}", i + 1, callee),
                        span: Some(span.clone()),
                    });
                }
            }
        }

        signature.ret.clone()
    }

    fn infer_index(&mut self, target: &Type, index: &Type, span: &Span) -> Type {
        let integer_index = index.is_integer() || index.is_any();
        match target.dereferenced() {
            Type::Array(elem) if integer_index => elem.as_ref().clone(),
            Type::String if integer_index => Type::String,
            Type::Map(elem) if *index == Type::String || index.is_any() => elem.as_ref().clone(),
            Type::Any => Type::Any,
            other => self.fail(CodegenError::InvalidOperation {
                operation: "[]".to_string(),
                reason: format!("cannot index {} with {}", other, index),
                span: Some(span.clone()),
            }),
        }
    }
}

/// Operands a logical operator accepts. Decimal is included only so that
/// a rewritten comparison, which keeps the decimal tag while producing a
/// bool, can feed `&&`, `||`, `!` and `?:`. Without a rewrite this also
/// lets a real decimal operand through; the VM then rejects it at run time.
fn is_bool_like(ty: &Type) -> bool {
    matches!(ty, Type::Bool | Type::Any | Type::Decimal)
}

fn accepts(param: &Type, arg: &Type) -> bool {
    param.is_any() || arg.is_any() || param == arg || (param.is_numeric() && arg.is_numeric())
}

fn arithmetic_result(l: &Type, r: &Type) -> Type {
    if l.is_any() || r.is_any() {
        Type::Any
    } else if *l == Type::Decimal || *r == Type::Decimal {
        Type::Decimal
    } else if l.is_complex() || r.is_complex() {
        Type::Complex(FloatWidth::W64)
    } else if l.is_integer() && r.is_integer() {
        INT
    } else {
        FLOAT
    }
}
