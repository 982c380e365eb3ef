use crate::ast::{BinaryOp, Expr, ExprKind, Literal, Span, UnaryOp};
use crate::error::ParseError;
use chumsky::prelude::*;
use chumsky::Stream;
use lexer::token::Token;

/// Parser for a complete source text holding exactly one expression
pub fn parser() -> impl Parser<Token, Expr, Error = Simple<Token>> {
    expr_parser().then_ignore(end())
}

/// Lex and parse `source` into an expression tree.
pub fn parse(source: &str) -> Result<Expr, Vec<ParseError>> {
    let tokens = lexer::lex_spanned(source)
        .map_err(|e| vec![Simple::custom(e.span, "invalid character")])?;

    let eoi = source.len()..source.len();
    parser().parse(Stream::from_iter(eoi, tokens.into_iter()))
}

fn binary(lhs: Expr, (op, rhs): (BinaryOp, Expr)) -> Expr {
    let span = lhs.span.start..rhs.span.end;
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    )
}

#[derive(Clone)]
enum Postfix {
    Member { field: String, optional: bool },
    Index(Expr),
}

fn expr_parser() -> impl Parser<Token, Expr, Error = Simple<Token>> + Clone {
    recursive(|expr| {
        let float = select! { Token::Float(s) => s }.try_map(|s, span: Span| {
            s.parse::<f64>()
                .map(Literal::Float)
                .map_err(|e| Simple::custom(span, format!("invalid float literal '{}': {}", s, e)))
        });

        let literal = select! {
            Token::Int(n) => Literal::Int(n),
            Token::String(s) => Literal::String(s),
            Token::True => Literal::Bool(true),
            Token::False => Literal::Bool(false),
            Token::Nil => Literal::Nil,
        }
        .or(float)
        .map(ExprKind::Literal);

        let args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        // name(args) is a call, a bare name is a variable
        let call_or_ident = select! { Token::Identifier(name) => name }
            .then(args.or_not())
            .map(|(name, maybe_args)| match maybe_args {
                Some(args) => ExprKind::Call { func: name, args },
                None => ExprKind::Identifier(name),
            });

        let array_literal = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(ExprKind::Array);

        let map_key = select! {
            Token::Identifier(key) => key,
            Token::String(key) => key,
            Token::Int(n) => n.to_string(),
        };

        let map_literal = map_key
            .then_ignore(just(Token::Colon))
            .then(expr.clone())
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .delimited_by(just(Token::LBrace), just(Token::RBrace))
            .map(ExprKind::Map);

        let atom = literal
            .or(call_or_ident)
            .or(array_literal)
            .or(map_literal)
            .map_with_span(Expr::new)
            .or(expr
                .clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)));

        let postfix = just(Token::Dot)
            .to(false)
            .or(just(Token::QuestionDot).to(true))
            .then(select! { Token::Identifier(name) => name })
            .map(|(optional, field)| Postfix::Member { field, optional })
            .or(expr
                .clone()
                .delimited_by(just(Token::LBracket), just(Token::RBracket))
                .map(Postfix::Index))
            .map_with_span(|postfix, span: Span| (postfix, span));

        let access = atom
            .then(postfix.repeated())
            .foldl(|lhs, (postfix, span)| {
                let span = lhs.span.start..span.end;
                let kind = match postfix {
                    Postfix::Member { field, optional } => ExprKind::Member {
                        target: Box::new(lhs),
                        field,
                        optional,
                    },
                    Postfix::Index(index) => ExprKind::Index {
                        target: Box::new(lhs),
                        index: Box::new(index),
                    },
                };
                Expr::new(kind, span)
            })
            .boxed();

        // Power is right associative and binds tighter than prefix minus:
        // -2 ** 2 == -(2 ** 2), 2 ** -1 is allowed
        let power = recursive(|power| {
            let prefix = just(Token::Minus)
                .to(UnaryOp::Negate)
                .or(just(Token::Plus).to(UnaryOp::Plus))
                .or(just(Token::Not).to(UnaryOp::Not))
                .map_with_span(|op, span: Span| (op, span))
                .repeated()
                .then(power)
                .foldr(|(op, span), expr: Expr| {
                    let span = span.start..expr.span.end;
                    Expr::new(
                        ExprKind::Unary {
                            op,
                            expr: Box::new(expr),
                        },
                        span,
                    )
                });

            access
                .clone()
                .then(just(Token::Pow).to(BinaryOp::Pow).then(prefix).or_not())
                .map(|(lhs, rhs)| match rhs {
                    Some(rhs) => binary(lhs, rhs),
                    None => lhs,
                })
        })
        .boxed();

        let unary = just(Token::Minus)
            .to(UnaryOp::Negate)
            .or(just(Token::Plus).to(UnaryOp::Plus))
            .or(just(Token::Not).to(UnaryOp::Not))
            .map_with_span(|op, span: Span| (op, span))
            .repeated()
            .then(power)
            .foldr(|(op, span), expr: Expr| {
                let span = span.start..expr.span.end;
                Expr::new(
                    ExprKind::Unary {
                        op,
                        expr: Box::new(expr),
                    },
                    span,
                )
            })
            .boxed();

        let product = unary
            .clone()
            .then(
                just(Token::Star)
                    .to(BinaryOp::Mul)
                    .or(just(Token::Slash).to(BinaryOp::Div))
                    .or(just(Token::Percent).to(BinaryOp::Mod))
                    .then(unary)
                    .repeated(),
            )
            .foldl(binary)
            .boxed();

        let sum = product
            .clone()
            .then(
                just(Token::Plus)
                    .to(BinaryOp::Add)
                    .or(just(Token::Minus).to(BinaryOp::Sub))
                    .then(product)
                    .repeated(),
            )
            .foldl(binary)
            .boxed();

        let comparison = sum
            .clone()
            .then(
                choice((
                    just(Token::DoubleEq).to(BinaryOp::Eq),
                    just(Token::NotEq).to(BinaryOp::NotEq),
                    just(Token::Gt).to(BinaryOp::Gt),
                    just(Token::Lt).to(BinaryOp::Lt),
                    just(Token::GtEq).to(BinaryOp::GtEq),
                    just(Token::LtEq).to(BinaryOp::LtEq),
                    just(Token::In).to(BinaryOp::In),
                    just(Token::Contains).to(BinaryOp::Contains),
                    just(Token::StartsWith).to(BinaryOp::StartsWith),
                    just(Token::EndsWith).to(BinaryOp::EndsWith),
                ))
                .then(sum)
                .repeated(),
            )
            .foldl(binary)
            .boxed();

        let logic_and = comparison
            .clone()
            .then(
                just(Token::And)
                    .to(BinaryOp::LogicalAnd)
                    .then(comparison)
                    .repeated(),
            )
            .foldl(binary)
            .boxed();

        let logic_or = logic_and
            .clone()
            .then(
                just(Token::Or)
                    .to(BinaryOp::LogicalOr)
                    .then(logic_and)
                    .repeated(),
            )
            .foldl(binary)
            .boxed();

        let coalesce = logic_or
            .clone()
            .then(
                just(Token::NilCoalesce)
                    .to(BinaryOp::NilCoalesce)
                    .then(logic_or)
                    .repeated(),
            )
            .foldl(binary)
            .boxed();

        // Ternary (condition ? then_expr : else_expr), branches nest to the right
        coalesce
            .then(
                just(Token::Question)
                    .ignore_then(expr.clone())
                    .then_ignore(just(Token::Colon))
                    .then(expr)
                    .or_not(),
            )
            .map(|(condition, maybe_branches)| match maybe_branches {
                None => condition,
                Some((then_expr, else_expr)) => {
                    let span = condition.span.start..else_expr.span.end;
                    Expr::new(
                        ExprKind::Ternary {
                            condition: Box::new(condition),
                            then_expr: Box::new(then_expr),
                            else_expr: Box::new(else_expr),
                        },
                        span,
                    )
                }
            })
    })
}
