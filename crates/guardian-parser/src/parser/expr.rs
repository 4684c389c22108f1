//! Expression parser: Pratt core plus postfix and atom parsing.

use super::types::{parse_array_type, parse_map_type, parse_plain_type, parse_type_list};
use super::{ParseError, Parser};
use guardian_ast::foundation::{BinaryOp, UnaryOp};
use guardian_ast::{Expr, ExprKind, Literal};
use guardian_lexer::Token;

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// Get binary operator metadata (precedence, associativity, operator enum).
///
/// Higher precedence = tighter binding. The tiers are Swift-style:
/// disjunctive and conjunctive operators are right-associative, everything
/// else is left-associative.
fn binary_op_info(token: &Token) -> Option<(u8, Assoc, BinaryOp)> {
    match token {
        Token::LogicalOr => Some((10, Assoc::Right, BinaryOp::Or)),
        Token::LogicalAnd => Some((20, Assoc::Right, BinaryOp::And)),
        Token::Eql => Some((30, Assoc::Left, BinaryOp::Eql)),
        Token::Neq => Some((30, Assoc::Left, BinaryOp::Neq)),
        Token::Lss => Some((30, Assoc::Left, BinaryOp::Lss)),
        Token::Leq => Some((30, Assoc::Left, BinaryOp::Leq)),
        Token::Gtr => Some((30, Assoc::Left, BinaryOp::Gtr)),
        Token::Geq => Some((30, Assoc::Left, BinaryOp::Geq)),
        Token::Add => Some((40, Assoc::Left, BinaryOp::Add)),
        Token::Sub => Some((40, Assoc::Left, BinaryOp::Sub)),
        Token::BitOr => Some((40, Assoc::Left, BinaryOp::BitOr)),
        Token::Xor => Some((40, Assoc::Left, BinaryOp::Xor)),
        Token::Mul => Some((50, Assoc::Left, BinaryOp::Mul)),
        Token::Div => Some((50, Assoc::Left, BinaryOp::Div)),
        Token::Mod => Some((50, Assoc::Left, BinaryOp::Mod)),
        Token::BitAnd => Some((50, Assoc::Left, BinaryOp::BitAnd)),
        Token::Shl => Some((60, Assoc::Left, BinaryOp::Shl)),
        Token::Shr => Some((60, Assoc::Left, BinaryOp::Shr)),
        Token::Exp => Some((60, Assoc::Left, BinaryOp::Exp)),
        _ => None,
    }
}

/// Parse a full expression.
pub(crate) fn parse_expr(p: &mut Parser) -> Result<Expr, ParseError> {
    parse_pratt(p, 0)
}

/// Parse a simple expression: composite literals disabled.
///
/// Used for conditions and switch targets, where `ident {` must be read as
/// the start of the following block.
pub(crate) fn parse_simple_expr(p: &mut Parser) -> Result<Expr, ParseError> {
    let saved = p.simple;
    p.simple = true;
    let result = parse_pratt(p, 0);
    p.simple = saved;
    result
}

/// Pratt parser - handles binary operators with precedence climbing.
fn parse_pratt(p: &mut Parser, min_prec: u8) -> Result<Expr, ParseError> {
    let mut left = parse_prefix(p)?;

    while let Some(token) = p.stream.peek() {
        if let Some((prec, assoc, op)) = binary_op_info(token) {
            if prec < min_prec {
                break;
            }

            let span_start = p.stream.current_pos();
            p.stream.advance();
            // A line break directly after a binary operator continues the
            // expression on the next line
            p.stream.skip_newlines();

            let next_prec = if assoc == Assoc::Left { prec + 1 } else { prec };
            let right = parse_pratt(p, next_prec)?;

            let span = left.span.merge(&p.stream.span_from(span_start));
            left = Expr::new(
                p.next_id(),
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse prefix expressions (unary operators, then postfix chains).
fn parse_prefix(p: &mut Parser) -> Result<Expr, ParseError> {
    match p.stream.peek() {
        Some(Token::Not) | Some(Token::Sub) => parse_unary(p),
        _ => parse_postfix(p),
    }
}

/// Parse unary operators.
fn parse_unary(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.stream.current_pos();
    let span = p.stream.current_span();
    let op = match p.stream.advance() {
        Some(Token::Not) => UnaryOp::Not,
        Some(Token::Sub) => UnaryOp::Neg,
        other => {
            return Err(ParseError::unexpected_token(
                other.cloned().as_ref(),
                "where a unary operator was expected",
                span,
            ));
        }
    };

    let operand = parse_prefix(p)?;
    let span = p.stream.span_from(start);

    Ok(Expr::new(
        p.next_id(),
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        span,
    ))
}

/// Parse postfix expressions (member references, calls, indexing, slicing).
fn parse_postfix(p: &mut Parser) -> Result<Expr, ParseError> {
    let mut expr = parse_atom(p)?;

    loop {
        match p.stream.peek() {
            Some(Token::Dot) => {
                p.stream.advance();
                let member_start = p.stream.current_pos();
                let name = super::types::parse_identifier(p)?;
                let member = Expr::new(
                    p.next_id(),
                    ExprKind::Identifier(name),
                    p.stream.span_from(member_start),
                );
                let span = expr.span.merge(&member.span);
                expr = Expr::new(
                    p.next_id(),
                    ExprKind::Reference {
                        parent: Box::new(expr),
                        member: Box::new(member),
                    },
                    span,
                );
            }
            Some(Token::OpenBracket) => {
                let args_start = p.stream.current_pos();
                let args = parse_call_args(p)?;
                let span = expr.span.merge(&p.stream.span_from(args_start));
                expr = Expr::new(
                    p.next_id(),
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            }
            Some(Token::OpenSquare) => {
                expr = parse_index_or_slice(p, expr)?;
            }
            _ => break,
        }
    }

    Ok(expr)
}

/// Parse call arguments.
fn parse_call_args(p: &mut Parser) -> Result<Vec<Expr>, ParseError> {
    p.stream.expect(Token::OpenBracket)?;
    let mut args = Vec::new();
    p.stream.skip_newlines();
    while !matches!(p.stream.peek(), Some(Token::CloseBracket)) {
        args.push(parse_expr(p)?);
        p.stream.skip_newlines();
        if !matches!(p.stream.peek(), Some(Token::CloseBracket)) {
            p.stream.expect(Token::Comma)?;
            p.stream.skip_newlines();
        }
    }
    p.stream.expect(Token::CloseBracket)?;
    Ok(args)
}

/// Parse `base[...]` as an index or slice expression.
fn parse_index_or_slice(p: &mut Parser, base: Expr) -> Result<Expr, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::OpenSquare)?;

    // `base[:high]` or `base[:]`
    if p.stream.eat(&Token::Colon) {
        return finish_slice(p, base, None, start);
    }

    let index = parse_expr(p)?;

    // `base[low:high]` or `base[low:]`
    if p.stream.eat(&Token::Colon) {
        return finish_slice(p, base, Some(index), start);
    }

    p.stream.expect(Token::CloseSquare)?;
    let span = base.span.merge(&p.stream.span_from(start));
    Ok(Expr::new(
        p.next_id(),
        ExprKind::Index {
            base: Box::new(base),
            index: Box::new(index),
        },
        span,
    ))
}

fn finish_slice(
    p: &mut Parser,
    base: Expr,
    low: Option<Expr>,
    start: usize,
) -> Result<Expr, ParseError> {
    let high = if p.stream.eat(&Token::CloseSquare) {
        None
    } else {
        let high = parse_expr(p)?;
        p.stream.expect(Token::CloseSquare)?;
        Some(high)
    };
    let span = base.span.merge(&p.stream.span_from(start));
    Ok(Expr::new(
        p.next_id(),
        ExprKind::Slice {
            base: Box::new(base),
            low: low.map(Box::new),
            high: high.map(Box::new),
        },
        span,
    ))
}

/// Parse an atom: literals, identifiers, composite/array/map/func literals,
/// parenthesized expressions.
fn parse_atom(p: &mut Parser) -> Result<Expr, ParseError> {
    // `Dog{...}` — only outside simple-expression mode
    if !p.simple
        && matches!(p.stream.peek(), Some(Token::Identifier(_)))
        && matches!(p.stream.peek_nth(1), Some(Token::OpenBrace))
    {
        return parse_composite_literal(p);
    }

    let start = p.stream.current_pos();
    let span = p.stream.current_span();
    match p.stream.peek() {
        Some(Token::Integer(n)) => {
            let n = *n;
            p.stream.advance();
            Ok(Expr::new(p.next_id(), ExprKind::Literal(Literal::Integer(n)), span))
        }
        Some(Token::Float(x)) => {
            let x = *x;
            p.stream.advance();
            Ok(Expr::new(p.next_id(), ExprKind::Literal(Literal::Float(x)), span))
        }
        Some(Token::String(s)) => {
            let s = s.clone();
            p.stream.advance();
            Ok(Expr::new(p.next_id(), ExprKind::Literal(Literal::Str(s)), span))
        }
        Some(Token::Character(c)) => {
            let c = *c;
            p.stream.advance();
            Ok(Expr::new(p.next_id(), ExprKind::Literal(Literal::Char(c)), span))
        }
        Some(Token::True) => {
            p.stream.advance();
            Ok(Expr::new(p.next_id(), ExprKind::Literal(Literal::Bool(true)), span))
        }
        Some(Token::False) => {
            p.stream.advance();
            Ok(Expr::new(p.next_id(), ExprKind::Literal(Literal::Bool(false)), span))
        }
        Some(Token::Identifier(name)) => {
            let name = name.to_string();
            p.stream.advance();
            Ok(Expr::new(p.next_id(), ExprKind::Identifier(name), span))
        }
        Some(Token::OpenBracket) => {
            p.stream.advance();
            p.stream.skip_newlines();
            let inner = parse_expr(p)?;
            p.stream.skip_newlines();
            p.stream.expect(Token::CloseBracket)?;
            Ok(inner)
        }
        Some(Token::OpenSquare) => parse_array_literal(p, start),
        Some(Token::Map) => parse_map_literal(p, start),
        Some(Token::Func) => parse_func_literal(p, start),
        other => Err(ParseError::unexpected_token(
            other,
            "in expression position",
            span,
        )),
    }
}

/// Parse a composite literal: `Light{intensity: 5}`.
fn parse_composite_literal(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.stream.current_pos();
    let type_name = parse_plain_type(p, false)?;

    p.stream.expect(Token::OpenBrace)?;
    let mut fields = Vec::new();
    p.stream.skip_newlines();
    while !matches!(p.stream.peek(), Some(Token::CloseBrace)) {
        let name = super::types::parse_identifier(p)?;
        p.stream.expect(Token::Colon)?;
        let value = parse_expr(p)?;
        fields.push((name, value));
        p.stream.skip_newlines();
        if !matches!(p.stream.peek(), Some(Token::CloseBrace)) {
            p.stream.expect(Token::Comma)?;
            p.stream.skip_newlines();
        }
    }
    p.stream.expect(Token::CloseBrace)?;

    Ok(Expr::new(
        p.next_id(),
        ExprKind::CompositeLiteral {
            type_name: Box::new(type_name),
            fields,
        },
        p.stream.span_from(start),
    ))
}

/// Parse an array literal: `[3]string{"a", "b", "c"}`.
fn parse_array_literal(p: &mut Parser, start: usize) -> Result<Expr, ParseError> {
    let signature = parse_array_type(p, false)?;

    p.stream.expect(Token::OpenBrace)?;
    let mut elements = Vec::new();
    p.stream.skip_newlines();
    while !matches!(p.stream.peek(), Some(Token::CloseBrace)) {
        elements.push(parse_expr(p)?);
        p.stream.skip_newlines();
        if !matches!(p.stream.peek(), Some(Token::CloseBrace)) {
            p.stream.expect(Token::Comma)?;
            p.stream.skip_newlines();
        }
    }
    p.stream.expect(Token::CloseBrace)?;

    Ok(Expr::new(
        p.next_id(),
        ExprKind::ArrayLiteral {
            signature: Box::new(signature),
            elements,
        },
        p.stream.span_from(start),
    ))
}

/// Parse a map literal: `map[string]int{"a": 1}`.
fn parse_map_literal(p: &mut Parser, start: usize) -> Result<Expr, ParseError> {
    let signature = parse_map_type(p, false)?;

    p.stream.expect(Token::OpenBrace)?;
    let mut entries = Vec::new();
    p.stream.skip_newlines();
    while !matches!(p.stream.peek(), Some(Token::CloseBrace)) {
        let key = parse_expr(p)?;
        p.stream.expect(Token::Colon)?;
        let value = parse_expr(p)?;
        entries.push((key, value));
        p.stream.skip_newlines();
        if !matches!(p.stream.peek(), Some(Token::CloseBrace)) {
            p.stream.expect(Token::Comma)?;
            p.stream.skip_newlines();
        }
    }
    p.stream.expect(Token::CloseBrace)?;

    Ok(Expr::new(
        p.next_id(),
        ExprKind::MapLiteral {
            signature: Box::new(signature),
            entries,
        },
        p.stream.span_from(start),
    ))
}

/// Parse a function literal: `func(a int) int { return a }`.
fn parse_func_literal(p: &mut Parser, start: usize) -> Result<Expr, ParseError> {
    p.stream.expect(Token::Func)?;
    let params = super::decl::parse_parameters(p)?;
    let results = parse_func_results(p)?;
    let body = super::stmt::parse_braces_scope(p, super::stmt::ScopeContext::Block)?;

    Ok(Expr::new(
        p.next_id(),
        ExprKind::FuncLiteral {
            params,
            results,
            body,
        },
        p.stream.span_from(start),
    ))
}

/// Parse function results: `(a, b)` list, bare type list, or none.
pub(crate) fn parse_func_results(p: &mut Parser) -> Result<Vec<guardian_ast::TypeNode>, ParseError> {
    if p.stream.eat(&Token::OpenBracket) {
        let types = parse_type_list(p)?;
        p.stream.expect(Token::CloseBracket)?;
        Ok(types)
    } else if super::types::at_type_start(p) && !matches!(p.stream.peek(), Some(Token::Func)) {
        // A bare `func` here would be the body's `func` literal start in
        // ambiguous positions; parenthesized results disambiguate
        parse_type_list(p)
    } else {
        Ok(Vec::new())
    }
}
