//! Type annotation parsers.

use super::{ParseError, Parser};
use guardian_ast::{FuncTypeParam, TypeKind, TypeNode, VarDecl};
use guardian_lexer::Token;

/// Check whether the current token can start a type annotation.
pub(crate) fn at_type_start(p: &Parser) -> bool {
    matches!(
        p.stream.peek(),
        Some(Token::Identifier(_))
            | Some(Token::OpenSquare)
            | Some(Token::Map)
            | Some(Token::Func)
            | Some(Token::Ellipsis)
    )
}

/// Parse any type annotation.
pub(crate) fn parse_type(p: &mut Parser) -> Result<TypeNode, ParseError> {
    match p.stream.peek() {
        Some(Token::OpenSquare) => parse_array_type(p, false),
        Some(Token::Map) => parse_map_type(p, false),
        Some(Token::Func) => parse_func_type(p, false),
        Some(Token::Identifier(_)) => parse_plain_type(p, false),
        Some(Token::Ellipsis) => {
            p.stream.advance();
            match p.stream.peek() {
                Some(Token::OpenSquare) => parse_array_type(p, true),
                Some(Token::Map) => parse_map_type(p, true),
                Some(Token::Func) => parse_func_type(p, true),
                Some(Token::Identifier(_)) => parse_plain_type(p, true),
                other => Err(ParseError::unexpected_token(
                    other,
                    "after '...'",
                    p.stream.current_span(),
                )),
            }
        }
        other => Err(ParseError::unexpected_token(
            other,
            "in type position",
            p.stream.current_span(),
        )),
    }
}

/// Parse a plain (named, possibly dotted) type.
pub(crate) fn parse_plain_type(p: &mut Parser, variadic: bool) -> Result<TypeNode, ParseError> {
    let start = p.stream.current_pos();
    let mut names = vec![parse_identifier(p)?];
    while matches!(p.stream.peek(), Some(Token::Dot)) {
        p.stream.advance();
        names.push(parse_identifier(p)?);
    }
    Ok(TypeNode {
        id: p.next_id(),
        span: p.stream.span_from(start),
        kind: TypeKind::Plain { names, variadic },
    })
}

/// Parse a comma-separated list of plain types (inherits / is clauses).
pub(crate) fn parse_plain_type_list(p: &mut Parser) -> Result<Vec<TypeNode>, ParseError> {
    let mut types = vec![parse_plain_type(p, false)?];
    while p.stream.eat(&Token::Comma) {
        types.push(parse_plain_type(p, false)?);
    }
    Ok(types)
}

/// Parse an array type: `[]int`, `[3]string`.
pub(crate) fn parse_array_type(p: &mut Parser, variadic: bool) -> Result<TypeNode, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::OpenSquare)?;

    let length = match p.stream.peek() {
        Some(Token::Integer(n)) => {
            let n = *n;
            if n < 0 {
                return Err(ParseError::invalid_syntax(
                    "array length cannot be negative",
                    p.stream.current_span(),
                ));
            }
            p.stream.advance();
            Some(n as u64)
        }
        _ => None,
    };

    p.stream.expect(Token::CloseSquare)?;
    let element = parse_type(p)?;

    Ok(TypeNode {
        id: p.next_id(),
        span: p.stream.span_from(start),
        kind: TypeKind::Array {
            element: Box::new(element),
            length,
            variadic,
        },
    })
}

/// Parse a map type: `map[string]int`.
pub(crate) fn parse_map_type(p: &mut Parser, variadic: bool) -> Result<TypeNode, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Map)?;
    p.stream.expect(Token::OpenSquare)?;
    let key = parse_type(p)?;
    p.stream.expect(Token::CloseSquare)?;
    let value = parse_type(p)?;

    Ok(TypeNode {
        id: p.next_id(),
        span: p.stream.span_from(start),
        kind: TypeKind::Map {
            key: Box::new(key),
            value: Box::new(value),
            variadic,
        },
    })
}

/// Parse a function type: `func(int, string) bool`.
pub(crate) fn parse_func_type(p: &mut Parser, variadic: bool) -> Result<TypeNode, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Func)?;
    p.stream.expect(Token::OpenBracket)?;
    let params = parse_func_type_params(p)?;
    p.stream.expect(Token::CloseBracket)?;

    let results = if p.stream.eat(&Token::OpenBracket) {
        let types = parse_type_list(p)?;
        p.stream.expect(Token::CloseBracket)?;
        types
    } else if at_type_start(p) {
        parse_type_list(p)?
    } else {
        Vec::new()
    };

    Ok(TypeNode {
        id: p.next_id(),
        span: p.stream.span_from(start),
        kind: TypeKind::Func {
            params,
            results,
            variadic,
        },
    })
}

/// Parse function-type parameters: all named or all bare types, never mixed.
pub(crate) fn parse_func_type_params(p: &mut Parser) -> Result<Vec<FuncTypeParam>, ParseError> {
    let mut params = Vec::new();
    if matches!(p.stream.peek(), Some(Token::CloseBracket)) {
        return Ok(params);
    }

    let named = is_explicit_var_declaration(p);
    loop {
        if named {
            if !is_explicit_var_declaration(p) {
                return Err(ParseError::invalid_syntax(
                    "cannot mix named and unnamed parameters",
                    p.stream.current_span(),
                ));
            }
            params.push(FuncTypeParam::Named(parse_var_declaration(p)?));
        } else {
            params.push(FuncTypeParam::Type(parse_type(p)?));
        }
        if !p.stream.eat(&Token::Comma) {
            break;
        }
        p.stream.skip_newlines();
    }
    Ok(params)
}

/// Parse a comma-separated list of types.
pub(crate) fn parse_type_list(p: &mut Parser) -> Result<Vec<TypeNode>, ParseError> {
    let mut types = vec![parse_type(p)?];
    while p.stream.eat(&Token::Comma) {
        types.push(parse_type(p)?);
    }
    Ok(types)
}

/// Parse an explicit variable declaration: `a, b int`.
pub(crate) fn parse_var_declaration(p: &mut Parser) -> Result<VarDecl, ParseError> {
    let start = p.stream.current_pos();
    let mut identifiers = vec![parse_identifier(p)?];
    while p.stream.eat(&Token::Comma) {
        identifiers.push(parse_identifier(p)?);
    }
    let declared_type = parse_type(p)?;
    Ok(VarDecl {
        span: p.stream.span_from(start),
        identifiers,
        declared_type,
    })
}

/// Lookahead: does an explicit variable declaration start here?
///
/// Matches `ident (, ident)*` followed by a type-start token. Assignment
/// operators and call/member punctuation after the identifier list rule
/// the pattern out.
pub(crate) fn is_explicit_var_declaration(p: &Parser) -> bool {
    let mut n = 0;
    loop {
        match p.stream.peek_nth(n) {
            Some(Token::Identifier(_)) => n += 1,
            _ => return false,
        }
        match p.stream.peek_nth(n) {
            Some(Token::Comma) => n += 1,
            Some(Token::Identifier(_))
            | Some(Token::OpenSquare)
            | Some(Token::Map)
            | Some(Token::Func)
            | Some(Token::Ellipsis) => return true,
            _ => return false,
        }
    }
}

/// Parse a required identifier.
pub(crate) fn parse_identifier(p: &mut Parser) -> Result<String, ParseError> {
    let span = p.stream.current_span();
    match p.stream.advance() {
        Some(Token::Identifier(name)) => Ok(name.to_string()),
        other => Err(ParseError::unexpected_token(
            other.cloned().as_ref(),
            "where an identifier was expected",
            span,
        )),
    }
}
