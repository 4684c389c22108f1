//! Declaration parsers (keyword-dispatched).

use super::expr::parse_func_results;
use super::stmt::{ScopeContext, parse_braces_scope};
use super::types::{
    parse_func_type_params, parse_identifier, parse_plain_type_list, parse_type,
    parse_var_declaration,
};
use super::{ParseError, Parser};
use guardian_ast::{
    ClassDecl, ContractDecl, DeclKind, Declaration, EnumDecl, EventDecl, FuncDecl, FuncSignature,
    InterfaceDecl, LifecycleDecl, LifecycleKind, TypeAliasDecl, TypeNode, VarDecl,
};
use guardian_lexer::Token;

/// Parse one declaration, dispatching on the leading keyword.
pub(crate) fn parse_declaration(p: &mut Parser) -> Result<Declaration, ParseError> {
    let start = p.stream.current_pos();
    let kind = match p.stream.peek() {
        Some(Token::Class) => parse_class(p).map(DeclKind::Class)?,
        Some(Token::Contract) => parse_contract(p).map(DeclKind::Contract)?,
        Some(Token::Interface) => parse_interface(p).map(DeclKind::Interface)?,
        Some(Token::Enum) => parse_enum(p).map(DeclKind::Enum)?,
        Some(Token::Event) => parse_event(p).map(DeclKind::Event)?,
        Some(Token::Func) => parse_func(p).map(DeclKind::Func)?,
        Some(Token::Type) => parse_type_alias(p).map(DeclKind::TypeAlias)?,
        Some(Token::Constructor) | Some(Token::Destructor) | Some(Token::Fallback) => {
            parse_lifecycle(p).map(DeclKind::Lifecycle)?
        }
        other => {
            return Err(ParseError::unexpected_token(
                other,
                "where a declaration was expected",
                p.stream.current_span(),
            ));
        }
    };
    Ok(Declaration {
        id: p.next_id(),
        span: p.stream.span_from(start),
        kind,
    })
}

/// Parse the `inherits` / `is` clauses, which may appear in either order.
fn parse_inheritance_clauses(
    p: &mut Parser,
) -> Result<(Vec<TypeNode>, Vec<TypeNode>), ParseError> {
    let mut supers = Vec::new();
    let mut interfaces = Vec::new();

    if p.stream.eat(&Token::Inherits) {
        supers = parse_plain_type_list(p)?;
        if p.stream.eat(&Token::Is) {
            interfaces = parse_plain_type_list(p)?;
        }
    } else if p.stream.eat(&Token::Is) {
        interfaces = parse_plain_type_list(p)?;
        if p.stream.eat(&Token::Inherits) {
            supers = parse_plain_type_list(p)?;
        }
    }

    Ok((supers, interfaces))
}

fn parse_class(p: &mut Parser) -> Result<ClassDecl, ParseError> {
    p.stream.expect(Token::Class)?;
    let identifier = parse_identifier(p)?;
    let (supers, interfaces) = parse_inheritance_clauses(p)?;
    let body = parse_braces_scope(p, ScopeContext::TypeBody)?;
    Ok(ClassDecl {
        identifier,
        supers,
        interfaces,
        body,
    })
}

fn parse_contract(p: &mut Parser) -> Result<ContractDecl, ParseError> {
    p.stream.expect(Token::Contract)?;
    let identifier = parse_identifier(p)?;
    let (supers, interfaces) = parse_inheritance_clauses(p)?;
    let body = parse_braces_scope(p, ScopeContext::TypeBody)?;
    Ok(ContractDecl {
        identifier,
        supers,
        interfaces,
        body,
    })
}

fn parse_interface(p: &mut Parser) -> Result<InterfaceDecl, ParseError> {
    p.stream.expect(Token::Interface)?;
    let identifier = parse_identifier(p)?;

    let supers = if p.stream.eat(&Token::Inherits) {
        parse_plain_type_list(p)?
    } else {
        Vec::new()
    };

    p.stream.expect(Token::OpenBrace)?;
    let mut signatures = Vec::new();
    loop {
        p.stream.skip_newlines();
        if p.stream.eat(&Token::CloseBrace) {
            break;
        }
        if p.stream.at_end() {
            return Err(ParseError::unexpected_token(
                None,
                "while looking for '}' of interface body",
                p.stream.current_span(),
            ));
        }
        signatures.push(parse_func_signature(p)?);
    }

    Ok(InterfaceDecl {
        identifier,
        supers,
        signatures,
    })
}

/// Parse one named function signature in an interface body.
fn parse_func_signature(p: &mut Parser) -> Result<FuncSignature, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Func)?;
    let identifier = parse_identifier(p)?;
    p.stream.expect(Token::OpenBracket)?;
    let params = parse_func_type_params(p)?;
    p.stream.expect(Token::CloseBracket)?;
    let results = parse_func_results(p)?;
    Ok(FuncSignature {
        id: p.next_id(),
        span: p.stream.span_from(start),
        identifier,
        params,
        results,
    })
}

fn parse_enum(p: &mut Parser) -> Result<EnumDecl, ParseError> {
    p.stream.expect(Token::Enum)?;
    let identifier = parse_identifier(p)?;

    let supers = if p.stream.eat(&Token::Inherits) {
        parse_plain_type_list(p)?
    } else {
        Vec::new()
    };

    p.stream.expect(Token::OpenBrace)?;
    let mut items = Vec::new();
    p.stream.skip_newlines();
    if !p.stream.eat(&Token::CloseBrace) {
        items.push(parse_identifier(p)?);
        while p.stream.eat(&Token::Comma) {
            p.stream.skip_newlines();
            items.push(parse_identifier(p)?);
        }
        p.stream.skip_newlines();
        p.stream.expect(Token::CloseBrace)?;
    }

    Ok(EnumDecl {
        identifier,
        supers,
        items,
    })
}

fn parse_event(p: &mut Parser) -> Result<EventDecl, ParseError> {
    p.stream.expect(Token::Event)?;
    let identifier = parse_identifier(p)?;
    let params = parse_parameters(p)?;
    Ok(EventDecl { identifier, params })
}

fn parse_func(p: &mut Parser) -> Result<FuncDecl, ParseError> {
    p.stream.expect(Token::Func)?;
    let identifier = parse_identifier(p)?;
    let params = parse_parameters(p)?;
    let results = parse_func_results(p)?;
    let body = parse_braces_scope(p, ScopeContext::Block)?;
    Ok(FuncDecl {
        identifier,
        params,
        results,
        body,
    })
}

fn parse_lifecycle(p: &mut Parser) -> Result<LifecycleDecl, ParseError> {
    let span = p.stream.current_span();
    let kind = match p.stream.advance() {
        Some(Token::Constructor) => LifecycleKind::Constructor,
        Some(Token::Destructor) => LifecycleKind::Destructor,
        Some(Token::Fallback) => LifecycleKind::Fallback,
        other => {
            return Err(ParseError::unexpected_token(
                other.cloned().as_ref(),
                "where a lifecycle keyword was expected",
                span,
            ));
        }
    };
    let params = parse_parameters(p)?;
    let body = parse_braces_scope(p, ScopeContext::Block)?;
    Ok(LifecycleDecl { kind, params, body })
}

fn parse_type_alias(p: &mut Parser) -> Result<TypeAliasDecl, ParseError> {
    p.stream.expect(Token::Type)?;
    let identifier = parse_identifier(p)?;
    let value = parse_type(p)?;
    Ok(TypeAliasDecl { identifier, value })
}

/// Parse a named parameter list: `(a int, b, c string)`.
pub(crate) fn parse_parameters(p: &mut Parser) -> Result<Vec<VarDecl>, ParseError> {
    let mut params = Vec::new();
    p.stream.expect(Token::OpenBracket)?;
    p.stream.skip_newlines();
    if !p.stream.eat(&Token::CloseBracket) {
        params.push(parse_var_declaration(p)?);
        while p.stream.eat(&Token::Comma) {
            p.stream.skip_newlines();
            params.push(parse_var_declaration(p)?);
        }
        p.stream.skip_newlines();
        p.stream.expect(Token::CloseBracket)?;
    }
    Ok(params)
}
