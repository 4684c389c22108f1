//! Statement and scope-body parsers.
//!
//! A "scope item" is anything that can appear inside braces: a declaration
//! or a statement. What is permitted depends on where the scope sits —
//! class bodies take declarations only, function bodies take statements
//! plus nested var/func declarations, and the file scope takes everything.

use super::expr::{parse_expr, parse_simple_expr};
use super::types::{is_explicit_var_declaration, parse_identifier, parse_var_declaration};
use super::{ParseError, Parser, decl};
use guardian_ast::foundation::{AssignOp, BinaryOp};
use guardian_ast::{
    AssignmentStmt, CaseStmt, Condition, DeclKind, Declaration, Expr, ExprKind, FlowKind,
    FlowStmt, ForEachStmt, ForStmt, IfStmt, ImportStmt, Literal, PackageStmt, ReturnStmt, Scope,
    Stmt, SwitchStmt,
};
use guardian_lexer::Token;

/// Where a scope sits, deciding which items it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeContext {
    /// Top-level file scope: declarations and statements; var declarations
    /// are scope declarations (forward-referencable)
    File,
    /// Class/contract body: declarations only
    TypeBody,
    /// Function/lifecycle/block body: statements; var declarations run
    /// sequentially, nested func declarations are forward-referencable
    Block,
}

/// Parse one scope item into `scope`.
pub(crate) fn parse_scope_item(
    p: &mut Parser,
    scope: &mut Scope,
    ctx: ScopeContext,
) -> Result<(), ParseError> {
    match p.stream.peek() {
        Some(Token::Class)
        | Some(Token::Contract)
        | Some(Token::Interface)
        | Some(Token::Enum)
        | Some(Token::Event)
        | Some(Token::Type)
        | Some(Token::Constructor)
        | Some(Token::Destructor)
        | Some(Token::Fallback) => {
            if ctx == ScopeContext::Block {
                return Err(ParseError::invalid_syntax(
                    "only variable and function declarations may appear inside a body",
                    p.stream.current_span(),
                ));
            }
            let declaration = decl::parse_declaration(p)?;
            scope.add_declaration(declaration);
            Ok(())
        }
        // `func name(...)` is a declaration; a bare `func(...)` literal is
        // an expression statement
        Some(Token::Func) if matches!(p.stream.peek_nth(1), Some(Token::Identifier(_))) => {
            let declaration = decl::parse_declaration(p)?;
            scope.add_declaration(declaration);
            Ok(())
        }
        Some(Token::Import) => {
            require_statement_position(p, ctx)?;
            let stmt = parse_import_statement(p)?;
            scope.add_sequential(stmt);
            Ok(())
        }
        Some(Token::Package) => {
            require_statement_position(p, ctx)?;
            let stmt = parse_package_statement(p)?;
            scope.add_sequential(stmt);
            Ok(())
        }
        _ if is_explicit_var_declaration(p) => {
            let start = p.stream.current_pos();
            let var = parse_var_declaration(p)?;
            let declaration = Declaration {
                id: p.next_id(),
                span: p.stream.span_from(start),
                kind: DeclKind::Var(var),
            };
            // In running code a var declaration executes in sequence; in
            // type bodies and at file level it is forward-referencable
            match ctx {
                ScopeContext::Block => scope.add_sequential(Stmt::Declaration(declaration)),
                ScopeContext::File | ScopeContext::TypeBody => scope.add_declaration(declaration),
            }
            Ok(())
        }
        _ => {
            require_statement_position(p, ctx)?;
            let stmt = parse_statement(p)?;
            scope.add_sequential(stmt);
            Ok(())
        }
    }
}

/// Reject statements inside class/contract bodies.
fn require_statement_position(p: &Parser, ctx: ScopeContext) -> Result<(), ParseError> {
    if ctx == ScopeContext::TypeBody {
        return Err(ParseError::invalid_syntax(
            "statements are not allowed in a type body",
            p.stream.current_span(),
        ));
    }
    Ok(())
}

/// Parse a braced scope: `{ item* }`.
pub(crate) fn parse_braces_scope(p: &mut Parser, ctx: ScopeContext) -> Result<Scope, ParseError> {
    p.stream.expect(Token::OpenBrace)?;
    let mut scope = Scope::new();
    loop {
        p.stream.skip_newlines();
        if p.stream.eat(&Token::CloseBrace) {
            break;
        }
        if p.stream.at_end() {
            return Err(ParseError::unexpected_token(
                None,
                "while looking for '}'",
                p.stream.current_span(),
            ));
        }
        parse_scope_item(p, &mut scope, ctx)?;
    }
    Ok(scope)
}

/// Parse a single statement.
pub(crate) fn parse_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    match p.stream.peek() {
        Some(Token::If) => parse_if_statement(p),
        Some(Token::For) => parse_for_statement(p),
        Some(Token::Switch) | Some(Token::Exclusive) => parse_switch_statement(p),
        Some(Token::Return) => parse_return_statement(p),
        Some(Token::Break) | Some(Token::Continue) => parse_flow_statement(p),
        _ => parse_assignment_or_expr_statement(p),
    }
}

/// Parse an assignment statement or a bare expression statement.
pub(crate) fn parse_assignment_or_expr_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let start = p.stream.current_pos();
    let mut left = vec![parse_expr(p)?];
    while p.stream.eat(&Token::Comma) {
        left.push(parse_expr(p)?);
    }

    let op = match p.stream.peek() {
        Some(Token::Increment) | Some(Token::Decrement) => {
            return parse_post_assignment(p, left, start);
        }
        Some(Token::Assign) => AssignOp::Assign,
        Some(Token::Define) => AssignOp::Define,
        Some(tok) => match compound_op(tok) {
            Some(op) => AssignOp::Compound(op),
            None => {
                // No assignment operator: a single expression is a statement
                if left.len() == 1 {
                    return Ok(Stmt::Expr(left.pop().expect("one element")));
                }
                return Err(ParseError::unexpected_token(
                    Some(tok).cloned().as_ref(),
                    "after expression list (expected assignment operator)",
                    p.stream.current_span(),
                ));
            }
        },
        None => {
            if left.len() == 1 {
                return Ok(Stmt::Expr(left.pop().expect("one element")));
            }
            return Err(ParseError::unexpected_token(
                None,
                "after expression list",
                p.stream.current_span(),
            ));
        }
    };
    p.stream.advance();
    p.stream.skip_newlines();

    let mut right = vec![parse_expr(p)?];
    while p.stream.eat(&Token::Comma) {
        p.stream.skip_newlines();
        right.push(parse_expr(p)?);
    }

    Ok(Stmt::Assignment(AssignmentStmt {
        span: p.stream.span_from(start),
        left,
        right,
        op,
    }))
}

/// Map a compound-assignment token to its underlying binary operator.
fn compound_op(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::AddAssign => Some(BinaryOp::Add),
        Token::SubAssign => Some(BinaryOp::Sub),
        Token::MulAssign => Some(BinaryOp::Mul),
        Token::DivAssign => Some(BinaryOp::Div),
        Token::ModAssign => Some(BinaryOp::Mod),
        Token::ExpAssign => Some(BinaryOp::Exp),
        Token::AndAssign => Some(BinaryOp::BitAnd),
        Token::OrAssign => Some(BinaryOp::BitOr),
        Token::XorAssign => Some(BinaryOp::Xor),
        Token::ShlAssign => Some(BinaryOp::Shl),
        Token::ShrAssign => Some(BinaryOp::Shr),
        _ => None,
    }
}

/// Desugar `i++` / `i--` into `i = i + 1` / `i = i - 1`.
fn parse_post_assignment(
    p: &mut Parser,
    left: Vec<Expr>,
    start: usize,
) -> Result<Stmt, ParseError> {
    if left.len() != 1 {
        return Err(ParseError::invalid_syntax(
            "increment/decrement takes a single target",
            p.stream.current_span(),
        ));
    }
    let op = match p.stream.advance() {
        Some(Token::Increment) => BinaryOp::Add,
        _ => BinaryOp::Sub,
    };

    let span = p.stream.span_from(start);
    let target = left[0].clone();
    let one = Expr::new(p.next_id(), ExprKind::Literal(Literal::Integer(1)), span);
    let value = Expr::new(
        p.next_id(),
        ExprKind::Binary {
            op,
            left: Box::new(target),
            right: Box::new(one),
        },
        span,
    );

    Ok(Stmt::Assignment(AssignmentStmt {
        span,
        left,
        right: vec![value],
        op: AssignOp::Assign,
    }))
}

/// Lookahead: does a `;` appear before the next `{` or line break?
///
/// Used to detect the optional init clause of `if` and `for` statements.
fn has_init_clause(p: &Parser) -> bool {
    let mut n = 0;
    loop {
        match p.stream.peek_nth(n) {
            Some(Token::Semicolon) => return true,
            Some(Token::OpenBrace) | Some(Token::NewLine) | None => return false,
            _ => n += 1,
        }
    }
}

/// Parse an if statement: `if [init;] cond { } else if cond { } else { }`.
fn parse_if_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::If)?;

    let init = if has_init_clause(p) {
        let stmt = parse_assignment_or_expr_statement(p)?;
        p.stream.expect(Token::Semicolon)?;
        Some(Box::new(stmt))
    } else {
        None
    };

    let mut conditions = Vec::new();
    let condition = parse_simple_expr(p)?;
    let body = parse_braces_scope(p, ScopeContext::Block)?;
    conditions.push(Condition { condition, body });

    while p.stream.eat(&Token::ElseIf) {
        let condition = parse_simple_expr(p)?;
        let body = parse_braces_scope(p, ScopeContext::Block)?;
        conditions.push(Condition { condition, body });
    }

    let else_body = if p.stream.eat(&Token::Else) {
        Some(parse_braces_scope(p, ScopeContext::Block)?)
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        span: p.stream.span_from(start),
        init,
        conditions,
        else_body,
    }))
}

/// Parse a for or for-each statement.
fn parse_for_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::For)?;

    if is_for_each(p) {
        let mut variables = vec![parse_identifier(p)?];
        while p.stream.eat(&Token::Comma) {
            variables.push(parse_identifier(p)?);
        }
        p.stream.expect(Token::In)?;
        let producer = parse_simple_expr(p)?;
        let body = parse_braces_scope(p, ScopeContext::Block)?;
        return Ok(Stmt::ForEach(ForEachStmt {
            span: p.stream.span_from(start),
            variables,
            producer,
            body,
        }));
    }

    let init = if has_init_clause(p) {
        let stmt = parse_assignment_or_expr_statement(p)?;
        p.stream.expect(Token::Semicolon)?;
        Some(Box::new(stmt))
    } else {
        None
    };

    let cond = parse_simple_expr(p)?;

    let post = if p.stream.eat(&Token::Semicolon) {
        Some(Box::new(parse_assignment_or_expr_statement(p)?))
    } else {
        None
    };

    let body = parse_braces_scope(p, ScopeContext::Block)?;

    Ok(Stmt::For(ForStmt {
        span: p.stream.span_from(start),
        init,
        cond,
        post,
        body,
    }))
}

/// Lookahead: `for a, b in ...`?
fn is_for_each(p: &Parser) -> bool {
    let mut n = 0;
    loop {
        match p.stream.peek_nth(n) {
            Some(Token::Identifier(_)) => n += 1,
            _ => return false,
        }
        match p.stream.peek_nth(n) {
            Some(Token::Comma) => n += 1,
            Some(Token::In) => return true,
            _ => return false,
        }
    }
}

/// Parse a switch statement.
fn parse_switch_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let start = p.stream.current_pos();
    let exclusive = p.stream.eat(&Token::Exclusive);
    p.stream.expect(Token::Switch)?;

    let target = parse_simple_expr(p)?;

    p.stream.expect(Token::OpenBrace)?;
    let mut cases = Vec::new();
    let mut default = None;
    loop {
        p.stream.skip_newlines();
        if p.stream.eat(&Token::CloseBrace) {
            break;
        }
        if p.stream.eat(&Token::Case) {
            let case_start = p.stream.current_pos();
            let mut exprs = vec![parse_expr(p)?];
            while p.stream.eat(&Token::Comma) {
                exprs.push(parse_expr(p)?);
            }
            p.stream.expect(Token::Colon)?;
            let body = parse_case_block(p)?;
            cases.push(CaseStmt {
                span: p.stream.span_from(case_start),
                exprs,
                body,
            });
        } else if p.stream.eat(&Token::Default) {
            p.stream.expect(Token::Colon)?;
            default = Some(parse_case_block(p)?);
        } else {
            return Err(ParseError::unexpected_token(
                p.stream.peek(),
                "in switch body (expected 'case' or 'default')",
                p.stream.current_span(),
            ));
        }
    }

    Ok(Stmt::Switch(SwitchStmt {
        span: p.stream.span_from(start),
        exclusive,
        target,
        cases,
        default,
    }))
}

/// Parse statements up to the next `case`, `default` or `}`.
fn parse_case_block(p: &mut Parser) -> Result<Scope, ParseError> {
    let mut scope = Scope::new();
    loop {
        p.stream.skip_newlines();
        match p.stream.peek() {
            Some(Token::Case) | Some(Token::Default) | Some(Token::CloseBrace) | None => break,
            _ => parse_scope_item(p, &mut scope, ScopeContext::Block)?,
        }
    }
    Ok(scope)
}

/// Parse a return statement.
fn parse_return_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Return)?;

    let mut results = Vec::new();
    if !matches!(
        p.stream.peek(),
        Some(Token::NewLine) | Some(Token::CloseBrace) | Some(Token::Semicolon) | None
    ) {
        results.push(parse_expr(p)?);
        while p.stream.eat(&Token::Comma) {
            results.push(parse_expr(p)?);
        }
    }

    Ok(Stmt::Return(ReturnStmt {
        span: p.stream.span_from(start),
        results,
    }))
}

/// Parse `break` / `continue`.
fn parse_flow_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let span = p.stream.current_span();
    let kind = match p.stream.advance() {
        Some(Token::Break) => FlowKind::Break,
        _ => FlowKind::Continue,
    };
    Ok(Stmt::Flow(FlowStmt { span, kind }))
}

/// Parse an import statement: `import "path"` or `import alias "path"`.
fn parse_import_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Import)?;

    let alias = match p.stream.peek() {
        Some(Token::Identifier(name)) => {
            let name = name.to_string();
            p.stream.advance();
            Some(name)
        }
        _ => None,
    };

    let span = p.stream.current_span();
    let path = match p.stream.advance() {
        Some(Token::String(path)) => path.to_string(),
        other => {
            return Err(ParseError::unexpected_token(
                other.cloned().as_ref(),
                "where an import path string was expected",
                span,
            ));
        }
    };

    Ok(Stmt::Import(ImportStmt {
        span: p.stream.span_from(start),
        alias,
        path,
    }))
}

/// Parse a package statement: `package name version 0.1.2`.
///
/// The version is collected token-by-token up to the line break; semver
/// validation is the package resolver's job, not the parser's.
fn parse_package_statement(p: &mut Parser) -> Result<Stmt, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Package)?;

    let name = parse_identifier(p)?;

    match p.stream.peek() {
        Some(Token::Identifier(kw)) if &**kw == "version" => {
            p.stream.advance();
        }
        other => {
            return Err(ParseError::unexpected_token(
                other,
                "in package statement (expected 'version')",
                p.stream.current_span(),
            ));
        }
    }

    let mut version = String::new();
    while !matches!(p.stream.peek(), Some(Token::NewLine) | None) {
        let token = p.stream.advance().expect("peeked token exists");
        version.push_str(&token.to_string());
    }

    Ok(Stmt::Package(PackageStmt {
        span: p.stream.span_from(start),
        name,
        version,
    }))
}
