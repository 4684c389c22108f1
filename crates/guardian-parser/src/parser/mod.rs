//! Hand-written recursive descent parser for Guardian.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead
//! - `error`: ParseError and recovery mechanisms
//! - `expr`: Expression parser using Pratt parsing
//! - `decl`: Declaration parsers (keyword-dispatched)
//! - `stmt`: Statement and scope-body parsers
//! - `types`: Type annotation parsers
//!
//! ## Public API
//!
//! ```rust,ignore
//! pub fn parse_source(tokens: &[(Token, Range<usize>)], file_id: u16)
//!     -> (SourceUnit, Vec<ParseError>)
//! pub fn parse_expression(tokens: &[(Token, Range<usize>)], file_id: u16)
//!     -> Result<Expr, ParseError>
//! ```
//!
//! Errors inside a declaration abort that declaration; the top-level loop
//! records the error and synchronizes to the next declaration keyword, so a
//! single pass reports one error per broken declaration.

mod error;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

mod decl;
mod expr;
mod stmt;
mod types;

use guardian_ast::{Expr, NodeId, SourceUnit};
use guardian_lexer::Token;
use std::ops::Range;

/// Parser context: the token stream plus node-id allocation and the
/// simple-expression flag.
pub(crate) struct Parser<'src> {
    pub(crate) stream: TokenStream<'src>,
    next_id: u32,
    /// While set, `ident {` is not a composite literal (conditions, switch
    /// targets — `if x > Dog{} {}` would otherwise be ambiguous).
    pub(crate) simple: bool,
}

impl<'src> Parser<'src> {
    fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self {
            stream: TokenStream::new(tokens, file_id),
            next_id: 0,
            simple: false,
        }
    }

    /// Allocate the next node id.
    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Parse a token stream into a source unit.
///
/// # Parameters
/// - `tokens`: Slice of (token, byte_span) pairs from `guardian_lexer::tokenize`
/// - `file_id`: File identifier for span tracking
///
/// # Returns
///
/// The parsed unit together with all parse errors. The unit contains every
/// declaration that parsed cleanly even when errors are present, so the
/// validator can still run best-effort over partial input.
pub fn parse_source(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> (SourceUnit, Vec<ParseError>) {
    let mut parser = Parser::new(tokens, file_id);
    let mut unit = SourceUnit::default();
    let mut errors = Vec::new();

    loop {
        parser.stream.skip_newlines();
        if parser.stream.at_end() {
            break;
        }
        match stmt::parse_scope_item(&mut parser, &mut unit.scope, stmt::ScopeContext::File) {
            Ok(()) => {}
            Err(err) => {
                errors.push(err);
                parser.stream.synchronize();
            }
        }
    }

    (unit, errors)
}

/// Parse a token stream as a single expression.
///
/// # Parameters
/// - `tokens`: Slice of (token, byte_span) pairs
/// - `file_id`: File identifier for span tracking
///
/// # Returns
/// - `Ok(Expr)` if parsing succeeds
/// - `Err(ParseError)` if parsing fails
pub fn parse_expression(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokens, file_id);
    expr::parse_expr(&mut parser)
}
