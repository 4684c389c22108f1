// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Unified entry point for the Guardian compilation pipeline.
//!
//! Drives source text through the front end — tokens, AST, semantic
//! validation — and folds lexical, parse and semantic errors into one
//! ordered diagnostic list. The result is a [`CheckedUnit`]: the AST, the
//! node type table and the type registry a code generator consumes, plus
//! everything wrong with the input.
//!
//! Code generation must not run on a unit whose diagnostics contain
//! errors; [`CheckedUnit::is_clean`] is that gate.

use guardian_ast::foundation::{SourceMap, Span};
use guardian_ast::{NodeId, SourceUnit};
use guardian_validate::{
    CompileError, DiagnosticFormatter, ErrorKind, Severity, Type, TypeRegistry, validate,
};
use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A fully checked compilation unit.
#[derive(Debug)]
pub struct CheckedUnit {
    /// The parsed AST (present even when diagnostics are not empty, so
    /// tooling can inspect partial input)
    pub unit: SourceUnit,
    /// The sources behind the unit's spans
    pub sources: SourceMap,
    /// Resolved type of every node the validator reached
    pub types: HashMap<NodeId, Type>,
    /// Declared class/contract/interface/enum definitions
    pub registry: TypeRegistry,
    /// Lexical, parse and semantic diagnostics, in pipeline order
    pub diagnostics: Vec<CompileError>,
}

impl CheckedUnit {
    /// Whether code generation may proceed.
    pub fn is_clean(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Render all diagnostics with source snippets.
    pub fn format_diagnostics(&self) -> String {
        DiagnosticFormatter::new(&self.sources).format_all(&self.diagnostics)
    }
}

/// Driver-level failures (everything inside the pipeline is a diagnostic,
/// not an error).
#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Check a single source string.
///
/// Runs the full front end. Later phases run even when earlier ones
/// reported errors, so one call reports everything wrong with the input;
/// the diagnostics list carries lexical errors first, then parse errors,
/// then semantic diagnostics.
pub fn compile_source(path: impl Into<PathBuf>, source: impl Into<String>) -> CheckedUnit {
    let source = source.into();
    let path = path.into();

    let (tokens, lex_errors) = guardian_lexer::tokenize(&source);
    debug!(
        file = %path.display(),
        tokens = tokens.len(),
        errors = lex_errors.len(),
        "lexed"
    );

    let mut sources = SourceMap::new();
    let file_id = sources.add_file(path, source);

    let mut diagnostics = Vec::new();
    for err in &lex_errors {
        let span = span_for(&sources, file_id, &err.span);
        diagnostics.push(CompileError::new(ErrorKind::Syntax, span, err.to_string()));
    }

    let (unit, parse_errors) = guardian_parser::parse_source(&tokens, file_id);
    debug!(
        declarations = unit.scope.declarations.len(),
        statements = unit.scope.sequence.len(),
        errors = parse_errors.len(),
        "parsed"
    );
    for err in parse_errors {
        diagnostics.push(CompileError::new(ErrorKind::Syntax, err.span, err.message));
    }

    let outcome = validate(&unit);
    debug!(
        nodes = outcome.types.len(),
        diagnostics = outcome.diagnostics.len(),
        "validated"
    );
    diagnostics.extend(outcome.diagnostics);

    CheckedUnit {
        unit,
        sources,
        types: outcome.types,
        registry: outcome.registry,
        diagnostics,
    }
}

/// Check a source file on disk.
pub fn check_file(path: &Path) -> Result<CheckedUnit, CompilerError> {
    let source = std::fs::read_to_string(path).map_err(|source| CompilerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(compile_source(path, source))
}

/// Span for a raw byte range, with the line looked up from the source map.
fn span_for(sources: &SourceMap, file_id: u16, range: &Range<usize>) -> Span {
    let probe = Span::new(file_id, range.start as u32, range.end as u32, 1);
    let (line, _) = sources.line_col(&probe);
    Span::new(file_id, range.start as u32, range.end as u32, line as u16)
}
