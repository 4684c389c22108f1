//! Semantic diagnostics.
//!
//! Diagnostics are rich, accumulated errors: validation never aborts on the
//! first failure, so one pass over a compilation unit produces the complete
//! diagnostic set.
//!
//! # Design
//!
//! - `CompileError` — single diagnostic with primary and optional secondary spans
//! - `ErrorKind` — one tag per semantic check
//! - `Severity` — error, warning, or note
//! - `DiagnosticFormatter` — formats diagnostics with source snippets

use guardian_ast::foundation::{SourceMap, Span};
use std::fmt;

/// Compilation diagnostic with source location and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// Category of this error
    pub kind: ErrorKind,
    /// Severity level
    pub severity: Severity,
    /// Primary source location
    pub span: Span,
    /// Primary error message
    pub message: String,
    /// Additional labeled spans
    pub labels: Vec<Label>,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

/// Category of semantic error.
///
/// One tag per check the validator performs, so diagnostics can be filtered
/// and counted by phase.
///
/// # Invariant
///
/// The discriminant values must match the ERROR_KIND_NAMES array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Lexical or parse error folded into the unified diagnostic list
    Syntax = 0,
    /// Variable name already declared in a visible scope
    DuplicateVariable = 1,
    /// Type name already declared in a visible scope
    DuplicateType = 2,
    /// Identifier does not resolve to a variable
    UndefinedName = 3,
    /// Name does not resolve to a type
    UndefinedType = 4,
    /// Left-hand side of an assignment is not addressable
    InvalidAssignmentTarget = 5,
    /// Assignment arity or type mismatch
    InvalidAssignment = 6,
    /// Expression does not have the type the context requires
    RequiredType = 7,
    /// Call target is neither callable nor constructible
    InvalidCall = 8,
    /// Constructor call matches no declared overload
    ConstructorMismatch = 9,
    /// Function call arguments do not match the parameter tuple
    ArgumentMismatch = 10,
    /// Index or slice applied to a non-container type
    InvalidSubscript = 11,
    /// Member access on a type without named members
    NotSubscriptable = 12,
    /// Member not found in the reference context
    PropertyNotFound = 13,
    /// Reference member is not a name
    UnnamedReference = 14,
    /// Literal kind has no type rule in this profile
    UnsupportedLiteral = 15,
    /// Binary operator has no type rule in this profile
    UnknownOperator = 16,
    /// Declaration participates in an inheritance cycle
    RecursiveDeclaration = 17,
    /// Super-type clause names a type of the wrong kind
    InvalidSuper = 18,
    /// Internal validator error (bug)
    Internal = 19,
}

/// Human-readable names for error kinds.
///
/// Index matches ErrorKind discriminant.
const ERROR_KIND_NAMES: &[&str] = &[
    "syntax error",               // 0: Syntax
    "duplicate variable",         // 1: DuplicateVariable
    "duplicate type",             // 2: DuplicateType
    "undefined name",             // 3: UndefinedName
    "undefined type",             // 4: UndefinedType
    "invalid assignment target",  // 5: InvalidAssignmentTarget
    "invalid assignment",         // 6: InvalidAssignment
    "required type mismatch",     // 7: RequiredType
    "invalid call",               // 8: InvalidCall
    "constructor mismatch",       // 9: ConstructorMismatch
    "argument mismatch",          // 10: ArgumentMismatch
    "invalid subscript",          // 11: InvalidSubscript
    "not subscriptable",          // 12: NotSubscriptable
    "property not found",         // 13: PropertyNotFound
    "unnamed reference",          // 14: UnnamedReference
    "unsupported literal",        // 15: UnsupportedLiteral
    "unknown operator",           // 16: UnknownOperator
    "recursive declaration",      // 17: RecursiveDeclaration
    "invalid super type",         // 18: InvalidSuper
    "internal validator error",   // 19: Internal
];

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note (not an error)
    Note,
    /// Warning (code is valid but suspicious)
    Warning,
    /// Error (downstream code generation must not run)
    Error,
}

/// Secondary labeled span in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Source location
    pub span: Span,
    /// Label text
    pub message: String,
}

impl CompileError {
    /// Creates a new error diagnostic.
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Error, span, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Warning, span, message)
    }

    /// Creates a new note diagnostic.
    pub fn note(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Note, span, message)
    }

    /// Internal constructor with explicit severity.
    fn with_severity(kind: ErrorKind, severity: Severity, span: Span, message: String) -> Self {
        Self {
            kind,
            severity,
            span,
            message,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Adds a secondary labeled span (e.g. "first declared here").
    pub fn with_label(mut self, span: Span, message: String) -> Self {
        self.labels.push(Label { span, message });
        self
    }

    /// Adds a note or hint.
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl ErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn name(self) -> &'static str {
        ERROR_KIND_NAMES[self as usize]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.severity,
            self.kind.name(),
            self.message
        )
    }
}

impl std::error::Error for CompileError {}

/// Formats diagnostics with source code context.
///
/// Produces error messages with file/line/column location, the offending
/// source line, caret underlines, secondary labels and notes.
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    /// Creates a new diagnostic formatter over a source map.
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    /// Formats a diagnostic as a string with source context.
    pub fn format(&self, error: &CompileError) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}: {}: {}\n",
            error.severity,
            error.kind.name(),
            error.message
        ));

        let file_path = self.sources.file_path(&error.span);
        let (line, col) = self.sources.line_col(&error.span);
        output.push_str(&format!("  --> {}:{}:{}\n", file_path.display(), line, col));

        let file = self.sources.file(&error.span);
        if let Some(source_line) = file.line_text(line) {
            let source_line = source_line.trim_end_matches('\n');
            output.push_str("   |\n");
            output.push_str(&format!("{:3} | {}\n", line, source_line));

            let start_col = col as usize;
            let span_len = (error.span.end - error.span.start) as usize;
            let end_col = (start_col + span_len).min(source_line.len() + 1);
            let underline = " ".repeat(start_col.saturating_sub(1))
                + &"^".repeat(end_col.saturating_sub(start_col).max(1));
            output.push_str(&format!("   | {}\n", underline));
        }

        for label in &error.labels {
            output.push_str(&format!("   = note: {}\n", label.message));

            let (label_line, label_col) = self.sources.line_col(&label.span);
            let label_path = self.sources.file_path(&label.span);
            output.push_str(&format!(
                "     at {}:{}:{}\n",
                label_path.display(),
                label_line,
                label_col
            ));
        }

        for note in &error.notes {
            output.push_str(&format!("   = help: {}\n", note));
        }

        output
    }

    /// Formats multiple diagnostics, separated by blank lines.
    pub fn format_all(&self, errors: &[CompileError]) -> String {
        errors
            .iter()
            .map(|e| self.format(e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
