// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for the Guardian language.
//!
//! This crate contains all AST node definitions and the foundation types
//! (source spans, source maps) shared by the parser and the validator.

pub mod ast;
pub mod foundation;

// Re-export commonly used types
pub use foundation::{AssignOp, BinaryOp, SourceFile, SourceMap, Span, UnaryOp};

pub use ast::*;
