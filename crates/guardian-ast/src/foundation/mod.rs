//! Foundation types shared across the Guardian pipeline.
//!
//! - `span` — source location tracking (`Span`, `SourceMap`, `SourceFile`)
//! - `ops` — operator enums shared by parser and validator

pub mod ops;
pub mod span;

pub use ops::{AssignOp, BinaryOp, UnaryOp};
pub use span::{SourceFile, SourceMap, Span};
