//! AST node definitions for Guardian.
//!
//! The parser produces this tree; the validator consumes it read-only and
//! records resolved types in side tables keyed by [`NodeId`].
//!
//! # Design
//!
//! - Every expression, declaration and type node carries a `NodeId` unique
//!   within one parse, plus a `Span`
//! - Scopes hold declarations (order-preserving, possibly shadowed) and a
//!   sequential statement list; lookups by name return the first match
//! - Statements carry spans but no ids: only expressions and declarations
//!   resolve to types

pub mod decl;
pub mod expr;
pub mod scope;
pub mod stmt;
pub mod types;

pub use decl::*;
pub use expr::*;
pub use scope::*;
pub use stmt::*;
pub use types::*;

/// Identifier of an AST node, unique within a single parse.
///
/// The validator memoizes resolved types and declaration states in tables
/// keyed by this id, leaving the tree itself immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
