// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Semantic validation for the Guardian language.
//!
//! This crate is the core of the front end: it takes the AST produced by
//! `guardian-parser` and performs name resolution, type inference and
//! inheritance/interface-conformance checking, producing a node type table
//! and an ordered diagnostic list for the code generator behind it.
//!
//! # Architecture
//!
//! - `types`: the type system — the [`Type`] sum type, the
//!   [`TypeRegistry`] arena of declared aggregates, and the predicates
//!   (`compare`, `inherits`, `implements`, `assignable_to`) everything
//!   else relies on
//! - `scope`: the scope tree, with lazy resolve-on-demand lookups
//! - `exprs`: expression type resolution, memoized per node
//! - `stmts`: statement validation (assignments, conditions, loops,
//!   switches)
//! - `decls`: declaration validation and the at-most-once / cycle-guard
//!   machinery
//! - `builtins`: the language profile (primitives, operator and literal
//!   rules), passed in as configuration rather than kept as globals
//! - `error`: accumulated diagnostics and their formatter
//! - `writer`: type rendering for messages
//!
//! # Validation model
//!
//! Validation is single-threaded, synchronous and re-entrant: resolving a
//! name may validate another declaration on demand, which may resolve
//! further names. Declarations validate at most once, in first-requested
//! order rather than textual order, and cyclic references terminate
//! through an explicit in-progress marker. Checks that fail substitute
//! `Invalid`/`Unknown` and keep going — one pass produces the complete
//! diagnostic set.
//!
//! ```
//! # use guardian_validate::validate;
//! let (tokens, _) = guardian_lexer::tokenize(
//!     "class LightSource {}
//!      class Light inherits LightSource {}
//!
//!      item LightSource
//!
//!      constructor() {
//!          item = Light{}
//!      }",
//! );
//! let (unit, _) = guardian_parser::parse_source(&tokens, 0);
//! let outcome = validate(&unit);
//! assert!(outcome.is_clean());
//! ```

pub mod builtins;
pub mod error;
pub mod exprs;
pub mod scope;
pub mod stmts;
pub mod types;
pub mod writer;

mod decls;

pub use builtins::{BuiltinScope, LiteralRule, OperatorRule, ValidatorConfig};
pub use decls::DeclState;
pub use error::{CompileError, DiagnosticFormatter, ErrorKind, Label, Severity};
pub use scope::{ScopeId, ScopeOwner, TypeScope};
pub use types::{Tuple, Type, TypeRegistry};

use guardian_ast::{NodeId, SourceUnit};
use std::collections::HashMap;

/// The validator for one compilation unit.
///
/// Owns the scope tree, the registry of declared aggregates, the memoized
/// node type table and the accumulated diagnostics. One instance per
/// compilation; consumed by [`Validator::validate_unit`].
pub struct Validator<'ast> {
    pub(crate) config: ValidatorConfig,
    pub(crate) registry: TypeRegistry,
    pub(crate) scopes: Vec<TypeScope<'ast>>,
    pub(crate) current: ScopeId,
    /// Resolved types, keyed by node id (the AST stays immutable)
    pub(crate) types: HashMap<NodeId, Type>,
    /// Per-declaration resolution state; doubles as the cycle guard
    pub(crate) decl_states: HashMap<NodeId, DeclState>,
    pub(crate) diagnostics: Vec<CompileError>,
}

/// Everything validation produced for a unit.
#[derive(Debug)]
pub struct ValidationOutcome {
    /// Resolved type of every expression, declaration and type node
    pub types: HashMap<NodeId, Type>,
    /// Definitions of all declared classes, contracts, interfaces and
    /// enums
    pub registry: TypeRegistry,
    /// All diagnostics, in the order they were found
    pub diagnostics: Vec<CompileError>,
}

impl ValidationOutcome {
    /// Whether code generation may proceed.
    pub fn is_clean(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// The resolved type of a node, if it was reached.
    pub fn type_of(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }
}

impl<'ast> Validator<'ast> {
    /// Create a validator with the given language profile.
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
            scopes: vec![TypeScope::new(None, None, None)],
            current: ScopeId(0),
            types: HashMap::new(),
            decl_states: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Validate a source unit, consuming the validator.
    pub fn validate_unit(mut self, unit: &'ast SourceUnit) -> ValidationOutcome {
        // The root scope resolves against the unit's top-level scope, so
        // forward references between top-level declarations work
        self.scopes[0].source = Some(&unit.scope);
        self.validate_scope_items(&unit.scope);
        ValidationOutcome {
            types: self.types,
            registry: self.registry,
            diagnostics: self.diagnostics,
        }
    }
}

/// Validate a source unit with the stock Guardian profile.
pub fn validate(unit: &SourceUnit) -> ValidationOutcome {
    Validator::new(ValidatorConfig::default()).validate_unit(unit)
}
