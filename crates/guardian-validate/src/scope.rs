//! The scope model: a tree of lexical type scopes.
//!
//! Scopes live in an arena owned by the [`Validator`], linked by
//! [`ScopeId`] indices so that parent back-references never need owning
//! pointers. Each scope holds the names resolved so far plus a reference to
//! the raw AST scope it was built from; a name that misses the resolved
//! tables but exists in the raw scope triggers on-demand validation of that
//! declaration. This is what lets declarations reference siblings that
//! appear later in source order.
//!
//! Lookups come in two strengths:
//!
//! - **declared** walks only state that already exists; it never triggers
//!   validation and is what duplicate detection uses
//! - **visible** additionally consults the raw AST scope and validates
//!   pending declarations on demand
//!
//! Builtin and primitive tables are consulted before any scope walk and are
//! immutable for the validator's lifetime.

use crate::Validator;
use crate::error::{CompileError, ErrorKind};
use crate::types::{ClassId, ContractId, InterfaceId, Lifecycle, Type, flatten_single};
use guardian_ast::foundation::Span;
use guardian_ast::{LifecycleKind, Scope};
use indexmap::IndexMap;

/// Index of a scope in the validator's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// The declaration owning a scope, when there is one.
///
/// Lookups inside a class or contract body consult the owner's resolved
/// members (including inherited ones) between the local tables and the
/// parent walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOwner {
    Class(ClassId),
    Contract(ContractId),
    Interface(InterfaceId),
    Func,
}

/// One node of the scope tree.
#[derive(Debug)]
pub struct TypeScope<'ast> {
    /// Variables resolved in this scope so far
    pub variables: IndexMap<String, Type>,
    /// Types resolved in this scope so far
    pub types: IndexMap<String, Type>,
    /// Lifecycle overload sets registered in this scope
    pub lifecycles: IndexMap<LifecycleKind, Vec<Lifecycle>>,
    /// Owning declaration, if this scope is a declaration body
    pub owner: Option<ScopeOwner>,
    /// The raw AST scope, consulted for pending declarations
    pub source: Option<&'ast Scope>,
    /// Enclosing scope; `None` only for the root
    pub parent: Option<ScopeId>,
}

impl<'ast> TypeScope<'ast> {
    pub(crate) fn new(
        parent: Option<ScopeId>,
        source: Option<&'ast Scope>,
        owner: Option<ScopeOwner>,
    ) -> Self {
        Self {
            variables: IndexMap::new(),
            types: IndexMap::new(),
            lifecycles: IndexMap::new(),
            owner,
            source,
            parent,
        }
    }
}

impl<'ast> Validator<'ast> {
    /// Push a child of the current scope and make it current.
    pub(crate) fn enter_scope(
        &mut self,
        source: Option<&'ast Scope>,
        owner: Option<ScopeOwner>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes
            .push(TypeScope::new(Some(self.current), source, owner));
        self.current = id;
        id
    }

    /// Return to the current scope's parent.
    pub(crate) fn exit_scope(&mut self) {
        let parent = self.scopes[self.current.0 as usize]
            .parent
            .expect("cannot exit the root scope");
        self.current = parent;
    }

    fn scope(&self, id: ScopeId) -> &TypeScope<'ast> {
        &self.scopes[id.0 as usize]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut TypeScope<'ast> {
        &mut self.scopes[id.0 as usize]
    }

    /// Variable lookup over already-resolved state only.
    pub(crate) fn is_var_declared_in_scope(&self, id: ScopeId, name: &str) -> Option<Type> {
        let scope = self.scope(id);
        if let Some(t) = scope.variables.get(name) {
            return Some(t.clone());
        }
        if let Some(t) = self.owner_property(scope.owner, name) {
            return Some(t);
        }
        let parent = scope.parent?;
        self.is_var_declared_in_scope(parent, name)
    }

    /// Variable lookup that validates pending declarations on demand.
    ///
    /// A declaration validates at most once; a lookup that re-enters a
    /// declaration currently being validated observes whatever state that
    /// validation has produced so far, or fails closed.
    pub(crate) fn is_var_visible_in_scope(&mut self, id: ScopeId, name: &str) -> Option<Type> {
        if let Some(t) = self.scope(id).variables.get(name) {
            return Some(t.clone());
        }
        if let Some(t) = self.owner_property(self.scope(id).owner, name) {
            return Some(t);
        }
        if let Some(source) = self.scope(id).source
            && let Some(decl) = source.declaration(name)
        {
            let saved = self.current;
            self.current = id;
            self.validate_declaration(decl);
            self.current = saved;
            if let Some(t) = self.scope(id).variables.get(name) {
                return Some(t.clone());
            }
        }
        let parent = self.scope(id).parent?;
        self.is_var_visible_in_scope(parent, name)
    }

    /// Type lookup over already-resolved state only.
    pub(crate) fn is_type_declared_in_scope(&self, id: ScopeId, name: &str) -> Option<Type> {
        let scope = self.scope(id);
        if let Some(t) = scope.types.get(name) {
            return Some(t.clone());
        }
        if let Some(t) = self.owner_nested_type(scope.owner, name) {
            return Some(t);
        }
        let parent = scope.parent?;
        self.is_type_declared_in_scope(parent, name)
    }

    /// Type lookup that validates pending declarations on demand.
    pub(crate) fn is_type_visible_in_scope(&mut self, id: ScopeId, name: &str) -> Option<Type> {
        if let Some(t) = self.scope(id).types.get(name) {
            return Some(t.clone());
        }
        if let Some(t) = self.owner_nested_type(self.scope(id).owner, name) {
            return Some(t);
        }
        if let Some(source) = self.scope(id).source
            && let Some(decl) = source.declaration(name)
        {
            let saved = self.current;
            self.current = id;
            self.validate_declaration(decl);
            self.current = saved;
            if let Some(t) = self.scope(id).types.get(name) {
                return Some(t.clone());
            }
        }
        let parent = self.scope(id).parent?;
        self.is_type_visible_in_scope(parent, name)
    }

    /// A member of the owning declaration, inherited members included.
    fn owner_property(&self, owner: Option<ScopeOwner>, name: &str) -> Option<Type> {
        match owner? {
            ScopeOwner::Class(id) => self.registry.class_property(id, name),
            ScopeOwner::Contract(id) => self.registry.contract_property(id, name),
            _ => None,
        }
    }

    /// A type nested in the owning declaration, inherited types included.
    fn owner_nested_type(&self, owner: Option<ScopeOwner>, name: &str) -> Option<Type> {
        match owner? {
            ScopeOwner::Class(id) => self.registry.class_nested_type(id, name),
            ScopeOwner::Contract(id) => self.registry.contract_nested_type(id, name),
            _ => None,
        }
    }

    /// Variable lookup from the current scope: builtins, then the declared
    /// walk.
    pub(crate) fn is_var_declared(&self, name: &str) -> Option<Type> {
        if let Some(t) = self.config.builtins.variables.get(name) {
            return Some(t.clone());
        }
        self.is_var_declared_in_scope(self.current, name)
    }

    /// Variable lookup from the current scope: builtins, then the visible
    /// walk.
    pub(crate) fn is_var_visible(&mut self, name: &str) -> Option<Type> {
        if let Some(t) = self.config.builtins.variables.get(name) {
            return Some(t.clone());
        }
        self.is_var_visible_in_scope(self.current, name)
    }

    /// Type lookup from the current scope: primitives, builtins, then the
    /// declared walk.
    pub(crate) fn is_type_declared(&self, name: &str) -> Option<Type> {
        if let Some(t) = self.config.primitives.get(name) {
            return Some(t.clone());
        }
        if let Some(t) = self.config.builtins.types.get(name) {
            return Some(t.clone());
        }
        self.is_type_declared_in_scope(self.current, name)
    }

    /// Type lookup from the current scope: primitives, builtins, then the
    /// visible walk.
    pub(crate) fn is_type_visible(&mut self, name: &str) -> Option<Type> {
        if let Some(t) = self.config.primitives.get(name) {
            return Some(t.clone());
        }
        if let Some(t) = self.config.builtins.types.get(name) {
            return Some(t.clone());
        }
        self.is_type_visible_in_scope(self.current, name)
    }

    /// Bind a variable in the current scope.
    ///
    /// A duplicate reports a diagnostic but still binds, so later uses
    /// resolve against the new type instead of cascading.
    pub(crate) fn declare_var(&mut self, span: Span, name: &str, ty: Type) {
        if self.is_var_declared(name).is_some() {
            self.diagnostics.push(CompileError::new(
                ErrorKind::DuplicateVariable,
                span,
                format!("variable '{}' is already declared", name),
            ));
        }
        self.scope_mut(self.current)
            .variables
            .insert(name.to_string(), ty);
    }

    /// Bind a type name in the current scope.
    pub(crate) fn declare_type(&mut self, span: Span, name: &str, ty: Type) {
        if self.is_type_declared(name).is_some() {
            self.diagnostics.push(CompileError::new(
                ErrorKind::DuplicateType,
                span,
                format!("type '{}' is already declared", name),
            ));
        }
        self.scope_mut(self.current)
            .types
            .insert(name.to_string(), ty);
    }

    /// Register a lifecycle overload in the current scope.
    pub(crate) fn declare_lifecycle(&mut self, kind: LifecycleKind, lifecycle: Lifecycle) {
        self.scope_mut(self.current)
            .lifecycles
            .entry(kind)
            .or_default()
            .push(lifecycle);
    }

    /// Check that `actual` is the type the context requires.
    ///
    /// Single-element tuples flatten before the comparison, so a
    /// one-result call satisfies a scalar requirement.
    pub(crate) fn require_type(&mut self, span: Span, expected: &Type, actual: &Type) -> bool {
        let actual = flatten_single(actual);
        if !self.registry.compare(expected, actual) {
            let message = format!(
                "expected '{}', found '{}'",
                self.registry.display(expected),
                self.registry.display(actual)
            );
            self.diagnostics
                .push(CompileError::new(ErrorKind::RequiredType, span, message));
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidatorConfig;

    fn span() -> Span {
        Span::new(0, 0, 1, 1)
    }

    fn int() -> Type {
        Type::Numeric {
            bits: 256,
            signed: true,
        }
    }

    #[test]
    fn test_declare_and_look_up() {
        let mut v = Validator::new(ValidatorConfig::default());
        v.declare_var(span(), "balance", int());

        assert_eq!(v.is_var_declared("balance"), Some(int()));
        assert_eq!(v.is_var_visible("balance"), Some(int()));
        assert_eq!(v.is_var_declared("missing"), None);
    }

    #[test]
    fn test_duplicate_reports_but_still_binds() {
        let mut v = Validator::new(ValidatorConfig::default());
        v.declare_var(span(), "x", int());
        v.declare_var(span(), "x", Type::Bool);

        assert_eq!(v.diagnostics.len(), 1);
        assert_eq!(v.diagnostics[0].kind, ErrorKind::DuplicateVariable);
        // Error recovery: the new binding wins
        assert_eq!(v.is_var_declared("x"), Some(Type::Bool));
    }

    #[test]
    fn test_parent_scopes_are_walked() {
        let mut v = Validator::new(ValidatorConfig::default());
        v.declare_var(span(), "outer", int());
        v.enter_scope(None, None);
        v.declare_var(span(), "inner", Type::Bool);

        assert_eq!(v.is_var_declared("outer"), Some(int()));
        assert_eq!(v.is_var_declared("inner"), Some(Type::Bool));

        v.exit_scope();
        assert_eq!(v.is_var_declared("inner"), None);
    }

    #[test]
    fn test_owner_members_are_visible() {
        let mut v = Validator::new(ValidatorConfig::default());
        let base = v.registry.alloc_class("LightSource");
        let light = v.registry.alloc_class("Light");
        v.registry
            .class_mut(base)
            .properties
            .insert("intensity".to_string(), int());
        v.registry.class_mut(light).supers.push(base.0);

        v.enter_scope(None, Some(ScopeOwner::Class(light)));
        // Inherited property reachable through the owning declaration
        assert_eq!(v.is_var_declared("intensity"), Some(int()));
    }

    #[test]
    fn test_primitives_resolve_before_scopes() {
        let v = Validator::new(ValidatorConfig::default());
        assert_eq!(v.is_type_declared("bool"), Some(Type::Bool));
        assert_eq!(
            v.is_type_declared("uint8"),
            Some(Type::Numeric {
                bits: 8,
                signed: false
            })
        );
    }

    #[test]
    fn test_require_type_flattens_single_tuples() {
        use crate::types::Tuple;

        let mut v = Validator::new(ValidatorConfig::default());
        let single = Type::Tuple(Tuple::new(vec![Type::Bool]));
        assert!(v.require_type(span(), &Type::Bool, &single));
        assert!(v.diagnostics.is_empty());

        assert!(!v.require_type(span(), &Type::Bool, &int()));
        assert_eq!(v.diagnostics.len(), 1);
        assert_eq!(v.diagnostics[0].kind, ErrorKind::RequiredType);
    }
}
