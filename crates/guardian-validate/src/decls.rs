//! Declaration validation.
//!
//! Declarations validate lazily: the scope model invokes
//! [`Validator::validate_declaration`] the first time a name is needed,
//! which may be before the declaration's position in source order. Each
//! declaration validates at most once; the per-declaration [`DeclState`]
//! doubles as the cycle guard — a lookup that re-enters a declaration
//! marked in-progress returns without re-entering validation and observes
//! whatever partial state exists.
//!
//! Aggregate declarations allocate their registry definition and bind
//! their name *before* resolving supers or validating bodies, so mutually
//! recursive declarations can refer to each other by id while either is
//! still being filled in.

use crate::Validator;
use crate::error::ErrorKind;
use crate::scope::ScopeOwner;
use crate::types::{
    AliasedType, ArrayType, EventType, FuncType, Lifecycle, MapType, Tuple, Type,
    resolve_underlying,
};
use guardian_ast::{
    DeclKind, Declaration, EnumDecl, EventDecl, FuncDecl, FuncTypeParam, InterfaceDecl,
    LifecycleDecl, TypeAliasDecl, TypeKind, TypeNode, VarDecl,
};
use indexmap::IndexMap;

/// Resolution state of one declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclState {
    /// Currently validating; re-entrant lookups must not recurse
    InProgress,
    /// Validated; the type the declaration resolved to
    Resolved(Type),
}

/// Which aggregate table a class-shaped declaration lives in.
#[derive(Clone, Copy)]
enum AggregateKind {
    Class,
    Contract,
}

impl<'ast> Validator<'ast> {
    /// Validate a declaration, at most once.
    pub(crate) fn validate_declaration(&mut self, decl: &'ast Declaration) {
        if self.decl_states.contains_key(&decl.id) {
            // Resolved, or in progress further up the stack (cycle guard)
            return;
        }
        self.decl_states.insert(decl.id, DeclState::InProgress);

        let resolved = match &decl.kind {
            DeclKind::Class(c) => {
                let shape = ClassShape {
                    identifier: &c.identifier,
                    supers: &c.supers,
                    interfaces: &c.interfaces,
                    body: &c.body,
                };
                self.validate_aggregate(decl, shape, AggregateKind::Class)
            }
            DeclKind::Contract(c) => {
                let shape = ClassShape {
                    identifier: &c.identifier,
                    supers: &c.supers,
                    interfaces: &c.interfaces,
                    body: &c.body,
                };
                self.validate_aggregate(decl, shape, AggregateKind::Contract)
            }
            DeclKind::Interface(i) => self.validate_interface(decl, i),
            DeclKind::Enum(e) => self.validate_enum(decl, e),
            DeclKind::Func(f) => self.validate_func(decl, f),
            DeclKind::Lifecycle(l) => self.validate_lifecycle(l),
            DeclKind::TypeAlias(t) => self.validate_type_alias(decl, t),
            DeclKind::Event(e) => self.validate_event(decl, e),
            DeclKind::Var(v) => self.validate_var(v),
        };

        self.types.insert(decl.id, resolved.clone());
        self.decl_states.insert(decl.id, DeclState::Resolved(resolved));
    }

    /// Shared class/contract validation.
    fn validate_aggregate(
        &mut self,
        decl: &'ast Declaration,
        c: ClassShape<'ast>,
        kind: AggregateKind,
    ) -> Type {
        let ty = match kind {
            AggregateKind::Class => Type::Class(self.registry.alloc_class(c.identifier)),
            AggregateKind::Contract => Type::Contract(self.registry.alloc_contract(c.identifier)),
        };
        // Bind the name first so self-references and mutual recursion
        // resolve while the body is still validating
        self.declare_type(decl.span, c.identifier, ty.clone());

        let mut supers = Vec::new();
        for node in c.supers {
            let Some(resolved) = self.resolve_super(node) else {
                continue;
            };
            match (kind, resolve_underlying(&resolved)) {
                (AggregateKind::Class, Type::Class(id)) => supers.push(id.0),
                (AggregateKind::Contract, Type::Contract(id)) => supers.push(id.0),
                _ => {
                    let expected = match kind {
                        AggregateKind::Class => "class",
                        AggregateKind::Contract => "contract",
                    };
                    self.error(
                        ErrorKind::InvalidSuper,
                        node.span,
                        format!(
                            "'{}' is not a {}",
                            self.registry.display(&resolved),
                            expected
                        ),
                    );
                }
            }
        }
        match (&ty, kind) {
            (Type::Class(id), _) => self.registry.class_mut(*id).supers = supers,
            (Type::Contract(id), _) => self.registry.contract_mut(*id).supers = supers,
            _ => unreachable!(),
        }
        if self.registry.inherits_strictly(&ty, &ty) {
            self.error(
                ErrorKind::RecursiveDeclaration,
                decl.span,
                format!("'{}' inherits itself", c.identifier),
            );
        }

        let mut interfaces = Vec::new();
        for node in c.interfaces {
            let Some(resolved) = self.resolve_super(node) else {
                continue;
            };
            match resolve_underlying(&resolved) {
                Type::Interface(id) => interfaces.push(*id),
                _ => {
                    self.error(
                        ErrorKind::InvalidSuper,
                        node.span,
                        format!("'{}' is not an interface", self.registry.display(&resolved)),
                    );
                }
            }
        }
        match &ty {
            Type::Class(id) => self.registry.class_mut(*id).interfaces = interfaces,
            Type::Contract(id) => self.registry.contract_mut(*id).interfaces = interfaces,
            _ => unreachable!(),
        }

        // Validate the body in the aggregate's own scope, then harvest the
        // resolved member tables into the registry definition
        let owner = match &ty {
            Type::Class(id) => ScopeOwner::Class(*id),
            Type::Contract(id) => ScopeOwner::Contract(*id),
            _ => unreachable!(),
        };
        let body_scope = self.enter_scope(Some(c.body), Some(owner));
        for d in &c.body.declarations {
            self.validate_declaration(d);
        }
        let scope = &self.scopes[body_scope.0 as usize];
        let properties = scope.variables.clone();
        let types = scope.types.clone();
        let lifecycles = scope.lifecycles.clone();
        self.exit_scope();

        match &ty {
            Type::Class(id) => {
                let def = self.registry.class_mut(*id);
                def.properties = properties;
                def.types = types;
                def.lifecycles = lifecycles;
            }
            Type::Contract(id) => {
                let def = self.registry.contract_mut(*id);
                def.properties = properties;
                def.types = types;
                def.lifecycles = lifecycles;
            }
            _ => unreachable!(),
        }
        ty
    }

    fn validate_interface(&mut self, decl: &'ast Declaration, i: &'ast InterfaceDecl) -> Type {
        let id = self.registry.alloc_interface(&i.identifier);
        self.declare_type(decl.span, &i.identifier, Type::Interface(id));

        let mut supers = Vec::new();
        for node in &i.supers {
            let Some(resolved) = self.resolve_super(node) else {
                continue;
            };
            match resolve_underlying(&resolved) {
                Type::Interface(sid) => supers.push(*sid),
                _ => {
                    self.error(
                        ErrorKind::InvalidSuper,
                        node.span,
                        format!("'{}' is not an interface", self.registry.display(&resolved)),
                    );
                }
            }
        }
        self.registry.interface_mut(id).supers = supers;
        if self
            .registry
            .inherits_strictly(&Type::Interface(id), &Type::Interface(id))
        {
            self.error(
                ErrorKind::RecursiveDeclaration,
                decl.span,
                format!("'{}' inherits itself", i.identifier),
            );
        }

        let mut funcs = IndexMap::new();
        for sig in &i.signatures {
            let params = self.resolve_func_type_params(&sig.params);
            let mut results = Vec::new();
            for r in &sig.results {
                results.push(self.resolve_type_node(r));
            }
            let func = Type::Func(Box::new(FuncType {
                params: Tuple::new(params),
                results: Tuple::new(results),
            }));
            self.types.insert(sig.id, func.clone());
            funcs.insert(sig.identifier.clone(), func);
        }
        self.registry.interface_mut(id).funcs = funcs;

        Type::Interface(id)
    }

    fn validate_enum(&mut self, decl: &'ast Declaration, e: &'ast EnumDecl) -> Type {
        let id = self.registry.alloc_enum(&e.identifier);
        self.declare_type(decl.span, &e.identifier, Type::Enum(id));

        let mut supers = Vec::new();
        for node in &e.supers {
            let Some(resolved) = self.resolve_super(node) else {
                continue;
            };
            match resolve_underlying(&resolved) {
                Type::Enum(sid) => supers.push(*sid),
                _ => {
                    self.error(
                        ErrorKind::InvalidSuper,
                        node.span,
                        format!("'{}' is not an enum", self.registry.display(&resolved)),
                    );
                }
            }
        }
        self.registry.enum_mut(id).supers = supers.clone();
        if self
            .registry
            .inherits_strictly(&Type::Enum(id), &Type::Enum(id))
        {
            self.error(
                ErrorKind::RecursiveDeclaration,
                decl.span,
                format!("'{}' inherits itself", e.identifier),
            );
        }

        // Inherited items flatten in, supers first in declaration order
        let mut items = Vec::new();
        for sid in &supers {
            items.extend(self.registry.enum_def(*sid).items.iter().cloned());
        }
        items.extend(e.items.iter().cloned());
        self.registry.enum_mut(id).items = items;

        Type::Enum(id)
    }

    fn validate_func(&mut self, decl: &'ast Declaration, f: &'ast FuncDecl) -> Type {
        let params = self.resolve_param_slots(&f.params);
        let mut results = Vec::new();
        for r in &f.results {
            results.push(self.resolve_type_node(r));
        }
        let func = Type::Func(Box::new(FuncType {
            params: Tuple::new(params),
            results: Tuple::new(results),
        }));
        // Bound before the body validates, so the function can recurse
        self.declare_var(decl.span, &f.identifier, func.clone());

        self.enter_scope(Some(&f.body), Some(ScopeOwner::Func));
        self.declare_params(&f.params);
        self.validate_scope_items(&f.body);
        self.exit_scope();

        func
    }

    fn validate_lifecycle(&mut self, l: &'ast LifecycleDecl) -> Type {
        let params = self.resolve_param_slots(&l.params);
        self.declare_lifecycle(
            l.kind,
            Lifecycle {
                kind: l.kind,
                params,
            },
        );

        self.enter_scope(Some(&l.body), Some(ScopeOwner::Func));
        self.declare_params(&l.params);
        self.validate_scope_items(&l.body);
        self.exit_scope();

        // Lifecycles register by kind and bind no name
        Type::Unknown
    }

    fn validate_type_alias(&mut self, decl: &'ast Declaration, t: &'ast TypeAliasDecl) -> Type {
        let underlying = self.resolve_type_node(&t.value);
        let aliased = Type::Aliased(Box::new(AliasedType {
            name: t.identifier.clone(),
            underlying,
        }));
        self.declare_type(decl.span, &t.identifier, aliased.clone());
        aliased
    }

    fn validate_event(&mut self, decl: &'ast Declaration, e: &'ast EventDecl) -> Type {
        let params = self.resolve_param_slots(&e.params);
        let event = Type::Event(Box::new(EventType {
            name: e.identifier.clone(),
            params: Tuple::new(params),
        }));
        self.declare_var(decl.span, &e.identifier, event.clone());
        event
    }

    fn validate_var(&mut self, v: &'ast VarDecl) -> Type {
        let ty = self.resolve_type_node(&v.declared_type);
        for name in &v.identifiers {
            self.declare_var(v.span, name, ty.clone());
        }
        ty
    }

    /// Resolve a super-type clause entry; `None` reports undefined.
    fn resolve_super(&mut self, node: &'ast TypeNode) -> Option<Type> {
        let Some(name) = node.plain_name() else {
            self.error(
                ErrorKind::InvalidSuper,
                node.span,
                "super types must be named types".to_string(),
            );
            return None;
        };
        match self.is_type_visible(&name) {
            Some(t) => {
                self.types.insert(node.id, t.clone());
                Some(t)
            }
            None => {
                self.error(
                    ErrorKind::UndefinedType,
                    node.span,
                    format!("unknown type '{}'", name),
                );
                None
            }
        }
    }

    /// Resolve a type annotation, memoized by node id.
    pub(crate) fn resolve_type_node(&mut self, node: &'ast TypeNode) -> Type {
        if let Some(t) = self.types.get(&node.id) {
            return t.clone();
        }
        let t = match &node.kind {
            TypeKind::Plain { names, variadic } => {
                let name = names.join(".");
                let base = match self.is_type_visible(&name) {
                    Some(t) => t,
                    None => {
                        self.error(
                            ErrorKind::UndefinedType,
                            node.span,
                            format!("unknown type '{}'", name),
                        );
                        Type::Invalid
                    }
                };
                if *variadic {
                    // `...T` collects into an open array
                    Type::Array(Box::new(ArrayType {
                        element: base,
                        length: None,
                        variadic: true,
                    }))
                } else {
                    base
                }
            }
            TypeKind::Array {
                element,
                length,
                variadic,
            } => Type::Array(Box::new(ArrayType {
                element: self.resolve_type_node(element),
                length: *length,
                variadic: *variadic,
            })),
            TypeKind::Map { key, value, .. } => Type::Map(Box::new(MapType {
                key: self.resolve_type_node(key),
                value: self.resolve_type_node(value),
            })),
            TypeKind::Func {
                params, results, ..
            } => {
                let params = self.resolve_func_type_params(params);
                let mut result_types = Vec::new();
                for r in results {
                    result_types.push(self.resolve_type_node(r));
                }
                Type::Func(Box::new(FuncType {
                    params: Tuple::new(params),
                    results: Tuple::new(result_types),
                }))
            }
        };
        self.types.insert(node.id, t.clone());
        t
    }

    /// Flatten function-type parameters into type slots, one per
    /// identifier for named groups.
    pub(crate) fn resolve_func_type_params(&mut self, params: &'ast [FuncTypeParam]) -> Vec<Type> {
        let mut slots = Vec::new();
        for param in params {
            match param {
                FuncTypeParam::Type(node) => slots.push(self.resolve_type_node(node)),
                FuncTypeParam::Named(var) => {
                    let ty = self.resolve_type_node(&var.declared_type);
                    for _ in &var.identifiers {
                        slots.push(ty.clone());
                    }
                }
            }
        }
        slots
    }

    /// Flatten a named parameter list into type slots.
    pub(crate) fn resolve_param_slots(&mut self, params: &'ast [VarDecl]) -> Vec<Type> {
        let mut slots = Vec::new();
        for param in params {
            let ty = self.resolve_type_node(&param.declared_type);
            for _ in &param.identifiers {
                slots.push(ty.clone());
            }
        }
        slots
    }

    /// Bind a parameter list in the current (body) scope.
    pub(crate) fn declare_params(&mut self, params: &'ast [VarDecl]) {
        for param in params {
            let ty = self.resolve_type_node(&param.declared_type);
            for name in &param.identifiers {
                self.declare_var(param.span, name, ty.clone());
            }
        }
    }
}

/// Borrowed view shared by class and contract declarations.
struct ClassShape<'ast> {
    identifier: &'ast str,
    supers: &'ast [TypeNode],
    interfaces: &'ast [TypeNode],
    body: &'ast guardian_ast::Scope,
}
