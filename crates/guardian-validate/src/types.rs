//! The Guardian type system.
//!
//! There are five first-class Guardian types — primitives (bool, the
//! numerics), arrays, maps and functions — and two second-class types:
//! tuples (multi-value results, never storable) and aliases (named types
//! deferring to an underlying type). Classes, contracts, interfaces, enums
//! and events are declared aggregates held in a [`TypeRegistry`] arena and
//! referenced by id, so that inheritance graphs (which form DAGs and may be
//! mutually referential) never need owning pointers between definitions.
//!
//! # Predicates
//!
//! - [`TypeRegistry::compare`] — structural equality after alias resolution
//! - [`TypeRegistry::inherits`] — reflexive reachability over super-type DAGs
//! - [`TypeRegistry::implements`] — declared-interface conformance, closed
//!   over class and interface supers
//! - [`TypeRegistry::assignable_to`] — the composite assignability rule:
//!   compare OR inherits OR implements
//! - [`resolve_underlying`] — follows alias links to a fixed point

use guardian_ast::LifecycleKind;
use indexmap::IndexMap;
use std::collections::HashSet;

/// A semantic type.
///
/// Aggregate variants carry arena ids into the [`TypeRegistry`]; everything
/// else is self-contained. `Invalid` is the error-recovery type; `Unknown`
/// appears only transiently before resolution completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Failed resolution; produced alongside a diagnostic
    Invalid,
    /// Not yet resolved (unresolved identifiers, in-flight declarations)
    Unknown,
    /// Boolean
    Bool,
    /// Sized integer: int8..int256, uint8..uint256
    Numeric { bits: u16, signed: bool },
    /// Array with optional fixed length
    Array(Box<ArrayType>),
    /// Key-value map
    Map(Box<MapType>),
    /// Function: parameter and result tuples
    Func(Box<FuncType>),
    /// Multi-value tuple; never first-class storable
    Tuple(Tuple),
    /// Named alias deferring to an underlying type
    Aliased(Box<AliasedType>),
    /// Declared class
    Class(ClassId),
    /// Declared interface
    Interface(InterfaceId),
    /// Declared contract
    Contract(ContractId),
    /// Declared enum
    Enum(EnumId),
    /// Declared event
    Event(Box<EventType>),
}

/// Array type: element type, optional fixed length, variadic flag.
///
/// Length and variadic flags take part in assignability to a specific
/// literal but not in structural equality.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Type,
    pub length: Option<u64>,
    pub variadic: bool,
}

/// Map type.
#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    pub key: Type,
    pub value: Type,
}

/// Function type.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub params: Tuple,
    pub results: Tuple,
}

/// Named alias: identity preserved for diagnostics, semantics deferred to
/// the underlying type.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasedType {
    pub name: String,
    pub underlying: Type,
}

/// Event type: a named parameter tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct EventType {
    pub name: String,
    pub params: Tuple,
}

/// An ordered, possibly empty list of types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tuple {
    pub types: Vec<Type>,
}

impl Tuple {
    /// Create a tuple from a list of types.
    pub fn new(types: Vec<Type>) -> Self {
        Self { types }
    }

    /// The empty tuple.
    pub fn empty() -> Self {
        Self { types: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A lifecycle overload: its kind and parameter types.
#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    pub kind: LifecycleKind,
    pub params: Vec<Type>,
}

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);
    };
}

arena_id!(
    /// Index of a class definition in the registry.
    ClassId
);
arena_id!(
    /// Index of an interface definition in the registry.
    InterfaceId
);
arena_id!(
    /// Index of a contract definition in the registry.
    ContractId
);
arena_id!(
    /// Index of an enum definition in the registry.
    EnumId
);

/// A validated class or contract definition.
///
/// Classes and contracts share the same structure; contracts are
/// distinguished only for downstream code generation.
#[derive(Debug, Clone, Default)]
pub struct AggregateDef {
    pub name: String,
    /// Direct super types (same aggregate kind); forms a DAG
    pub supers: Vec<u32>,
    /// Directly declared interfaces
    pub interfaces: Vec<InterfaceId>,
    /// Fields and methods
    pub properties: IndexMap<String, Type>,
    /// Nested type declarations
    pub types: IndexMap<String, Type>,
    /// Lifecycle overload sets, keyed by kind
    pub lifecycles: IndexMap<LifecycleKind, Vec<Lifecycle>>,
}

/// A validated interface definition.
#[derive(Debug, Clone, Default)]
pub struct InterfaceDef {
    pub name: String,
    pub supers: Vec<InterfaceId>,
    /// Method signatures; values are `Func` types
    pub funcs: IndexMap<String, Type>,
}

/// A validated enum definition.
#[derive(Debug, Clone, Default)]
pub struct EnumDef {
    pub name: String,
    pub supers: Vec<EnumId>,
    /// Ordered items, inherited items first
    pub items: Vec<String>,
}

/// Arena of declared aggregate definitions.
///
/// Definitions are allocated before their bodies validate, so mutually
/// recursive declarations can refer to each other by id while either is
/// still being filled in.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: Vec<AggregateDef>,
    contracts: Vec<AggregateDef>,
    interfaces: Vec<InterfaceDef>,
    enums: Vec<EnumDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty class definition.
    pub fn alloc_class(&mut self, name: &str) -> ClassId {
        self.classes.push(AggregateDef {
            name: name.to_string(),
            ..Default::default()
        });
        ClassId(self.classes.len() as u32 - 1)
    }

    /// Allocate an empty contract definition.
    pub fn alloc_contract(&mut self, name: &str) -> ContractId {
        self.contracts.push(AggregateDef {
            name: name.to_string(),
            ..Default::default()
        });
        ContractId(self.contracts.len() as u32 - 1)
    }

    /// Allocate an empty interface definition.
    pub fn alloc_interface(&mut self, name: &str) -> InterfaceId {
        self.interfaces.push(InterfaceDef {
            name: name.to_string(),
            ..Default::default()
        });
        InterfaceId(self.interfaces.len() as u32 - 1)
    }

    /// Allocate an empty enum definition.
    pub fn alloc_enum(&mut self, name: &str) -> EnumId {
        self.enums.push(EnumDef {
            name: name.to_string(),
            ..Default::default()
        });
        EnumId(self.enums.len() as u32 - 1)
    }

    pub fn class(&self, id: ClassId) -> &AggregateDef {
        &self.classes[id.0 as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut AggregateDef {
        &mut self.classes[id.0 as usize]
    }

    pub fn contract(&self, id: ContractId) -> &AggregateDef {
        &self.contracts[id.0 as usize]
    }

    pub fn contract_mut(&mut self, id: ContractId) -> &mut AggregateDef {
        &mut self.contracts[id.0 as usize]
    }

    pub fn interface(&self, id: InterfaceId) -> &InterfaceDef {
        &self.interfaces[id.0 as usize]
    }

    pub fn interface_mut(&mut self, id: InterfaceId) -> &mut InterfaceDef {
        &mut self.interfaces[id.0 as usize]
    }

    pub fn enum_def(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.0 as usize]
    }

    pub fn enum_mut(&mut self, id: EnumId) -> &mut EnumDef {
        &mut self.enums[id.0 as usize]
    }

    /// Structural equality after resolving aliases on both sides.
    ///
    /// Tuples compare element-wise with equal arity; arrays and maps compare
    /// element-type-wise (length and variadic flags are excluded); functions
    /// compare their parameter and result tuples.
    pub fn compare(&self, a: &Type, b: &Type) -> bool {
        let a = resolve_underlying(a);
        let b = resolve_underlying(b);
        match (a, b) {
            (Type::Invalid, Type::Invalid) => true,
            (Type::Unknown, Type::Unknown) => true,
            (Type::Bool, Type::Bool) => true,
            (
                Type::Numeric { bits: ab, signed: asg },
                Type::Numeric { bits: bb, signed: bsg },
            ) => ab == bb && asg == bsg,
            (Type::Array(x), Type::Array(y)) => self.compare(&x.element, &y.element),
            (Type::Map(x), Type::Map(y)) => {
                self.compare(&x.key, &y.key) && self.compare(&x.value, &y.value)
            }
            (Type::Func(x), Type::Func(y)) => {
                self.compare_tuples(&x.params, &y.params)
                    && self.compare_tuples(&x.results, &y.results)
            }
            (Type::Tuple(x), Type::Tuple(y)) => self.compare_tuples(x, y),
            (Type::Class(x), Type::Class(y)) => x == y,
            (Type::Contract(x), Type::Contract(y)) => x == y,
            (Type::Interface(x), Type::Interface(y)) => x == y,
            (Type::Enum(x), Type::Enum(y)) => x == y,
            (Type::Event(x), Type::Event(y)) => {
                x.name == y.name && self.compare_tuples(&x.params, &y.params)
            }
            _ => false,
        }
    }

    /// Element-wise tuple comparison with equal arity.
    pub fn compare_tuples(&self, a: &Tuple, b: &Tuple) -> bool {
        a.len() == b.len()
            && a.types
                .iter()
                .zip(b.types.iter())
                .all(|(x, y)| self.compare(x, y))
    }

    /// Whether `sup` is reachable from `sub` through zero or more super
    /// links (reflexive: every type inherits itself).
    ///
    /// Traversal is cycle-safe: supers form a DAG in valid programs, but an
    /// invalid program can tie them into a cycle before the validator
    /// reports it.
    pub fn inherits(&self, sub: &Type, sup: &Type) -> bool {
        let sub = resolve_underlying(sub);
        let sup = resolve_underlying(sup);
        match (sub, sup) {
            (Type::Class(a), Type::Class(b)) => {
                self.search_supers(a.0, b.0, |id| &self.classes[id as usize].supers)
            }
            (Type::Contract(a), Type::Contract(b)) => {
                self.search_supers(a.0, b.0, |id| &self.contracts[id as usize].supers)
            }
            (Type::Interface(a), Type::Interface(b)) => self.interface_inherits(*a, *b),
            (Type::Enum(a), Type::Enum(b)) => self.enum_inherits(*a, *b),
            _ => false,
        }
    }

    /// Strict (non-reflexive) inheritance: `sup` reachable in one or more
    /// steps. Used to detect inheritance cycles.
    pub fn inherits_strictly(&self, sub: &Type, sup: &Type) -> bool {
        let sub = resolve_underlying(sub);
        let sup = resolve_underlying(sup);
        let direct_supers: Vec<Type> = match sub {
            Type::Class(id) => self.class(*id).supers.iter().map(|s| Type::Class(ClassId(*s))).collect(),
            Type::Contract(id) => self.contract(*id).supers.iter().map(|s| Type::Contract(ContractId(*s))).collect(),
            Type::Interface(id) => self.interface(*id).supers.iter().map(|s| Type::Interface(*s)).collect(),
            Type::Enum(id) => self.enum_def(*id).supers.iter().map(|s| Type::Enum(*s)).collect(),
            _ => return false,
        };
        direct_supers.iter().any(|s| self.inherits(s, sup))
    }

    fn enum_inherits(&self, sub: EnumId, sup: EnumId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![sub];
        while let Some(id) = stack.pop() {
            if id == sup {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.extend(self.enum_def(id).supers.iter().copied());
        }
        false
    }

    fn interface_inherits(&self, sub: InterfaceId, sup: InterfaceId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![sub];
        while let Some(id) = stack.pop() {
            if id == sup {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.extend(self.interface(id).supers.iter().copied());
        }
        false
    }

    fn search_supers<'a, F>(&'a self, sub: u32, sup: u32, supers: F) -> bool
    where
        F: Fn(u32) -> &'a Vec<u32>,
    {
        let mut visited = HashSet::new();
        let mut stack = vec![sub];
        while let Some(id) = stack.pop() {
            if id == sup {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.extend(supers(id).iter().copied());
        }
        false
    }

    /// Whether `t` (a class or contract) declares conformance to `iface`,
    /// directly or through any super type, closed over interface supers.
    ///
    /// Conformance is nominal: only the declared interface lists are
    /// consulted, never the property set.
    pub fn implements(&self, t: &Type, iface: &Type) -> bool {
        let target = match resolve_underlying(iface) {
            Type::Interface(id) => *id,
            _ => return false,
        };

        let declared = match resolve_underlying(t) {
            Type::Class(id) => self.collect_declared_interfaces(id.0, |i| &self.classes[i as usize]),
            Type::Contract(id) => {
                self.collect_declared_interfaces(id.0, |i| &self.contracts[i as usize])
            }
            _ => return false,
        };

        declared
            .iter()
            .any(|i| self.interface_inherits(*i, target))
    }

    fn collect_declared_interfaces<'a, F>(&'a self, start: u32, def: F) -> Vec<InterfaceId>
    where
        F: Fn(u32) -> &'a AggregateDef,
    {
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        let mut interfaces = Vec::new();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let d = def(id);
            interfaces.extend(d.interfaces.iter().copied());
            stack.extend(d.supers.iter().copied());
        }
        interfaces
    }

    /// The composite assignability rule.
    pub fn assignable_to(&self, value: &Type, target: &Type) -> bool {
        self.compare(value, target)
            || self.inherits(value, target)
            || self.implements(value, target)
    }

    /// A class property (field or method), searching supers.
    pub fn class_property(&self, id: ClassId, name: &str) -> Option<Type> {
        self.search_aggregate(id.0, |i| &self.classes[i as usize], |d| d.properties.get(name))
    }

    /// A type nested in a class, searching supers.
    pub fn class_nested_type(&self, id: ClassId, name: &str) -> Option<Type> {
        self.search_aggregate(id.0, |i| &self.classes[i as usize], |d| d.types.get(name))
    }

    /// A contract property (field or method), searching supers.
    pub fn contract_property(&self, id: ContractId, name: &str) -> Option<Type> {
        self.search_aggregate(id.0, |i| &self.contracts[i as usize], |d| d.properties.get(name))
    }

    /// A type nested in a contract, searching supers.
    pub fn contract_nested_type(&self, id: ContractId, name: &str) -> Option<Type> {
        self.search_aggregate(id.0, |i| &self.contracts[i as usize], |d| d.types.get(name))
    }

    /// An interface method signature, searching super interfaces.
    pub fn interface_func(&self, id: InterfaceId, name: &str) -> Option<Type> {
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let def = self.interface(id);
            if let Some(t) = def.funcs.get(name) {
                return Some(t.clone());
            }
            stack.extend(def.supers.iter().copied());
        }
        None
    }

    fn search_aggregate<'a>(
        &'a self,
        start: u32,
        def: impl Fn(u32) -> &'a AggregateDef,
        pick: impl Fn(&'a AggregateDef) -> Option<&'a Type>,
    ) -> Option<Type> {
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let d = def(id);
            if let Some(t) = pick(d) {
                return Some(t.clone());
            }
            stack.extend(d.supers.iter().copied());
        }
        None
    }
}

/// Whether instances of `t` expose named members reachable via `.`.
pub fn is_subscriptable(t: &Type) -> bool {
    matches!(
        t,
        Type::Class(_) | Type::Contract(_) | Type::Interface(_) | Type::Enum(_)
    )
}

/// Unwrap single-element tuples to their contained type.
///
/// Tuples are never first-class: a one-element tuple produced by a call is
/// interchangeable with its contained type wherever a single type is
/// required.
pub fn flatten_single(t: &Type) -> &Type {
    match t {
        Type::Tuple(tuple) if tuple.len() == 1 => flatten_single(&tuple.types[0]),
        _ => t,
    }
}

/// Follow alias links to a fixed point.
pub fn resolve_underlying(t: &Type) -> &Type {
    let mut current = t;
    while let Type::Aliased(aliased) = current {
        current = &aliased.underlying;
    }
    current
}

/// Bits needed to index `count` values (minimum 1).
pub fn bits_needed(count: usize) -> u16 {
    let mut bits = 1u16;
    while (1usize << bits) < count {
        bits += 1;
    }
    bits
}

/// The smallest numeric tier (8, 16, ..., 256 bits) holding `bits` bits.
pub fn smallest_numeric(bits: u16, signed: bool) -> Type {
    let mut tier = 8u16;
    while tier < bits && tier < 256 {
        tier += 8;
    }
    Type::Numeric { bits: tier, signed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Type {
        Type::Numeric {
            bits: 256,
            signed: true,
        }
    }

    fn uint8() -> Type {
        Type::Numeric {
            bits: 8,
            signed: false,
        }
    }

    fn alias(name: &str, underlying: Type) -> Type {
        Type::Aliased(Box::new(AliasedType {
            name: name.to_string(),
            underlying,
        }))
    }

    #[test]
    fn test_compare_resolves_aliases() {
        let reg = TypeRegistry::new();
        let balance = alias("Balance", int());
        assert!(reg.compare(&balance, &int()));
        assert!(reg.compare(&int(), &balance));
        assert!(!reg.compare(&balance, &uint8()));
    }

    #[test]
    fn test_compare_arrays_ignores_length() {
        let reg = TypeRegistry::new();
        let fixed = Type::Array(Box::new(ArrayType {
            element: int(),
            length: Some(3),
            variadic: false,
        }));
        let open = Type::Array(Box::new(ArrayType {
            element: int(),
            length: None,
            variadic: false,
        }));
        assert!(reg.compare(&fixed, &open));

        let other = Type::Array(Box::new(ArrayType {
            element: uint8(),
            length: None,
            variadic: false,
        }));
        assert!(!reg.compare(&fixed, &other));
    }

    #[test]
    fn test_compare_tuples_requires_equal_arity() {
        let reg = TypeRegistry::new();
        let pair = Type::Tuple(Tuple::new(vec![int(), Type::Bool]));
        let pair2 = Type::Tuple(Tuple::new(vec![int(), Type::Bool]));
        let triple = Type::Tuple(Tuple::new(vec![int(), Type::Bool, int()]));
        assert!(reg.compare(&pair, &pair2));
        assert!(!reg.compare(&pair, &triple));
    }

    #[test]
    fn test_compare_funcs() {
        let reg = TypeRegistry::new();
        let f1 = Type::Func(Box::new(FuncType {
            params: Tuple::new(vec![int()]),
            results: Tuple::new(vec![Type::Bool]),
        }));
        let f2 = Type::Func(Box::new(FuncType {
            params: Tuple::new(vec![int()]),
            results: Tuple::new(vec![Type::Bool]),
        }));
        let f3 = Type::Func(Box::new(FuncType {
            params: Tuple::new(vec![uint8()]),
            results: Tuple::new(vec![Type::Bool]),
        }));
        assert!(reg.compare(&f1, &f2));
        assert!(!reg.compare(&f1, &f3));
    }

    #[test]
    fn test_inherits_is_reflexive() {
        let mut reg = TypeRegistry::new();
        let a = reg.alloc_class("A");
        assert!(reg.inherits(&Type::Class(a), &Type::Class(a)));
    }

    #[test]
    fn test_inherits_is_transitive() {
        let mut reg = TypeRegistry::new();
        let object = reg.alloc_class("Object");
        let source = reg.alloc_class("LightSource");
        let light = reg.alloc_class("Light");
        reg.class_mut(source).supers.push(object.0);
        reg.class_mut(light).supers.push(source.0);

        assert!(reg.inherits(&Type::Class(light), &Type::Class(source)));
        assert!(reg.inherits(&Type::Class(light), &Type::Class(object)));
        assert!(!reg.inherits(&Type::Class(object), &Type::Class(light)));
    }

    #[test]
    fn test_inherits_multiple_supers() {
        let mut reg = TypeRegistry::new();
        let a = reg.alloc_class("A");
        let b = reg.alloc_class("B");
        let c = reg.alloc_class("C");
        reg.class_mut(c).supers.push(a.0);
        reg.class_mut(c).supers.push(b.0);

        assert!(reg.inherits(&Type::Class(c), &Type::Class(a)));
        assert!(reg.inherits(&Type::Class(c), &Type::Class(b)));
    }

    #[test]
    fn test_inherits_survives_cycles() {
        let mut reg = TypeRegistry::new();
        let a = reg.alloc_class("A");
        let b = reg.alloc_class("B");
        reg.class_mut(a).supers.push(b.0);
        reg.class_mut(b).supers.push(a.0);

        // Invalid program, but traversal must terminate
        assert!(reg.inherits(&Type::Class(a), &Type::Class(b)));
        assert!(reg.inherits_strictly(&Type::Class(a), &Type::Class(a)));
    }

    #[test]
    fn test_implements_direct_and_inherited() {
        let mut reg = TypeRegistry::new();
        let visible = reg.alloc_interface("Visible");
        let drawable = reg.alloc_interface("Drawable");
        reg.interface_mut(visible).supers.push(drawable);

        let base = reg.alloc_class("Base");
        let derived = reg.alloc_class("Derived");
        reg.class_mut(base).interfaces.push(visible);
        reg.class_mut(derived).supers.push(base.0);

        // Direct claim
        assert!(reg.implements(&Type::Class(base), &Type::Interface(visible)));
        // Closed over interface supers
        assert!(reg.implements(&Type::Class(base), &Type::Interface(drawable)));
        // Propagates down the class inheritance chain
        assert!(reg.implements(&Type::Class(derived), &Type::Interface(visible)));
    }

    #[test]
    fn test_implements_is_nominal() {
        let mut reg = TypeRegistry::new();
        let visible = reg.alloc_interface("Visible");
        let class = reg.alloc_class("Undeclared");
        // Never declared `is Visible`, so no conformance regardless of shape
        assert!(!reg.implements(&Type::Class(class), &Type::Interface(visible)));
    }

    #[test]
    fn test_assignable_to() {
        let mut reg = TypeRegistry::new();
        let source = reg.alloc_class("LightSource");
        let light = reg.alloc_class("Light");
        let unrelated = reg.alloc_class("Unrelated");
        reg.class_mut(light).supers.push(source.0);

        assert!(reg.assignable_to(&Type::Class(light), &Type::Class(source)));
        assert!(reg.assignable_to(&Type::Class(light), &Type::Class(light)));
        assert!(!reg.assignable_to(&Type::Class(unrelated), &Type::Class(source)));
    }

    #[test]
    fn test_resolve_underlying_fixed_point() {
        let inner = alias("inner", int());
        let outer = alias("outer", inner);
        assert_eq!(resolve_underlying(&outer), &int());
    }

    #[test]
    fn test_class_property_searches_supers() {
        let mut reg = TypeRegistry::new();
        let base = reg.alloc_class("LightSource");
        let light = reg.alloc_class("Light");
        reg.class_mut(base)
            .properties
            .insert("intensity".to_string(), int());
        reg.class_mut(light).supers.push(base.0);

        assert_eq!(reg.class_property(light, "intensity"), Some(int()));
        assert_eq!(reg.class_property(light, "missing"), None);
    }

    #[test]
    fn test_interface_func_searches_supers() {
        let mut reg = TypeRegistry::new();
        let drawable = reg.alloc_interface("Drawable");
        let visible = reg.alloc_interface("Visible");
        let draw = Type::Func(Box::new(FuncType {
            params: Tuple::empty(),
            results: Tuple::empty(),
        }));
        reg.interface_mut(drawable)
            .funcs
            .insert("draw".to_string(), draw.clone());
        reg.interface_mut(visible).supers.push(drawable);

        assert_eq!(reg.interface_func(visible, "draw"), Some(draw));
    }

    #[test]
    fn test_flatten_single() {
        let single = Type::Tuple(Tuple::new(vec![Type::Bool]));
        assert_eq!(flatten_single(&single), &Type::Bool);

        let pair = Type::Tuple(Tuple::new(vec![Type::Bool, int()]));
        assert_eq!(flatten_single(&pair), &pair);

        assert_eq!(flatten_single(&int()), &int());
    }

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(1), 1);
        assert_eq!(bits_needed(2), 1);
        assert_eq!(bits_needed(3), 2);
        assert_eq!(bits_needed(5), 3);
        assert_eq!(bits_needed(256), 8);
        assert_eq!(bits_needed(257), 9);
    }

    #[test]
    fn test_smallest_numeric() {
        assert_eq!(
            smallest_numeric(3, false),
            Type::Numeric {
                bits: 8,
                signed: false
            }
        );
        assert_eq!(
            smallest_numeric(9, false),
            Type::Numeric {
                bits: 16,
                signed: false
            }
        );
        assert_eq!(
            smallest_numeric(250, true),
            Type::Numeric {
                bits: 256,
                signed: true
            }
        );
    }
}
