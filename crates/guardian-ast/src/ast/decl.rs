//! Declaration nodes.

use super::{FuncSignature, NodeId, Scope, TypeNode};
use crate::foundation::Span;

/// A declaration node.
///
/// Declarations are what the scope model resolves lazily: the validator
/// keys its per-declaration resolution state (unresolved / in progress /
/// resolved) by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub id: NodeId,
    pub span: Span,
    pub kind: DeclKind,
}

/// Kinds of declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Class(ClassDecl),
    Contract(ContractDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Func(FuncDecl),
    Lifecycle(LifecycleDecl),
    TypeAlias(TypeAliasDecl),
    Event(EventDecl),
    Var(VarDecl),
}

impl Declaration {
    /// Whether `name` is introduced by this declaration.
    ///
    /// Var declarations introduce every listed identifier; lifecycles
    /// introduce no name at all (they register by kind instead).
    pub fn declares(&self, name: &str) -> bool {
        match &self.kind {
            DeclKind::Class(c) => c.identifier == name,
            DeclKind::Contract(c) => c.identifier == name,
            DeclKind::Interface(i) => i.identifier == name,
            DeclKind::Enum(e) => e.identifier == name,
            DeclKind::Func(f) => f.identifier == name,
            DeclKind::Lifecycle(_) => false,
            DeclKind::TypeAlias(t) => t.identifier == name,
            DeclKind::Event(e) => e.identifier == name,
            DeclKind::Var(v) => v.identifiers.iter().any(|id| id == name),
        }
    }
}

/// Class declaration: `class Light inherits LightSource is Visible { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub identifier: String,
    /// Declared super classes (plain type names)
    pub supers: Vec<TypeNode>,
    /// Declared interfaces (plain type names)
    pub interfaces: Vec<TypeNode>,
    pub body: Scope,
}

/// Contract declaration; shares the class grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDecl {
    pub identifier: String,
    pub supers: Vec<TypeNode>,
    pub interfaces: Vec<TypeNode>,
    pub body: Scope,
}

/// Interface declaration: a named set of function signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub identifier: String,
    pub supers: Vec<TypeNode>,
    pub signatures: Vec<FuncSignature>,
}

/// Enum declaration: ordered item identifiers, with enum inheritance.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub identifier: String,
    pub supers: Vec<TypeNode>,
    pub items: Vec<String>,
}

/// Function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub identifier: String,
    pub params: Vec<VarDecl>,
    pub results: Vec<TypeNode>,
    pub body: Scope,
}

/// Lifecycle method kind.
///
/// Lifecycles are keyed by kind rather than name; each kind holds an
/// overload set distinguished by parameter tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecycleKind {
    Constructor,
    Destructor,
    Fallback,
}

impl std::fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleKind::Constructor => write!(f, "constructor"),
            LifecycleKind::Destructor => write!(f, "destructor"),
            LifecycleKind::Fallback => write!(f, "fallback"),
        }
    }
}

/// Lifecycle declaration: `constructor(name string) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleDecl {
    pub kind: LifecycleKind,
    pub params: Vec<VarDecl>,
    pub body: Scope,
}

/// Type alias declaration: `type Balance uint256`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub identifier: String,
    pub value: TypeNode,
}

/// Event declaration: `event Transfer(from address, to address)`
#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub identifier: String,
    pub params: Vec<VarDecl>,
}

/// Explicit variable declaration: `item LightSource`, `a, b int`.
///
/// Also used for function/lifecycle/event parameter groups.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub span: Span,
    pub identifiers: Vec<String>,
    pub declared_type: TypeNode,
}
