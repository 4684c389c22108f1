//! Type annotation nodes.

use super::{NodeId, VarDecl};
use crate::foundation::Span;

/// A type annotation as written in source.
///
/// Resolution to a semantic type happens in the validator; these nodes only
/// record what the programmer wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub id: NodeId,
    pub span: Span,
    pub kind: TypeKind,
}

/// Kinds of type annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Named type, possibly dotted: `LightSource`, `pkg.Type`
    Plain {
        names: Vec<String>,
        /// `...T` variadic marker
        variadic: bool,
    },
    /// Array type: `[]int`, `[3]string`, `...[]int`
    Array {
        element: Box<TypeNode>,
        /// Fixed length, if written (`[3]string`)
        length: Option<u64>,
        variadic: bool,
    },
    /// Map type: `map[string]int`
    Map {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
        variadic: bool,
    },
    /// Function type: `func(int, string) bool`
    ///
    /// Parameters may be written named (`func(a int)`) or bare; named groups
    /// are kept so each identifier contributes one parameter slot.
    Func {
        params: Vec<FuncTypeParam>,
        results: Vec<TypeNode>,
        variadic: bool,
    },
}

/// One parameter group in a function type.
#[derive(Debug, Clone, PartialEq)]
pub enum FuncTypeParam {
    /// Bare type: `func(int)`
    Type(TypeNode),
    /// Named group: `func(a, b int)` — contributes one slot per identifier
    Named(VarDecl),
}

impl TypeNode {
    /// The plain dotted name, if this is a plain type.
    pub fn plain_name(&self) -> Option<String> {
        match &self.kind {
            TypeKind::Plain { names, .. } => Some(names.join(".")),
            _ => None,
        }
    }
}

/// A named function signature, as listed in interface bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncSignature {
    pub id: NodeId,
    pub span: Span,
    pub identifier: String,
    pub params: Vec<FuncTypeParam>,
    pub results: Vec<TypeNode>,
}
