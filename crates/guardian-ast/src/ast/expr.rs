//! Expression nodes.

use super::{NodeId, Scope, TypeNode, VarDecl};
use crate::foundation::{BinaryOp, Span, UnaryOp};
use std::rc::Rc;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

impl Expr {
    /// Create a new expression node.
    pub fn new(id: NodeId, kind: ExprKind, span: Span) -> Self {
        Self { id, span, kind }
    }

    /// The identifier behind this expression, if it bottoms out in one.
    ///
    /// Walks through calls, slices, indices and references to the leftmost
    /// identifier; used for assignment-target declaration and for member
    /// names in reference chains.
    pub fn root_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            ExprKind::Call { callee, .. } => callee.root_identifier(),
            ExprKind::Slice { base, .. } => base.root_identifier(),
            ExprKind::Index { base, .. } => base.root_identifier(),
            ExprKind::Reference { parent, .. } => parent.root_identifier(),
            _ => None,
        }
    }
}

/// Kinds of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal constant
    Literal(Literal),
    /// Plain identifier
    Identifier(String),
    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Prefix unary operation
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Array literal with declared signature: `[3]string{"a", "b", "c"}`
    ArrayLiteral {
        signature: Box<TypeNode>,
        elements: Vec<Expr>,
    },
    /// Map literal with declared signature: `map[string]int{"a": 1}`
    MapLiteral {
        signature: Box<TypeNode>,
        entries: Vec<(Expr, Expr)>,
    },
    /// Function literal
    FuncLiteral {
        params: Vec<VarDecl>,
        results: Vec<TypeNode>,
        body: Scope,
    },
    /// Composite literal: `Light{intensity: 5}`
    CompositeLiteral {
        type_name: Box<TypeNode>,
        fields: Vec<(String, Expr)>,
    },
    /// Index expression: `a[i]`
    Index { base: Box<Expr>, index: Box<Expr> },
    /// Slice expression: `a[1:2]`, `a[:2]`, `a[1:]`
    Slice {
        base: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
    },
    /// Call expression: `f(x)`, `Dog()` (constructor)
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// Member reference: `a.b`; chains nest in `member`
    Reference { parent: Box<Expr>, member: Box<Expr> },
}

/// Literal constant values.
///
/// Uses `Rc<str>` for string data, matching the lexer's token payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Str(Rc<str>),
    Char(char),
    Bool(bool),
}

/// Literal kind tag, the key of the validator's literal-rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Float,
    Str,
    Char,
    Bool,
}

impl Literal {
    /// The kind tag of this literal.
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Integer(_) => LiteralKind::Integer,
            Literal::Float(_) => LiteralKind::Float,
            Literal::Str(_) => LiteralKind::Str,
            Literal::Char(_) => LiteralKind::Char,
            Literal::Bool(_) => LiteralKind::Bool,
        }
    }
}
