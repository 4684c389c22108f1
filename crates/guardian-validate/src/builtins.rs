//! The language profile: primitives, builtins, operator and literal rules.
//!
//! The original system kept these as process-wide tables; here they are
//! explicit configuration handed to the [`Validator`] at construction, so
//! independent compilations can run with independent (or customized)
//! profiles. [`ValidatorConfig::guardian`] is the stock profile.

use crate::types::{AliasedType, ArrayType, Type, TypeRegistry, flatten_single, resolve_underlying};
use guardian_ast::foundation::BinaryOp;
use guardian_ast::{Literal, LiteralKind};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Result-type rule for one binary operator.
pub type OperatorRule = fn(&TypeRegistry, &Type, &Type) -> Type;

/// Type rule for one literal kind.
pub type LiteralRule = fn(&Literal) -> Type;

/// Language-provided globals, consulted before any scope walk.
#[derive(Debug, Clone, Default)]
pub struct BuiltinScope {
    pub variables: IndexMap<String, Type>,
    pub types: IndexMap<String, Type>,
}

/// Everything the validator knows about the language profile.
pub struct ValidatorConfig {
    /// Fixed built-in type names
    pub primitives: IndexMap<String, Type>,
    /// Language-provided globals
    pub builtins: BuiltinScope,
    /// Binary-operator type rules
    pub operators: HashMap<BinaryOp, OperatorRule>,
    /// Literal-kind type rules
    pub literals: HashMap<LiteralKind, LiteralRule>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::guardian()
    }
}

impl ValidatorConfig {
    /// The stock Guardian profile.
    ///
    /// Numerics come in 8-bit tiers up to 256 bits; `int`/`uint` are the
    /// widest tier. `string` is an aliased byte array, `address` an aliased
    /// `uint160`. Float literals have no rule: the numeric model is
    /// integer-only, and a float in source reports an unsupported-literal
    /// diagnostic.
    pub fn guardian() -> Self {
        let mut primitives = IndexMap::new();
        primitives.insert("bool".to_string(), Type::Bool);
        for bits in (8..=256u16).step_by(8) {
            primitives.insert(format!("int{}", bits), Type::Numeric { bits, signed: true });
            primitives.insert(
                format!("uint{}", bits),
                Type::Numeric {
                    bits,
                    signed: false,
                },
            );
        }
        primitives.insert("int".to_string(), int_type());
        primitives.insert("uint".to_string(), uint_type());
        primitives.insert("byte".to_string(), byte_type());
        primitives.insert("string".to_string(), string_type());
        primitives.insert("address".to_string(), address_type());

        let mut operators: HashMap<BinaryOp, OperatorRule> = HashMap::new();
        operators.insert(BinaryOp::Add, add_rule);
        for op in [
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Mod,
            BinaryOp::Exp,
            BinaryOp::BitAnd,
            BinaryOp::BitOr,
            BinaryOp::Xor,
            BinaryOp::Shl,
            BinaryOp::Shr,
        ] {
            operators.insert(op, numeric_rule);
        }
        for op in [
            BinaryOp::Eql,
            BinaryOp::Neq,
            BinaryOp::Lss,
            BinaryOp::Leq,
            BinaryOp::Gtr,
            BinaryOp::Geq,
            BinaryOp::And,
            BinaryOp::Or,
        ] {
            operators.insert(op, boolean_rule);
        }

        let mut literals: HashMap<LiteralKind, LiteralRule> = HashMap::new();
        literals.insert(LiteralKind::Integer, integer_literal);
        literals.insert(LiteralKind::Str, string_literal);
        literals.insert(LiteralKind::Char, char_literal);
        literals.insert(LiteralKind::Bool, bool_literal);

        Self {
            primitives,
            builtins: BuiltinScope::default(),
            operators,
            literals,
        }
    }
}

/// Default signed integer: `int256`.
pub(crate) fn int_type() -> Type {
    Type::Numeric {
        bits: 256,
        signed: true,
    }
}

/// Default unsigned integer: `uint256`.
pub(crate) fn uint_type() -> Type {
    Type::Numeric {
        bits: 256,
        signed: false,
    }
}

pub(crate) fn byte_type() -> Type {
    Type::Numeric {
        bits: 8,
        signed: false,
    }
}

/// `string`: an aliased open byte array.
pub(crate) fn string_type() -> Type {
    Type::Aliased(Box::new(AliasedType {
        name: "string".to_string(),
        underlying: Type::Array(Box::new(ArrayType {
            element: byte_type(),
            length: None,
            variadic: false,
        })),
    }))
}

/// `address`: an aliased 160-bit unsigned integer.
pub(crate) fn address_type() -> Type {
    Type::Aliased(Box::new(AliasedType {
        name: "address".to_string(),
        underlying: Type::Numeric {
            bits: 160,
            signed: false,
        },
    }))
}

fn integer_literal(_lit: &Literal) -> Type {
    int_type()
}

fn string_literal(_lit: &Literal) -> Type {
    string_type()
}

fn char_literal(_lit: &Literal) -> Type {
    byte_type()
}

fn bool_literal(_lit: &Literal) -> Type {
    Type::Bool
}

/// `+` concatenates strings and adds numerics.
fn add_rule(reg: &TypeRegistry, left: &Type, right: &Type) -> Type {
    let string = string_type();
    if reg.compare(left, &string) || reg.compare(right, &string) {
        return string;
    }
    numeric_rule(reg, left, right)
}

/// Arithmetic, bitwise and shift operators: both operands numeric, the
/// result wide enough for either.
fn numeric_rule(_reg: &TypeRegistry, left: &Type, right: &Type) -> Type {
    let left = resolve_underlying(flatten_single(left));
    let right = resolve_underlying(flatten_single(right));
    match (left, right) {
        (
            Type::Numeric {
                bits: lb,
                signed: ls,
            },
            Type::Numeric {
                bits: rb,
                signed: rs,
            },
        ) => Type::Numeric {
            bits: (*lb).max(*rb),
            signed: *ls || *rs,
        },
        _ => Type::Invalid,
    }
}

/// Comparison, equality and logical operators all produce `bool`.
fn boolean_rule(_reg: &TypeRegistry, _left: &Type, _right: &Type) -> Type {
    Type::Bool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_tiers() {
        let config = ValidatorConfig::guardian();
        assert_eq!(config.primitives.get("bool"), Some(&Type::Bool));
        assert_eq!(
            config.primitives.get("int64"),
            Some(&Type::Numeric {
                bits: 64,
                signed: true
            })
        );
        assert_eq!(config.primitives.get("int"), Some(&int_type()));
        assert_eq!(config.primitives.get("uint"), Some(&uint_type()));
        assert!(config.primitives.contains_key("uint8"));
        assert!(config.primitives.contains_key("uint256"));
        assert!(!config.primitives.contains_key("int257"));
    }

    #[test]
    fn test_every_operator_has_a_rule() {
        let config = ValidatorConfig::guardian();
        for op in [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Mod,
            BinaryOp::Exp,
            BinaryOp::BitAnd,
            BinaryOp::BitOr,
            BinaryOp::Xor,
            BinaryOp::Shl,
            BinaryOp::Shr,
            BinaryOp::Eql,
            BinaryOp::Neq,
            BinaryOp::Lss,
            BinaryOp::Leq,
            BinaryOp::Gtr,
            BinaryOp::Geq,
            BinaryOp::And,
            BinaryOp::Or,
        ] {
            assert!(config.operators.contains_key(&op), "missing rule for {op}");
        }
    }

    #[test]
    fn test_float_literals_are_unsupported() {
        let config = ValidatorConfig::guardian();
        assert!(!config.literals.contains_key(&LiteralKind::Float));
        assert!(config.literals.contains_key(&LiteralKind::Integer));
    }

    #[test]
    fn test_numeric_rule_widens() {
        let reg = TypeRegistry::new();
        let narrow = Type::Numeric {
            bits: 8,
            signed: false,
        };
        let result = numeric_rule(&reg, &narrow, &int_type());
        assert_eq!(
            result,
            Type::Numeric {
                bits: 256,
                signed: true
            }
        );

        assert_eq!(numeric_rule(&reg, &Type::Bool, &int_type()), Type::Invalid);
    }

    #[test]
    fn test_add_concatenates_strings() {
        let reg = TypeRegistry::new();
        assert_eq!(
            add_rule(&reg, &string_type(), &string_type()),
            string_type()
        );
        assert_eq!(
            add_rule(&reg, &int_type(), &int_type()),
            Type::Numeric {
                bits: 256,
                signed: true
            }
        );
    }
}
