//! Human-readable type rendering for diagnostics.
//!
//! Rendering is deterministic and used only in messages, never in control
//! flow. Aggregate types print their declared name, aliases print their
//! alias (identity is preserved for diagnostics even though semantics defer
//! to the underlying type).

use crate::types::{Tuple, Type, TypeRegistry};
use std::fmt;

/// Display adapter binding a type to the registry its ids point into.
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    registry: &'a TypeRegistry,
}

impl TypeRegistry {
    /// Render `ty` for a diagnostic message.
    pub fn display<'a>(&'a self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay { ty, registry: self }
    }

    /// Render a tuple (used for argument lists in messages).
    pub fn display_tuple(&self, tuple: &Tuple) -> String {
        format!("{}", self.display(&Type::Tuple(tuple.clone())))
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self.ty, self.registry)
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, ty: &Type, reg: &TypeRegistry) -> fmt::Result {
    match ty {
        Type::Invalid => write!(f, "invalid"),
        Type::Unknown => write!(f, "unknown"),
        Type::Bool => write!(f, "bool"),
        Type::Numeric { bits, signed } => {
            if *signed {
                write!(f, "int{}", bits)
            } else {
                write!(f, "uint{}", bits)
            }
        }
        Type::Array(array) => {
            match array.length {
                Some(len) => write!(f, "[{}]", len)?,
                None => write!(f, "[]")?,
            }
            write_type(f, &array.element, reg)
        }
        Type::Map(map) => {
            write!(f, "map[")?;
            write_type(f, &map.key, reg)?;
            write!(f, "]")?;
            write_type(f, &map.value, reg)
        }
        Type::Func(func) => {
            write!(f, "func")?;
            write_tuple(f, &func.params, reg)?;
            write_tuple(f, &func.results, reg)
        }
        Type::Tuple(tuple) => write_tuple(f, tuple, reg),
        Type::Aliased(aliased) => write!(f, "{}", aliased.name),
        Type::Class(id) => write!(f, "{}", reg.class(*id).name),
        Type::Contract(id) => write!(f, "{}", reg.contract(*id).name),
        Type::Interface(id) => write!(f, "{}", reg.interface(*id).name),
        Type::Enum(id) => write!(f, "{}", reg.enum_def(*id).name),
        Type::Event(event) => {
            write!(f, "event")?;
            write_tuple(f, &event.params, reg)
        }
    }
}

fn write_tuple(f: &mut fmt::Formatter<'_>, tuple: &Tuple, reg: &TypeRegistry) -> fmt::Result {
    write!(f, "(")?;
    for (i, ty) in tuple.types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_type(f, ty, reg)?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AliasedType, ArrayType, FuncType, MapType};

    fn int() -> Type {
        Type::Numeric {
            bits: 256,
            signed: true,
        }
    }

    #[test]
    fn test_primitive_rendering() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.display(&Type::Bool).to_string(), "bool");
        assert_eq!(reg.display(&int()).to_string(), "int256");
        assert_eq!(
            reg.display(&Type::Numeric {
                bits: 8,
                signed: false
            })
            .to_string(),
            "uint8"
        );
        assert_eq!(reg.display(&Type::Invalid).to_string(), "invalid");
        assert_eq!(reg.display(&Type::Unknown).to_string(), "unknown");
    }

    #[test]
    fn test_container_rendering() {
        let reg = TypeRegistry::new();
        let array = Type::Array(Box::new(ArrayType {
            element: int(),
            length: None,
            variadic: false,
        }));
        assert_eq!(reg.display(&array).to_string(), "[]int256");

        let fixed = Type::Array(Box::new(ArrayType {
            element: Type::Bool,
            length: Some(3),
            variadic: false,
        }));
        assert_eq!(reg.display(&fixed).to_string(), "[3]bool");

        let map = Type::Map(Box::new(MapType {
            key: int(),
            value: array,
        }));
        assert_eq!(reg.display(&map).to_string(), "map[int256][]int256");
    }

    #[test]
    fn test_func_and_tuple_rendering() {
        let reg = TypeRegistry::new();
        let func = Type::Func(Box::new(FuncType {
            params: Tuple::new(vec![int(), Type::Bool]),
            results: Tuple::new(vec![int()]),
        }));
        assert_eq!(reg.display(&func).to_string(), "func(int256, bool)(int256)");

        let empty = Type::Tuple(Tuple::empty());
        assert_eq!(reg.display(&empty).to_string(), "()");
    }

    #[test]
    fn test_named_types_render_their_names() {
        let mut reg = TypeRegistry::new();
        let class = reg.alloc_class("Light");
        let iface = reg.alloc_interface("Visible");
        assert_eq!(reg.display(&Type::Class(class)).to_string(), "Light");
        assert_eq!(reg.display(&Type::Interface(iface)).to_string(), "Visible");

        let alias = Type::Aliased(Box::new(AliasedType {
            name: "Balance".to_string(),
            underlying: int(),
        }));
        assert_eq!(reg.display(&alias).to_string(), "Balance");
    }
}
