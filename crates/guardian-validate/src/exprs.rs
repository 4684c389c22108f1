//! Expression type resolution.
//!
//! Every expression node resolves to exactly one [`Type`]; the result is
//! memoized in the validator's node table, so each node resolves once per
//! compilation. Failed resolutions substitute `Invalid` (alongside a
//! diagnostic) or `Unknown` (identifiers, which assignment may yet declare)
//! so sibling checks keep running.

use crate::Validator;
use crate::error::{CompileError, ErrorKind};
use crate::scope::ScopeOwner;
use crate::types::{
    FuncType, Tuple, Type, bits_needed, flatten_single, is_subscriptable, resolve_underlying,
    smallest_numeric,
};
use guardian_ast::foundation::Span;
use guardian_ast::{Expr, ExprKind, LifecycleKind};

impl<'ast> Validator<'ast> {
    /// Resolve the type of an expression, memoized by node id.
    pub(crate) fn resolve_expression(&mut self, expr: &'ast Expr) -> Type {
        if let Some(t) = self.types.get(&expr.id) {
            return t.clone();
        }
        let t = self.resolve_expression_uncached(expr);
        self.types.insert(expr.id, t.clone());
        t
    }

    fn resolve_expression_uncached(&mut self, expr: &'ast Expr) -> Type {
        match &expr.kind {
            ExprKind::Literal(lit) => match self.config.literals.get(&lit.kind()).copied() {
                Some(rule) => rule(lit),
                None => {
                    self.error(
                        ErrorKind::UnsupportedLiteral,
                        expr.span,
                        format!("{:?} literals are not supported", lit.kind()),
                    );
                    Type::Invalid
                }
            },

            ExprKind::Identifier(name) => self.is_var_visible(name).unwrap_or(Type::Unknown),

            ExprKind::Binary { op, left, right } => {
                let left = self.resolve_expression(left);
                let right = self.resolve_expression(right);
                match self.config.operators.get(op).copied() {
                    Some(rule) => rule(&self.registry, &left, &right),
                    None => {
                        self.error(
                            ErrorKind::UnknownOperator,
                            expr.span,
                            format!("operator '{}' has no type rule", op),
                        );
                        Type::Invalid
                    }
                }
            }

            ExprKind::Unary { operand, .. } => self.resolve_expression(operand),

            // The array type comes from the declared signature, never from
            // the elements
            ExprKind::ArrayLiteral {
                signature,
                elements,
            } => {
                for element in elements {
                    self.resolve_expression(element);
                }
                self.resolve_type_node(signature)
            }

            ExprKind::MapLiteral { signature, entries } => {
                for (key, value) in entries {
                    self.resolve_expression(key);
                    self.resolve_expression(value);
                }
                self.resolve_type_node(signature)
            }

            ExprKind::FuncLiteral {
                params,
                results,
                body,
            } => {
                let param_slots = self.resolve_param_slots(params);
                let mut result_types = Vec::new();
                for r in results {
                    result_types.push(self.resolve_type_node(r));
                }
                let func = Type::Func(Box::new(FuncType {
                    params: Tuple::new(param_slots),
                    results: Tuple::new(result_types),
                }));

                self.enter_scope(Some(body), Some(ScopeOwner::Func));
                self.declare_params(params);
                self.validate_scope_items(body);
                self.exit_scope();

                func
            }

            ExprKind::CompositeLiteral { type_name, fields } => {
                for (_, value) in fields {
                    self.resolve_expression(value);
                }
                // The visible lookup falls back to pending declarations, so
                // `Light{}` resolves even when `class Light` appears later
                let t = match type_name.plain_name() {
                    Some(name) => match self.is_type_visible(&name) {
                        Some(t) => t,
                        None => {
                            self.error(
                                ErrorKind::UndefinedType,
                                type_name.span,
                                format!("unknown type '{}'", name),
                            );
                            Type::Invalid
                        }
                    },
                    None => {
                        self.error(
                            ErrorKind::UndefinedType,
                            type_name.span,
                            "composite literal requires a named type".to_string(),
                        );
                        Type::Invalid
                    }
                };
                self.types.insert(type_name.id, t.clone());
                t
            }

            ExprKind::Index { base, index } => {
                let base_t = self.resolve_expression(base);
                self.resolve_expression(index);
                match resolve_underlying(flatten_single(&base_t)) {
                    Type::Array(array) => array.element.clone(),
                    Type::Map(map) => map.value.clone(),
                    Type::Invalid => Type::Invalid,
                    _ => {
                        self.error(
                            ErrorKind::InvalidSubscript,
                            expr.span,
                            format!(
                                "cannot index '{}' (not an array or map)",
                                self.registry.display(&base_t)
                            ),
                        );
                        Type::Invalid
                    }
                }
            }

            ExprKind::Slice { base, low, high } => {
                let base_t = self.resolve_expression(base);
                if let Some(low) = low {
                    self.resolve_expression(low);
                }
                if let Some(high) = high {
                    self.resolve_expression(high);
                }
                match resolve_underlying(flatten_single(&base_t)) {
                    // A slice of an array is that same array type
                    Type::Array(_) => flatten_single(&base_t).clone(),
                    Type::Invalid => Type::Invalid,
                    _ => {
                        self.error(
                            ErrorKind::InvalidSubscript,
                            expr.span,
                            format!(
                                "cannot slice '{}' (not an array)",
                                self.registry.display(&base_t)
                            ),
                        );
                        Type::Invalid
                    }
                }
            }

            ExprKind::Call { callee, args } => self.resolve_call(expr.span, callee, args),

            ExprKind::Reference { parent, member } => {
                let mut context = self.resolve_expression(parent);
                // `Day.Monday`: an unresolved parent may name a type (enum
                // items, nested types) rather than a variable
                if matches!(context, Type::Unknown)
                    && let ExprKind::Identifier(name) = &parent.kind
                    && let Some(t) = self.is_type_visible(name)
                {
                    self.types.insert(parent.id, t.clone());
                    context = t;
                }
                if matches!(context, Type::Invalid) {
                    return Type::Invalid;
                }
                self.resolve_contextual_reference(context, member)
            }
        }
    }

    /// Resolve a call: a function call, or a constructor call when the
    /// callee names a type instead of a variable.
    fn resolve_call(&mut self, span: Span, callee: &'ast Expr, args: &'ast [Expr]) -> Type {
        let callee_t = self.resolve_expression(callee);
        let target = if matches!(callee_t, Type::Unknown) {
            // An unresolved callee may be a type name: `Dog()` constructs
            match &callee.kind {
                ExprKind::Identifier(name) => self.is_type_visible(name).unwrap_or(Type::Unknown),
                _ => Type::Unknown,
            }
        } else {
            callee_t.clone()
        };

        let args_tuple = self.expression_tuple(args);
        match resolve_underlying(&target).clone() {
            Type::Func(func) => {
                if !self.registry.compare_tuples(&func.params, &args_tuple) {
                    self.error(
                        ErrorKind::ArgumentMismatch,
                        span,
                        format!(
                            "arguments {} do not match parameters {}",
                            self.registry.display_tuple(&args_tuple),
                            self.registry.display_tuple(&func.params)
                        ),
                    );
                }
                Type::Tuple(func.results)
            }
            Type::Class(id) => {
                self.check_constructor_call(span, &Type::Class(id), &args_tuple);
                Type::Class(id)
            }
            Type::Contract(id) => {
                self.check_constructor_call(span, &Type::Contract(id), &args_tuple);
                Type::Contract(id)
            }
            Type::Invalid => Type::Invalid,
            _ => {
                self.error(
                    ErrorKind::InvalidCall,
                    span,
                    format!(
                        "'{}' is neither callable nor constructible",
                        self.registry.display(&target)
                    ),
                );
                Type::Invalid
            }
        }
    }

    /// Check a constructor call against the declared overload set.
    ///
    /// An empty argument list passes when no constructors are declared at
    /// all; otherwise some overload's parameter tuple must match.
    fn check_constructor_call(&mut self, span: Span, aggregate: &Type, args: &Tuple) {
        let (name, constructors) = match aggregate {
            Type::Class(id) => {
                let def = self.registry.class(*id);
                (
                    def.name.clone(),
                    def.lifecycles
                        .get(&LifecycleKind::Constructor)
                        .cloned()
                        .unwrap_or_default(),
                )
            }
            Type::Contract(id) => {
                let def = self.registry.contract(*id);
                (
                    def.name.clone(),
                    def.lifecycles
                        .get(&LifecycleKind::Constructor)
                        .cloned()
                        .unwrap_or_default(),
                )
            }
            _ => return,
        };

        if constructors.is_empty() && args.is_empty() {
            return;
        }
        for constructor in &constructors {
            let params = Tuple::new(constructor.params.clone());
            if self.registry.compare_tuples(&params, args) {
                return;
            }
        }
        self.error(
            ErrorKind::ConstructorMismatch,
            span,
            format!(
                "no constructor of '{}' accepts {}",
                name,
                self.registry.display_tuple(args)
            ),
        );
    }

    /// Resolve a member access against a context type.
    ///
    /// The context must be subscriptable; the member's leftmost identifier
    /// is looked up as a property of the context, pre-bound, and the member
    /// expression is then resolved through the normal rules — so calls,
    /// indexing and deeper references all compose against the bound
    /// property.
    fn resolve_contextual_reference(&mut self, context: Type, member: &'ast Expr) -> Type {
        let under = resolve_underlying(flatten_single(&context)).clone();
        if !is_subscriptable(&under) {
            self.error(
                ErrorKind::NotSubscriptable,
                member.span,
                format!("type '{}' has no members", self.registry.display(&context)),
            );
            return Type::Invalid;
        }
        let Some(name) = member.root_identifier() else {
            self.error(
                ErrorKind::UnnamedReference,
                member.span,
                "reference member must be a name".to_string(),
            );
            return Type::Invalid;
        };
        let Some(property) = self.property_type(&under, name) else {
            self.error(
                ErrorKind::PropertyNotFound,
                member.span,
                format!(
                    "'{}' has no property '{}'",
                    self.registry.display(&context),
                    name
                ),
            );
            return Type::Invalid;
        };
        if let Some(root) = root_identifier_expr(member) {
            self.types.insert(root.id, property);
        }
        self.resolve_expression(member)
    }

    /// A named member of a subscriptable type.
    ///
    /// Enum items resolve to the smallest unsigned tier that can index the
    /// item list.
    fn property_type(&self, context: &Type, name: &str) -> Option<Type> {
        match context {
            Type::Class(id) => self
                .registry
                .class_property(*id, name)
                .or_else(|| self.registry.class_nested_type(*id, name)),
            Type::Contract(id) => self
                .registry
                .contract_property(*id, name)
                .or_else(|| self.registry.contract_nested_type(*id, name)),
            Type::Interface(id) => self.registry.interface_func(*id, name),
            Type::Enum(id) => {
                let def = self.registry.enum_def(*id);
                def.items
                    .iter()
                    .any(|item| item == name)
                    .then(|| smallest_numeric(bits_needed(def.items.len()), false))
            }
            _ => None,
        }
    }

    /// Resolve an expression list to its combined type tuple.
    ///
    /// Tuple-valued expressions flatten into individual slots, so a
    /// multi-result call contributes one slot per result.
    pub(crate) fn expression_tuple(&mut self, exprs: &'ast [Expr]) -> Tuple {
        let mut types = Vec::new();
        for expr in exprs {
            match self.resolve_expression(expr) {
                Type::Tuple(tuple) => types.extend(tuple.types),
                t => types.push(t),
            }
        }
        Tuple::new(types)
    }

    pub(crate) fn error(&mut self, kind: ErrorKind, span: Span, message: String) {
        self.diagnostics.push(CompileError::new(kind, span, message));
    }
}

/// The expression node holding the leftmost identifier.
fn root_identifier_expr(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Identifier(_) => Some(expr),
        ExprKind::Call { callee, .. } => root_identifier_expr(callee),
        ExprKind::Index { base, .. } => root_identifier_expr(base),
        ExprKind::Slice { base, .. } => root_identifier_expr(base),
        ExprKind::Reference { parent, .. } => root_identifier_expr(parent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidatorConfig;
    use guardian_lexer::tokenize;
    use guardian_parser::parse_expression;

    fn int() -> Type {
        Type::Numeric {
            bits: 256,
            signed: true,
        }
    }

    fn resolve(src: &str) -> (Type, Vec<CompileError>) {
        let (tokens, lex_errors) = tokenize(src);
        assert!(lex_errors.is_empty(), "lex errors in {:?}", src);
        let expr = parse_expression(&tokens, 0).expect("expression parses");
        let mut v = Validator::new(ValidatorConfig::default());
        let t = v.resolve_expression(&expr);
        (t, v.diagnostics)
    }

    #[test]
    fn test_literals() {
        assert_eq!(resolve("5").0, int());
        assert_eq!(resolve("true").0, Type::Bool);
        let (t, diags) = resolve("\"hello\"");
        assert!(matches!(t, Type::Aliased(_)));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_binary_operators() {
        assert_eq!(resolve("1 + 2").0, int());
        assert_eq!(resolve("1 < 2").0, Type::Bool);
        assert_eq!(resolve("true && false").0, Type::Bool);
        // String concatenation
        assert!(matches!(resolve("\"a\" + \"b\"").0, Type::Aliased(_)));
        // Numeric operator over booleans has no result type
        assert_eq!(resolve("true + false").0, Type::Invalid);
    }

    #[test]
    fn test_unary_is_operand_type() {
        assert_eq!(resolve("!true").0, Type::Bool);
        assert_eq!(resolve("-5").0, int());
    }

    #[test]
    fn test_unresolved_identifier_is_unknown() {
        let (t, diags) = resolve("mystery");
        assert_eq!(t, Type::Unknown);
        // No diagnostic: assignment may still declare it
        assert!(diags.is_empty());
    }

    #[test]
    fn test_array_literal_typed_from_signature() {
        let (t, diags) = resolve("[]int{1, 2, 3}");
        match t {
            Type::Array(array) => assert_eq!(array.element, int()),
            other => panic!("expected array, got {:?}", other),
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_index_and_slice() {
        let (t, _) = resolve("[]int{1, 2}[0]");
        assert_eq!(t, int());

        let (t, _) = resolve("[]int{1, 2}[0:1]");
        assert!(matches!(t, Type::Array(_)));

        let (t, diags) = resolve("true[0]");
        assert_eq!(t, Type::Invalid);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::InvalidSubscript);
    }

    #[test]
    fn test_composite_literal_of_unknown_type() {
        let (t, diags) = resolve("Ghost{}");
        assert_eq!(t, Type::Invalid);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::UndefinedType);
    }

    #[test]
    fn test_call_on_non_callable() {
        let (t, diags) = resolve("5(1)");
        assert_eq!(t, Type::Invalid);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::InvalidCall);
    }

    #[test]
    fn test_func_literal_type() {
        let (t, diags) = resolve("func(a int) bool { return true }");
        match t {
            Type::Func(f) => {
                assert_eq!(f.params.types, vec![int()]);
                assert_eq!(f.results.types, vec![Type::Bool]);
            }
            other => panic!("expected func, got {:?}", other),
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_reference_on_non_subscriptable() {
        let (t, diags) = resolve("5.name");
        assert_eq!(t, Type::Invalid);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::NotSubscriptable);
    }

    #[test]
    fn test_expression_tuple_flattens() {
        use guardian_ast::foundation::Span;
        use guardian_ast::{Literal, NodeId};

        let span = Span::new(0, 0, 1, 1);
        let exprs = vec![
            Expr::new(NodeId(100), ExprKind::Literal(Literal::Integer(1)), span),
            Expr::new(NodeId(101), ExprKind::Literal(Literal::Bool(true)), span),
        ];
        let mut v = Validator::new(ValidatorConfig::default());
        let tuple = v.expression_tuple(&exprs);
        assert_eq!(tuple.types, vec![int(), Type::Bool]);
    }
}
