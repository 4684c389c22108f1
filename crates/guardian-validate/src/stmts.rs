//! Statement validation.
//!
//! Statements validate in place: every failed check appends a diagnostic
//! and validation continues, so one pass reports everything wrong with a
//! body. Control-flow bodies validate in child scopes of the current
//! scope.

use crate::Validator;
use crate::error::ErrorKind;
use crate::types::{Type, flatten_single, resolve_underlying};
use guardian_ast::{
    AssignmentStmt, Expr, ExprKind, ForEachStmt, ForStmt, IfStmt, ReturnStmt, Scope, Stmt,
    SwitchStmt,
};

impl<'ast> Validator<'ast> {
    /// Validate every item of a raw scope in the current type scope:
    /// declarations first (those already resolved lazily are skipped),
    /// then the statement sequence.
    pub(crate) fn validate_scope_items(&mut self, scope: &'ast Scope) {
        for decl in &scope.declarations {
            self.validate_declaration(decl);
        }
        for stmt in &scope.sequence {
            self.validate_statement(stmt);
        }
    }

    /// Validate a raw scope in a fresh child scope.
    pub(crate) fn validate_body(&mut self, body: &'ast Scope) {
        self.enter_scope(Some(body), None);
        self.validate_scope_items(body);
        self.exit_scope();
    }

    pub(crate) fn validate_statement(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                self.resolve_expression(expr);
            }
            Stmt::Assignment(assignment) => self.validate_assignment(assignment),
            Stmt::If(node) => self.validate_if(node),
            Stmt::For(node) => self.validate_for(node),
            Stmt::ForEach(node) => self.validate_for_each(node),
            Stmt::Switch(node) => self.validate_switch(node),
            Stmt::Return(node) => self.validate_return(node),
            Stmt::Declaration(decl) => self.validate_declaration(decl),
            // break/continue carry nothing to check; imports and packages
            // are resolved by the driver, not here
            Stmt::Flow(_) | Stmt::Import(_) | Stmt::Package(_) => {}
        }
    }

    /// Validate an assignment statement.
    ///
    /// Left and right expression lists flatten into type tuples. When the
    /// right side flattens to a single type and the left side has more
    /// slots, the single type broadcasts against every target; otherwise
    /// the tuples must match element-wise in arity and assignability. A
    /// left-hand identifier whose type is still unknown is declared with
    /// the corresponding right-hand type — this is what `:=` and inferred
    /// declarations bottom out in.
    pub(crate) fn validate_assignment(&mut self, node: &'ast AssignmentStmt) {
        for right in &node.right {
            let t = self.resolve_expression(right);
            // A right-hand side must already mean something
            if matches!(t, Type::Unknown)
                && let ExprKind::Identifier(name) = &right.kind
            {
                self.error(
                    ErrorKind::UndefinedName,
                    right.span,
                    format!("undefined name '{}'", name),
                );
            }
        }

        for left in &node.left {
            if matches!(
                left.kind,
                ExprKind::Call { .. }
                    | ExprKind::Literal(_)
                    | ExprKind::MapLiteral { .. }
                    | ExprKind::ArrayLiteral { .. }
                    | ExprKind::Slice { .. }
                    | ExprKind::FuncLiteral { .. }
            ) {
                self.error(
                    ErrorKind::InvalidAssignmentTarget,
                    left.span,
                    "expression is not assignable".to_string(),
                );
            }
        }

        let left_tuple = self.expression_tuple(&node.left);
        let right_tuple = self.expression_tuple(&node.right);

        if left_tuple.len() > right_tuple.len() && right_tuple.len() == 1 {
            // Broadcast: one source type checked against every target
            let source = right_tuple.types[0].clone();
            for target in &left_tuple.types {
                if matches!(target, Type::Unknown | Type::Invalid) {
                    continue;
                }
                if !self.registry.assignable_to(&source, target) {
                    self.error(
                        ErrorKind::InvalidAssignment,
                        node.span,
                        format!(
                            "'{}' is not assignable from '{}'",
                            self.registry.display(target),
                            self.registry.display(&source)
                        ),
                    );
                }
            }
            self.declare_unknown_targets(node, &left_tuple.types, |_| source.clone());
        } else {
            if left_tuple.len() != right_tuple.len() {
                self.error(
                    ErrorKind::InvalidAssignment,
                    node.span,
                    format!(
                        "cannot assign {} values to {} targets",
                        right_tuple.len(),
                        left_tuple.len()
                    ),
                );
                return;
            }
            for (target, source) in left_tuple.types.iter().zip(right_tuple.types.iter()) {
                if matches!(target, Type::Unknown | Type::Invalid)
                    || matches!(source, Type::Invalid)
                {
                    continue;
                }
                if !self.registry.assignable_to(source, target) {
                    self.error(
                        ErrorKind::InvalidAssignment,
                        node.span,
                        format!(
                            "'{}' is not assignable from '{}'",
                            self.registry.display(target),
                            self.registry.display(source)
                        ),
                    );
                }
            }
            let sources = right_tuple.types.clone();
            self.declare_unknown_targets(node, &left_tuple.types, |i| sources[i].clone());
        }
    }

    /// Declare left-hand identifiers whose type is still unknown.
    ///
    /// Tuples are not first class, so this only applies when every left
    /// expression contributed exactly one slot.
    fn declare_unknown_targets(
        &mut self,
        node: &'ast AssignmentStmt,
        targets: &[Type],
        source_for: impl Fn(usize) -> Type,
    ) {
        if node.left.len() != targets.len() {
            return;
        }
        for (i, left) in node.left.iter().enumerate() {
            if !matches!(targets[i], Type::Unknown) {
                continue;
            }
            if let ExprKind::Identifier(name) = &left.kind {
                let ty = source_for(i);
                self.declare_var(left.span, name, ty.clone());
                // Fix up the memoized annotation for this occurrence
                self.types.insert(left.id, ty);
            }
        }
    }

    fn validate_if(&mut self, node: &'ast IfStmt) {
        if let Some(init) = &node.init {
            self.validate_statement(init);
        }
        for cond in &node.conditions {
            let t = self.resolve_expression(&cond.condition);
            self.require_condition(&cond.condition, &t);
            self.validate_body(&cond.body);
        }
        if let Some(else_body) = &node.else_body {
            self.validate_body(else_body);
        }
    }

    fn validate_for(&mut self, node: &'ast ForStmt) {
        if let Some(init) = &node.init {
            self.validate_statement(init);
        }
        let t = self.resolve_expression(&node.cond);
        self.require_condition(&node.cond, &t);
        if let Some(post) = &node.post {
            self.validate_statement(post);
        }
        self.validate_body(&node.body);
    }

    /// Conditions must be boolean after alias resolution.
    fn require_condition(&mut self, expr: &Expr, actual: &Type) {
        self.require_type(expr.span, &Type::Bool, actual);
    }

    /// For-each loop variables bind positionally: (index, element) over
    /// arrays, (key, value) over maps.
    fn validate_for_each(&mut self, node: &'ast ForEachStmt) {
        let producer = self.resolve_expression(&node.producer);
        let slots: Vec<Type> = match resolve_underlying(flatten_single(&producer)) {
            Type::Array(array) => vec![crate::builtins::int_type(), array.element.clone()],
            Type::Map(map) => vec![map.key.clone(), map.value.clone()],
            Type::Invalid => Vec::new(),
            _ => {
                self.error(
                    ErrorKind::RequiredType,
                    node.producer.span,
                    format!(
                        "cannot iterate over '{}' (not an array or map)",
                        self.registry.display(&producer)
                    ),
                );
                Vec::new()
            }
        };
        if node.variables.len() > slots.len() && !slots.is_empty() {
            self.error(
                ErrorKind::InvalidAssignment,
                node.span,
                format!(
                    "{} loop variables for {} iteration values",
                    node.variables.len(),
                    slots.len()
                ),
            );
        }

        self.enter_scope(Some(&node.body), None);
        for (i, name) in node.variables.iter().enumerate() {
            // Fail closed: variables beyond the producer's shape stay unknown
            let ty = slots.get(i).cloned().unwrap_or(Type::Unknown);
            self.declare_var(node.span, name, ty);
        }
        self.validate_scope_items(&node.body);
        self.exit_scope();
    }

    /// Every case expression must be assignable to the switch target's
    /// type.
    fn validate_switch(&mut self, node: &'ast SwitchStmt) {
        let target = self.resolve_expression(&node.target);
        let target = flatten_single(&target).clone();

        for case in &node.cases {
            for expr in &case.exprs {
                let t = self.resolve_expression(expr);
                let t = flatten_single(&t).clone();
                if matches!(target, Type::Invalid) || matches!(t, Type::Invalid) {
                    continue;
                }
                if !self.registry.assignable_to(&t, &target) {
                    self.error(
                        ErrorKind::RequiredType,
                        expr.span,
                        format!(
                            "case of type '{}' cannot match a '{}' switch",
                            self.registry.display(&t),
                            self.registry.display(&target)
                        ),
                    );
                }
            }
            self.validate_body(&case.body);
        }
        if let Some(default) = &node.default {
            self.validate_body(default);
        }
    }

    /// Result expressions resolve; matching the count and types against
    /// the enclosing function is left to the emitter's contract.
    fn validate_return(&mut self, node: &'ast ReturnStmt) {
        for result in &node.results {
            self.resolve_expression(result);
        }
    }
}
