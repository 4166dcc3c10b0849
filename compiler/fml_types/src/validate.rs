//! Static validation pass.
//!
//! Walks a parsed program once, assigning a type to every expression and
//! rejecting ill-typed programs before anything is evaluated. The pass may
//! rewrite the arena in two ways:
//!
//! - **Cast insertion**: when a value must change representation to fit
//!   its slot (`int` into `float`), or a declaration's initializer needs an
//!   explicit conversion, the expression is wrapped in a `TypeCast` node.
//!   The wrapped expression moves to a fresh id and the cast takes over the
//!   original id, so parents never need to be patched.
//! - **Literal reinterpretation**: a string literal used where a date or
//!   duration fits (arithmetic, a `date`/`duration` slot) becomes a
//!   `Constant::Date` / `Constant::Duration`.
//!
//! Both rewrites are deterministic, so validating two copies of the same
//! parse yields identical arenas.

use fml_ir::{
    Constant, Expr, ExprArena, ExprId, ExprKind, Name, OperatorId, Program, StmtId, StmtKind,
    StmtRange, StringInterner,
};
use fml_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::builtins::builtin_signature;
use crate::operators::{binary_result, unary_result};
use crate::temporal::{parse_date, IsoDuration};
use crate::{FunctionType, Type, TypeEnv, TypeError, TypeErrorKind, TypeKind, common_type};

/// The type of every validated expression, indexed by `ExprId`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprTypes(Vec<Option<Type>>);

impl ExprTypes {
    pub fn get(&self, id: ExprId) -> Option<&Type> {
        self.0.get(id.index()).and_then(Option::as_ref)
    }

    fn set(&mut self, id: ExprId, ty: Type) {
        let index = id.index();
        if index >= self.0.len() {
            self.0.resize(index + 1, None);
        }
        self.0[index] = Some(ty);
    }

    /// Number of expressions that received a type.
    pub fn len(&self) -> usize {
        self.0.iter().filter(|ty| ty.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of validation.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedProgram {
    /// Type of the program's result.
    pub result: Type,
    pub expr_types: ExprTypes,
}

/// How strictly a value must fit its slot.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Coercion {
    /// Assignments, arguments and returns: the slot must accept the value.
    Assign,
    /// Declarations: any cast path is enough.
    Cast,
}

/// Validate `program` against the host bindings in `globals`.
///
/// Program-level declarations go into a fresh frame above `globals`, so
/// they may shadow host names.
///
/// # Errors
///
/// Returns the first type error in evaluation order.
#[tracing::instrument(level = "debug", skip_all)]
pub fn validate(
    arena: &mut ExprArena,
    program: &Program,
    globals: &TypeEnv,
    interner: &StringInterner,
) -> Result<TypedProgram, TypeError> {
    let mut validator = Validator {
        types: ExprTypes(Vec::with_capacity(arena.expr_count())),
        arena,
        interner,
        env: globals.child(),
        returns: Vec::new(),
        loop_depth: 0,
        results: Vec::new(),
    };

    for &stmt in &validator.arena.get_stmt_list(program.body).to_vec() {
        validator.stmt(stmt)?;
    }
    if let Some(tail) = program.tail {
        let ty = validator.expr(tail)?;
        validator.results.push(ty);
    }

    let result = match validator.results.split_first() {
        None => Type::void(),
        Some((first, rest)) if rest.iter().all(|ty| ty.equals(first)) => {
            first.clone().with_final(true)
        }
        Some(_) => Type::mixed(),
    };
    tracing::debug!(result = %result.render(interner), "validated");

    Ok(TypedProgram {
        result,
        expr_types: validator.types,
    })
}

struct Validator<'a> {
    arena: &'a mut ExprArena,
    interner: &'a StringInterner,
    env: TypeEnv,
    types: ExprTypes,
    /// Declared return types of the enclosing functions.
    returns: Vec<Type>,
    loop_depth: usize,
    /// Types produced by top-level `return`s and the tail expression.
    results: Vec<Type>,
}

impl Validator<'_> {
    fn error(&self, kind: TypeErrorKind, id: ExprId) -> TypeError {
        TypeError::new(kind, self.arena.get_expr(id).span)
    }

    fn stmt_error(&self, kind: TypeErrorKind, id: StmtId) -> TypeError {
        TypeError::new(kind, self.arena.get_stmt(id).span)
    }

    fn render(&self, ty: &Type) -> String {
        ty.render(self.interner)
    }

    fn name(&self, name: Name) -> String {
        self.interner.lookup(name).to_owned()
    }

    // Scopes

    fn push_scope(&mut self) {
        self.env = self.env.child();
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.env.parent().cloned() {
            self.env = parent;
        }
    }

    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_scope();
        let result = f(self);
        self.pop_scope();
        result
    }

    fn in_loop<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.loop_depth += 1;
        let result = f(self);
        self.loop_depth -= 1;
        result
    }

    fn declare(&mut self, name: Name, ty: Type, at: StmtId) -> Result<(), TypeError> {
        self.env.declare(name, ty).map_err(|_| {
            self.stmt_error(
                TypeErrorKind::DuplicateDeclaration {
                    name: self.name(name),
                },
                at,
            )
        })
    }

    /// Declared type of a name, falling back to the built-ins.
    fn lookup(&self, name: Name) -> Option<Type> {
        self.env
            .lookup(name)
            .cloned()
            .or_else(|| builtin_signature(self.interner.lookup(name)).map(Type::function))
    }

    // Statements

    fn stmts(&mut self, range: StmtRange) -> Result<(), TypeError> {
        for stmt in self.arena.get_stmt_list(range).to_vec() {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    /// A branch or loop body gets its own scope.
    fn body(&mut self, id: StmtId) -> Result<(), TypeError> {
        self.scoped(|v| v.stmt(id))
    }

    fn stmt(&mut self, id: StmtId) -> Result<(), TypeError> {
        ensure_sufficient_stack(|| self.stmt_inner(id))
    }

    fn stmt_inner(&mut self, id: StmtId) -> Result<(), TypeError> {
        let kind = self.arena.get_stmt(id).kind.clone();
        tracing::trace!(stmt = id.index(), "validate statement");
        match kind {
            StmtKind::Expr(expr) => {
                self.expr(expr)?;
            }
            StmtKind::VarDecl {
                mutable,
                ty,
                name,
                init,
            } => {
                let actual = self.value_expr(init)?;
                let declared = match ty {
                    Some(parsed) => {
                        let declared = Type::from_parsed(&parsed);
                        self.coerce(init, actual, &declared, Coercion::Cast)?;
                        declared
                    }
                    None => slot_type(actual),
                };
                self.declare(name, declared.with_final(!mutable), id)?;
            }
            StmtKind::Return(value) => self.return_stmt(id, value)?,
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.value_expr(cond)?;
                self.body(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.body(else_branch)?;
                }
            }
            StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
                self.value_expr(cond)?;
                self.in_loop(|v| v.body(body))?;
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                self.scoped(|v| {
                    if let Some(init) = init {
                        v.stmt(init)?;
                    }
                    if let Some(cond) = cond {
                        v.value_expr(cond)?;
                    }
                    if let Some(step) = step {
                        v.expr(step)?;
                    }
                    v.in_loop(|v| v.body(body))
                })?;
            }
            StmtKind::ForEach {
                mutable,
                ty,
                name,
                iterable,
                body,
            } => {
                let iterable_ty = self.value_expr(iterable)?;
                let element = match &iterable_ty.kind {
                    TypeKind::Array { element, .. } => element.as_ref().clone(),
                    TypeKind::Mixed => Type::mixed(),
                    _ => {
                        return Err(self.error(
                            TypeErrorKind::NotIterable {
                                ty: self.render(&iterable_ty),
                            },
                            iterable,
                        ))
                    }
                };
                let declared = match ty {
                    Some(parsed) => {
                        let declared = Type::from_parsed(&parsed);
                        if !declared.assignable_by(&element) {
                            return Err(self.stmt_error(
                                TypeErrorKind::NotAssignable {
                                    target: self.render(&declared),
                                    source_type: self.render(&element),
                                },
                                id,
                            ));
                        }
                        declared
                    }
                    None => slot_type(element),
                };
                self.scoped(|v| {
                    v.declare(name, declared.with_final(!mutable), id)?;
                    v.in_loop(|v| v.body(body))
                })?;
            }
            StmtKind::Break => self.loop_control(id, "break")?,
            StmtKind::Continue => self.loop_control(id, "continue")?,
            StmtKind::Block(stmts) => self.scoped(|v| v.stmts(stmts))?,
            StmtKind::FunctionDecl {
                name,
                params,
                ret,
                body,
            } => self.function_decl(id, name, params, &ret, body)?,
        }
        Ok(())
    }

    fn loop_control(&self, id: StmtId, keyword: &'static str) -> Result<(), TypeError> {
        if self.loop_depth == 0 {
            return Err(self.stmt_error(TypeErrorKind::OutsideLoop { keyword }, id));
        }
        Ok(())
    }

    fn return_stmt(&mut self, id: StmtId, value: Option<ExprId>) -> Result<(), TypeError> {
        let Some(expected) = self.returns.last().cloned() else {
            // Top level: the returned value is a program result.
            let ty = match value {
                Some(value) => self.value_expr(value)?,
                None => Type::void(),
            };
            self.results.push(ty);
            return Ok(());
        };

        match value {
            Some(value) => {
                let actual = self.value_expr(value)?;
                self.coerce(value, actual, &expected, Coercion::Assign)
            }
            None if expected.is_void() => Ok(()),
            None => Err(self.stmt_error(
                TypeErrorKind::NotAssignable {
                    target: self.render(&expected),
                    source_type: "void".to_owned(),
                },
                id,
            )),
        }
    }

    fn function_decl(
        &mut self,
        id: StmtId,
        name: Name,
        params: fml_ir::ParamRange,
        ret: &fml_ir::ParsedType,
        body: StmtRange,
    ) -> Result<(), TypeError> {
        let params = self.arena.get_params(params).to_vec();
        let ret = Type::from_parsed(ret);
        let signature = FunctionType::new(
            params.iter().map(|p| Type::from_parsed(&p.ty)).collect(),
            ret.clone(),
        );
        // Declared before the body so the function can call itself.
        self.declare(name, Type::function(signature), id)?;

        let saved_depth = std::mem::take(&mut self.loop_depth);
        self.returns.push(ret.clone());
        let result = self.scoped(|v| {
            for param in &params {
                let ty = Type::from_parsed(&param.ty).with_final(!param.mutable);
                v.declare(param.name, ty, id)?;
            }
            v.stmts(body)
        });
        self.returns.pop();
        self.loop_depth = saved_depth;
        result?;

        if !ret.is_void() && !self.always_returns(body) {
            return Err(self.stmt_error(
                TypeErrorKind::MissingReturn {
                    name: self.name(name),
                    ty: self.render(&ret),
                },
                id,
            ));
        }
        Ok(())
    }

    fn always_returns(&self, range: StmtRange) -> bool {
        self.arena
            .get_stmt_list(range)
            .iter()
            .any(|&stmt| self.stmt_returns(stmt))
    }

    fn stmt_returns(&self, id: StmtId) -> bool {
        match &self.arena.get_stmt(id).kind {
            StmtKind::Return(_) => true,
            StmtKind::Block(stmts) => self.always_returns(*stmts),
            StmtKind::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => self.stmt_returns(*then_branch) && self.stmt_returns(*else_branch),
            _ => false,
        }
    }

    // Expressions

    /// Validate an expression whose value is used.
    fn value_expr(&mut self, id: ExprId) -> Result<Type, TypeError> {
        let ty = self.expr(id)?;
        if ty.is_void() {
            return Err(self.error(TypeErrorKind::VoidValue, id));
        }
        Ok(ty)
    }

    fn expr(&mut self, id: ExprId) -> Result<Type, TypeError> {
        ensure_sufficient_stack(|| self.expr_inner(id))
    }

    fn expr_inner(&mut self, id: ExprId) -> Result<Type, TypeError> {
        let kind = self.arena.get_expr(id).kind.clone();
        let ty = match kind {
            ExprKind::Ident(name) => self.lookup(name).ok_or_else(|| {
                self.error(
                    TypeErrorKind::UnknownIdentifier {
                        name: self.name(name),
                    },
                    id,
                )
            })?,
            ExprKind::Constant(constant) => constant_type(constant),
            ExprKind::Unary { op, operand } => {
                let operand_ty = self.value_expr(operand)?;
                unary_result(op, &operand_ty).ok_or_else(|| {
                    self.error(
                        TypeErrorKind::UnaryMismatch {
                            op: op.symbol(),
                            operand: self.render(&operand_ty),
                        },
                        id,
                    )
                })?
            }
            ExprKind::Binary { op, left, right } => self.binary(id, op, left, right)?,
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                self.value_expr(cond)?;
                let then_ty = self.value_expr(then_branch)?;
                let else_ty = self.value_expr(else_branch)?;
                self.join_branches(then_branch, then_ty, else_branch, else_ty)?
            }
            ExprKind::Call { callee, args } => self.call(id, callee, args)?,
            ExprKind::Array(elements) => self.array(elements)?,
            ExprKind::Index { receiver, index } => self.index(id, receiver, index)?,
            ExprKind::TypeLiteral(parsed) => {
                Type::new(TypeKind::TypeLiteral(Box::new(Type::from_parsed(&parsed))))
            }
        };
        self.types.set(id, ty.clone());
        Ok(ty)
    }

    fn binary(
        &mut self,
        id: ExprId,
        op: OperatorId,
        left: ExprId,
        right: ExprId,
    ) -> Result<Type, TypeError> {
        if op == OperatorId::TypeCast {
            return self.cast(id, left, right);
        }
        if op.is_assignment() {
            return self.assignment(id, op, left, right);
        }

        let left_ty = self.value_expr(left)?;
        let right_ty = self.value_expr(right)?;
        if accepts_calendar_literals(op) {
            if let Some(result) = self.calendar_arithmetic(op, left, &left_ty, right, &right_ty) {
                return Ok(result);
            }
        }
        binary_result(op, &left_ty, &right_ty)
            .ok_or_else(|| self.binary_mismatch(id, op, &left_ty, &right_ty))
    }

    fn binary_mismatch(&self, id: ExprId, op: OperatorId, left: &Type, right: &Type) -> TypeError {
        self.error(
            TypeErrorKind::BinaryMismatch {
                op: op.symbol(),
                left: self.render(left),
                right: self.render(right),
            },
            id,
        )
    }

    /// Retry `left op right` with string literals read as dates or
    /// durations. Rewrites the literals only if that makes the operation
    /// valid.
    fn calendar_arithmetic(
        &mut self,
        op: OperatorId,
        left: ExprId,
        left_ty: &Type,
        right: ExprId,
        right_ty: &Type,
    ) -> Option<Type> {
        let left_alt = self.calendar_literal(left);
        let right_alt = self.calendar_literal(right);
        if left_alt.is_none() && right_alt.is_none() {
            return None;
        }
        let l = left_alt.as_ref().map_or(left_ty, |(_, ty)| ty);
        let r = right_alt.as_ref().map_or(right_ty, |(_, ty)| ty);
        let result = binary_result(op, l, r)?;
        for (id, alt) in [(left, left_alt), (right, right_alt)] {
            if let Some((constant, ty)) = alt {
                self.rewrite_literal(id, constant, ty);
            }
        }
        Some(result)
    }

    /// The date or duration a string literal denotes, if any.
    fn calendar_literal(&self, id: ExprId) -> Option<(Constant, Type)> {
        let ExprKind::Constant(Constant::Str(text)) = self.arena.get_expr(id).kind else {
            return None;
        };
        let literal = self.interner.lookup(text);
        if parse_date(literal).is_some() {
            Some((Constant::Date(text), Type::date()))
        } else if IsoDuration::parse(literal).is_some() {
            Some((Constant::Duration(text), Type::duration()))
        } else {
            None
        }
    }

    fn rewrite_literal(&mut self, id: ExprId, constant: Constant, ty: Type) {
        tracing::trace!(expr = id.index(), ty = %ty.render(self.interner), "reinterpret literal");
        self.arena.get_expr_mut(id).kind = ExprKind::Constant(constant);
        self.types.set(id, ty);
    }

    /// Read a string literal as the date or duration `target` expects.
    fn reinterpret_for(&mut self, id: ExprId, actual: Type, target: &Type) -> Type {
        if actual.kind != TypeKind::String
            || !matches!(target.kind, TypeKind::Date | TypeKind::Duration)
        {
            return actual;
        }
        match self.calendar_literal(id) {
            Some((constant, ty)) if ty.equals(target) => {
                self.rewrite_literal(id, constant, ty.clone());
                ty
            }
            _ => actual,
        }
    }

    /// Make the value of `id` fit a slot of type `target`, inserting a cast
    /// when the representation changes.
    fn coerce(
        &mut self,
        id: ExprId,
        actual: Type,
        target: &Type,
        mode: Coercion,
    ) -> Result<(), TypeError> {
        let actual = self.reinterpret_for(id, actual, target);
        if target.assignable_by(&actual) {
            if target.needs_conversion_from(&actual) {
                self.insert_cast(id, target)?;
            }
            return Ok(());
        }
        // A mixed value is checked when the inserted cast runs.
        if (mode == Coercion::Cast || actual.is_mixed()) && actual.castable_to(target) {
            return self.insert_cast(id, target);
        }
        Err(self.error(
            TypeErrorKind::NotAssignable {
                target: self.render(target),
                source_type: self.render(&actual),
            },
            id,
        ))
    }

    /// Wrap the expression at `id` in a cast to `target`. The original
    /// expression moves to a new id; the cast takes over `id`.
    fn insert_cast(&mut self, id: ExprId, target: &Type) -> Result<(), TypeError> {
        let parsed = target.to_parsed().ok_or_else(|| {
            self.error(
                TypeErrorKind::Bug(format!("no cast syntax for {}", self.render(target))),
                id,
            )
        })?;
        let original = self.arena.get_expr(id).clone();
        let span = original.span;
        let moved = self.arena.alloc_expr(original);
        let literal = self
            .arena
            .alloc_expr(Expr::new(ExprKind::TypeLiteral(parsed), span));

        if let Some(ty) = self.types.get(id).cloned() {
            self.types.set(moved, ty);
        }
        let target = target.clone().with_final(true);
        self.types.set(
            literal,
            Type::new(TypeKind::TypeLiteral(Box::new(target.clone()))),
        );
        self.types.set(id, target);
        self.arena.get_expr_mut(id).kind = ExprKind::Binary {
            op: OperatorId::TypeCast,
            left: moved,
            right: literal,
        };
        tracing::trace!(expr = id.index(), moved = moved.index(), "inserted cast");
        Ok(())
    }

    fn cast(&mut self, id: ExprId, operand: ExprId, literal: ExprId) -> Result<Type, TypeError> {
        let ExprKind::TypeLiteral(parsed) = self.arena.get_expr(literal).kind.clone() else {
            return Err(self.error(
                TypeErrorKind::Bug("cast without a type operand".to_owned()),
                literal,
            ));
        };
        let target = Type::from_parsed(&parsed);
        self.types.set(
            literal,
            Type::new(TypeKind::TypeLiteral(Box::new(target.clone()))),
        );

        let actual = self.value_expr(operand)?;
        let actual = self.reinterpret_for(operand, actual, &target);
        if !actual.castable_to(&target) {
            return Err(self.error(
                TypeErrorKind::InvalidCast {
                    from: self.render(&actual),
                    to: self.render(&target),
                },
                id,
            ));
        }
        Ok(target)
    }

    fn assignment(
        &mut self,
        id: ExprId,
        op: OperatorId,
        target: ExprId,
        value: ExprId,
    ) -> Result<Type, TypeError> {
        if !matches!(
            self.arena.get_expr(target).kind,
            ExprKind::Ident(_) | ExprKind::Index { .. }
        ) {
            return Err(self.error(TypeErrorKind::InvalidAssignmentTarget, target));
        }

        let target_ty = self.value_expr(target)?;
        if target_ty.is_final {
            let name = self.root_name(target);
            return Err(self.error(TypeErrorKind::FinalAssignment { name }, id));
        }
        let slot = target_ty.with_final(true);

        let value_ty = self.value_expr(value)?;
        match op.compound_base() {
            None => self.coerce(value, value_ty, &slot, Coercion::Assign)?,
            Some(base) => {
                let combined = binary_result(base, &slot, &value_ty)
                    .or_else(|| {
                        let (constant, ty) = self.calendar_literal(value)?;
                        let combined = binary_result(base, &slot, &ty)?;
                        self.rewrite_literal(value, constant, ty);
                        Some(combined)
                    })
                    .ok_or_else(|| self.binary_mismatch(id, base, &slot, &value_ty))?;
                if !slot.assignable_by(&combined) {
                    return Err(self.error(
                        TypeErrorKind::NotAssignable {
                            target: self.render(&slot),
                            source_type: self.render(&combined),
                        },
                        id,
                    ));
                }
            }
        }
        Ok(slot)
    }

    /// Name of the variable an assignment target is rooted in.
    fn root_name(&self, mut id: ExprId) -> String {
        loop {
            match self.arena.get_expr(id).kind {
                ExprKind::Ident(name) => return self.name(name),
                ExprKind::Index { receiver, .. } => id = receiver,
                _ => return "expression".to_owned(),
            }
        }
    }

    fn join_branches(
        &mut self,
        then_branch: ExprId,
        then_ty: Type,
        else_branch: ExprId,
        else_ty: Type,
    ) -> Result<Type, TypeError> {
        if then_ty.equals(&else_ty) {
            return Ok(then_ty.with_final(true));
        }
        if then_ty.assignable_by(&else_ty) {
            if then_ty.needs_conversion_from(&else_ty) {
                self.insert_cast(else_branch, &then_ty)?;
            }
            return Ok(then_ty.with_final(true));
        }
        if else_ty.assignable_by(&then_ty) {
            if else_ty.needs_conversion_from(&then_ty) {
                self.insert_cast(then_branch, &else_ty)?;
            }
            return Ok(else_ty.with_final(true));
        }
        Ok(Type::mixed())
    }

    fn call(
        &mut self,
        id: ExprId,
        callee: ExprId,
        args: fml_ir::ExprRange,
    ) -> Result<Type, TypeError> {
        let callee_name = match self.arena.get_expr(callee).kind {
            ExprKind::Ident(name) => self.name(name),
            _ => "function".to_owned(),
        };
        let callee_ty = self.value_expr(callee)?;
        let args = self.arena.get_expr_list(args).to_vec();

        let signature = match &callee_ty.kind {
            TypeKind::Function(signature) => signature.as_ref().clone(),
            TypeKind::Mixed => {
                for &arg in &args {
                    self.value_expr(arg)?;
                }
                return Ok(Type::mixed());
            }
            _ => {
                return Err(self.error(
                    TypeErrorKind::NotCallable {
                        ty: self.render(&callee_ty),
                    },
                    callee,
                ))
            }
        };

        if !signature.accepts_arity(args.len()) {
            let expected = if signature.variadic.is_some() {
                format!("at least {}", signature.params.len())
            } else {
                signature.params.len().to_string()
            };
            return Err(self.error(
                TypeErrorKind::ArgumentCount {
                    name: callee_name,
                    expected,
                    found: args.len(),
                },
                id,
            ));
        }

        let mut arg_types: SmallVec<[Type; 4]> = SmallVec::with_capacity(args.len());
        for (i, &arg) in args.iter().enumerate() {
            let actual = self.value_expr(arg)?;
            let Some(param) = signature.param(i).cloned() else {
                return Err(self.error(
                    TypeErrorKind::Bug(format!("no parameter {i} for {callee_name}")),
                    arg,
                ));
            };
            self.coerce(arg, actual.clone(), &param, Coercion::Assign)?;
            arg_types.push(self.types.get(arg).cloned().unwrap_or(actual));
        }

        signature.result(&arg_types).ok_or_else(|| {
            let rendered: Vec<String> = arg_types.iter().map(|t| self.render(t)).collect();
            self.error(
                TypeErrorKind::InvalidArguments {
                    name: callee_name,
                    args: rendered.join(", "),
                },
                id,
            )
        })
    }

    fn array(&mut self, elements: fml_ir::ExprRange) -> Result<Type, TypeError> {
        let elements = self.arena.get_expr_list(elements).to_vec();
        let mut types = Vec::with_capacity(elements.len());
        for &element in &elements {
            types.push(self.value_expr(element)?);
        }
        let element_ty = common_type(&types).unwrap_or_else(Type::mixed);
        for (&element, ty) in elements.iter().zip(&types) {
            if element_ty.needs_conversion_from(ty) {
                self.insert_cast(element, &element_ty)?;
            }
        }
        Ok(Type::array(element_ty, Some(elements.len())))
    }

    fn index(&mut self, id: ExprId, receiver: ExprId, index: ExprId) -> Result<Type, TypeError> {
        let receiver_ty = self.value_expr(receiver)?;
        let index_ty = self.value_expr(index)?;
        if !matches!(receiver_ty.kind, TypeKind::Array { .. } | TypeKind::Mixed) {
            return Err(self.error(
                TypeErrorKind::NotIndexable {
                    ty: self.render(&receiver_ty),
                },
                receiver,
            ));
        }
        binary_result(OperatorId::Index, &receiver_ty, &index_ty).ok_or_else(|| {
            let ty = match self.arena.get_expr(index).kind {
                ExprKind::Constant(Constant::Str(text)) => {
                    format!("\"{}\"", self.interner.lookup(text))
                }
                _ => self.render(&index_ty),
            };
            self.error(TypeErrorKind::InvalidIndex { ty }, id)
        })
    }
}

fn constant_type(constant: Constant) -> Type {
    match constant {
        Constant::Int(_) => Type::int(),
        Constant::Float(_) => Type::float(),
        Constant::Bool(_) => Type::boolean(),
        Constant::Null => Type::null(),
        Constant::Str(_) => Type::string(),
        Constant::Date(_) => Type::date(),
        Constant::Duration(_) => Type::duration(),
    }
}

/// Operators whose string literal operands may denote dates or durations.
fn accepts_calendar_literals(op: OperatorId) -> bool {
    matches!(op, OperatorId::Add | OperatorId::Sub | OperatorId::Mul)
}

/// Type of a slot inferred from a value: literal array lengths are not
/// part of a variable's type.
fn slot_type(ty: Type) -> Type {
    match ty.kind {
        TypeKind::Array { element, .. } => Type::new(TypeKind::Array { element, len: None }),
        kind => Type::new(kind),
    }
}

#[cfg(test)]
mod tests;
