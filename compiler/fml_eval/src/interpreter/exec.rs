//! Statement execution and calls to formula-declared functions.

use std::rc::Rc;

use fml_ir::{ExprId, Span, StmtId, StmtKind, StmtRange};
use fml_stack::ensure_sufficient_stack;
use fml_types::Type;

use super::{Flow, Interpreter};
use crate::errors::{bug, EvalError, EvalErrorKind, EvalResult};
use crate::operators::cast;
use crate::{FunctionValue, Mutability, UserFunction, Value};

impl Interpreter<'_> {
    /// Execute `range` in the current scope.
    pub(crate) fn exec_block(&mut self, range: StmtRange) -> EvalResult<Flow> {
        let arena = self.arena;
        for &stmt in arena.get_stmt_list(range) {
            match self.exec(stmt)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    /// Execute `stmt` in a scope of its own.
    fn exec_scoped(&mut self, stmt: StmtId) -> EvalResult<Flow> {
        self.with_env_scope(|scoped| scoped.exec(stmt))
    }

    pub(crate) fn exec(&mut self, id: StmtId) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec_inner(id))
    }

    fn exec_inner(&mut self, id: StmtId) -> EvalResult<Flow> {
        let arena = self.arena;
        let stmt = arena.get_stmt(id);
        self.check_cancelled(stmt.span)?;
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval(*expr)?;
                Ok(Flow::Next)
            }
            StmtKind::VarDecl {
                mutable,
                name,
                init,
                ..
            } => {
                let value = self.eval(*init)?;
                self.env.define(*name, value, Mutability::from_flag(*mutable));
                Ok(Flow::Next)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(*expr)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(*cond)?.is_truthy() {
                    self.exec_scoped(*then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_scoped(*else_branch)
                } else {
                    Ok(Flow::Next)
                }
            }
            StmtKind::While { cond, body } => self.exec_loop(Some(*cond), None, *body, false),
            StmtKind::DoWhile { body, cond } => self.exec_loop(Some(*cond), None, *body, true),
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => self.with_env_scope(|scoped| {
                if let Some(init) = init {
                    scoped.exec(*init)?;
                }
                scoped.exec_loop(*cond, *step, *body, false)
            }),
            StmtKind::ForEach {
                mutable,
                ty,
                name,
                iterable,
                body,
            } => {
                let iterable_value = self.eval(*iterable)?;
                let Value::Array(items) = iterable_value else {
                    return Err(EvalError::new(
                        EvalErrorKind::NotIterable {
                            ty: iterable_value.type_name(),
                        },
                        arena.get_expr(*iterable).span,
                    ));
                };
                let element_type = ty.as_ref().map(Type::from_parsed);
                for item in items.iter() {
                    self.check_cancelled(stmt.span)?;
                    let item = match &element_type {
                        Some(ty) => cast(item, ty, self.interner)
                            .map_err(|kind| EvalError::new(kind, stmt.span))?,
                        None => item.clone(),
                    };
                    let flow = self.with_env_scope(|scoped| {
                        scoped
                            .env
                            .define(*name, item, Mutability::from_flag(*mutable));
                        scoped.exec(*body)
                    })?;
                    match flow {
                        Flow::Break => break,
                        Flow::Next | Flow::Continue => {}
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                    }
                }
                Ok(Flow::Next)
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Block(range) => self.with_env_scope(|scoped| scoped.exec_block(*range)),
            StmtKind::FunctionDecl {
                name, params, body, ..
            } => {
                let function = UserFunction {
                    name: *name,
                    params: arena.get_params(*params).to_vec(),
                    body: *body,
                    scope: self.env.current_scope(),
                };
                self.track_capture(&function.scope);
                self.env.define(
                    *name,
                    Value::Function(FunctionValue::User(Rc::new(function))),
                    Mutability::Immutable,
                );
                Ok(Flow::Next)
            }
        }
    }

    /// `while`, `do`-`while` and the loop part of `for`. A missing
    /// condition loops until `break` or `return`.
    fn exec_loop(
        &mut self,
        cond: Option<ExprId>,
        step: Option<ExprId>,
        body: StmtId,
        body_first: bool,
    ) -> EvalResult<Flow> {
        let span = self.arena.get_stmt(body).span;
        let mut first = true;
        loop {
            self.check_cancelled(span)?;
            let skip_cond = first && body_first;
            first = false;
            if !skip_cond {
                if let Some(cond) = cond {
                    if !self.eval(cond)?.is_truthy() {
                        break;
                    }
                }
            }
            match self.exec_scoped(body)? {
                Flow::Break => break,
                Flow::Next | Flow::Continue => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
            if let Some(step) = step {
                self.eval(step)?;
            }
        }
        Ok(Flow::Next)
    }

    /// Call a formula-declared function.
    ///
    /// The body runs in an environment rooted at the declaring scope, with
    /// the parameters in a scope of their own. The caller's environment is
    /// restored afterwards, whatever the outcome.
    pub(crate) fn call_user(
        &mut self,
        function: &UserFunction,
        args: &[Value],
        span: Span,
    ) -> EvalResult {
        let name = self.name(function.name);
        if args.len() != function.params.len() {
            return Err(EvalError::new(
                EvalErrorKind::ArgumentCount {
                    name: name.to_owned(),
                    expected: function.params.len().to_string(),
                    found: args.len(),
                },
                span,
            ));
        }
        if self.call_depth >= self.max_call_depth {
            return Err(EvalError::new(
                EvalErrorKind::CallDepth {
                    depth: self.max_call_depth,
                },
                span,
            ));
        }
        tracing::trace!(name, depth = self.call_depth, "call");

        let flow = {
            let mut frame = self.enter_call(function, args);
            ensure_sufficient_stack(|| frame.exec_block(function.body))
        };

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Next => Ok(Value::Void),
            Flow::Break | Flow::Continue => {
                Err(EvalError::new(bug("loop control escaped a function"), span))
            }
        }
    }
}
