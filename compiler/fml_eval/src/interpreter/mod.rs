//! Tree-walking interpreter over the validated AST.
//!
//! The interpreter borrows the arena and interner; all runtime state lives
//! in the [`Environment`]. Casts the validator inserted are ordinary
//! `TypeCast` nodes here, so evaluation never consults static types.

mod builder;
mod exec;
mod expr;
mod scope_guard;

use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;

use fml_ir::{ExprArena, Name, Program, Span, StringInterner};

use crate::environment::WeakScope;
use crate::errors::{bug, EvalError, EvalErrorKind, EvalResult};
use crate::{Environment, LocalScope, Scope, Value};

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

/// Default limit on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// How a statement finished.
#[derive(Debug)]
pub(crate) enum Flow {
    Next,
    Return(Value),
    Break,
    Continue,
}

/// Evaluates a parsed (and normally validated) formula.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: &'a ExprArena,
    pub(crate) env: Environment,
    cancel: Option<Arc<AtomicBool>>,
    max_call_depth: usize,
    call_depth: usize,
    /// Scopes that functions were declared in during the current run.
    captured: Vec<WeakScope>,
}

impl<'a> Interpreter<'a> {
    /// An interpreter with an empty environment.
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        InterpreterBuilder::new(interner, arena).build()
    }

    pub fn builder(interner: &'a StringInterner, arena: &'a ExprArena) -> InterpreterBuilder<'a> {
        InterpreterBuilder::new(interner, arena)
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Run `program` to completion.
    ///
    /// A top-level `return` ends the run with its value; otherwise the
    /// trailing expression is the result, or `void` without one.
    ///
    /// # Errors
    ///
    /// Returns the first runtime failure.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, program: &Program) -> EvalResult {
        let result = self.with_env_scope(|scoped| {
            match scoped.exec_block(program.body)? {
                Flow::Return(value) => return Ok(value),
                Flow::Next => {}
                Flow::Break | Flow::Continue => {
                    return Err(EvalError::new(
                        bug("loop control outside a loop"),
                        program.span,
                    ));
                }
            }
            match program.tail {
                Some(tail) => scoped.eval(tail),
                None => Ok(Value::Void),
            }
        });
        self.release_captured();
        match &result {
            Ok(value) => tracing::debug!(result = value.type_name(), "evaluated"),
            Err(err) => tracing::debug!(%err, "evaluation failed"),
        }
        result
    }

    /// Fails with `Cancelled` once the cancellation flag is raised.
    pub(crate) fn check_cancelled(&self, span: Span) -> EvalResult<()> {
        match &self.cancel {
            Some(flag) if flag.load(atomic::Ordering::Relaxed) => {
                Err(EvalError::new(EvalErrorKind::Cancelled, span))
            }
            _ => Ok(()),
        }
    }

    /// Remember `scope` so the end of the run can release it.
    pub(crate) fn track_capture(&mut self, scope: &LocalScope<Scope>) {
        if self.captured.len() == self.captured.capacity() {
            self.captured.retain(WeakScope::is_alive);
        }
        self.captured.push(scope.downgrade());
    }

    /// Break the scope/function cycles left over from a run.
    fn release_captured(&mut self) {
        let captured = std::mem::take(&mut self.captured);
        tracing::trace!(scopes = captured.len(), "release captured scopes");
        for scope in captured.iter().filter_map(WeakScope::upgrade) {
            scope.release();
        }
    }

    pub(crate) fn name(&self, name: Name) -> &'a str {
        self.interner.lookup(name)
    }
}
