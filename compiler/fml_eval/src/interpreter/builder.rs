//! Builder for [`Interpreter`].

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use fml_ir::{ExprArena, StringInterner};

use super::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::Environment;

/// Configures an [`Interpreter`] before it runs.
#[must_use]
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    env: Option<Environment>,
    cancel: Option<Arc<AtomicBool>>,
    max_call_depth: usize,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        InterpreterBuilder {
            interner,
            arena,
            env: None,
            cancel: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Start from `env` instead of an empty environment. Host bindings go
    /// in its global scope.
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Stop with `Cancelled` once `flag` is set. Checked before each
    /// statement and each loop iteration.
    pub fn cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Limit nested calls of formula-declared functions.
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            interner: self.interner,
            arena: self.arena,
            env: self.env.unwrap_or_default(),
            cancel: self.cancel,
            max_call_depth: self.max_call_depth,
            call_depth: 0,
            captured: Vec::new(),
        }
    }
}
