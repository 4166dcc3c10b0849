//! Guards that put the environment back when evaluation leaves a scope.
//!
//! Blocks, loop bodies and `for` headers run inside a [`ScopedInterpreter`];
//! calls to formula-declared functions run inside a [`CallFrame`]. Both deref
//! to the interpreter and undo their setup on drop, so an early `?` return
//! leaves the environment exactly as the caller had it.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::{Environment, Mutability, UserFunction, Value};

/// A nested scope, popped on drop.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

/// The environment of one user function call: the declaring scope with the
/// parameters bound in a scope on top.
///
/// Dropping the frame pops the parameter scope, hands the caller its
/// environment back and lowers the call depth.
pub(crate) struct CallFrame<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    caller: Option<Environment>,
}

impl Drop for CallFrame<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
        if let Some(caller) = self.caller.take() {
            self.interpreter.env = caller;
        }
        self.interpreter.call_depth -= 1;
    }
}

impl<'interp> Deref for CallFrame<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for CallFrame<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope that is popped when the returned guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` in a fresh scope.
    pub fn with_env_scope<T>(&mut self, f: impl FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T) -> T {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Switch to `function`'s declaring scope and bind `args` to its
    /// parameters. Argument count and call depth are checked by the caller.
    pub(crate) fn enter_call(&mut self, function: &UserFunction, args: &[Value]) -> CallFrame<'_, 'a> {
        let caller = std::mem::replace(
            &mut self.env,
            Environment::from_scope(function.scope.clone()),
        );
        self.call_depth += 1;
        self.env.push_scope();
        for (param, arg) in function.params.iter().zip(args) {
            self.env
                .define(param.name, arg.clone(), Mutability::from_flag(param.mutable));
        }
        CallFrame {
            interpreter: self,
            caller: Some(caller),
        }
    }
}
