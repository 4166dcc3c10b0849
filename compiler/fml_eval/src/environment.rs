//! Environment for variable scoping in the interpreter.
//!
//! Uses a scope stack (not cloning) for efficient scope management.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use fml_ir::Name;

use crate::{FunctionValue, UserFunction, Value};

/// Whether a variable binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `mut T x = ...`
    Mutable,
    /// `T x = ...`
    Immutable,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }

    pub fn from_flag(mutable: bool) -> Self {
        if mutable {
            Mutability::Mutable
        } else {
            Mutability::Immutable
        }
    }
}

/// Error returned by `Scope::assign` when assignment fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Variable exists but is immutable.
    Immutable,
    /// Variable not found in any scope.
    Undefined,
}

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through `LocalScope::new()`. The interpreter
/// runs single-threaded, so this is `Rc`, not `Arc`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> LocalScope<T> {
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl LocalScope<Scope> {
    /// A handle that does not keep the scope alive.
    pub(crate) fn downgrade(&self) -> WeakScope {
        WeakScope(Rc::downgrade(&self.0))
    }

    /// Drop every binding, breaking the cycles between this scope and
    /// the functions declared in it.
    pub(crate) fn release(&self) {
        let bindings = std::mem::take(&mut self.borrow_mut().bindings);
        drop(bindings);
    }

    /// Release the scope if the only handles left on it are functions
    /// declared in it and bound nowhere else. `self` is the last outside
    /// handle.
    pub(crate) fn release_if_unreachable(&self) {
        let Ok(scope) = self.try_borrow() else {
            return;
        };
        // Per declared function: (strong count, occurrences in this scope).
        let mut own: FxHashMap<*const UserFunction, (usize, usize)> = FxHashMap::default();
        for binding in scope.bindings.values() {
            if let Value::Function(FunctionValue::User(function)) = &binding.value {
                if function.scope.ptr_eq(self) {
                    own.entry(Rc::as_ptr(function))
                        .or_insert((Rc::strong_count(function), 0))
                        .1 += 1;
                }
            }
        }
        let closed = !own.is_empty()
            && own.values().all(|&(strong, seen)| strong == seen)
            && Rc::strong_count(&self.0) == own.len() + 1;
        drop(scope);
        if closed {
            self.release();
        }
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Weak handle to a scope that captured a function.
#[derive(Clone, Debug, Default)]
pub(crate) struct WeakScope(Weak<RefCell<Scope>>);

impl WeakScope {
    /// The scope, if it is still alive.
    pub(crate) fn upgrade(&self) -> Option<LocalScope<Scope>> {
        self.0.upgrade().map(LocalScope)
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// A single scope containing variable bindings.
#[derive(Clone, Debug)]
pub struct Scope {
    bindings: FxHashMap<Name, Binding>,
    parent: Option<LocalScope<Scope>>,
}

#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    #[inline]
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.bindings.insert(name, Binding { value, mutability });
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(binding) = self.bindings.get(&name) {
            return Some(binding.value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        self.update(name, |slot| *slot = value)
    }

    /// Apply `f` to the value bound to `name`, in place.
    pub fn update<T>(
        &mut self,
        name: Name,
        f: impl FnOnce(&mut Value) -> T,
    ) -> Result<T, AssignError> {
        if let Some(binding) = self.bindings.get_mut(&name) {
            if !binding.mutability.is_mutable() {
                return Err(AssignError::Immutable);
            }
            return Ok(f(&mut binding.value));
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().update(name, f);
        }
        Err(AssignError::Undefined)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment for the interpreter using a scope stack.
///
/// Instead of cloning environments, we maintain a stack of scopes
/// that can be pushed and popped efficiently.
pub struct Environment {
    /// Stack of scopes, with current scope at the top.
    scopes: Vec<LocalScope<Scope>>,
    /// Bottom scope: host bindings for a top-level environment, the
    /// declaring scope for a function call.
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Self::from_scope(LocalScope::new(Scope::new()))
    }

    /// An environment whose bottom scope is `scope`.
    pub fn from_scope(global: LocalScope<Scope>) -> Self {
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        let new_scope = LocalScope::new(Scope::with_parent(parent));
        self.scopes.push(new_scope);
    }

    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                scope.release_if_unreachable();
            }
        }
    }

    /// The innermost scope.
    #[inline]
    pub fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    #[inline]
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name, value, mutability);
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        self.update(name, |slot| *slot = value)
    }

    /// Apply `f` to the value bound to `name`, in place.
    pub fn update<T>(
        &mut self,
        name: Name,
        f: impl FnOnce(&mut Value) -> T,
    ) -> Result<T, AssignError> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .update(name, f)
    }

    /// Define a global variable (immutable).
    pub fn define_global(&mut self, name: Name, value: Value) {
        self.global
            .borrow_mut()
            .define(name, value, Mutability::Immutable);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
