//! Type environment for name resolution and scoping.

use std::rc::Rc;

use fml_ir::Name;
use rustc_hash::FxHashMap;

use crate::Type;

/// Internal storage for `TypeEnv`, wrapped in `Rc` for cheap cloning.
#[derive(Clone, Debug)]
struct TypeEnvInner {
    bindings: FxHashMap<Name, Type>,
    parent: Option<TypeEnv>,
}

/// Declared types of the names in scope.
///
/// Each `TypeEnv` is one frame; `child()` opens a nested frame that shares
/// its parents by `Rc`.
#[derive(Clone, Debug)]
pub struct TypeEnv(Rc<TypeEnvInner>);

/// The name is already declared in this frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlreadyDeclared;

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv(Rc::new(TypeEnvInner {
            bindings: FxHashMap::default(),
            parent: None,
        }))
    }

    /// Create a child scope.
    #[must_use]
    pub fn child(&self) -> Self {
        TypeEnv(Rc::new(TypeEnvInner {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    /// The enclosing scope, if any.
    pub fn parent(&self) -> Option<&TypeEnv> {
        self.0.parent.as_ref()
    }

    /// Bind a name in this frame, replacing any previous binding.
    pub fn bind(&mut self, name: Name, ty: Type) {
        Rc::make_mut(&mut self.0).bindings.insert(name, ty);
    }

    /// Bind a name that must not already exist in this frame.
    pub fn declare(&mut self, name: Name, ty: Type) -> Result<(), AlreadyDeclared> {
        if self.is_bound_locally(name) {
            return Err(AlreadyDeclared);
        }
        self.bind(name, ty);
        Ok(())
    }

    /// Look up a name, searching parent scopes.
    pub fn lookup(&self, name: Name) -> Option<&Type> {
        self.0
            .bindings
            .get(&name)
            .or_else(|| self.0.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    /// Check if a name is bound in the current scope only.
    pub fn is_bound_locally(&self, name: Name) -> bool {
        self.0.bindings.contains_key(&name)
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
