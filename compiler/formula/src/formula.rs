//! The host-facing formula object.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use fml_eval::{
    lookup_builtin, Environment, EvalError, EvalErrorKind, FunctionValue, HostFunction,
    Interpreter, Value,
};
use fml_ir::visitor::{self, Occurrence};
use fml_ir::{ExprArena, Name, PrintConfig, Program, StringInterner};
use fml_parse::ParseOutput;
use fml_types::{Type, TypeEnv};

use crate::host::value_type;
use crate::FormulaError;

/// A parsed formula plus the host bindings it is evaluated against.
///
/// Parsing happens once, in [`Formula::new`]. Validation runs on the first
/// [`calculate`](Formula::calculate) and again only when the types of the
/// host bindings change or the formula is rewritten by a rename. Host
/// bindings persist across calculations; declarations made by the formula
/// itself start fresh every time.
pub struct Formula {
    source: String,
    interner: StringInterner,
    arena: ExprArena,
    program: Program,
    variables: BTreeMap<Name, Value>,
    methods: BTreeMap<Name, HostFunction>,
    validated: Option<Validated>,
    cancel: Option<Arc<AtomicBool>>,
}

/// Validation output for one set of binding types.
struct Validated {
    bindings: Vec<(Name, Type)>,
    arena: ExprArena,
    result: Type,
}

impl Formula {
    /// Lex and parse `source`.
    ///
    /// # Errors
    ///
    /// Fails on unrecognized input or malformed grammar.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn new(source: &str) -> Result<Self, FormulaError> {
        let mut interner = StringInterner::new();
        let tokens = fml_lexer::lex(source, &mut interner)?;
        let ParseOutput { arena, program } = fml_parse::parse(&tokens)?;
        Ok(Formula {
            source: source.to_owned(),
            interner,
            arena,
            program,
            variables: BTreeMap::new(),
            methods: BTreeMap::new(),
            validated: None,
            cancel: None,
        })
    }

    /// The text the formula was created from. Renames do not change it;
    /// see [`to_source`](Formula::to_source).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The formula as it currently reads, renames applied, in the default
    /// layout.
    pub fn to_source(&self) -> String {
        self.to_source_with(PrintConfig::default())
    }

    pub fn to_source_with(&self, config: PrintConfig) -> String {
        fml_ir::print_program(&self.arena, &self.program, &self.interner, config)
    }

    /// Bind a host variable. Replaces a method of the same name.
    pub fn set_variable(&mut self, name: &str, value: impl Into<Value>) {
        let name = self.interner.intern(name);
        let value = value.into();
        tracing::trace!(name = self.interner.lookup(name), ty = value.type_name(), "set variable");
        self.methods.remove(&name);
        self.variables.insert(name, value);
    }

    /// Remove a host variable, returning its value.
    pub fn remove_variable(&mut self, name: &str) -> Option<Value> {
        let name = self.interner.get(name)?;
        self.variables.remove(&name)
    }

    /// Bind a host method. Replaces a variable of the same name.
    pub fn set_method(&mut self, name: &str, method: HostFunction) {
        let name = self.interner.intern(name);
        tracing::trace!(name = self.interner.lookup(name), "set method");
        self.variables.remove(&name);
        self.methods.insert(name, method);
    }

    /// A value of the enum type `ty`, for binding as a variable.
    pub fn enum_value(&mut self, ty: &str, variant: &str) -> Value {
        Value::Enum {
            ty: self.interner.intern(ty),
            variant: self.interner.intern(variant),
        }
    }

    /// Stop calculations once `flag` is raised.
    pub fn set_cancellation(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    /// Render a value the way the formula would write it.
    pub fn render(&self, value: &Value) -> String {
        value.render(&self.interner)
    }

    /// Free variables in first-occurrence order.
    pub fn variables(&self) -> Vec<String> {
        self.names(&visitor::free_identifiers(&self.arena, &self.program).variables)
    }

    /// Free call targets in first-occurrence order, built-ins included.
    pub fn methods(&self) -> Vec<String> {
        self.names(&visitor::free_identifiers(&self.arena, &self.program).calls)
    }

    /// The text of every quoted literal, in source order.
    pub fn string_literals(&self) -> Vec<String> {
        self.names(&visitor::string_literals(&self.arena, &self.program))
    }

    /// Rename the free variable `old` to `new`. Returns how many
    /// occurrences were rewritten.
    pub fn rename_variables(&mut self, old: &str, new: &str) -> usize {
        let (old, new) = (self.interner.intern(old), self.interner.intern(new));
        let count = visitor::rename_identifier(&mut self.arena, &self.program, old, new);
        self.rewritten(count)
    }

    /// Rename calls of the free method `old` to `new`.
    pub fn rename_methods(&mut self, old: &str, new: &str) -> usize {
        let (old, new) = (self.interner.intern(old), self.interner.intern(new));
        let count = visitor::rename_call(&mut self.arena, &self.program, old, new);
        self.rewritten(count)
    }

    /// Replace every string literal `old` with `new`.
    pub fn rename_strings(&mut self, old: &str, new: &str) -> usize {
        let (old, new) = (self.interner.intern(old), self.interner.intern(new));
        let count = visitor::rename_string_literal(&mut self.arena, &self.program, old, new);
        self.rewritten(count)
    }

    /// The static type of the result under the current bindings.
    ///
    /// # Errors
    ///
    /// Fails if the formula does not validate.
    pub fn result_type(&mut self) -> Result<Type, FormulaError> {
        let validated = self.take_validated()?;
        let result = validated.result.clone();
        self.validated = Some(validated);
        Ok(result)
    }

    /// Validate if needed, then evaluate.
    ///
    /// # Errors
    ///
    /// Fails if a free name has no binding, if the formula does not
    /// validate against the binding types, or at runtime.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn calculate(&mut self) -> Result<Value, FormulaError> {
        self.check_bindings()?;
        let validated = self.take_validated()?;
        let result = self.evaluate(&validated);
        self.validated = Some(validated);
        Ok(result?)
    }

    /// Every free name must be bound before anything is checked or run.
    fn check_bindings(&self) -> Result<(), EvalError> {
        let mut missing = None;
        visitor::for_each_free_identifier(&self.arena, &self.program, |id, name, occurrence| {
            if missing.is_some() || self.is_bound(name) {
                return;
            }
            let name = self.interner.lookup(name).to_owned();
            let kind = match occurrence {
                Occurrence::Variable => EvalErrorKind::UnboundVariable { name },
                Occurrence::Callee => EvalErrorKind::UnresolvedMethod { name },
            };
            missing = Some(EvalError::new(kind, self.arena.get_expr(id).span));
        });
        missing.map_or(Ok(()), Err)
    }

    fn is_bound(&self, name: Name) -> bool {
        self.variables.contains_key(&name)
            || self.methods.contains_key(&name)
            || lookup_builtin(self.interner.lookup(name)).is_some()
    }

    /// Binding names and types, in name order.
    fn binding_types(&self) -> Vec<(Name, Type)> {
        let mut bindings: Vec<(Name, Type)> = self
            .variables
            .iter()
            .map(|(name, value)| (*name, value_type(value)))
            .chain(
                self.methods
                    .iter()
                    .map(|(name, method)| (*name, Type::function(method.signature().clone()))),
            )
            .collect();
        bindings.sort_by_key(|(name, _)| *name);
        bindings
    }

    /// The cached validation if the binding types still match, otherwise a
    /// fresh one. The caller puts it back into the cache.
    fn take_validated(&mut self) -> Result<Validated, FormulaError> {
        let bindings = self.binding_types();
        if let Some(cached) = self.validated.take() {
            if cached.bindings == bindings {
                return Ok(cached);
            }
        }
        tracing::debug!(bindings = bindings.len(), "validating");

        let mut globals = TypeEnv::new();
        for (name, ty) in &bindings {
            globals.bind(*name, ty.clone());
        }
        let mut arena = self.arena.clone();
        let typed = fml_types::validate(&mut arena, &self.program, &globals, &self.interner)?;
        Ok(Validated {
            bindings,
            arena,
            result: typed.result,
        })
    }

    fn evaluate(&self, validated: &Validated) -> Result<Value, EvalError> {
        let mut env = Environment::new();
        for (name, value) in &self.variables {
            env.define_global(*name, value.clone());
        }
        for (name, method) in &self.methods {
            env.define_global(*name, Value::Function(FunctionValue::Host(method.clone())));
        }
        let mut builder = Interpreter::builder(&self.interner, &validated.arena).env(env);
        if let Some(flag) = &self.cancel {
            builder = builder.cancellation(Arc::clone(flag));
        }
        builder.build().run(&self.program)
    }

    fn rewritten(&mut self, count: usize) -> usize {
        if count > 0 {
            self.validated = None;
        }
        count
    }

    fn names(&self, names: &[Name]) -> Vec<String> {
        names
            .iter()
            .map(|name| self.interner.lookup(*name).to_owned())
            .collect()
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("source", &self.source)
            .field("variables", &self.variables.len())
            .field("methods", &self.methods.len())
            .finish_non_exhaustive()
    }
}
