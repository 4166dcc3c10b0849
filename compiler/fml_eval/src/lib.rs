//! Tree-walking interpreter for the formula language.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Environment`: variable scoping with a scope stack
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator dispatch
//! - `call_builtin`: the built-in functions, by name
//! - `Interpreter`: statements and expressions over the validated arena
//!
//! Programs are expected to have passed `fml_types::validate`, which
//! inserts the implicit casts as ordinary cast nodes. Running an
//! unvalidated program is allowed; type confusion then surfaces as
//! runtime errors instead of static ones.

mod builtins;
mod environment;
pub mod errors;
pub mod interpreter;
mod operators;
mod value;

pub use builtins::{call_builtin, lookup_builtin};
pub use environment::{AssignError, Environment, LocalScope, Mutability, Scope};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter, DEFAULT_MAX_CALL_DEPTH};
pub use operators::{cast, compare_values, evaluate_binary, evaluate_unary, values_equal};
pub use value::{FunctionValue, HostFn, HostFunction, UserFunction, Value};
