//! Static type system for the formula language.
//!
//! - `Type`: kind plus finality, with assignability and cast rules
//! - `operators`: which operand types each operator accepts, and the result
//! - `TypeEnv`: declared types of the names in scope
//! - `validate`: the pass that types a parsed program and inserts casts
//!
//! Dates and durations are modeled in `temporal` so the validator can
//! recognize calendar literals; the evaluator reuses the same parsers.

pub mod builtins;
mod describe;
mod env;
mod error;
pub mod operators;
pub mod temporal;
mod ty;
mod validate;

pub use describe::{OperatorDescription, TypeDescription};
pub use env::{AlreadyDeclared, TypeEnv};
pub use error::{TypeError, TypeErrorKind};
pub use ty::{common_type, widest_numeric, FunctionType, ReturnResolver, Type, TypeKind};
pub use validate::{validate, ExprTypes, TypedProgram};
