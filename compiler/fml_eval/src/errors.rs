//! Evaluation errors.
//!
//! Only bindings supplied after validation (variable values, host methods)
//! and data-dependent failures (indices, arithmetic) can fail here. Anything
//! the validator should have caught is reported as `Bug`.

use fml_ir::Span;

/// Why evaluation stopped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("Variable {name} has no value")]
    UnboundVariable { name: String },
    #[error("No method provided for {name}")]
    UnresolvedMethod { name: String },
    #[error("{index} not in range 0 - {length}")]
    OutOfRange { index: i64, length: usize },
    #[error("{index} is no valid array index")]
    InvalidIndex { index: String },
    #[error("Operator \"{op}\" cannot combine {left} and {right}")]
    BinaryMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Operator \"{op}\" cannot be applied to {operand}")]
    UnaryMismatch {
        op: &'static str,
        operand: &'static str,
    },
    #[error("Cannot convert {value} to {to}")]
    InvalidCast { value: String, to: String },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in {op}")]
    Overflow { op: &'static str },
    #[error("Date out of range")]
    DateOutOfRange,
    #[error("Array lengths differ: {left} and {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("{ty} is not callable")]
    NotCallable { ty: &'static str },
    #[error("{ty} cannot be iterated")]
    NotIterable { ty: &'static str },
    #[error("{name} expects {expected} arguments, got {found}")]
    ArgumentCount {
        name: String,
        expected: String,
        found: usize,
    },
    #[error("Invalid argument for {name}: {message}")]
    InvalidArgument { name: String, message: String },
    #[error("{name} failed: {message}")]
    HostFailure { name: String, message: String },
    #[error("Maximum call depth of {depth} exceeded")]
    CallDepth { depth: usize },
    #[error("Evaluation cancelled")]
    Cancelled,
    /// Internal inconsistency; a validated program never gets here.
    #[error("Internal error: {0}")]
    Bug(String),
}

/// A runtime failure and the expression that caused it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at position {}", .span.start)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, span: Span) -> Self {
        EvalError { kind, span }
    }
}

/// Result of evaluating one expression.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

#[cold]
pub(crate) fn bug(message: impl Into<String>) -> EvalErrorKind {
    EvalErrorKind::Bug(message.into())
}
