//! Validation errors.

use fml_ir::Span;

/// Why a well-formed program was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeErrorKind {
    #[error("Unknown identifier {name}")]
    UnknownIdentifier { name: String },
    #[error("Operator \"{op}\" is not defined for {left} and {right}")]
    BinaryMismatch {
        op: &'static str,
        left: String,
        right: String,
    },
    #[error("Operator \"{op}\" is not defined for {operand}")]
    UnaryMismatch { op: &'static str, operand: String },
    #[error("Cannot assign {source_type} to {target}")]
    NotAssignable { target: String, source_type: String },
    #[error("Cannot cast {from} to {to}")]
    InvalidCast { from: String, to: String },
    #[error("Cannot assign to final value {name}")]
    FinalAssignment { name: String },
    #[error("Expression is not assignable")]
    InvalidAssignmentTarget,
    #[error("{ty} is not callable")]
    NotCallable { ty: String },
    #[error("{name} expects {expected} arguments, got {found}")]
    ArgumentCount {
        name: String,
        expected: String,
        found: usize,
    },
    #[error("Invalid arguments ({args}) for {name}")]
    InvalidArguments { name: String, args: String },
    #[error("{ty} is no valid array index")]
    InvalidIndex { ty: String },
    #[error("{ty} cannot be indexed")]
    NotIndexable { ty: String },
    #[error("{ty} cannot be iterated")]
    NotIterable { ty: String },
    #[error("{name} is already declared in this scope")]
    DuplicateDeclaration { name: String },
    #[error("Void cannot be used as a value")]
    VoidValue,
    #[error("{keyword} outside of a loop")]
    OutsideLoop { keyword: &'static str },
    #[error("Function {name} must return {ty} on every path")]
    MissingReturn { name: String, ty: String },
    /// Internal inconsistency in the validator.
    #[error("Internal error: {0}")]
    Bug(String),
}

/// A validation failure and where it happened.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at position {}", .span.start)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Span,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, span: Span) -> Self {
        TypeError { kind, span }
    }
}
