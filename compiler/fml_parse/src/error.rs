//! Parse error types.

use fml_ir::Span;

/// What went wrong, independent of where.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },
    /// The token stream ended before the construct closed.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: &'static str },
}

/// A structural mismatch between the token stream and the grammar.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at position {}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Span of the offending token.
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    /// Byte offset of the offending token.
    #[inline]
    pub fn position(&self) -> u32 {
        self.span.start
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnexpectedEndOfInput { .. })
    }
}
