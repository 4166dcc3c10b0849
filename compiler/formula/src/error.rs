//! Errors surfaced to the host.

use fml_eval::EvalError;
use fml_lexer::LexError;
use fml_parse::ParseError;
use fml_types::TypeError;

/// Any failure between formula text and result.
///
/// Lex and parse errors come from [`Formula::new`](crate::Formula::new);
/// type and runtime errors from [`Formula::calculate`](crate::Formula::calculate).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error("Can't calculate. {0}")]
    Eval(#[from] EvalError),
}
