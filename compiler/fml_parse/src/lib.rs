//! Recursive descent parser for the formula language.
//!
//! Expressions use precedence climbing driven by the operator registry in
//! `fml_ir::operator`. Statements are recognized by trying each statement
//! form in a fixed order against a snapshot; the first form that parses
//! wins, and when none does, the error that got furthest is reported.

mod cursor;
mod error;
mod grammar;

use fml_ir::{ArenaCheckpoint, ExprArena, Program, Span, TokenList};

pub use cursor::Cursor;
pub use error::{ParseError, ParseErrorKind};

/// Result of parsing: the node arena and the program rooted in it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOutput {
    pub arena: ExprArena,
    pub program: Program,
}

/// Saved parser state for speculative parsing.
#[derive(Copy, Clone, Debug)]
struct ParserSnapshot {
    position: usize,
    arena: ArenaCheckpoint,
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::with_capacity(tokens.len() * 4),
        }
    }

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            position: self.cursor.position(),
            arena: self.arena.checkpoint(),
        }
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor.set_position(snapshot.position);
        self.arena.rollback(snapshot.arena);
    }

    /// Run `parse`, rolling back every consumed token and allocated node
    /// if it fails.
    fn attempt<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let snapshot = self.snapshot();
        let result = parse(self);
        if result.is_err() {
            self.restore(snapshot);
        }
        result
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    /// Consume the parser and produce its output.
    fn finish(self, program: Program) -> ParseOutput {
        ParseOutput {
            arena: self.arena,
            program,
        }
    }
}

/// The error that reached further into the input. Ties keep `current`.
fn furthest(current: ParseError, candidate: ParseError) -> ParseError {
    if candidate.position() > current.position() {
        candidate
    } else {
        current
    }
}

/// Parse a whole formula: statements, optionally ending in a bare
/// expression whose value is the result.
///
/// # Errors
///
/// Returns the parse error that reached furthest into the input.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList) -> Result<ParseOutput, ParseError> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    tracing::trace!(
        exprs = parser.arena.expr_count(),
        stmts = parser.arena.stmt_count(),
        "parsed"
    );
    Ok(parser.finish(program))
}

/// Parse a single expression spanning the whole token stream. The result
/// is a program with no statements and the expression as its tail.
///
/// # Errors
///
/// Fails if the tokens do not form exactly one expression.
pub fn parse_expression(tokens: &TokenList) -> Result<ParseOutput, ParseError> {
    let mut parser = Parser::new(tokens);
    let start = parser.cursor.current_span();
    let expr = parser.parse_expr()?;
    parser
        .cursor
        .expect(fml_ir::TokenKind::Eof, "end of input")?;
    let program = Program {
        body: fml_ir::StmtRange::EMPTY,
        tail: Some(expr),
        span: parser.span_from(start),
    };
    Ok(parser.finish(program))
}
