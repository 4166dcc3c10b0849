//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use fml_ir::{Name, Span, Token, TokenKind, TokenList};

use crate::{ParseError, ParseErrorKind};

/// Cursor for navigating tokens.
///
/// The position only moves forward except through `set_position`, which
/// snapshots use to roll back speculative parses.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `pos` is past the end of the stream.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos < self.tokens.len(),
            "cursor position {} out of bounds (max {})",
            pos,
            self.tokens.len()
        );
        self.pos = pos;
    }

    /// Get the current token.
    ///
    /// An empty token list (never produced by the lexer) reads as `Eof`.
    #[inline]
    pub fn current(&self) -> Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.as_slice().last())
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens
                .get(self.pos - 1)
                .map_or(Span::DUMMY, |token| token.span)
        } else {
            Span::DUMMY
        }
    }

    /// One-token lookahead. Returns `Eof` at the end of the stream.
    #[inline]
    pub fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advance to the next token. Never moves past `Eof`.
    #[inline]
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches.
    #[inline]
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or fail naming `expected`.
    pub fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consume an identifier.
    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Build an error for the current token.
    #[cold]
    #[inline(never)]
    pub fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        let kind = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEndOfInput { expected }
        } else {
            ParseErrorKind::UnexpectedToken {
                expected,
                found: token.kind.display_name(),
            }
        };
        ParseError::new(kind, token.span)
    }
}
