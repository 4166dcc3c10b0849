//! Lexer for the formula language using logos.
//!
//! Produces a [`TokenList`] terminated by an `Eof` token. Whitespace and
//! `//` line comments are skipped; string literals are unescaped and
//! interned.

mod convert;
mod raw_token;

use fml_ir::{Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;

use convert::convert_token;
use raw_token::RawToken;

/// Longest excerpt quoted in a lex error.
const MAX_EXCERPT: usize = 16;

/// Input the tokenizer could not recognize.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized input \"{excerpt}\" at position {position}")]
pub struct LexError {
    /// Byte offset of the first unrecognized character.
    pub position: u32,
    /// The unrecognized run, up to the next whitespace.
    pub excerpt: String,
}

impl LexError {
    #[cold]
    fn at(source: &str, start: usize) -> Self {
        let rest = &source[start..];
        let excerpt: String = rest
            .chars()
            .take_while(|c| !c.is_whitespace())
            .take(MAX_EXCERPT)
            .collect();
        LexError {
            position: Span::at(start).start,
            excerpt,
        }
    }
}

/// Lex source code into a [`TokenList`].
///
/// The final token is always `Eof`, positioned at the end of the input.
///
/// # Errors
///
/// Returns a [`LexError`] at the first character that starts no token,
/// including integer literals that do not fit in 64 bits.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn lex(source: &str, interner: &mut StringInterner) -> Result<TokenList, LexError> {
    let mut result = TokenList::with_capacity(source.len() / 2 + 1);
    let mut logos = RawToken::lexer(source);

    while let Some(token) = logos.next() {
        let range = logos.span();
        match token {
            Ok(raw) => {
                let kind = convert_token(raw, logos.slice(), interner);
                result.push(Token::new(kind, Span::from_range(range)));
            }
            Err(()) => {
                let error = LexError::at(source, range.start);
                tracing::debug!(position = error.position, "lex error");
                return Err(error);
            }
        }
    }

    result.push(Token::new(TokenKind::Eof, Span::at(source.len())));
    tracing::trace!(tokens = result.len(), "lexed");
    Ok(result)
}

#[cfg(test)]
mod tests;
