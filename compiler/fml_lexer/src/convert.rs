//! Token Conversion
//!
//! Converts raw logos tokens to final `TokenKind` with string interning.

use fml_ir::{StringInterner, TokenKind};

use crate::raw_token::RawToken;

/// Convert a raw token to a `TokenKind`, interning strings.
pub(crate) fn convert_token(
    raw: RawToken,
    slice: &str,
    interner: &mut StringInterner,
) -> TokenKind {
    match raw {
        // Literals
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(f) => TokenKind::Float(f.to_bits()),
        RawToken::String => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::String(interner.intern(&unescape_string(content)))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        // Keywords
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::For => TokenKind::For,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Mut => TokenKind::Mut,
        RawToken::Var => TokenKind::Var,
        RawToken::Function => TokenKind::Function,

        // Type keywords
        RawToken::IntType => TokenKind::IntType,
        RawToken::FloatType => TokenKind::FloatType,
        RawToken::BooleanType => TokenKind::BooleanType,
        RawToken::StringType => TokenKind::StringType,
        RawToken::DateType => TokenKind::DateType,
        RawToken::DurationType => TokenKind::DurationType,
        RawToken::VoidType => TokenKind::VoidType,
        RawToken::MixedType => TokenKind::MixedType,

        // Punctuation
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Arrow => TokenKind::Arrow,

        // Operators
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::Minus => TokenKind::Minus,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::Star => TokenKind::Star,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
    }
}

/// Process string escape sequences. Unknown escapes are kept verbatim.
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') | None => result.push('\\'),
                Some('"') => result.push('"'),
                Some(c) => {
                    result.push('\\');
                    result.push(c);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
