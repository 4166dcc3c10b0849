//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived tokenizer output before
//! string interning and final token conversion.

use logos::Logos;

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub(crate) enum RawToken {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("mut")]
    Mut,
    #[token("var")]
    Var,
    #[token("function")]
    Function,

    #[token("int")]
    IntType,
    #[token("float")]
    FloatType,
    #[token("boolean")]
    BooleanType,
    #[token("string")]
    StringType,
    #[token("date")]
    DateType,
    #[token("duration")]
    DurationType,
    #[token("void")]
    VoidType,
    #[token("mixed")]
    MixedType,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("->")]
    Arrow,

    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+=")]
    PlusEq,
    #[token("+")]
    Plus,
    #[token("-=")]
    MinusEq,
    #[token("-")]
    Minus,
    #[token("*=")]
    StarEq,
    #[token("*")]
    Star,
    #[token("/=")]
    SlashEq,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // Out-of-range integers fail the callback and surface as lex errors.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}
