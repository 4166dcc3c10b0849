//! Tokens produced by the lexer.

use std::fmt;
use std::ops::Index;

use crate::{Name, Span};

/// A token with its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Byte offset of the first character of the token.
    #[inline]
    pub const fn position(&self) -> u32 {
        self.span.start
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Token kinds.
///
/// Floats are stored as `u64` bits so the enum stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(u64),
    String(Name),
    Ident(Name),

    // Keywords
    True,
    False,
    Null,
    If,
    Else,
    While,
    Do,
    For,
    Return,
    Break,
    Continue,
    Mut,
    Var,
    Function,

    // Type keywords
    IntType,
    FloatType,
    BooleanType,
    StringType,
    DateType,
    DurationType,
    VoidType,
    MixedType,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    AmpAmp,
    PipePipe,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Question,
    Colon,
    Semicolon,
    Arrow,

    /// End of input. Always the last token of a `TokenList`.
    Eof,
}

impl TokenKind {
    /// Human-readable name used in parse errors.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float literal",
            TokenKind::String(_) => "string literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Mut => "mut",
            TokenKind::Var => "var",
            TokenKind::Function => "function",
            TokenKind::IntType => "int",
            TokenKind::FloatType => "float",
            TokenKind::BooleanType => "boolean",
            TokenKind::StringType => "string",
            TokenKind::DateType => "date",
            TokenKind::DurationType => "duration",
            TokenKind::VoidType => "void",
            TokenKind::MixedType => "mixed",
            TokenKind::Plus => "\"+\"",
            TokenKind::Minus => "\"-\"",
            TokenKind::Star => "\"*\"",
            TokenKind::Slash => "\"/\"",
            TokenKind::Percent => "\"%\"",
            TokenKind::Caret => "\"^\"",
            TokenKind::AmpAmp => "\"&&\"",
            TokenKind::PipePipe => "\"||\"",
            TokenKind::Bang => "\"!\"",
            TokenKind::EqEq => "\"==\"",
            TokenKind::NotEq => "\"!=\"",
            TokenKind::Lt => "\"<\"",
            TokenKind::Gt => "\">\"",
            TokenKind::LtEq => "\"<=\"",
            TokenKind::GtEq => "\">=\"",
            TokenKind::Eq => "\"=\"",
            TokenKind::PlusEq => "\"+=\"",
            TokenKind::MinusEq => "\"-=\"",
            TokenKind::StarEq => "\"*=\"",
            TokenKind::SlashEq => "\"/=\"",
            TokenKind::LParen => "\"(\"",
            TokenKind::RParen => "\")\"",
            TokenKind::LBracket => "\"[\"",
            TokenKind::RBracket => "\"]\"",
            TokenKind::LBrace => "\"{\"",
            TokenKind::RBrace => "\"}\"",
            TokenKind::Comma => "\",\"",
            TokenKind::Question => "\"?\"",
            TokenKind::Colon => "\":\"",
            TokenKind::Semicolon => "\";\"",
            TokenKind::Arrow => "\"->\"",
            TokenKind::Eof => "end of input",
        }
    }

    /// Check if this token is a built-in type keyword.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::IntType
                | TokenKind::FloatType
                | TokenKind::BooleanType
                | TokenKind::StringType
                | TokenKind::DateType
                | TokenKind::DurationType
                | TokenKind::VoidType
                | TokenKind::MixedType
                | TokenKind::Function
        )
    }

    /// Operator symbol for tokens that spell an operator.
    ///
    /// Kept in sync with the operator registry; see `operator::tests`.
    pub fn operator_symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            _ => return None,
        };
        Some(symbol)
    }

    /// The float payload of a `Float` token.
    pub fn float_value(&self) -> Option<f64> {
        match self {
            TokenKind::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

/// Lexer output: tokens in source order, terminated by `Eof`.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    #[inline]
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            tokens: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
