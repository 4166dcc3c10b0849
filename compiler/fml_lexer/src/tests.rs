use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut interner = StringInterner::new();
    lex(source, &mut interner)
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_lex_arithmetic() {
    let mut interner = StringInterner::new();
    let tokens = lex("a + 2 * 2.65", &mut interner).unwrap();
    let a = interner.intern("a");
    let got: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        got,
        vec![
            TokenKind::Ident(a),
            TokenKind::Plus,
            TokenKind::Int(2),
            TokenKind::Star,
            TokenKind::Float(2.65f64.to_bits()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_spans_are_byte_offsets() {
    let mut interner = StringInterner::new();
    let tokens = lex("(1+2+3", &mut interner).unwrap();
    let starts: Vec<_> = tokens.iter().map(Token::position).collect();
    assert_eq!(starts, vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(tokens[6].kind, TokenKind::Eof);
}

#[test]
fn test_longest_operator_wins() {
    assert_eq!(
        kinds("<= >= == != += -= *= /= && || ->"),
        vec![
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::Arrow,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_and_type_keywords() {
    assert_eq!(
        kinds("if else while do for return break continue mut var function"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Do,
            TokenKind::For,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Mut,
            TokenKind::Var,
            TokenKind::Function,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("int float boolean string date duration void mixed"),
        vec![
            TokenKind::IntType,
            TokenKind::FloatType,
            TokenKind::BooleanType,
            TokenKind::StringType,
            TokenKind::DateType,
            TokenKind::DurationType,
            TokenKind::VoidType,
            TokenKind::MixedType,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let mut interner = StringInterner::new();
    let tokens = lex("interval iffy", &mut interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident(interner.intern("interval")));
    assert_eq!(tokens[1].kind, TokenKind::Ident(interner.intern("iffy")));
}

#[test]
fn test_string_literal_unescaped() {
    let mut interner = StringInterner::new();
    let tokens = lex(r#""say \"hi\"\n""#, &mut interner).unwrap();
    let TokenKind::String(name) = tokens[0].kind else {
        panic!("expected string, got {:?}", tokens[0].kind);
    };
    assert_eq!(interner.lookup(name), "say \"hi\"\n");
}

#[test]
fn test_comments_skipped() {
    assert_eq!(
        kinds("1 // one\n+ 2"),
        vec![
            TokenKind::Int(1),
            TokenKind::Plus,
            TokenKind::Int(2),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_empty_input() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("   \n\t"), vec![TokenKind::Eof]);
}

#[test]
fn test_unrecognized_character() {
    let mut interner = StringInterner::new();
    let err = lex("1 + #abc def", &mut interner).unwrap_err();
    assert_eq!(err.position, 4);
    assert_eq!(err.excerpt, "#abc");
    assert_eq!(
        err.to_string(),
        "Unrecognized input \"#abc\" at position 4"
    );
}

#[test]
fn test_integer_overflow_is_error() {
    let mut interner = StringInterner::new();
    let err = lex("99999999999999999999", &mut interner).unwrap_err();
    assert_eq!(err.position, 0);
}

#[test]
fn test_unterminated_string_is_error() {
    let mut interner = StringInterner::new();
    assert!(lex("\"open", &mut interner).is_err());
}

proptest! {
    #[test]
    fn prop_lex_never_panics_and_ends_with_eof(source in "\\PC{0,40}") {
        let mut interner = StringInterner::new();
        if let Ok(tokens) = lex(&source, &mut interner) {
            let last = tokens.as_slice().last().map(|t| t.kind);
            prop_assert_eq!(last, Some(TokenKind::Eof));
        }
    }

    #[test]
    fn prop_integer_literal_value(n in 0i64..=i64::MAX) {
        let mut interner = StringInterner::new();
        let tokens = lex(&n.to_string(), &mut interner).unwrap();
        prop_assert_eq!(tokens[0].kind, TokenKind::Int(n));
    }
}
