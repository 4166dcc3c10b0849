use super::*;
use fml_ir::StringInterner;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

struct Checked {
    arena: ExprArena,
    program: Program,
    result: Result<TypedProgram, TypeError>,
}

fn check_with(source: &str, interner: &mut StringInterner, globals: &TypeEnv) -> Checked {
    let tokens = fml_lexer::lex(source, interner).unwrap();
    let output = fml_parse::parse(&tokens).unwrap();
    let mut arena = output.arena;
    let result = validate(&mut arena, &output.program, globals, interner);
    Checked {
        arena,
        program: output.program,
        result,
    }
}

fn result_type(source: &str) -> String {
    let mut interner = StringInterner::new();
    let checked = check_with(source, &mut interner, &TypeEnv::new());
    checked.result.unwrap().result.render(&interner)
}

fn error(source: &str) -> TypeErrorKind {
    let mut interner = StringInterner::new();
    check_with(source, &mut interner, &TypeEnv::new())
        .result
        .unwrap_err()
        .kind
}

#[test]
fn test_arithmetic_result_types() {
    assert_eq!(result_type("1 + 2 * 3"), "int");
    assert_eq!(result_type("1 / 2"), "float");
    assert_eq!(result_type("1 + 2.5"), "float");
    assert_eq!(result_type("\"a\" + \"b\""), "string");
    assert_eq!(result_type("{1, 2, 3} + 5"), "int[]");
    assert_eq!(result_type("{10, 15, 20} / 5"), "float[]");
}

#[test]
fn test_host_globals() {
    let mut interner = StringInterner::new();
    let mut globals = TypeEnv::new();
    globals.bind(interner.intern("a"), Type::float());
    globals.bind(interner.intern("b"), Type::int());
    let checked = check_with("a * b + 1", &mut interner, &globals);
    assert_eq!(checked.result.unwrap().result, Type::float());
}

#[test]
fn test_empty_program_is_void() {
    assert_eq!(result_type("int x = 1;"), "void");
}

#[test]
fn test_declaration_inserts_int_to_float_cast() {
    let mut interner = StringInterner::new();
    let checked = check_with("float x = 1; x", &mut interner, &TypeEnv::new());
    assert_eq!(checked.result.unwrap().result.render(&interner), "float");

    let body = checked.arena.get_stmt_list(checked.program.body);
    let StmtKind::VarDecl { init, .. } = checked.arena.get_stmt(body[0]).kind else {
        panic!("expected declaration");
    };
    let ExprKind::Binary { op, left, right } = checked.arena.get_expr(init).kind else {
        panic!("expected inserted cast");
    };
    assert_eq!(op, OperatorId::TypeCast);
    assert_eq!(
        checked.arena.get_expr(left).kind,
        ExprKind::Constant(Constant::Int(1))
    );
    assert_eq!(
        checked.arena.get_expr(right).kind,
        ExprKind::TypeLiteral(fml_ir::ParsedType::Float)
    );
}

#[test]
fn test_declaration_may_cast_explicitly_castable_values() {
    assert_eq!(result_type("int x = 2.7; x"), "int");
    assert_eq!(result_type("string s = 5; s"), "string");
    assert!(matches!(
        error("date d = 5;"),
        TypeErrorKind::NotAssignable { .. }
    ));
}

#[test]
fn test_assignment_does_not_narrow() {
    assert_eq!(
        error("mut int x = 1; x = 2.5;"),
        TypeErrorKind::NotAssignable {
            target: "int".to_owned(),
            source_type: "float".to_owned(),
        }
    );
    assert_eq!(result_type("mut float x = 1; x = 2; x"), "float");
}

#[test]
fn test_calendar_literals_are_reinterpreted() {
    let mut interner = StringInterner::new();
    let checked = check_with(
        "\"2020-01-15T00:00:00+00:00\" + \"P5M\"",
        &mut interner,
        &TypeEnv::new(),
    );
    assert_eq!(checked.result.unwrap().result, Type::date());
    let ExprKind::Binary { left, right, .. } =
        checked.arena.get_expr(checked.program.tail.unwrap()).kind
    else {
        panic!("expected sum");
    };
    assert!(matches!(
        checked.arena.get_expr(left).kind,
        ExprKind::Constant(Constant::Date(_))
    ));
    assert!(matches!(
        checked.arena.get_expr(right).kind,
        ExprKind::Constant(Constant::Duration(_))
    ));
}

#[test]
fn test_calendar_arithmetic_types() {
    assert_eq!(result_type("10 * \"P1M\""), "duration");
    assert_eq!(
        result_type("\"2020-01-15\" - \"2020-01-15\""),
        "duration"
    );
    assert_eq!(result_type("date d = \"2020-01-15\"; d + \"P1D\""), "date");
    // Strings that are neither stay strings.
    assert_eq!(result_type("\"P5M\" + \"abc\""), "string");
}

#[test]
fn test_final_assignment() {
    assert_eq!(
        error("int x = 1; x = 2;"),
        TypeErrorKind::FinalAssignment {
            name: "x".to_owned()
        }
    );
    assert_eq!(
        error("int[] xs = {1, 2}; xs[0] = 5;"),
        TypeErrorKind::FinalAssignment {
            name: "xs".to_owned()
        }
    );
    assert_eq!(result_type("mut int[] xs = {1, 2}; xs[0] = 5; xs"), "int[]");
}

#[test]
fn test_assignment_target_must_be_a_slot() {
    assert_eq!(
        error("mut int x = 1; (x + 1) = 2;"),
        TypeErrorKind::InvalidAssignmentTarget
    );
}

#[test]
fn test_compound_assignment() {
    assert_eq!(result_type("mut int x = 1; x += 2; x"), "int");
    assert!(matches!(
        error("mut int x = 1; x /= 2;"),
        TypeErrorKind::NotAssignable { .. }
    ));
    assert_eq!(
        result_type("mut date d = \"2020-01-15\"; d += \"P1M\"; d"),
        "date"
    );
}

#[test]
fn test_scopes() {
    assert!(matches!(
        error("int x = 1; int x = 2;"),
        TypeErrorKind::DuplicateDeclaration { .. }
    ));
    assert_eq!(result_type("int x = 1; { int x = 2; } x"), "int");
    assert!(matches!(
        error("if (true) { int y = 1; } y"),
        TypeErrorKind::UnknownIdentifier { .. }
    ));
    assert!(matches!(
        error("for (mut int i = 0; i < 3; i += 1) {} i"),
        TypeErrorKind::UnknownIdentifier { .. }
    ));
}

#[test]
fn test_unknown_identifier() {
    assert_eq!(
        error("a + 1"),
        TypeErrorKind::UnknownIdentifier {
            name: "a".to_owned()
        }
    );
}

#[test]
fn test_loop_control_outside_loop() {
    assert_eq!(
        error("break;"),
        TypeErrorKind::OutsideLoop { keyword: "break" }
    );
    assert_eq!(
        error("while (true) { int f() { continue; return 1; } }"),
        TypeErrorKind::OutsideLoop {
            keyword: "continue"
        }
    );
    assert_eq!(result_type("while (true) { if (true) break; } 1"), "int");
}

#[test]
fn test_functions() {
    assert_eq!(
        result_type("int fib(int n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } fib(10)"),
        "int"
    );
    assert_eq!(
        error("int f(int n) { if (n > 0) return 1; }"),
        TypeErrorKind::MissingReturn {
            name: "f".to_owned(),
            ty: "int".to_owned()
        }
    );
    assert_eq!(
        result_type("int f(int n) { if (n > 0) { return 1; } else { return 2; } } f(1)"),
        "int"
    );
    assert!(matches!(
        error("int f(int n) { n = 2; return n; }"),
        TypeErrorKind::FinalAssignment { .. }
    ));
    assert_eq!(result_type("int f(mut int n) { n = 2; return n; } f(1)"), "int");
}

#[test]
fn test_argument_checks() {
    assert_eq!(
        error("int f(int n) { return n; } f(1, 2)"),
        TypeErrorKind::ArgumentCount {
            name: "f".to_owned(),
            expected: "1".to_owned(),
            found: 2
        }
    );
    assert!(matches!(
        error("int f(int n) { return n; } f(\"x\")"),
        TypeErrorKind::NotAssignable { .. }
    ));
    assert_eq!(
        error("max()"),
        TypeErrorKind::InvalidArguments {
            name: "max".to_owned(),
            args: String::new()
        }
    );
    assert!(matches!(error("5(1)"), TypeErrorKind::NotCallable { .. }));
}

#[test]
fn test_void_value() {
    assert_eq!(
        error("void f() { } int x = f();"),
        TypeErrorKind::VoidValue
    );
    assert_eq!(result_type("void f() { } f()"), "void");
}

#[test]
fn test_builtins() {
    assert_eq!(result_type("max(min(5, -2), 1)"), "int");
    assert_eq!(result_type("max(1, 2.5)"), "float");
    assert_eq!(result_type("max({-10, 15, 20})"), "int");
    assert_eq!(result_type("pow(2, 3)"), "float");
    assert_eq!(result_type("asVector(1, 2, 3, 4)[2]"), "int");
    assert_eq!(result_type("sizeof({1, 2, 3, 4})"), "int");
}

#[test]
fn test_builtin_argument_widening_inserts_cast() {
    let mut interner = StringInterner::new();
    let checked = check_with("sqrt(4)", &mut interner, &TypeEnv::new());
    let typed = checked.result.unwrap();
    let ExprKind::Call { args, .. } = checked.arena.get_expr(checked.program.tail.unwrap()).kind
    else {
        panic!("expected call");
    };
    let arg = checked.arena.get_expr_list(args)[0];
    assert!(matches!(
        checked.arena.get_expr(arg).kind,
        ExprKind::Binary {
            op: OperatorId::TypeCast,
            ..
        }
    ));
    assert_eq!(typed.expr_types.get(arg), Some(&Type::float()));
}

#[test]
fn test_index_checks() {
    assert_eq!(
        error("{1, 2, 3}[\"123\"]"),
        TypeErrorKind::InvalidIndex {
            ty: "\"123\"".to_owned()
        }
    );
    assert_eq!(
        error("{1, 2, 3}[\"123\"]").to_string(),
        "\"123\" is no valid array index"
    );
    assert!(matches!(error("5[0]"), TypeErrorKind::NotIndexable { .. }));
}

#[test]
fn test_ternary_joins_branches() {
    assert_eq!(result_type("true ? 1 : 2"), "int");
    assert_eq!(result_type("true ? 1 : 2.5"), "float");
    assert_eq!(result_type("true ? 1 : \"x\""), "mixed");
}

#[test]
fn test_array_literals() {
    assert_eq!(result_type("{1, 2.5}"), "float[]");
    assert_eq!(result_type("{1, \"x\"}"), "mixed[]");
    assert_eq!(result_type("{}"), "void");
    assert_eq!(result_type("sizeof({})"), "int");
}

#[test]
fn test_foreach() {
    assert_eq!(
        result_type("mut int total = 0; for (int v : {1, 2, 3}) total += v; total"),
        "int"
    );
    assert_eq!(
        result_type("mut float total = 0; for (float v : {1, 2, 3}) total += v; total"),
        "float"
    );
    assert!(matches!(
        error("for (int v : 5) {}"),
        TypeErrorKind::NotIterable { .. }
    ));
    assert!(matches!(
        error("for (int v : {1.5}) {}"),
        TypeErrorKind::NotAssignable { .. }
    ));
}

#[test]
fn test_explicit_casts() {
    assert_eq!(result_type("(int) 2.5"), "int");
    assert_eq!(result_type("(date) \"2020-01-15\""), "date");
    assert_eq!(
        error("(date) 5"),
        TypeErrorKind::InvalidCast {
            from: "int".to_owned(),
            to: "date".to_owned()
        }
    );
}

#[test]
fn test_top_level_returns() {
    assert_eq!(result_type("if (true) return 1; return 2;"), "int");
    assert_eq!(result_type("if (true) return 1; return \"x\";"), "mixed");
}

#[test]
fn test_operator_mismatch() {
    assert_eq!(
        error("5 - {1, 2}"),
        TypeErrorKind::BinaryMismatch {
            op: "-",
            left: "int".to_owned(),
            right: "int[]".to_owned()
        }
    );
    assert!(matches!(
        error("{1, 2} + {1, 2, 3}"),
        TypeErrorKind::BinaryMismatch { .. }
    ));
}

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..100).prop_map(|n| n.to_string()),
        (0u32..100).prop_map(|n| format!("{n}.5")),
        Just("\"2020-01-15\"".to_owned()),
        Just("\"P1M\"".to_owned()),
        Just("{1, 2, 3}".to_owned()),
        Just("x".to_owned()),
    ]
}

fn expression() -> impl Strategy<Value = String> {
    operand().prop_recursive(4, 16, 2, |inner| {
        (
            inner.clone(),
            prop::sample::select(vec!["+", "-", "*", "/", "<", "=="]),
            inner,
        )
            .prop_map(|(l, op, r)| format!("({l} {op} {r})"))
    })
}

proptest! {
    #[test]
    fn validation_is_deterministic(source in expression()) {
        let mut interner = StringInterner::new();
        let mut globals = TypeEnv::new();
        globals.bind(interner.intern("x"), Type::float());
        let first = check_with(&source, &mut interner, &globals);
        let second = check_with(&source, &mut interner, &globals);
        prop_assert_eq!(first.result, second.result);
        prop_assert_eq!(first.arena, second.arena);
    }
}
