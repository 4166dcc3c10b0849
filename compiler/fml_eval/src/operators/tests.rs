use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::Int).collect())
}

fn floats(values: &[f64]) -> Value {
    Value::array(values.iter().copied().map(Value::Float).collect())
}

fn date(text: &str) -> Value {
    Value::Date(parse_date(text).unwrap())
}

#[test]
fn test_integer_arithmetic() {
    assert_eq!(
        evaluate_binary(OperatorId::Add, &Value::Int(2), &Value::Int(3)),
        Ok(Value::Int(5))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Div, &Value::Int(1), &Value::Int(2)),
        Ok(Value::Float(0.5))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Mod, &Value::Int(7), &Value::Int(3)),
        Ok(Value::Int(1))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Mul, &Value::Int(2), &Value::Float(1.5)),
        Ok(Value::Float(3.0))
    );
}

#[test]
fn test_integer_failures() {
    assert_eq!(
        evaluate_binary(OperatorId::Div, &Value::Int(1), &Value::Int(0)),
        Err(EvalErrorKind::DivisionByZero)
    );
    assert_eq!(
        evaluate_binary(OperatorId::Mod, &Value::Int(1), &Value::Int(0)),
        Err(EvalErrorKind::DivisionByZero)
    );
    assert_eq!(
        evaluate_binary(OperatorId::Add, &Value::Int(i64::MAX), &Value::Int(1)),
        Err(EvalErrorKind::Overflow { op: "addition" })
    );
    assert_eq!(
        evaluate_unary(OperatorId::Neg, &Value::Int(i64::MIN)),
        Err(EvalErrorKind::Overflow { op: "negation" })
    );
}

#[test]
fn test_array_broadcast() {
    let v = ints(&[1, 2, 3]);
    assert_eq!(
        evaluate_binary(OperatorId::Add, &v, &Value::Int(5)),
        Ok(ints(&[6, 7, 8]))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Sub, &v, &v),
        Ok(ints(&[0, 0, 0]))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Mul, &v, &v),
        Ok(ints(&[1, 4, 9]))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Div, &ints(&[10, 15, 20]), &Value::Int(5)),
        Ok(floats(&[2.0, 3.0, 4.0]))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Add, &v, &ints(&[1, 2])),
        Err(EvalErrorKind::LengthMismatch { left: 3, right: 2 })
    );
}

#[test]
fn test_scalar_left_only_for_commutative_operators() {
    let v = ints(&[1, 2, 3]);
    assert_eq!(
        evaluate_binary(OperatorId::Mul, &Value::Int(2), &v),
        Ok(ints(&[2, 4, 6]))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Sub, &Value::Int(5), &v),
        Err(EvalErrorKind::BinaryMismatch {
            op: "-",
            left: "int",
            right: "array"
        })
    );
}

#[test]
fn test_calendar_arithmetic() {
    let start = date("2020-01-15T00:00:00+00:00");
    let five_months = Value::Duration(IsoDuration::new(5, 0));
    let later = evaluate_binary(OperatorId::Add, &start, &five_months).unwrap();
    assert_eq!(later, date("2020-06-15T00:00:00+00:00"));
    assert_eq!(
        evaluate_binary(OperatorId::Sub, &later, &five_months),
        Ok(start.clone())
    );
    assert_eq!(
        evaluate_binary(OperatorId::Sub, &start, &start),
        Ok(Value::Duration(IsoDuration::ZERO))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Mul, &Value::Int(10), &Value::Duration(IsoDuration::new(1, 0))),
        Ok(Value::Duration(IsoDuration::new(10, 0)))
    );
}

#[test]
fn test_equality_and_ordering() {
    assert_eq!(
        evaluate_binary(OperatorId::Eq, &Value::Int(1), &Value::Float(1.0)),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Eq, &Value::Int(1), &Value::string("1")),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        evaluate_binary(OperatorId::Lt, &Value::string("a"), &Value::string("b")),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        evaluate_binary(OperatorId::GtEq, &Value::Bool(true), &Value::Bool(false)),
        Ok(Value::Bool(true))
    );
    assert!(evaluate_binary(OperatorId::Lt, &Value::Int(1), &Value::string("a")).is_err());
}

#[test]
fn test_logical_operators() {
    assert_eq!(
        evaluate_binary(OperatorId::Xor, &Value::Bool(true), &Value::Bool(true)),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        evaluate_binary(OperatorId::And, &Value::Int(1), &Value::string("x")),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        evaluate_unary(OperatorId::Not, &Value::Null),
        Ok(Value::Bool(true))
    );
}

#[test]
fn test_casts() {
    let interner = StringInterner::new();
    let cast = |value: &Value, target: &Type| cast(value, target, &interner);
    assert_eq!(cast(&Value::Float(2.7), &Type::int()), Ok(Value::Int(2)));
    assert_eq!(cast(&Value::Float(-2.7), &Type::int()), Ok(Value::Int(-2)));
    assert_eq!(cast(&Value::Int(2), &Type::float()), Ok(Value::Float(2.0)));
    assert_eq!(cast(&Value::Bool(true), &Type::int()), Ok(Value::Int(1)));
    assert_eq!(
        cast(&Value::Int(0), &Type::boolean()),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        cast(&ints(&[1, 2]), &Type::array(Type::float(), None)),
        Ok(floats(&[1.0, 2.0]))
    );
    assert_eq!(
        cast(&Value::string("P1M"), &Type::duration()),
        Ok(Value::Duration(IsoDuration::new(1, 0)))
    );
    assert_eq!(
        cast(&Value::string("soon"), &Type::date()),
        Err(EvalErrorKind::InvalidCast {
            value: "\"soon\"".to_owned(),
            to: "date".to_owned()
        })
    );
    assert!(cast(&Value::Float(f64::NAN), &Type::int()).is_err());
}

#[test]
fn test_enum_casts_use_names() {
    let mut interner = StringInterner::new();
    let color = interner.intern("Color");
    let red = Value::Enum {
        ty: color,
        variant: interner.intern("Red"),
    };
    assert_eq!(
        cast(&red, &Type::string(), &interner),
        Ok(Value::string("Color.Red"))
    );
    assert_eq!(
        cast(&Value::array(vec![red.clone()]), &Type::array(Type::string(), None), &interner),
        Ok(Value::array(vec![Value::string("Color.Red")]))
    );
    assert_eq!(
        cast(&red, &Type::int(), &interner),
        Err(EvalErrorKind::InvalidCast {
            value: "Color.Red".to_owned(),
            to: "int".to_owned()
        })
    );
    assert_eq!(cast(&red, &Type::enumeration(color), &interner), Ok(red));
}


fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1000i64..1000).prop_map(Value::Int),
        (-1000i32..1000).prop_map(|n| Value::Float(f64::from(n) / 4.0)),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn operand() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar(),
        prop::collection::vec((-1000i64..1000).prop_map(Value::Int), 3).prop_map(Value::array),
    ]
}

proptest! {
    #[test]
    fn commutative_operators_are_symmetric(left in operand(), right in operand()) {
        for op in OperatorId::ALL.into_iter().filter(|op| op.is_commutative()) {
            let forward = evaluate_binary(op, &left, &right);
            let backward = evaluate_binary(op, &right, &left);
            prop_assert_eq!(forward.is_ok(), backward.is_ok(), "{} {:?} {:?}", op, left, right);
            if let (Ok(a), Ok(b)) = (forward, backward) {
                prop_assert!(values_equal(&a, &b), "{} {:?} {:?}", op, a, b);
            }
        }
    }
}
