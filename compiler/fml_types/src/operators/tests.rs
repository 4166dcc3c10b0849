use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ints(len: usize) -> Type {
    Type::array(Type::int(), Some(len))
}

#[test]
fn test_integer_arithmetic() {
    assert_eq!(
        binary_result(OperatorId::Add, &Type::int(), &Type::int()),
        Some(Type::int())
    );
    assert_eq!(
        binary_result(OperatorId::Div, &Type::int(), &Type::int()),
        Some(Type::float())
    );
    assert_eq!(
        binary_result(OperatorId::Mul, &Type::int(), &Type::float()),
        Some(Type::float())
    );
}

#[test]
fn test_string_concatenation_only() {
    assert_eq!(
        binary_result(OperatorId::Add, &Type::string(), &Type::string()),
        Some(Type::string())
    );
    assert_eq!(
        binary_result(OperatorId::Sub, &Type::string(), &Type::string()),
        None
    );
    assert_eq!(
        binary_result(OperatorId::Add, &Type::string(), &Type::int()),
        None
    );
}

#[test]
fn test_calendar_arithmetic() {
    let date = Type::date();
    let duration = Type::duration();
    assert_eq!(
        binary_result(OperatorId::Add, &date, &duration),
        Some(Type::date())
    );
    // Commutative retry.
    assert_eq!(
        binary_result(OperatorId::Add, &duration, &date),
        Some(Type::date())
    );
    assert_eq!(
        binary_result(OperatorId::Sub, &date, &date),
        Some(Type::duration())
    );
    assert_eq!(binary_result(OperatorId::Sub, &duration, &date), None);
    assert_eq!(
        binary_result(OperatorId::Mul, &Type::int(), &duration),
        Some(Type::duration())
    );
}

#[test]
fn test_array_broadcast() {
    assert_eq!(
        binary_result(OperatorId::Add, &ints(3), &Type::int()),
        Some(ints(3))
    );
    assert_eq!(
        binary_result(OperatorId::Add, &Type::int(), &ints(3)),
        Some(ints(3))
    );
    assert_eq!(
        binary_result(OperatorId::Div, &ints(3), &Type::int()),
        Some(Type::array(Type::float(), Some(3)))
    );
    // Non-commutative operators only broadcast with the array on the left.
    assert_eq!(binary_result(OperatorId::Sub, &Type::int(), &ints(3)), None);
    assert_eq!(binary_result(OperatorId::Add, &ints(2), &ints(3)), None);
    assert_eq!(
        binary_result(OperatorId::Mul, &ints(3), &ints(3)),
        Some(ints(3))
    );
}

#[test]
fn test_logical_accepts_any_value() {
    for ty in [Type::int(), Type::string(), ints(2), Type::null()] {
        assert_eq!(
            binary_result(OperatorId::And, &ty, &Type::boolean()),
            Some(Type::boolean())
        );
        assert_eq!(unary_result(OperatorId::Not, &ty), Some(Type::boolean()));
    }
    assert_eq!(
        binary_result(OperatorId::Or, &Type::void(), &Type::boolean()),
        None
    );
}

#[test]
fn test_equality() {
    assert_eq!(
        binary_result(OperatorId::Eq, &Type::float(), &Type::int()),
        Some(Type::boolean())
    );
    assert_eq!(
        binary_result(OperatorId::Eq, &Type::string(), &Type::null()),
        Some(Type::boolean())
    );
    assert_eq!(
        binary_result(OperatorId::NotEq, &Type::string(), &Type::int()),
        None
    );
}

#[test]
fn test_index() {
    let mutable = ints(3).with_final(false);
    assert_eq!(
        binary_result(OperatorId::Index, &mutable, &Type::int()),
        Some(Type::int().with_final(false))
    );
    assert_eq!(
        binary_result(OperatorId::Index, &ints(3), &Type::string()),
        None
    );
}

#[test]
fn test_cast_and_assignment() {
    let to_int = Type::new(TypeKind::TypeLiteral(Box::new(Type::int())));
    assert_eq!(
        binary_result(OperatorId::TypeCast, &Type::float(), &to_int),
        Some(Type::int())
    );
    assert_eq!(
        binary_result(OperatorId::Assign, &Type::float(), &Type::int()),
        Some(Type::float())
    );
    assert_eq!(
        binary_result(OperatorId::DivAssign, &Type::int(), &Type::int()),
        None
    );
    assert_eq!(
        binary_result(OperatorId::AddAssign, &Type::date(), &Type::duration()),
        Some(Type::date())
    );
}

#[test]
fn test_negation() {
    assert_eq!(unary_result(OperatorId::Neg, &Type::int()), Some(Type::int()));
    assert_eq!(
        unary_result(OperatorId::Neg, &ints(2)),
        Some(ints(2))
    );
    assert_eq!(unary_result(OperatorId::Neg, &Type::string()), None);
}

#[test]
fn test_compatible_operand_types() {
    let compatible = compatible_operand_types(OperatorId::Sub, &Type::date());
    assert_eq!(
        compatible,
        vec![Type::date(), Type::duration(), Type::mixed()]
    );
}

fn scalar() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::int()),
        Just(Type::float()),
        Just(Type::boolean()),
        Just(Type::string()),
        Just(Type::null()),
        Just(Type::date()),
        Just(Type::duration()),
        Just(Type::mixed()),
    ]
}

fn any_type() -> impl Strategy<Value = Type> {
    scalar().prop_recursive(2, 8, 1, |inner| {
        (inner, proptest::option::of(0usize..4)).prop_map(|(element, len)| Type::array(element, len))
    })
}

proptest! {
    #[test]
    fn prop_commutative_operators_are_symmetric(left in any_type(), right in any_type()) {
        for op in OperatorId::ALL.into_iter().filter(|op| op.is_commutative()) {
            prop_assert_eq!(
                binary_result(op, &left, &right),
                binary_result(op, &right, &left),
                "{:?}", op
            );
        }
    }
}
