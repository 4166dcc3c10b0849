//! Signatures of the built-in functions.
//!
//! The implementations live in the evaluator; both sides key on the same
//! names.

use crate::{FunctionType, ReturnResolver, Type};

/// Every built-in function name.
pub const BUILTIN_NAMES: [&str; 13] = [
    "min", "max", "pow", "sqrt", "floor", "ceil", "round", "sin", "cos", "tan", "abs",
    "asVector", "sizeof",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Signature of the built-in called `name`.
pub fn builtin_signature(name: &str) -> Option<FunctionType> {
    let float_fn = |arity: usize| FunctionType::new(vec![Type::float(); arity], Type::float());
    let signature = match name {
        "min" | "max" => FunctionType::new(Vec::new(), Type::mixed())
            .variadic(Type::mixed())
            .resolved_by(ReturnResolver::WidestOrElement),
        "abs" => FunctionType::new(vec![Type::mixed()], Type::mixed())
            .resolved_by(ReturnResolver::Widest),
        "asVector" => FunctionType::new(Vec::new(), Type::array(Type::mixed(), None))
            .variadic(Type::mixed())
            .resolved_by(ReturnResolver::ArrayOf),
        "sizeof" => FunctionType::new(vec![Type::array(Type::mixed(), None)], Type::int()),
        "pow" => float_fn(2),
        "sqrt" | "floor" | "ceil" | "round" | "sin" | "cos" | "tan" => float_fn(1),
        _ => return None,
    };
    Some(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_builtin_has_a_signature() {
        for name in BUILTIN_NAMES {
            assert!(builtin_signature(name).is_some(), "{name}");
        }
        assert!(builtin_signature("strFunc").is_none());
    }

    #[test]
    fn test_max_resolves_from_arguments() {
        let max = builtin_signature("max").unwrap();
        assert!(max.accepts_arity(3));
        assert_eq!(
            max.result(&[Type::int(), Type::int()]),
            Some(Type::int())
        );
        assert_eq!(max.result(&[]), None);
    }

    #[test]
    fn test_sizeof_takes_any_array() {
        let sizeof = builtin_signature("sizeof").unwrap();
        let param = sizeof.param(0).unwrap();
        assert!(param.assignable_by(&Type::array(Type::int(), Some(4))));
        assert!(!param.assignable_by(&Type::int()));
        assert!(!sizeof.accepts_arity(2));
    }
}
