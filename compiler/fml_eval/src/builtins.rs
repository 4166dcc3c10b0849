//! Built-in function implementations.
//!
//! Signatures live in `fml_types::builtins`; validated calls arrive with
//! arguments already converted to the parameter types.

use std::cmp::Ordering;

use fml_types::builtins::BUILTIN_NAMES;

use crate::errors::EvalErrorKind;
use crate::operators::compare_values;
use crate::Value;

type BuiltinResult = Result<Value, EvalErrorKind>;

/// The interned-independent name of a built-in, if `name` is one.
pub fn lookup_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_NAMES.iter().copied().find(|builtin| *builtin == name)
}

/// Call the built-in `name`.
pub fn call_builtin(name: &'static str, args: &[Value]) -> BuiltinResult {
    tracing::trace!(name, args = args.len(), "builtin call");
    match name {
        "min" => extremum(name, args, Ordering::Less),
        "max" => extremum(name, args, Ordering::Greater),
        "abs" => match args {
            [Value::Int(n)] => n
                .checked_abs()
                .map(Value::Int)
                .ok_or(EvalErrorKind::Overflow { op: "abs" }),
            [Value::Float(x)] => Ok(Value::Float(x.abs())),
            _ => Err(invalid_argument(name, args)),
        },
        "pow" => {
            let (base, exponent) = match args {
                [base, exponent] => (float_arg(name, base)?, float_arg(name, exponent)?),
                _ => return Err(arity(name, "2", args)),
            };
            Ok(Value::Float(base.powf(exponent)))
        }
        "sqrt" => unary_float(name, args, f64::sqrt),
        "floor" => unary_float(name, args, f64::floor),
        "ceil" => unary_float(name, args, f64::ceil),
        "round" => unary_float(name, args, f64::round),
        "sin" => unary_float(name, args, f64::sin),
        "cos" => unary_float(name, args, f64::cos),
        "tan" => unary_float(name, args, f64::tan),
        "asVector" => Ok(as_vector(args)),
        "sizeof" => match args {
            [Value::Array(items)] => i64::try_from(items.len())
                .map(Value::Int)
                .map_err(|_| EvalErrorKind::Overflow { op: "sizeof" }),
            _ => Err(invalid_argument(name, args)),
        },
        _ => Err(EvalErrorKind::UnresolvedMethod {
            name: name.to_owned(),
        }),
    }
}

/// `min` / `max` over the arguments, or over the elements of a single array
/// argument. The result is a float if any candidate is a float.
fn extremum(name: &'static str, args: &[Value], wanted: Ordering) -> BuiltinResult {
    let candidates = match args {
        [Value::Array(items)] => items.as_slice(),
        _ => args,
    };
    let mut best: Option<&Value> = None;
    let mut any_float = false;
    for candidate in candidates {
        match candidate {
            Value::Int(_) => {}
            Value::Float(_) => any_float = true,
            _ => return Err(invalid_argument(name, args)),
        }
        best = match best {
            Some(current) if compare_values(candidate, current) != Some(wanted) => Some(current),
            _ => Some(candidate),
        };
    }
    let best = best.ok_or_else(|| invalid_argument(name, args))?;
    if any_float {
        Ok(Value::Float(float_arg(name, best)?))
    } else {
        Ok(best.clone())
    }
}

/// Array of the arguments, widening integers when floats are present.
fn as_vector(args: &[Value]) -> Value {
    let all_numeric = args
        .iter()
        .all(|arg| matches!(arg, Value::Int(_) | Value::Float(_)));
    let any_float = args.iter().any(|arg| matches!(arg, Value::Float(_)));
    if all_numeric && any_float {
        let widened = args
            .iter()
            .filter_map(Value::as_float)
            .map(Value::Float)
            .collect();
        return Value::array(widened);
    }
    Value::array(args.to_vec())
}

fn unary_float(name: &'static str, args: &[Value], f: fn(f64) -> f64) -> BuiltinResult {
    match args {
        [arg] => Ok(Value::Float(f(float_arg(name, arg)?))),
        _ => Err(arity(name, "1", args)),
    }
}

fn float_arg(name: &'static str, arg: &Value) -> Result<f64, EvalErrorKind> {
    arg.as_float()
        .ok_or_else(|| invalid_argument(name, std::slice::from_ref(arg)))
}

#[cold]
fn invalid_argument(name: &str, args: &[Value]) -> EvalErrorKind {
    let rendered: Vec<String> = args.iter().map(Value::to_literal).collect();
    EvalErrorKind::InvalidArgument {
        name: name.to_owned(),
        message: format!("({})", rendered.join(", ")),
    }
}

#[cold]
fn arity(name: &str, expected: &str, args: &[Value]) -> EvalErrorKind {
    EvalErrorKind::ArgumentCount {
        name: name.to_owned(),
        expected: expected.to_owned(),
        found: args.len(),
    }
}
