//! Static types of host-supplied values.

use fml_eval::{FunctionValue, Value};
use fml_types::builtins::builtin_signature;
use fml_types::temporal::{parse_date, IsoDuration};
use fml_types::{common_type, Type};

/// The type the validator sees for a host binding holding `value`.
///
/// Host bindings are final. Array types leave the length open so a host
/// can change the array between calculations without revalidating.
pub fn value_type(value: &Value) -> Type {
    match value {
        Value::Int(_) => Type::int(),
        Value::Float(_) => Type::float(),
        Value::Bool(_) => Type::boolean(),
        Value::Str(_) => Type::string(),
        Value::Date(_) => Type::date(),
        Value::Duration(_) => Type::duration(),
        Value::Null => Type::null(),
        Value::Void => Type::void(),
        Value::Array(items) => {
            let element_types: Vec<Type> = items.iter().map(value_type).collect();
            let element = common_type(&element_types).unwrap_or_else(Type::mixed);
            Type::array(element, None)
        }
        Value::Function(FunctionValue::Host(host)) => Type::function(host.signature().clone()),
        Value::Function(FunctionValue::Builtin(name)) => {
            builtin_signature(name).map_or_else(Type::mixed, Type::function)
        }
        Value::Function(FunctionValue::User(_)) => Type::mixed(),
        Value::Enum { ty, .. } => Type::enumeration(*ty),
    }
}

/// Read a value written on a command line: numbers, `true`/`false`/`null`,
/// dates and durations in literal syntax, anything else as a string.
pub fn parse_host_value(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(x) = text.parse::<f64>() {
        return Value::Float(x);
    }
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    let unquoted = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text);
    if let Some(date) = parse_date(unquoted) {
        return Value::Date(date);
    }
    if let Some(duration) = IsoDuration::parse(unquoted) {
        return Value::Duration(duration);
    }
    Value::string(unquoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fml_eval::HostFunction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalar_types() {
        assert_eq!(value_type(&Value::Int(1)), Type::int());
        assert_eq!(value_type(&Value::string("x")), Type::string());
        assert!(value_type(&Value::Float(1.0)).is_final);
    }

    #[test]
    fn test_array_types() {
        let ints = Value::array(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(value_type(&ints), Type::array(Type::int(), None));
        let mixed = Value::array(vec![Value::Int(1), Value::Float(2.0)]);
        assert_eq!(value_type(&mixed), Type::array(Type::float(), None));
        let odd = Value::array(vec![Value::Int(1), Value::string("a")]);
        assert_eq!(value_type(&odd), Type::array(Type::mixed(), None));
    }

    #[test]
    fn test_function_types() {
        let host = HostFunction::new(|_| Ok(Value::Null));
        let ty = value_type(&Value::Function(FunctionValue::Host(host.clone())));
        assert_eq!(ty, Type::function(host.signature().clone()));
    }

    #[test]
    fn test_parse_host_value() {
        assert_eq!(parse_host_value("42"), Value::Int(42));
        assert_eq!(parse_host_value("-1.5"), Value::Float(-1.5));
        assert_eq!(parse_host_value("true"), Value::Bool(true));
        assert_eq!(
            parse_host_value("P1M"),
            Value::Duration(IsoDuration::new(1, 0))
        );
        assert_eq!(parse_host_value("\"hello\""), Value::string("hello"));
        assert!(matches!(parse_host_value("2020-01-15"), Value::Date(_)));
    }
}
