//! Runtime values.
//!
//! Arrays are shared behind `Rc` and copied on write, so passing an array
//! around is cheap and element assignment never affects other holders.

use std::fmt;
use std::rc::Rc;

use fml_ir::{Name, Param, StmtRange, StringInterner};
use fml_types::temporal::{format_date, Date, IsoDuration};
use fml_types::{FunctionType, Type};

use crate::environment::{LocalScope, Scope};

/// Runtime value in the formula interpreter.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Date(Date),
    Duration(IsoDuration),
    Array(Rc<Vec<Value>>),
    Function(FunctionValue),
    /// Variant of a host-defined enum.
    Enum {
        ty: Name,
        variant: Name,
    },
    Null,
    /// Result of a statement or a call without a value.
    Void,
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    /// Name of the value's runtime type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::Duration(_) => "duration",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
            Value::Enum { .. } => "enum",
            Value::Null => "null",
            Value::Void => "void",
        }
    }

    /// Truthiness used by conditions and the logical operators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Duration(d) => !d.is_zero(),
            Value::Null | Value::Void => false,
            Value::Date(_) | Value::Function(_) | Value::Enum { .. } => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as `f64`, widening integers.
    #[expect(
        clippy::cast_precision_loss,
        reason = "int to float widening is the language's conversion rule"
    )]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The value as it would be written in source: strings are quoted.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }

    /// Display form with enum names resolved.
    pub fn render(&self, interner: &StringInterner) -> String {
        match self {
            Value::Enum { ty, variant } => {
                format!("{}.{}", interner.lookup(*ty), interner.lookup(*variant))
            }
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(|v| v.render(interner)).collect();
                format!("{{{}}}", items.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Date(date) => f.write_str(&format_date(date)),
            Value::Duration(duration) => write!(f, "{duration}"),
            Value::Array(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
            Value::Function(function) => write!(f, "{function:?}"),
            // Names need the interner; see `render`.
            Value::Enum { .. } => f.write_str("enum"),
            Value::Null => f.write_str("null"),
            Value::Void => f.write_str("void"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Date(date) => write!(f, "Date({})", format_date(date)),
            Value::Duration(duration) => write!(f, "Duration({duration})"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Function(function) => write!(f, "{function:?}"),
            Value::Enum { ty, variant } => write!(f, "Enum({ty:?}, {variant:?})"),
            Value::Null => f.write_str("Null"),
            Value::Void => f.write_str("Void"),
        }
    }
}

/// Structural equality. `Int(1)` and `Float(1.0)` differ here; the
/// language's `==` lives in the operator module.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (
                Value::Enum { ty, variant },
                Value::Enum {
                    ty: other_ty,
                    variant: other_variant,
                },
            ) => ty == other_ty && variant == other_variant,
            (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Date> for Value {
    fn from(date: Date) -> Self {
        Value::Date(date)
    }
}

impl From<IsoDuration> for Value {
    fn from(duration: IsoDuration) -> Self {
        Value::Duration(duration)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

/// Something that can be called.
#[derive(Clone)]
pub enum FunctionValue {
    /// Declared in the formula.
    User(Rc<UserFunction>),
    /// One of the built-in functions, by name.
    Builtin(&'static str),
    /// Supplied by the host.
    Host(HostFunction),
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionValue::User(a), FunctionValue::User(b)) => Rc::ptr_eq(a, b),
            (FunctionValue::Builtin(a), FunctionValue::Builtin(b)) => a == b,
            (FunctionValue::Host(a), FunctionValue::Host(b)) => Rc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionValue::User(function) => write!(f, "function {:?}", function.name),
            FunctionValue::Builtin(name) => write!(f, "builtin {name}"),
            FunctionValue::Host(_) => f.write_str("host function"),
        }
    }
}

/// A function declared in the formula, with the scope it was declared in.
///
/// The function is usually bound in that same scope, so the two keep each
/// other alive; the interpreter releases such scopes when they end.
pub struct UserFunction {
    pub name: Name,
    pub params: Vec<Param>,
    pub body: StmtRange,
    pub scope: LocalScope<Scope>,
}

/// Host callback signature.
pub type HostFn = dyn Fn(&[Value]) -> Result<Value, String>;

/// A function supplied by the host, with the signature the validator
/// checks calls against.
#[derive(Clone)]
pub struct HostFunction {
    signature: FunctionType,
    func: Rc<HostFn>,
}

impl HostFunction {
    /// A host function taking any number of values and returning a value
    /// of unknown type.
    pub fn new(func: impl Fn(&[Value]) -> Result<Value, String> + 'static) -> Self {
        let signature = FunctionType::new(Vec::new(), Type::mixed()).variadic(Type::mixed());
        Self::with_signature(signature, func)
    }

    pub fn with_signature(
        signature: FunctionType,
        func: impl Fn(&[Value]) -> Result<Value, String> + 'static,
    ) -> Self {
        HostFunction {
            signature,
            func: Rc::new(func),
        }
    }

    pub fn signature(&self) -> &FunctionType {
        &self.signature
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.func)(args)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
