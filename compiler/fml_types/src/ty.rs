//! Static types.
//!
//! Every type carries an `is_final` flag: a slot of a final type cannot be
//! the target of an assignment. Finality is part of the value, not of the
//! type's identity, so [`Type::equals`] ignores it while the derived
//! `PartialEq` compares it too.

use fml_ir::{Name, ParsedType, StringInterner};

/// A static type plus its finality.
#[derive(Clone, PartialEq, Debug)]
pub struct Type {
    pub kind: TypeKind,
    pub is_final: bool,
}

/// Type variants.
#[derive(Clone, PartialEq, Debug)]
pub enum TypeKind {
    Int,
    Float,
    Boolean,
    String,
    Null,
    Void,
    Date,
    Duration,
    /// Any non-void value; checked at run time.
    Mixed,
    Array {
        element: Box<Type>,
        /// Known length of literal arrays.
        len: Option<usize>,
    },
    Function(Box<FunctionType>),
    /// Nominal enum type.
    Enum(Name),
    /// The type of a type expression (right side of a cast).
    TypeLiteral(Box<Type>),
}

/// Signature of a callable.
#[derive(Clone, PartialEq, Debug)]
pub struct FunctionType {
    pub params: Vec<Type>,
    /// Type of any arguments past `params`.
    pub variadic: Option<Type>,
    pub ret: Type,
    /// Computes the return type from the concrete argument types instead
    /// of using `ret`.
    pub resolver: Option<ReturnResolver>,
}

/// Per-call return type computation for built-ins whose result depends
/// on their arguments.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReturnResolver {
    /// Widest numeric argument, or the element type of a single array
    /// argument (`min`, `max`).
    WidestOrElement,
    /// Widest numeric argument (`abs`).
    Widest,
    /// Array of the arguments' common type (`asVector`).
    ArrayOf,
}

impl ReturnResolver {
    /// `None` means the arguments are unacceptable.
    pub fn resolve(self, args: &[Type]) -> Option<Type> {
        match self {
            ReturnResolver::WidestOrElement => match args {
                [Type {
                    kind: TypeKind::Array { element, .. },
                    ..
                }] if element.is_numeric() || element.kind == TypeKind::Mixed => {
                    Some(element.as_ref().clone().with_final(true))
                }
                _ => widest_numeric(args),
            },
            ReturnResolver::Widest => widest_numeric(args),
            ReturnResolver::ArrayOf => Some(Type::array(
                common_type(args).unwrap_or_else(Type::mixed),
                Some(args.len()),
            )),
        }
    }
}

/// `int` if every argument is `int`, `float` if any is `float`, `mixed` if
/// any is `mixed`. Fails on an empty list or non-numeric arguments.
pub fn widest_numeric(args: &[Type]) -> Option<Type> {
    if args.is_empty() {
        return None;
    }
    let mut widest = TypeKind::Int;
    for arg in args {
        match arg.kind {
            TypeKind::Int => {}
            TypeKind::Float => {
                if widest == TypeKind::Int {
                    widest = TypeKind::Float;
                }
            }
            TypeKind::Mixed => widest = TypeKind::Mixed,
            _ => return None,
        }
    }
    Some(Type::new(widest))
}

/// The one type every element shares, widening numerics.
pub fn common_type(types: &[Type]) -> Option<Type> {
    let first = types.first()?;
    if types.iter().all(|t| t.equals(first)) {
        return Some(first.clone().with_final(true));
    }
    if types.iter().all(Type::is_numeric) {
        return widest_numeric(types);
    }
    None
}

impl Type {
    /// A final type of the given kind.
    pub fn new(kind: TypeKind) -> Self {
        Type {
            kind,
            is_final: true,
        }
    }

    pub fn int() -> Self {
        Type::new(TypeKind::Int)
    }

    pub fn float() -> Self {
        Type::new(TypeKind::Float)
    }

    pub fn boolean() -> Self {
        Type::new(TypeKind::Boolean)
    }

    pub fn string() -> Self {
        Type::new(TypeKind::String)
    }

    pub fn null() -> Self {
        Type::new(TypeKind::Null)
    }

    pub fn void() -> Self {
        Type::new(TypeKind::Void)
    }

    pub fn date() -> Self {
        Type::new(TypeKind::Date)
    }

    pub fn duration() -> Self {
        Type::new(TypeKind::Duration)
    }

    pub fn mixed() -> Self {
        Type::new(TypeKind::Mixed)
    }

    pub fn array(element: Type, len: Option<usize>) -> Self {
        Type::new(TypeKind::Array {
            element: Box::new(element),
            len,
        })
    }

    pub fn function(function: FunctionType) -> Self {
        Type::new(TypeKind::Function(Box::new(function)))
    }

    pub fn enumeration(name: Name) -> Self {
        Type::new(TypeKind::Enum(name))
    }

    #[must_use]
    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, TypeKind::Int | TypeKind::Float)
    }

    pub fn is_mixed(&self) -> bool {
        self.kind == TypeKind::Mixed
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match &self.kind {
            TypeKind::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Structural equality ignoring finality at every level.
    pub fn equals(&self, other: &Type) -> bool {
        match (&self.kind, &other.kind) {
            (
                TypeKind::Array {
                    element: a,
                    len: la,
                },
                TypeKind::Array {
                    element: b,
                    len: lb,
                },
            ) => la == lb && a.equals(b),
            (TypeKind::Function(a), TypeKind::Function(b)) => {
                a.params.len() == b.params.len()
                    && a.params.iter().zip(&b.params).all(|(x, y)| x.equals(y))
                    && match (&a.variadic, &b.variadic) {
                        (Some(x), Some(y)) => x.equals(y),
                        (None, None) => true,
                        _ => false,
                    }
                    && a.ret.equals(&b.ret)
                    && a.resolver == b.resolver
            }
            (TypeKind::TypeLiteral(a), TypeKind::TypeLiteral(b)) => a.equals(b),
            (a, b) => a == b,
        }
    }

    /// Whether a value of type `other` may be stored in a slot of this type.
    pub fn assignable_by(&self, other: &Type) -> bool {
        match (&self.kind, &other.kind) {
            (_, TypeKind::Void) | (TypeKind::Void, _) => false,
            (TypeKind::Mixed, _) | (TypeKind::Float, TypeKind::Int) => true,
            (
                TypeKind::Array {
                    element: target,
                    len: target_len,
                },
                TypeKind::Array {
                    element: source,
                    len: source_len,
                },
            ) => {
                let lengths_agree = match (target_len, source_len) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                };
                lengths_agree && target.assignable_by(source)
            }
            (TypeKind::Function(target), TypeKind::Function(source)) => {
                target.params.len() == source.params.len()
                    && target
                        .params
                        .iter()
                        .zip(&source.params)
                        .all(|(t, s)| s.assignable_by(t))
                    && target.ret.assignable_by(&source.ret)
            }
            _ => self.equals(other),
        }
    }

    /// Whether an explicit (or declaration-inserted) cast from `self` to
    /// `target` exists.
    pub fn castable_to(&self, target: &Type) -> bool {
        match (&self.kind, &target.kind) {
            (TypeKind::Void, _) | (_, TypeKind::Void) => false,
            (_, TypeKind::Boolean | TypeKind::String | TypeKind::Mixed)
            | (TypeKind::Mixed, _)
            | (TypeKind::Int, TypeKind::Float)
            | (TypeKind::Float | TypeKind::Boolean, TypeKind::Int)
            | (TypeKind::String, TypeKind::Date | TypeKind::Duration) => true,
            (
                TypeKind::Array {
                    element: source,
                    len: source_len,
                },
                TypeKind::Array {
                    element: target_element,
                    len: target_len,
                },
            ) => {
                let lengths_agree = match (source_len, target_len) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                };
                lengths_agree && source.castable_to(target_element)
            }
            _ => target.assignable_by(self),
        }
    }

    /// Whether storing a value of `source` in a slot of this type changes
    /// its runtime representation (`int` into `float`).
    pub fn needs_conversion_from(&self, source: &Type) -> bool {
        match (&self.kind, &source.kind) {
            (TypeKind::Float, TypeKind::Int) => true,
            (
                TypeKind::Array {
                    element: target, ..
                },
                TypeKind::Array {
                    element: source, ..
                },
            ) => target.needs_conversion_from(source),
            _ => false,
        }
    }

    /// Lower a source annotation. Annotated types are final; the caller
    /// clears the flag for `mut` slots.
    pub fn from_parsed(parsed: &ParsedType) -> Type {
        match parsed {
            ParsedType::Int => Type::int(),
            ParsedType::Float => Type::float(),
            ParsedType::Boolean => Type::boolean(),
            ParsedType::String => Type::string(),
            ParsedType::Date => Type::date(),
            ParsedType::Duration => Type::duration(),
            ParsedType::Void => Type::void(),
            ParsedType::Mixed => Type::mixed(),
            ParsedType::Array(element) => Type::array(Type::from_parsed(element), None),
            ParsedType::Function { params, ret } => Type::function(FunctionType {
                params: params.iter().map(Type::from_parsed).collect(),
                variadic: None,
                ret: Type::from_parsed(ret),
                resolver: None,
            }),
            ParsedType::Named(name) => Type::enumeration(*name),
        }
    }

    /// Annotation that denotes this type, for inserted casts. `None` for
    /// types that have no source syntax (`null`, variadic signatures, type
    /// literals).
    pub fn to_parsed(&self) -> Option<ParsedType> {
        let parsed = match &self.kind {
            TypeKind::Int => ParsedType::Int,
            TypeKind::Float => ParsedType::Float,
            TypeKind::Boolean => ParsedType::Boolean,
            TypeKind::String => ParsedType::String,
            TypeKind::Date => ParsedType::Date,
            TypeKind::Duration => ParsedType::Duration,
            TypeKind::Void => ParsedType::Void,
            TypeKind::Mixed => ParsedType::Mixed,
            TypeKind::Array { element, .. } => ParsedType::Array(Box::new(element.to_parsed()?)),
            TypeKind::Function(function) if function.variadic.is_none() => ParsedType::Function {
                params: function
                    .params
                    .iter()
                    .map(Type::to_parsed)
                    .collect::<Option<_>>()?,
                ret: Box::new(function.ret.to_parsed()?),
            },
            TypeKind::Enum(name) => ParsedType::Named(*name),
            TypeKind::Null | TypeKind::Function(_) | TypeKind::TypeLiteral(_) => return None,
        };
        Some(parsed)
    }

    /// Human-readable form used in error messages.
    pub fn render(&self, interner: &StringInterner) -> String {
        match &self.kind {
            TypeKind::Int => "int".to_owned(),
            TypeKind::Float => "float".to_owned(),
            TypeKind::Boolean => "boolean".to_owned(),
            TypeKind::String => "string".to_owned(),
            TypeKind::Null => "null".to_owned(),
            TypeKind::Void => "void".to_owned(),
            TypeKind::Date => "date".to_owned(),
            TypeKind::Duration => "duration".to_owned(),
            TypeKind::Mixed => "mixed".to_owned(),
            TypeKind::Array { element, .. } => format!("{}[]", element.render(interner)),
            TypeKind::Function(function) => {
                let mut params: Vec<String> =
                    function.params.iter().map(|p| p.render(interner)).collect();
                if let Some(variadic) = &function.variadic {
                    params.push(format!("{}...", variadic.render(interner)));
                }
                format!(
                    "function({}) -> {}",
                    params.join(", "),
                    function.ret.render(interner)
                )
            }
            TypeKind::Enum(name) => interner.lookup(*name).to_owned(),
            TypeKind::TypeLiteral(inner) => format!("type {}", inner.render(interner)),
        }
    }
}

impl FunctionType {
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        FunctionType {
            params,
            variadic: None,
            ret,
            resolver: None,
        }
    }

    #[must_use]
    pub fn variadic(mut self, ty: Type) -> Self {
        self.variadic = Some(ty);
        self
    }

    #[must_use]
    pub fn resolved_by(mut self, resolver: ReturnResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Whether `count` arguments fit the parameter list.
    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.variadic.is_some() {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// Expected type of the argument at `index`.
    pub fn param(&self, index: usize) -> Option<&Type> {
        self.params.get(index).or(self.variadic.as_ref())
    }

    /// Result type for a call with these (already coerced) argument types.
    pub fn result(&self, args: &[Type]) -> Option<Type> {
        match self.resolver {
            Some(resolver) => resolver.resolve(args),
            None => Some(self.ret.clone().with_final(true)),
        }
    }
}
