//! Structured type descriptions for external tooling.
//!
//! Editors and node-graph frontends need to know what a type looks like
//! and which operators it takes part in. `describe` spells that out as
//! plain data; with the `serde` feature it serializes directly.

use fml_ir::{OperatorId, StringInterner};

use crate::operators::compatible_operand_types;
use crate::{Type, TypeKind};

/// Shape of a type, with names rendered as source text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescription {
    /// Variant name: `int`, `array`, `function`, `enum`, ...
    pub kind: String,
    pub is_final: bool,
    /// Element type of arrays.
    pub element: Option<Box<TypeDescription>>,
    /// Known length of literal arrays.
    pub length: Option<usize>,
    pub params: Vec<TypeDescription>,
    pub variadic: Option<Box<TypeDescription>>,
    pub returns: Option<Box<TypeDescription>>,
    /// Enum name.
    pub name: Option<String>,
    /// Binary operators this type accepts as left operand.
    pub operators: Vec<OperatorDescription>,
}

/// One binary operator and the right operand types it accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorDescription {
    pub symbol: String,
    pub operands: Vec<String>,
}

/// Operators listed in descriptions. Assignments and casts depend on the
/// slot or target, not on the type alone.
const DESCRIBED_OPERATORS: [OperatorId; 14] = [
    OperatorId::Add,
    OperatorId::Sub,
    OperatorId::Mul,
    OperatorId::Div,
    OperatorId::Mod,
    OperatorId::And,
    OperatorId::Or,
    OperatorId::Xor,
    OperatorId::Eq,
    OperatorId::NotEq,
    OperatorId::Lt,
    OperatorId::Gt,
    OperatorId::LtEq,
    OperatorId::GtEq,
];

impl Type {
    pub fn describe(&self, interner: &StringInterner) -> TypeDescription {
        let mut description = TypeDescription {
            kind: kind_name(&self.kind).to_owned(),
            is_final: self.is_final,
            element: None,
            length: None,
            params: Vec::new(),
            variadic: None,
            returns: None,
            name: None,
            operators: Vec::new(),
        };

        match &self.kind {
            TypeKind::Array { element, len } => {
                description.element = Some(Box::new(element.describe(interner)));
                description.length = *len;
            }
            TypeKind::Function(function) => {
                description.params = function
                    .params
                    .iter()
                    .map(|p| p.describe(interner))
                    .collect();
                description.variadic = function
                    .variadic
                    .as_ref()
                    .map(|v| Box::new(v.describe(interner)));
                description.returns = Some(Box::new(function.ret.describe(interner)));
            }
            TypeKind::Enum(name) => description.name = Some(interner.lookup(*name).to_owned()),
            TypeKind::TypeLiteral(inner) => {
                description.element = Some(Box::new(inner.describe(interner)));
            }
            _ => {}
        }

        description.operators = DESCRIBED_OPERATORS
            .iter()
            .filter_map(|&op| {
                let operands = compatible_operand_types(op, self);
                if operands.is_empty() {
                    return None;
                }
                Some(OperatorDescription {
                    symbol: op.symbol().to_owned(),
                    operands: operands.iter().map(|t| t.render(interner)).collect(),
                })
            })
            .collect();
        description
    }
}

fn kind_name(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Int => "int",
        TypeKind::Float => "float",
        TypeKind::Boolean => "boolean",
        TypeKind::String => "string",
        TypeKind::Null => "null",
        TypeKind::Void => "void",
        TypeKind::Date => "date",
        TypeKind::Duration => "duration",
        TypeKind::Mixed => "mixed",
        TypeKind::Array { .. } => "array",
        TypeKind::Function(_) => "function",
        TypeKind::Enum(_) => "enum",
        TypeKind::TypeLiteral(_) => "type",
    }
}
