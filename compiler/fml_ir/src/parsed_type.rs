//! Type annotations as written in source.
//!
//! These are syntax only. The validator lowers them to semantic types.

use crate::{Name, StringInterner};

/// A type as it appears in a declaration, parameter list or cast.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParsedType {
    Int,
    Float,
    Boolean,
    String,
    Date,
    Duration,
    Void,
    Mixed,
    /// `T[]`
    Array(Box<ParsedType>),
    /// `function(T1, T2) -> R`
    Function {
        params: Vec<ParsedType>,
        ret: Box<ParsedType>,
    },
    /// Any other identifier in type position names an enum.
    Named(Name),
}

impl ParsedType {
    /// Source form of the type.
    pub fn render(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.render_into(interner, &mut out);
        out
    }

    fn render_into(&self, interner: &StringInterner, out: &mut String) {
        match self {
            ParsedType::Int => out.push_str("int"),
            ParsedType::Float => out.push_str("float"),
            ParsedType::Boolean => out.push_str("boolean"),
            ParsedType::String => out.push_str("string"),
            ParsedType::Date => out.push_str("date"),
            ParsedType::Duration => out.push_str("duration"),
            ParsedType::Void => out.push_str("void"),
            ParsedType::Mixed => out.push_str("mixed"),
            ParsedType::Array(element) => {
                element.render_into(interner, out);
                out.push_str("[]");
            }
            ParsedType::Function { params, ret } => {
                out.push_str("function(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    param.render_into(interner, out);
                }
                out.push_str(") -> ");
                ret.render_into(interner, out);
            }
            ParsedType::Named(name) => out.push_str(interner.lookup(*name)),
        }
    }
}
