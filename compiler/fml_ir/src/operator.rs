//! Operator registry.
//!
//! Every operator the language knows is described once in a process-wide
//! static table. The parser resolves operator symbols through it to learn
//! precedence and associativity; the validator and evaluator dispatch on
//! [`OperatorId`] and consult the descriptor for commutativity.
//!
//! Ternary `?:` is not an operator here: it is parsed as its own
//! construct at [`TERNARY_PRECEDENCE`].

use std::fmt;

/// Operator identity, in descriptor-table order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OperatorId {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Xor,
    And,
    Or,
    Not,
    Neg,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    TypeCast,
    Index,
    Call,
}

/// Operator associativity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
    Left,
    Right,
}

/// Where an operator symbol appears relative to its operands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

/// Static description of one operator.
#[derive(Clone, Copy, Debug)]
pub struct OperatorDescriptor {
    pub id: OperatorId,
    pub symbol: &'static str,
    /// Higher binds tighter.
    pub precedence: u8,
    pub associativity: Associativity,
    /// `a op b == b op a`; enables the swapped-operand retry.
    pub commutative: bool,
    /// Requires an expression on the left.
    pub needs_left: bool,
    /// Requires an expression on the right.
    pub needs_right: bool,
    /// Reads the value of the left operand (assignment only writes it).
    pub uses_left: bool,
    /// Reads the value of the right operand (casts read a type instead).
    pub uses_right: bool,
}

impl OperatorDescriptor {
    pub fn fixity(&self) -> Fixity {
        match (self.needs_left, self.needs_right, self.precedence) {
            (false, _, _) => Fixity::Prefix,
            (true, true, POSTFIX_PRECEDENCE) | (true, false, _) => Fixity::Postfix,
            (true, true, _) => Fixity::Infix,
        }
    }
}

/// Precedence of assignment and compound assignment.
pub const ASSIGN_PRECEDENCE: u8 = 1;
/// Precedence of the ternary conditional.
pub const TERNARY_PRECEDENCE: u8 = 2;
/// Precedence of prefix operators and casts.
pub const PREFIX_PRECEDENCE: u8 = 10;
/// Precedence of indexing and calls.
pub const POSTFIX_PRECEDENCE: u8 = 11;

const fn infix(
    id: OperatorId,
    symbol: &'static str,
    precedence: u8,
    commutative: bool,
) -> OperatorDescriptor {
    OperatorDescriptor {
        id,
        symbol,
        precedence,
        associativity: Associativity::Left,
        commutative,
        needs_left: true,
        needs_right: true,
        uses_left: true,
        uses_right: true,
    }
}

const fn assign(id: OperatorId, symbol: &'static str, uses_left: bool) -> OperatorDescriptor {
    OperatorDescriptor {
        id,
        symbol,
        precedence: ASSIGN_PRECEDENCE,
        associativity: Associativity::Right,
        commutative: false,
        needs_left: true,
        needs_right: true,
        uses_left,
        uses_right: true,
    }
}

const fn prefix(id: OperatorId, symbol: &'static str) -> OperatorDescriptor {
    OperatorDescriptor {
        id,
        symbol,
        precedence: PREFIX_PRECEDENCE,
        associativity: Associativity::Right,
        commutative: false,
        needs_left: false,
        needs_right: true,
        uses_left: false,
        uses_right: true,
    }
}

const fn postfix(id: OperatorId, symbol: &'static str) -> OperatorDescriptor {
    OperatorDescriptor {
        id,
        symbol,
        precedence: POSTFIX_PRECEDENCE,
        associativity: Associativity::Left,
        commutative: false,
        needs_left: true,
        needs_right: true,
        uses_left: true,
        uses_right: true,
    }
}

/// The registry. Indexed by `OperatorId as usize`.
static OPERATORS: [OperatorDescriptor; 24] = [
    infix(OperatorId::Add, "+", 8, true),
    infix(OperatorId::Sub, "-", 8, false),
    infix(OperatorId::Mul, "*", 9, true),
    infix(OperatorId::Div, "/", 9, false),
    infix(OperatorId::Mod, "%", 9, false),
    infix(OperatorId::Xor, "^", 4, true),
    infix(OperatorId::And, "&&", 5, true),
    infix(OperatorId::Or, "||", 3, true),
    prefix(OperatorId::Not, "!"),
    prefix(OperatorId::Neg, "-"),
    infix(OperatorId::Eq, "==", 6, true),
    infix(OperatorId::NotEq, "!=", 6, true),
    infix(OperatorId::Lt, "<", 7, false),
    infix(OperatorId::Gt, ">", 7, false),
    infix(OperatorId::LtEq, "<=", 7, false),
    infix(OperatorId::GtEq, ">=", 7, false),
    assign(OperatorId::Assign, "=", false),
    assign(OperatorId::AddAssign, "+=", true),
    assign(OperatorId::SubAssign, "-=", true),
    assign(OperatorId::MulAssign, "*=", true),
    assign(OperatorId::DivAssign, "/=", true),
    OperatorDescriptor {
        id: OperatorId::TypeCast,
        symbol: "(type)",
        precedence: PREFIX_PRECEDENCE,
        associativity: Associativity::Right,
        commutative: false,
        needs_left: true,
        needs_right: true,
        uses_left: true,
        uses_right: false,
    },
    postfix(OperatorId::Index, "[]"),
    postfix(OperatorId::Call, "()"),
];

impl OperatorId {
    /// Every operator, in table order.
    pub const ALL: [OperatorId; 24] = [
        OperatorId::Add,
        OperatorId::Sub,
        OperatorId::Mul,
        OperatorId::Div,
        OperatorId::Mod,
        OperatorId::Xor,
        OperatorId::And,
        OperatorId::Or,
        OperatorId::Not,
        OperatorId::Neg,
        OperatorId::Eq,
        OperatorId::NotEq,
        OperatorId::Lt,
        OperatorId::Gt,
        OperatorId::LtEq,
        OperatorId::GtEq,
        OperatorId::Assign,
        OperatorId::AddAssign,
        OperatorId::SubAssign,
        OperatorId::MulAssign,
        OperatorId::DivAssign,
        OperatorId::TypeCast,
        OperatorId::Index,
        OperatorId::Call,
    ];

    #[inline]
    pub fn descriptor(self) -> &'static OperatorDescriptor {
        &OPERATORS[self as usize]
    }

    #[inline]
    pub fn symbol(self) -> &'static str {
        self.descriptor().symbol
    }

    #[inline]
    pub fn is_commutative(self) -> bool {
        self.descriptor().commutative
    }

    /// `=` and the compound assignments.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            OperatorId::Assign
                | OperatorId::AddAssign
                | OperatorId::SubAssign
                | OperatorId::MulAssign
                | OperatorId::DivAssign
        )
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn compound_base(self) -> Option<OperatorId> {
        match self {
            OperatorId::AddAssign => Some(OperatorId::Add),
            OperatorId::SubAssign => Some(OperatorId::Sub),
            OperatorId::MulAssign => Some(OperatorId::Mul),
            OperatorId::DivAssign => Some(OperatorId::Div),
            _ => None,
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            OperatorId::And | OperatorId::Or | OperatorId::Xor | OperatorId::Not
        )
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            OperatorId::Lt | OperatorId::Gt | OperatorId::LtEq | OperatorId::GtEq
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            OperatorId::Add | OperatorId::Sub | OperatorId::Mul | OperatorId::Div | OperatorId::Mod
        )
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// No operator with this symbol and fixity exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownOperator {
    pub symbol: String,
    pub fixity: Fixity,
}

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixity = match self.fixity {
            Fixity::Prefix => "prefix",
            Fixity::Infix => "infix",
            Fixity::Postfix => "postfix",
        };
        write!(f, "unknown {fixity} operator \"{}\"", self.symbol)
    }
}

impl std::error::Error for UnknownOperator {}

/// Resolve an operator symbol in the given position.
///
/// `-` resolves to `Neg` as a prefix and to `Sub` as an infix.
pub fn resolve(symbol: &str, fixity: Fixity) -> Result<&'static OperatorDescriptor, UnknownOperator> {
    OPERATORS
        .iter()
        .find(|desc| desc.symbol == symbol && desc.fixity() == fixity)
        .ok_or_else(|| UnknownOperator {
            symbol: symbol.to_owned(),
            fixity,
        })
}

/// Iterate over every descriptor in the registry.
pub fn descriptors() -> impl Iterator<Item = &'static OperatorDescriptor> {
    OPERATORS.iter()
}
