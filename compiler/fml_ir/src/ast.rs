//! AST node definitions.
//!
//! Nodes live in an [`ExprArena`](crate::ExprArena) and refer to each other
//! through [`ExprId`] / [`StmtId`] indices.

use std::fmt;

use crate::{ExprId, ExprRange, Name, OperatorId, ParamRange, ParsedType, Span, StmtId, StmtRange};

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Literal constant.
///
/// `Date` and `Duration` are never produced by the parser; the validator
/// rewrites a `Str` constant into one of them when the literal is used as
/// a date or duration. All three keep the literal text.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Str(Name),
    Date(Name),
    Duration(Name),
}

impl Constant {
    /// The quoted text of string-like constants.
    pub fn text(&self) -> Option<Name> {
        match self {
            Constant::Str(name) | Constant::Date(name) | Constant::Duration(name) => Some(*name),
            _ => None,
        }
    }
}

/// Expression variants.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Ident(Name),
    Constant(Constant),
    /// Prefix operator: `!x`, `-x`.
    Unary {
        op: OperatorId,
        operand: ExprId,
    },
    /// Infix operator, including assignments and casts.
    ///
    /// A cast `(T) x` is `Binary { op: TypeCast, left: x, right: TypeLiteral(T) }`.
    Binary {
        op: OperatorId,
        left: ExprId,
        right: ExprId,
    },
    Ternary {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Call {
        callee: ExprId,
        args: ExprRange,
    },
    /// `{a, b, c}`
    Array(ExprRange),
    Index {
        receiver: ExprId,
        index: ExprId,
    },
    /// A type used as an operand (right side of a cast).
    TypeLiteral(ParsedType),
}

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement variants.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `expr;`
    Expr(ExprId),
    /// `[mut] T name = init;` or `[mut] var name = init;` (`ty: None`).
    VarDecl {
        mutable: bool,
        ty: Option<ParsedType>,
        name: Name,
        init: ExprId,
    },
    Return(Option<ExprId>),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    /// `for (init; cond; step) body`
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<ExprId>,
        body: StmtId,
    },
    /// `for ([mut] T name : iterable) body`
    ForEach {
        mutable: bool,
        ty: Option<ParsedType>,
        name: Name,
        iterable: ExprId,
        body: StmtId,
    },
    Break,
    Continue,
    Block(StmtRange),
    /// `R name(params) { body }`
    FunctionDecl {
        name: Name,
        params: ParamRange,
        ret: ParsedType,
        body: StmtRange,
    },
}

/// Function parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: ParsedType,
    pub mutable: bool,
    pub span: Span,
}

/// A parsed formula: top-level statements plus an optional trailing
/// expression whose value is the result.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Program {
    pub body: StmtRange,
    pub tail: Option<ExprId>,
    pub span: Span,
}
