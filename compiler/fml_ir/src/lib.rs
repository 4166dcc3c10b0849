//! Formula IR - shared data structures for every pipeline stage.
//!
//! - Spans for source locations
//! - Names for interned identifiers and literal text
//! - Tokens and `TokenList` for lexer output
//! - The operator registry
//! - AST nodes and the arena that owns them
//! - Scope-aware AST traversal and the rename utilities built on it
//! - A printer that turns the AST back into source text
//!
//! # Design Philosophy
//!
//! - **Intern strings**: identifiers and literal text are `Name(u32)`
//! - **Flatten the tree**: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - **One operator table**: precedence, associativity and commutativity are
//!   looked up, never re-encoded per stage

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod name;
pub mod operator;
mod parsed_type;
pub mod printer;
mod span;
mod token;
pub mod visitor;

pub use arena::{ArenaCheckpoint, ExprArena};
pub use ast::{Constant, Expr, ExprKind, Param, Program, Stmt, StmtKind};
pub use expr_id::{ExprId, ExprRange, ParamRange, StmtId, StmtRange};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use operator::{Associativity, Fixity, OperatorDescriptor, OperatorId, UnknownOperator};
pub use parsed_type::ParsedType;
pub use printer::{print_expr, print_program, PrintConfig};
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
