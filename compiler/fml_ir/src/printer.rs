//! Source printer for the AST.
//!
//! Prints a program back to formula text. Parentheses are emitted only where
//! the operator table requires them, so the printed text parses back to the
//! same tree. Layout is normalized: one statement per line, blocks indented
//! by [`PrintConfig::indent_size`].

use std::fmt::Write;

use fml_stack::ensure_sufficient_stack;

use crate::ast::{Constant, ExprKind, Program, StmtKind};
use crate::operator::{Associativity, POSTFIX_PRECEDENCE, PREFIX_PRECEDENCE, TERNARY_PRECEDENCE};
use crate::{ExprArena, ExprId, ExprRange, Name, OperatorId, StmtId, StmtRange, StringInterner};

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Binding strength of identifiers, literals and array literals.
const PRIMARY_PRECEDENCE: u8 = POSTFIX_PRECEDENCE + 1;

/// Layout options for [`print_program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintConfig {
    /// Indentation size in spaces.
    pub indent_size: usize,
    /// Surround infix operators, `?` and `:` with spaces.
    pub spaced_operators: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            indent_size: INDENT_WIDTH,
            spaced_operators: true,
        }
    }
}

impl PrintConfig {
    /// Operators written without surrounding spaces.
    pub fn compact() -> Self {
        PrintConfig {
            spaced_operators: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_indent_size(self, indent_size: usize) -> Self {
        PrintConfig {
            indent_size,
            ..self
        }
    }
}

/// Print `program` as formula source.
pub fn print_program(
    arena: &ExprArena,
    program: &Program,
    interner: &StringInterner,
    config: PrintConfig,
) -> String {
    let mut printer = Printer {
        arena,
        interner,
        config,
        out: String::new(),
        depth: 0,
    };
    for &stmt in arena.get_stmt_list(program.body) {
        printer.line();
        printer.stmt(stmt);
    }
    if let Some(tail) = program.tail {
        printer.line();
        printer.statement_expr(tail);
    }
    printer.out
}

/// Print a single expression.
pub fn print_expr(
    arena: &ExprArena,
    id: ExprId,
    interner: &StringInterner,
    config: PrintConfig,
) -> String {
    let mut printer = Printer {
        arena,
        interner,
        config,
        out: String::new(),
        depth: 0,
    };
    printer.expr(id);
    printer.out
}

struct Printer<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    config: PrintConfig,
    out: String,
    depth: usize,
}

impl Printer<'_> {
    /// Start a new line at the current depth. The first line is not
    /// preceded by a newline.
    fn line(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let width = self.depth * self.config.indent_size;
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    fn emit(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn emit_name(&mut self, name: Name) {
        self.out.push_str(self.interner.lookup(name));
    }

    /// An infix symbol, spaced or not.
    fn emit_infix(&mut self, symbol: &str) {
        if self.config.spaced_operators {
            self.out.push(' ');
            self.out.push_str(symbol);
            self.out.push(' ');
        } else {
            self.out.push_str(symbol);
        }
    }

    fn stmt(&mut self, id: StmtId) {
        ensure_sufficient_stack(|| self.stmt_inner(id));
    }

    fn stmt_inner(&mut self, id: StmtId) {
        let arena = self.arena;
        let stmt = arena.get_stmt(id);
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.statement_expr(*expr);
                self.emit(";");
            }
            StmtKind::VarDecl {
                mutable,
                ty,
                name,
                init,
            } => {
                if *mutable {
                    self.emit("mut ");
                }
                match ty {
                    Some(ty) => self.emit(&ty.render(self.interner)),
                    None => self.emit("var"),
                }
                self.emit(" ");
                self.emit_name(*name);
                self.emit_infix("=");
                self.expr(*init);
                self.emit(";");
            }
            StmtKind::Return(value) => {
                self.emit("return");
                if let Some(value) = value {
                    self.emit(" ");
                    self.expr(*value);
                }
                self.emit(";");
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.emit("if (");
                self.expr(*cond);
                self.emit(")");
                self.body(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.emit(" else");
                    self.body(*else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                self.emit("while (");
                self.expr(*cond);
                self.emit(")");
                self.body(*body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.emit("do");
                self.body(*body);
                self.emit(" while (");
                self.expr(*cond);
                self.emit(");");
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                self.emit("for (");
                match init {
                    // The initializer statement brings its own `;`.
                    Some(init) => self.stmt(*init),
                    None => self.emit(";"),
                }
                if let Some(cond) = cond {
                    self.emit(" ");
                    self.expr(*cond);
                }
                self.emit(";");
                if let Some(step) = step {
                    self.emit(" ");
                    self.expr(*step);
                }
                self.emit(")");
                self.body(*body);
            }
            StmtKind::ForEach {
                mutable,
                ty,
                name,
                iterable,
                body,
            } => {
                self.emit("for (");
                if *mutable {
                    self.emit("mut ");
                }
                match ty {
                    Some(ty) => self.emit(&ty.render(self.interner)),
                    None => self.emit("var"),
                }
                self.emit(" ");
                self.emit_name(*name);
                self.emit(" : ");
                self.expr(*iterable);
                self.emit(")");
                self.body(*body);
            }
            StmtKind::Break => self.emit("break;"),
            StmtKind::Continue => self.emit("continue;"),
            StmtKind::Block(range) => self.block(*range),
            StmtKind::FunctionDecl {
                name,
                params,
                ret,
                body,
            } => {
                self.emit(&ret.render(self.interner));
                self.emit(" ");
                self.emit_name(*name);
                self.emit("(");
                for (i, param) in arena.get_params(*params).iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if param.mutable {
                        self.emit("mut ");
                    }
                    self.emit(&param.ty.render(self.interner));
                    self.emit(" ");
                    self.emit_name(param.name);
                }
                self.emit(") ");
                self.block(*body);
            }
        }
    }

    /// The body of a control statement, on the same line as its header.
    fn body(&mut self, id: StmtId) {
        self.emit(" ");
        self.stmt(id);
    }

    fn block(&mut self, range: StmtRange) {
        let arena = self.arena;
        let stmts = arena.get_stmt_list(range);
        if stmts.is_empty() {
            self.emit("{}");
            return;
        }
        self.emit("{");
        self.depth += 1;
        for &stmt in stmts {
            self.line();
            self.stmt(stmt);
        }
        self.depth -= 1;
        self.line();
        self.emit("}");
    }

    /// An expression in statement position. A leading `{` would open a
    /// block there, so expressions starting with an array literal are
    /// parenthesized.
    fn statement_expr(&mut self, id: ExprId) {
        if self.starts_with_array(id) {
            self.emit("(");
            self.expr(id);
            self.emit(")");
        } else {
            self.expr(id);
        }
    }

    fn starts_with_array(&self, mut id: ExprId) -> bool {
        loop {
            id = match &self.arena.get_expr(id).kind {
                ExprKind::Array(_) => return true,
                ExprKind::Binary {
                    op: OperatorId::TypeCast,
                    ..
                } => return false,
                ExprKind::Binary { left, .. } => *left,
                ExprKind::Ternary { cond, .. } => *cond,
                ExprKind::Call { callee, .. } => *callee,
                ExprKind::Index { receiver, .. } => *receiver,
                _ => return false,
            };
        }
    }

    fn expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| self.expr_inner(id));
    }

    fn expr_inner(&mut self, id: ExprId) {
        let arena = self.arena;
        match &arena.get_expr(id).kind {
            ExprKind::Ident(name) => self.emit_name(*name),
            ExprKind::Constant(constant) => self.constant(*constant),
            ExprKind::Unary { op, operand } => {
                self.emit(op.symbol());
                self.operand(*operand, PREFIX_PRECEDENCE);
            }
            ExprKind::Binary {
                op: OperatorId::TypeCast,
                left,
                right,
            } => {
                self.emit("(");
                self.expr(*right);
                self.emit(") ");
                self.operand(*left, PREFIX_PRECEDENCE);
            }
            ExprKind::Binary { op, left, right } => {
                let descriptor = op.descriptor();
                let precedence = descriptor.precedence;
                let (left_min, right_min) = match descriptor.associativity {
                    Associativity::Left => (precedence, precedence + 1),
                    Associativity::Right => (precedence + 1, precedence),
                };
                self.operand(*left, left_min);
                self.emit_infix(descriptor.symbol);
                self.operand(*right, right_min);
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                self.operand(*cond, TERNARY_PRECEDENCE + 1);
                self.emit_infix("?");
                self.expr(*then_branch);
                self.emit_infix(":");
                self.operand(*else_branch, TERNARY_PRECEDENCE);
            }
            ExprKind::Call { callee, args } => {
                self.operand(*callee, POSTFIX_PRECEDENCE);
                self.emit("(");
                self.list(*args);
                self.emit(")");
            }
            ExprKind::Array(items) => {
                self.emit("{");
                self.list(*items);
                self.emit("}");
            }
            ExprKind::Index { receiver, index } => {
                self.operand(*receiver, POSTFIX_PRECEDENCE);
                self.emit("[");
                self.expr(*index);
                self.emit("]");
            }
            ExprKind::TypeLiteral(ty) => self.emit(&ty.render(self.interner)),
        }
    }

    /// `id`, parenthesized if it binds looser than `min_precedence`.
    fn operand(&mut self, id: ExprId, min_precedence: u8) {
        if self.precedence(id) < min_precedence {
            self.emit("(");
            self.expr(id);
            self.emit(")");
        } else {
            self.expr(id);
        }
    }

    fn precedence(&self, id: ExprId) -> u8 {
        match &self.arena.get_expr(id).kind {
            ExprKind::Ident(_) | ExprKind::Array(_) | ExprKind::TypeLiteral(_) => {
                PRIMARY_PRECEDENCE
            }
            ExprKind::Constant(Constant::Int(n)) if *n < 0 => PREFIX_PRECEDENCE,
            ExprKind::Constant(Constant::Float(x)) if x.is_sign_negative() => PREFIX_PRECEDENCE,
            ExprKind::Constant(_) => PRIMARY_PRECEDENCE,
            ExprKind::Unary { .. } => PREFIX_PRECEDENCE,
            ExprKind::Binary { op, .. } => op.descriptor().precedence,
            ExprKind::Ternary { .. } => TERNARY_PRECEDENCE,
            ExprKind::Call { .. } | ExprKind::Index { .. } => POSTFIX_PRECEDENCE,
        }
    }

    fn list(&mut self, range: ExprRange) {
        let arena = self.arena;
        for (i, &item) in arena.get_expr_list(range).iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.expr(item);
        }
    }

    fn constant(&mut self, constant: Constant) {
        match constant {
            // Writing to a String is infallible.
            Constant::Int(n) => {
                let _ = write!(self.out, "{n}");
            }
            Constant::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    let _ = write!(self.out, "{x:.1}");
                } else {
                    let _ = write!(self.out, "{x}");
                }
            }
            Constant::Bool(true) => self.emit("true"),
            Constant::Bool(false) => self.emit("false"),
            Constant::Null => self.emit("null"),
            Constant::Str(text) | Constant::Date(text) | Constant::Duration(text) => {
                self.string(text);
            }
        }
    }

    fn string(&mut self, text: Name) {
        let text = self.interner.lookup(text);
        self.out.push('"');
        for c in text.chars() {
            match c {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                _ => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests;
