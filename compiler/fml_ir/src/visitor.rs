//! AST Visitor Pattern
//!
//! Generic, scope-aware traversal of a [`Program`]. The walk visits nodes in
//! source order and reports where lexical scopes open and close and where
//! names are declared, so visitors can tell free identifiers from local
//! ones without re-implementing the scoping rules.
//!
//! Built on top of the traversal are the source-level utilities the host
//! facade needs: free identifier discovery, string literal collection, and
//! the rename operations.

use fml_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::ast::{Constant, ExprKind, Program, StmtKind};
use crate::{ExprArena, ExprId, Name, StmtId};

/// AST Visitor trait.
///
/// Override `visit_*` methods to add behavior at specific nodes and call
/// the matching `walk_*` function to continue into children. The scope
/// hooks default to no-ops.
pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program, arena: &'ast ExprArena) {
        walk_program(self, program, arena);
    }

    fn visit_stmt_id(&mut self, id: StmtId, arena: &'ast ExprArena) {
        walk_stmt(self, id, arena);
    }

    fn visit_expr_id(&mut self, id: ExprId, arena: &'ast ExprArena) {
        walk_expr(self, id, arena);
    }

    /// The callee of a call expression.
    fn visit_callee(&mut self, id: ExprId, arena: &'ast ExprArena) {
        self.visit_expr_id(id, arena);
    }

    fn enter_scope(&mut self) {}

    fn exit_scope(&mut self) {}

    /// A name is declared in the innermost open scope.
    fn declare(&mut self, name: Name) {
        let _ = name;
    }
}

pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    program: &'ast Program,
    arena: &'ast ExprArena,
) {
    visitor.enter_scope();
    for &stmt in arena.get_stmt_list(program.body) {
        visitor.visit_stmt_id(stmt, arena);
    }
    if let Some(tail) = program.tail {
        visitor.visit_expr_id(tail, arena);
    }
    visitor.exit_scope();
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: StmtId,
    arena: &'ast ExprArena,
) {
    ensure_sufficient_stack(|| {
        match &arena.get_stmt(id).kind {
            StmtKind::Expr(expr) => visitor.visit_expr_id(*expr, arena),
            StmtKind::VarDecl { name, init, .. } => {
                // The initializer cannot see the name it initializes.
                visitor.visit_expr_id(*init, arena);
                visitor.declare(*name);
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    visitor.visit_expr_id(*value, arena);
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                visitor.visit_expr_id(*cond, arena);
                walk_scoped(visitor, *then_branch, arena);
                if let Some(else_branch) = else_branch {
                    walk_scoped(visitor, *else_branch, arena);
                }
            }
            StmtKind::While { cond, body } => {
                visitor.visit_expr_id(*cond, arena);
                walk_scoped(visitor, *body, arena);
            }
            StmtKind::DoWhile { body, cond } => {
                walk_scoped(visitor, *body, arena);
                visitor.visit_expr_id(*cond, arena);
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                visitor.enter_scope();
                if let Some(init) = init {
                    visitor.visit_stmt_id(*init, arena);
                }
                if let Some(cond) = cond {
                    visitor.visit_expr_id(*cond, arena);
                }
                if let Some(step) = step {
                    visitor.visit_expr_id(*step, arena);
                }
                visitor.visit_stmt_id(*body, arena);
                visitor.exit_scope();
            }
            StmtKind::ForEach {
                name,
                iterable,
                body,
                ..
            } => {
                visitor.visit_expr_id(*iterable, arena);
                visitor.enter_scope();
                visitor.declare(*name);
                visitor.visit_stmt_id(*body, arena);
                visitor.exit_scope();
            }
            StmtKind::Break | StmtKind::Continue => {}
            StmtKind::Block(stmts) => {
                visitor.enter_scope();
                for &stmt in arena.get_stmt_list(*stmts) {
                    visitor.visit_stmt_id(stmt, arena);
                }
                visitor.exit_scope();
            }
            StmtKind::FunctionDecl {
                name, params, body, ..
            } => {
                // Declared before the body so the function can recurse.
                visitor.declare(*name);
                visitor.enter_scope();
                for param in arena.get_params(*params) {
                    visitor.declare(param.name);
                }
                for &stmt in arena.get_stmt_list(*body) {
                    visitor.visit_stmt_id(stmt, arena);
                }
                visitor.exit_scope();
            }
        }
    });
}

/// A branch or loop body: its declarations do not outlive it.
fn walk_scoped<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: StmtId,
    arena: &'ast ExprArena,
) {
    visitor.enter_scope();
    visitor.visit_stmt_id(id, arena);
    visitor.exit_scope();
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: ExprId,
    arena: &'ast ExprArena,
) {
    ensure_sufficient_stack(|| {
        match &arena.get_expr(id).kind {
            ExprKind::Ident(_) | ExprKind::Constant(_) | ExprKind::TypeLiteral(_) => {}
            ExprKind::Unary { operand, .. } => visitor.visit_expr_id(*operand, arena),
            ExprKind::Binary { left, right, .. } => {
                visitor.visit_expr_id(*left, arena);
                visitor.visit_expr_id(*right, arena);
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                visitor.visit_expr_id(*cond, arena);
                visitor.visit_expr_id(*then_branch, arena);
                visitor.visit_expr_id(*else_branch, arena);
            }
            ExprKind::Call { callee, args } => {
                visitor.visit_callee(*callee, arena);
                for &arg in arena.get_expr_list(*args) {
                    visitor.visit_expr_id(arg, arena);
                }
            }
            ExprKind::Array(elements) => {
                for &element in arena.get_expr_list(*elements) {
                    visitor.visit_expr_id(element, arena);
                }
            }
            ExprKind::Index { receiver, index } => {
                visitor.visit_expr_id(*receiver, arena);
                visitor.visit_expr_id(*index, arena);
            }
        }
    });
}

/// How a free identifier is used.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Occurrence {
    /// Read or assigned as a value.
    Variable,
    /// Called directly: `name(...)`.
    Callee,
}

/// Reports every identifier not bound by a declaration inside the program.
struct FreeScan<F> {
    scopes: Vec<FxHashSet<Name>>,
    report: F,
}

impl<F: FnMut(ExprId, Name, Occurrence)> FreeScan<F> {
    fn is_bound(&self, name: Name) -> bool {
        self.scopes.iter().any(|scope| scope.contains(&name))
    }

    fn check(&mut self, id: ExprId, arena: &ExprArena, occurrence: Occurrence) -> bool {
        if let ExprKind::Ident(name) = arena.get_expr(id).kind {
            if !self.is_bound(name) {
                (self.report)(id, name, occurrence);
            }
            return true;
        }
        false
    }
}

impl<'ast, F: FnMut(ExprId, Name, Occurrence)> Visitor<'ast> for FreeScan<F> {
    fn visit_expr_id(&mut self, id: ExprId, arena: &'ast ExprArena) {
        if !self.check(id, arena, Occurrence::Variable) {
            walk_expr(self, id, arena);
        }
    }

    fn visit_callee(&mut self, id: ExprId, arena: &'ast ExprArena) {
        if !self.check(id, arena, Occurrence::Callee) {
            walk_expr(self, id, arena);
        }
    }

    fn enter_scope(&mut self) {
        self.scopes.push(FxHashSet::default());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: Name) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name);
        }
    }
}

/// Visit every free identifier occurrence in source order.
pub fn for_each_free_identifier(
    arena: &ExprArena,
    program: &Program,
    report: impl FnMut(ExprId, Name, Occurrence),
) {
    let mut scan = FreeScan {
        scopes: Vec::new(),
        report,
    };
    scan.visit_program(program, arena);
}

/// Free names of a program, each list in first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreeNames {
    /// Names the host must supply values for.
    pub variables: Vec<Name>,
    /// Names called directly that the host (or the built-ins) must supply.
    pub calls: Vec<Name>,
}

/// Collect the free identifiers of a program.
pub fn free_identifiers(arena: &ExprArena, program: &Program) -> FreeNames {
    let mut names = FreeNames::default();
    for_each_free_identifier(arena, program, |_, name, occurrence| {
        let list = match occurrence {
            Occurrence::Variable => &mut names.variables,
            Occurrence::Callee => &mut names.calls,
        };
        if !list.contains(&name) {
            list.push(name);
        }
    });
    names
}

struct StringLiterals {
    found: Vec<(ExprId, Name)>,
}

impl<'ast> Visitor<'ast> for StringLiterals {
    fn visit_expr_id(&mut self, id: ExprId, arena: &'ast ExprArena) {
        if let ExprKind::Constant(constant) = &arena.get_expr(id).kind {
            if let Some(text) = constant.text() {
                self.found.push((id, text));
            }
        }
        walk_expr(self, id, arena);
    }
}

/// The text of every quoted literal in source order, duplicates included.
pub fn string_literals(arena: &ExprArena, program: &Program) -> Vec<Name> {
    let mut visitor = StringLiterals { found: Vec::new() };
    visitor.visit_program(program, arena);
    visitor.found.into_iter().map(|(_, text)| text).collect()
}

fn rename_free(
    arena: &mut ExprArena,
    program: &Program,
    old: Name,
    new: Name,
    wanted: Occurrence,
) -> usize {
    let mut targets = Vec::new();
    for_each_free_identifier(arena, program, |id, name, occurrence| {
        if name == old && occurrence == wanted {
            targets.push(id);
        }
    });
    for &id in &targets {
        arena.get_expr_mut(id).kind = ExprKind::Ident(new);
    }
    targets.len()
}

/// Rename free variable occurrences of `old`. Call targets and locally
/// declared names are left alone. Returns the number of rewritten nodes.
pub fn rename_identifier(arena: &mut ExprArena, program: &Program, old: Name, new: Name) -> usize {
    rename_free(arena, program, old, new, Occurrence::Variable)
}

/// Rename free call targets named `old`. Returns the number of rewritten
/// nodes.
pub fn rename_call(arena: &mut ExprArena, program: &Program, old: Name, new: Name) -> usize {
    rename_free(arena, program, old, new, Occurrence::Callee)
}

/// Replace the text of every quoted literal equal to `old`. Returns the
/// number of rewritten nodes.
pub fn rename_string_literal(
    arena: &mut ExprArena,
    program: &Program,
    old: Name,
    new: Name,
) -> usize {
    let mut visitor = StringLiterals { found: Vec::new() };
    visitor.visit_program(program, arena);
    let mut renamed = 0;
    for (id, text) in visitor.found {
        if text != old {
            continue;
        }
        // A reinterpreted date or duration literal becomes a plain string
        // again; the validator decides what the new text means.
        arena.get_expr_mut(id).kind = ExprKind::Constant(Constant::Str(new));
        renamed += 1;
    }
    renamed
}

#[cfg(test)]
mod tests;
