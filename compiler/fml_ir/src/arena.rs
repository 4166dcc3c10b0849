//! Arena allocation for the flat AST.
//!
//! All expressions, statements and parameters of one formula live in
//! contiguous vectors. Child lists are stored flattened and addressed by
//! ranges.

use crate::ast::{Expr, Param, Stmt};
use crate::{ExprId, ExprRange, ParamRange, StmtId, StmtRange};

/// Contiguous storage for every node of one formula.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    stmts: Vec<Stmt>,
    stmt_lists: Vec<StmtId>,
    params: Vec<Param>,
}

/// Arena sizes at a point in time, for rolling back speculative parses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArenaCheckpoint {
    exprs: usize,
    expr_lists: usize,
    stmts: usize,
    stmt_lists: usize,
    params: usize,
}

#[inline]
fn next_index(len: usize) -> u32 {
    // Formula text is far below 4 GiB, so node counts fit in u32.
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heuristic: roughly one expression per four bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated = source_len / 4;
        ExprArena {
            exprs: Vec::with_capacity(estimated),
            expr_lists: Vec::with_capacity(estimated / 4),
            stmts: Vec::with_capacity(estimated / 8),
            stmt_lists: Vec::with_capacity(estimated / 8),
            params: Vec::new(),
        }
    }

    // Expressions

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = next_index(self.expr_lists.len());
        self.expr_lists.extend(exprs);
        ExprRange::new(start, next_index(self.expr_lists.len()) - start)
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    // Statements

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(next_index(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn alloc_stmt_list(&mut self, stmts: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = next_index(self.stmt_lists.len());
        self.stmt_lists.extend(stmts);
        StmtRange::new(start, next_index(self.stmt_lists.len()) - start)
    }

    #[inline]
    pub fn get_stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.to_range()]
    }

    // Parameters

    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = next_index(self.params.len());
        self.params.extend(params);
        ParamRange::new(start, next_index(self.params.len()) - start)
    }

    #[inline]
    pub fn get_params(&self, range: ParamRange) -> &[Param] {
        &self.params[range.to_range()]
    }

    // Speculation

    pub fn checkpoint(&self) -> ArenaCheckpoint {
        ArenaCheckpoint {
            exprs: self.exprs.len(),
            expr_lists: self.expr_lists.len(),
            stmts: self.stmts.len(),
            stmt_lists: self.stmt_lists.len(),
            params: self.params.len(),
        }
    }

    /// Drop every node allocated after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: ArenaCheckpoint) {
        self.exprs.truncate(checkpoint.exprs);
        self.expr_lists.truncate(checkpoint.expr_lists);
        self.stmts.truncate(checkpoint.stmts);
        self.stmt_lists.truncate(checkpoint.stmt_lists);
        self.params.truncate(checkpoint.params);
    }
}
