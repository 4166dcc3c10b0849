use super::*;
use crate::ast::{Expr, Stmt};
use crate::{OperatorId, ParsedType, Span, StringInterner};
use pretty_assertions::assert_eq;

struct Builder {
    arena: ExprArena,
    interner: StringInterner,
}

impl Builder {
    fn new() -> Self {
        Builder {
            arena: ExprArena::new(),
            interner: StringInterner::new(),
        }
    }

    fn name(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, Span::DUMMY))
    }

    fn ident(&mut self, name: &str) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::Ident(name))
    }

    fn string(&mut self, text: &str) -> ExprId {
        let text = self.name(text);
        self.expr(ExprKind::Constant(Constant::Str(text)))
    }

    fn add(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary {
            op: OperatorId::Add,
            left,
            right,
        })
    }

    fn call(&mut self, callee: &str, args: &[ExprId]) -> ExprId {
        let callee = self.ident(callee);
        let args = self.arena.alloc_expr_list(args.iter().copied());
        self.expr(ExprKind::Call { callee, args })
    }

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, Span::DUMMY))
    }

    fn program(&mut self, body: &[StmtId], tail: Option<ExprId>) -> Program {
        Program {
            body: self.arena.alloc_stmt_list(body.iter().copied()),
            tail,
            span: Span::DUMMY,
        }
    }

    fn names(&self, names: &[Name]) -> Vec<&str> {
        names.iter().map(|n| self.interner.lookup(*n)).collect()
    }
}

/// `a + b + max(c, b ? d : e)`
fn variables_and_calls(b: &mut Builder) -> Program {
    let a = b.ident("a");
    let b1 = b.ident("b");
    let sum = b.add(a, b1);
    let c = b.ident("c");
    let cond = b.ident("b");
    let d = b.ident("d");
    let e = b.ident("e");
    let ternary = b.expr(ExprKind::Ternary {
        cond,
        then_branch: d,
        else_branch: e,
    });
    let max = b.call("max", &[c, ternary]);
    let tail = b.add(sum, max);
    b.program(&[], Some(tail))
}

#[test]
fn test_free_identifiers_first_occurrence_order() {
    let mut b = Builder::new();
    let program = variables_and_calls(&mut b);
    let free = free_identifiers(&b.arena, &program);
    assert_eq!(b.names(&free.variables), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(b.names(&free.calls), vec!["max"]);
}

#[test]
fn test_declared_names_are_not_free() {
    let mut b = Builder::new();
    // int a = a; f(a, b)
    let init = b.ident("a");
    let a = b.name("a");
    let decl = b.stmt(StmtKind::VarDecl {
        mutable: false,
        ty: Some(ParsedType::Int),
        name: a,
        init,
    });
    let use_a = b.ident("a");
    let use_b = b.ident("b");
    let tail = b.call("f", &[use_a, use_b]);
    let program = b.program(&[decl], Some(tail));

    let free = free_identifiers(&b.arena, &program);
    // The initializer's `a` is free: the declaration is not visible yet.
    assert_eq!(b.names(&free.variables), vec!["a", "b"]);
    assert_eq!(b.names(&free.calls), vec!["f"]);
}

#[test]
fn test_block_scope_ends() {
    let mut b = Builder::new();
    // { int x = 1; } x
    let one = b.expr(ExprKind::Constant(Constant::Int(1)));
    let x = b.name("x");
    let decl = b.stmt(StmtKind::VarDecl {
        mutable: false,
        ty: Some(ParsedType::Int),
        name: x,
        init: one,
    });
    let list = b.arena.alloc_stmt_list([decl]);
    let block = b.stmt(StmtKind::Block(list));
    let tail = b.ident("x");
    let program = b.program(&[block], Some(tail));

    let free = free_identifiers(&b.arena, &program);
    assert_eq!(b.names(&free.variables), vec!["x"]);
}

#[test]
fn test_branch_declarations_do_not_leak() {
    let mut b = Builder::new();
    // if (c) int x = 1; x
    let cond = b.ident("c");
    let one = b.expr(ExprKind::Constant(Constant::Int(1)));
    let x = b.name("x");
    let decl = b.stmt(StmtKind::VarDecl {
        mutable: false,
        ty: Some(ParsedType::Int),
        name: x,
        init: one,
    });
    let branch = b.stmt(StmtKind::If {
        cond,
        then_branch: decl,
        else_branch: None,
    });
    let tail = b.ident("x");
    let program = b.program(&[branch], Some(tail));

    let free = free_identifiers(&b.arena, &program);
    assert_eq!(b.names(&free.variables), vec!["c", "x"]);
}

#[test]
fn test_string_literals_keep_duplicates() {
    let mut b = Builder::new();
    let args: Vec<_> = ["hallo", "welt", "hallo", "welt"]
        .iter()
        .map(|text| b.string(text))
        .collect();
    let tail = b.call("strFunc", &args);
    let program = b.program(&[], Some(tail));
    let literals = string_literals(&b.arena, &program);
    assert_eq!(b.names(&literals), vec!["hallo", "welt", "hallo", "welt"]);
}

#[test]
fn test_rename_identifier_skips_callees() {
    let mut b = Builder::new();
    // a + a(a)
    let left = b.ident("a");
    let arg = b.ident("a");
    let call = b.call("a", &[arg]);
    let tail = b.add(left, call);
    let program = b.program(&[], Some(tail));

    let old = b.name("a");
    let new = b.name("c");
    assert_eq!(rename_identifier(&mut b.arena, &program, old, new), 2);
    let free = free_identifiers(&b.arena, &program);
    assert_eq!(b.names(&free.variables), vec!["c"]);
    assert_eq!(b.names(&free.calls), vec!["a"]);

    let min = b.name("min");
    assert_eq!(rename_call(&mut b.arena, &program, old, min), 1);
    let free = free_identifiers(&b.arena, &program);
    assert_eq!(b.names(&free.calls), vec!["min"]);
}

#[test]
fn test_rename_string_literal() {
    let mut b = Builder::new();
    let hallo = b.string("Hallo");
    let other = b.string("other");
    let tail = b.add(hallo, other);
    let program = b.program(&[], Some(tail));

    let old = b.name("Hallo");
    let new = b.name("Welt");
    assert_eq!(rename_string_literal(&mut b.arena, &program, old, new), 1);
    let literals = string_literals(&b.arena, &program);
    assert_eq!(b.names(&literals), vec!["Welt", "other"]);
}
