use super::*;
use crate::ast::{Expr, Stmt};
use crate::{Param, ParsedType, Span};
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

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, Span::DUMMY))
    }

    fn ident(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.expr(ExprKind::Ident(name))
    }

    fn int(&mut self, n: i64) -> ExprId {
        self.expr(ExprKind::Constant(Constant::Int(n)))
    }

    fn binary(&mut self, op: OperatorId, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    fn ternary(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId) -> ExprId {
        self.expr(ExprKind::Ternary {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, Span::DUMMY))
    }

    fn print(&self, id: ExprId) -> String {
        print_expr(&self.arena, id, &self.interner, PrintConfig::default())
    }

    fn print_program(&mut self, body: &[StmtId], tail: Option<ExprId>, config: PrintConfig) -> String {
        let program = Program {
            body: self.arena.alloc_stmt_list(body.iter().copied()),
            tail,
            span: Span::DUMMY,
        };
        print_program(&self.arena, &program, &self.interner, config)
    }
}

#[test]
fn test_parentheses_follow_precedence() {
    let mut b = Builder::new();
    let (x, y, z) = (b.ident("a"), b.ident("b"), b.ident("c"));
    let sum = b.binary(OperatorId::Add, x, y);
    let product = b.binary(OperatorId::Mul, sum, z);
    assert_eq!(b.print(product), "(a + b) * c");

    let (x, y, z) = (b.ident("a"), b.ident("b"), b.ident("c"));
    let product = b.binary(OperatorId::Mul, y, z);
    let sum = b.binary(OperatorId::Add, x, product);
    assert_eq!(b.print(sum), "a + b * c");
}

#[test]
fn test_parentheses_follow_associativity() {
    let mut b = Builder::new();
    let (x, y, z) = (b.ident("a"), b.ident("b"), b.ident("c"));
    let inner = b.binary(OperatorId::Sub, y, z);
    let right_nested = b.binary(OperatorId::Sub, x, inner);
    assert_eq!(b.print(right_nested), "a - (b - c)");

    let (x, y, z) = (b.ident("a"), b.ident("b"), b.ident("c"));
    let inner = b.binary(OperatorId::Sub, x, y);
    let left_nested = b.binary(OperatorId::Sub, inner, z);
    assert_eq!(b.print(left_nested), "a - b - c");

    // Assignment groups to the right.
    let (x, y, one) = (b.ident("x"), b.ident("y"), b.int(1));
    let inner = b.binary(OperatorId::Assign, y, one);
    let chained = b.binary(OperatorId::Assign, x, inner);
    assert_eq!(b.print(chained), "x = y = 1");
}

#[test]
fn test_ternary_operands() {
    let mut b = Builder::new();
    let (c, d, x, y, z) = (b.ident("c"), b.ident("d"), b.ident("x"), b.ident("y"), b.ident("z"));
    let inner = b.ternary(c, x, y);
    let outer = b.ternary(inner, z, d);
    assert_eq!(b.print(outer), "(c ? x : y) ? z : d");

    let (c, d, x, y, z) = (b.ident("c"), b.ident("d"), b.ident("x"), b.ident("y"), b.ident("z"));
    let inner = b.ternary(d, y, z);
    let outer = b.ternary(c, x, inner);
    assert_eq!(b.print(outer), "c ? x : d ? y : z");

    let (c, x, y, one) = (b.ident("c"), b.ident("x"), b.ident("y"), b.int(1));
    let sum = b.binary(OperatorId::Add, y, one);
    let choice = b.ternary(c, x, sum);
    let total = b.binary(OperatorId::Mul, choice, one);
    assert_eq!(b.print(total), "(c ? x : y + 1) * 1");
}

#[test]
fn test_prefix_and_postfix() {
    let mut b = Builder::new();
    let (x, y) = (b.ident("x"), b.ident("y"));
    let sum = b.binary(OperatorId::Add, x, y);
    let negated = b.expr(ExprKind::Unary {
        op: OperatorId::Neg,
        operand: sum,
    });
    assert_eq!(b.print(negated), "-(x + y)");

    let xs = b.ident("xs");
    let zero = b.int(0);
    let index = b.expr(ExprKind::Index {
        receiver: xs,
        index: zero,
    });
    let target = b.expr(ExprKind::TypeLiteral(ParsedType::Float));
    let cast = b.binary(OperatorId::TypeCast, index, target);
    assert_eq!(b.print(cast), "(float) xs[0]");

    let callee = b.ident("max");
    let (one, two) = (b.int(1), b.int(2));
    let elements = b.arena.alloc_expr_list([one, two]);
    let array = b.expr(ExprKind::Array(elements));
    let args = b.arena.alloc_expr_list([array, one]);
    let call = b.expr(ExprKind::Call { callee, args });
    assert_eq!(b.print(call), "max({1, 2}, 1)");
}

#[test]
fn test_literals() {
    let mut b = Builder::new();
    let two = b.expr(ExprKind::Constant(Constant::Float(2.0)));
    assert_eq!(b.print(two), "2.0");
    let half = b.expr(ExprKind::Constant(Constant::Float(0.5)));
    assert_eq!(b.print(half), "0.5");
    let text = b.interner.intern("say \"hi\"\n\\");
    let quoted = b.expr(ExprKind::Constant(Constant::Str(text)));
    assert_eq!(b.print(quoted), r#""say \"hi\"\n\\""#);
    let null = b.expr(ExprKind::Constant(Constant::Null));
    assert_eq!(b.print(null), "null");
}

#[test]
fn test_compact_operators() {
    let mut b = Builder::new();
    let (c, x, y) = (b.ident("c"), b.ident("x"), b.ident("y"));
    let neg = b.expr(ExprKind::Unary {
        op: OperatorId::Neg,
        operand: y,
    });
    let diff = b.binary(OperatorId::Sub, x, neg);
    let choice = b.ternary(c, diff, x);
    let text = print_expr(&b.arena, choice, &b.interner, PrintConfig::compact());
    assert_eq!(text, "c?x--y:x");
}

#[test]
fn test_statement_layout() {
    let mut b = Builder::new();
    // int twice(mut int n) { n *= 2; return n; }
    let n = b.interner.intern("n");
    let twice = b.interner.intern("twice");
    let (target, two) = (b.ident("n"), b.int(2));
    let scaled = b.binary(OperatorId::MulAssign, target, two);
    let scale = b.stmt(StmtKind::Expr(scaled));
    let result = b.ident("n");
    let ret = b.stmt(StmtKind::Return(Some(result)));
    let body = b.arena.alloc_stmt_list([scale, ret]);
    let params = b.arena.alloc_params(vec![Param {
        name: n,
        ty: ParsedType::Int,
        mutable: true,
        span: Span::DUMMY,
    }]);
    let decl = b.stmt(StmtKind::FunctionDecl {
        name: twice,
        params,
        ret: ParsedType::Int,
        body,
    });
    // if (c) {} else x;
    let cond = b.ident("c");
    let empty = b.arena.alloc_stmt_list([]);
    let then_branch = b.stmt(StmtKind::Block(empty));
    let x = b.ident("x");
    let else_branch = b.stmt(StmtKind::Expr(x));
    let branch = b.stmt(StmtKind::If {
        cond,
        then_branch,
        else_branch: Some(else_branch),
    });
    let callee = b.ident("twice");
    let three = b.int(3);
    let args = b.arena.alloc_expr_list([three]);
    let tail = b.expr(ExprKind::Call { callee, args });

    let text = b.print_program(&[decl, branch], Some(tail), PrintConfig::default().with_indent_size(2));
    assert_eq!(
        text,
        "int twice(mut int n) {\n  n *= 2;\n  return n;\n}\nif (c) {} else x;\ntwice(3)"
    );
}

#[test]
fn test_array_in_statement_position() {
    let mut b = Builder::new();
    let one = b.int(1);
    let elements = b.arena.alloc_expr_list([one]);
    let array = b.expr(ExprKind::Array(elements));
    let text = b.print_program(&[], Some(array), PrintConfig::default());
    assert_eq!(text, "({1})");

    let zero = b.int(0);
    let index = b.expr(ExprKind::Index {
        receiver: array,
        index: zero,
    });
    let sum = b.binary(OperatorId::Add, index, one);
    let stmt = b.stmt(StmtKind::Expr(sum));
    let text = b.print_program(&[stmt], None, PrintConfig::default());
    assert_eq!(text, "({1}[0] + 1);");
}
