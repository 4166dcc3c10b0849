//! Statement and program parsing.
//!
//! A statement is recognized by trying each form of `STATEMENT_FORMS` in
//! order. Forms with a unique leading keyword come before the declaration
//! forms, and the expression statement comes last because every other
//! form could otherwise be misread as an expression.

use fml_ir::{Param, Program, Span, Stmt, StmtId, StmtKind, StmtRange, TokenKind};
use fml_stack::ensure_sufficient_stack;

use crate::{furthest, ParseError, Parser};

/// A statement form the parser knows how to recognize.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StatementForm {
    Block,
    FunctionDecl,
    VarDecl,
    Return,
    While,
    If,
    Break,
    Continue,
    DoWhile,
    ForEach,
    For,
    ExprStmt,
}

/// Statement forms in the order they are tried.
const STATEMENT_FORMS: [StatementForm; 12] = [
    StatementForm::Block,
    StatementForm::FunctionDecl,
    StatementForm::VarDecl,
    StatementForm::Return,
    StatementForm::While,
    StatementForm::If,
    StatementForm::Break,
    StatementForm::Continue,
    StatementForm::DoWhile,
    StatementForm::ForEach,
    StatementForm::For,
    StatementForm::ExprStmt,
];

impl Parser<'_> {
    /// Statements up to `Eof`. A final expression without `;` becomes the
    /// program's tail.
    pub(crate) fn parse_program(&mut self) -> Result<Program, ParseError> {
        let start = self.cursor.current_span();
        let mut body = Vec::new();
        let mut tail = None;

        while !self.cursor.is_at_end() {
            let statement_error = match self.parse_statement() {
                Ok(stmt) => {
                    body.push(stmt);
                    continue;
                }
                Err(err) => err,
            };

            let tail_result = self.attempt(|p| {
                let expr = p.parse_expr()?;
                p.cursor.expect(TokenKind::Eof, "end of input")?;
                Ok(expr)
            });
            match tail_result {
                Ok(expr) => {
                    tail = Some(expr);
                    break;
                }
                Err(tail_error) => return Err(furthest(statement_error, tail_error)),
            }
        }

        let body = self.arena.alloc_stmt_list(body);
        Ok(Program {
            body,
            tail,
            span: self.span_from(start),
        })
    }

    /// Try every statement form in order.
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<StmtId, ParseError> {
        let mut best: Option<ParseError> = None;
        for form in STATEMENT_FORMS {
            match self.attempt(|p| p.parse_form(form)) {
                Ok(stmt) => return Ok(stmt),
                Err(err) => {
                    tracing::trace!(?form, position = err.position(), "form rejected");
                    best = Some(match best {
                        Some(best) => furthest(best, err),
                        None => err,
                    });
                }
            }
        }
        // STATEMENT_FORMS is non-empty, so `best` is always set here.
        Err(best.unwrap_or_else(|| self.cursor.unexpected("statement")))
    }

    fn parse_form(&mut self, form: StatementForm) -> Result<StmtId, ParseError> {
        match form {
            StatementForm::Block => self.parse_block(),
            StatementForm::FunctionDecl => self.parse_function_decl(),
            StatementForm::VarDecl => self.parse_var_decl(),
            StatementForm::Return => self.parse_return(),
            StatementForm::While => self.parse_while(),
            StatementForm::If => self.parse_if(),
            StatementForm::Break => self.parse_break(),
            StatementForm::Continue => self.parse_continue(),
            StatementForm::DoWhile => self.parse_do_while(),
            StatementForm::ForEach => self.parse_for_each(),
            StatementForm::For => self.parse_for(),
            StatementForm::ExprStmt => self.parse_expr_stmt(),
        }
    }

    fn alloc_stmt(&mut self, kind: StmtKind, start: Span) -> StmtId {
        let span = self.span_from(start);
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }

    /// Statements up to the closing `}`, which is consumed.
    fn parse_block_body(&mut self) -> Result<StmtRange, ParseError> {
        let mut stmts = Vec::new();
        while !self.cursor.eat(TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.unexpected("\"}\""));
            }
            stmts.push(self.parse_statement()?);
        }
        Ok(self.arena.alloc_stmt_list(stmts))
    }

    /// `( expr )`
    fn parse_condition(&mut self) -> Result<fml_ir::ExprId, ParseError> {
        self.cursor.expect(TokenKind::LParen, "\"(\"")?;
        let cond = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen, "\")\"")?;
        Ok(cond)
    }

    fn parse_block(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::LBrace, "\"{\"")?;
        let body = self.parse_block_body()?;
        Ok(self.alloc_stmt(StmtKind::Block(body), start))
    }

    /// `R name(T a, mut U b) { ... }`
    fn parse_function_decl(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let ret = self.parse_type()?;
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::LParen, "\"(\"")?;

        let mut params = Vec::new();
        if !self.cursor.eat(TokenKind::RParen) {
            loop {
                let param_start = self.cursor.current_span();
                let mutable = self.cursor.eat(TokenKind::Mut);
                let ty = self.parse_type()?;
                let name = self.cursor.expect_ident()?;
                params.push(Param {
                    name,
                    ty,
                    mutable,
                    span: self.span_from(param_start),
                });
                if self.cursor.eat(TokenKind::Comma) {
                    continue;
                }
                self.cursor.expect(TokenKind::RParen, "\")\"")?;
                break;
            }
        }

        self.cursor.expect(TokenKind::LBrace, "\"{\"")?;
        let body = self.parse_block_body()?;
        let params = self.arena.alloc_params(params);
        Ok(self.alloc_stmt(
            StmtKind::FunctionDecl {
                name,
                params,
                ret,
                body,
            },
            start,
        ))
    }

    /// `[mut] T name = init;` or `[mut] var name = init;`
    fn parse_var_decl(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let mutable = self.cursor.eat(TokenKind::Mut);
        let ty = if self.cursor.eat(TokenKind::Var) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::Eq, "\"=\"")?;
        let init = self.parse_expr()?;
        self.cursor.expect(TokenKind::Semicolon, "\";\"")?;
        Ok(self.alloc_stmt(
            StmtKind::VarDecl {
                mutable,
                ty,
                name,
                init,
            },
            start,
        ))
    }

    fn parse_return(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Return, "return")?;
        let value = if self.cursor.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect(TokenKind::Semicolon, "\";\"")?;
        Ok(self.alloc_stmt(StmtKind::Return(value), start))
    }

    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::While, "while")?;
        let cond = self.parse_condition()?;
        let body = self.parse_statement()?;
        Ok(self.alloc_stmt(StmtKind::While { cond, body }, start))
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::If, "if")?;
        let cond = self.parse_condition()?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.cursor.eat(TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start,
        ))
    }

    fn parse_break(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Break, "break")?;
        self.cursor.expect(TokenKind::Semicolon, "\";\"")?;
        Ok(self.alloc_stmt(StmtKind::Break, start))
    }

    fn parse_continue(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Continue, "continue")?;
        self.cursor.expect(TokenKind::Semicolon, "\";\"")?;
        Ok(self.alloc_stmt(StmtKind::Continue, start))
    }

    /// `do stmt while (cond);`
    fn parse_do_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Do, "do")?;
        let body = self.parse_statement()?;
        self.cursor.expect(TokenKind::While, "while")?;
        let cond = self.parse_condition()?;
        self.cursor.expect(TokenKind::Semicolon, "\";\"")?;
        Ok(self.alloc_stmt(StmtKind::DoWhile { body, cond }, start))
    }

    /// `for ([mut] T name : iterable) stmt`
    fn parse_for_each(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::For, "for")?;
        self.cursor.expect(TokenKind::LParen, "\"(\"")?;
        let mutable = self.cursor.eat(TokenKind::Mut);
        let ty = if self.cursor.eat(TokenKind::Var) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::Colon, "\":\"")?;
        let iterable = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen, "\")\"")?;
        let body = self.parse_statement()?;
        Ok(self.alloc_stmt(
            StmtKind::ForEach {
                mutable,
                ty,
                name,
                iterable,
                body,
            },
            start,
        ))
    }

    /// `for (init; cond; step) stmt`, every clause optional.
    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::For, "for")?;
        self.cursor.expect(TokenKind::LParen, "\"(\"")?;

        let init = if self.cursor.eat(TokenKind::Semicolon) {
            None
        } else {
            // Both initializer forms consume the `;`.
            let declaration = match self.attempt(|p| p.parse_var_decl()) {
                Ok(stmt) => return self.finish_for(start, Some(stmt)),
                Err(err) => err,
            };
            match self.attempt(|p| p.parse_expr_stmt()) {
                Ok(stmt) => Some(stmt),
                Err(err) => return Err(furthest(declaration, err)),
            }
        };

        self.finish_for(start, init)
    }

    /// The rest of a `for` header after the initializer clause.
    fn finish_for(&mut self, start: Span, init: Option<StmtId>) -> Result<StmtId, ParseError> {
        let cond = if self.cursor.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect(TokenKind::Semicolon, "\";\"")?;
        let step = if self.cursor.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect(TokenKind::RParen, "\")\"")?;
        let body = self.parse_statement()?;
        Ok(self.alloc_stmt(
            StmtKind::For {
                init,
                cond,
                step,
                body,
            },
            start,
        ))
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let expr = self.parse_expr()?;
        self.cursor.expect(TokenKind::Semicolon, "\";\"")?;
        Ok(self.alloc_stmt(StmtKind::Expr(expr), start))
    }
}
