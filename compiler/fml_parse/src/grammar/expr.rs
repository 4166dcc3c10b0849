//! Expression parsing.
//!
//! Binary operators are parsed by precedence climbing over the operator
//! registry. The ternary is handled inside the climbing loop at
//! `TERNARY_PRECEDENCE`; prefix operators and casts sit below it, and
//! index/call suffixes bind tightest.

use fml_ir::operator::{self, Associativity, Fixity, TERNARY_PRECEDENCE};
use fml_ir::{Constant, Expr, ExprId, ExprKind, ExprRange, OperatorId, Span, TokenKind};
use fml_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a full expression, including assignments.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_binary(0))
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn expr_span(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let kind = self.cursor.current_kind();

            if kind == TokenKind::Question {
                if TERNARY_PRECEDENCE < min_precedence {
                    break;
                }
                self.cursor.advance();
                let then_branch = self.parse_binary(0)?;
                self.cursor.expect(TokenKind::Colon, "\":\" (Ternary)")?;
                let else_branch = self.parse_binary(TERNARY_PRECEDENCE)?;
                let span = self.expr_span(left).merge(self.expr_span(else_branch));
                left = self.alloc(
                    ExprKind::Ternary {
                        cond: left,
                        then_branch,
                        else_branch,
                    },
                    span,
                );
                continue;
            }

            let Some(symbol) = kind.operator_symbol() else {
                break;
            };
            // `!` has no infix form and ends the expression.
            let Ok(descriptor) = operator::resolve(symbol, Fixity::Infix) else {
                break;
            };
            if descriptor.precedence < min_precedence {
                break;
            }
            self.cursor.advance();

            let next_min = match descriptor.associativity {
                Associativity::Left => descriptor.precedence + 1,
                Associativity::Right => descriptor.precedence,
            };
            let right = self.parse_binary(next_min)?;
            let span = self.expr_span(left).merge(self.expr_span(right));
            left = self.alloc(
                ExprKind::Binary {
                    op: descriptor.id,
                    left,
                    right,
                },
                span,
            );
        }

        Ok(left)
    }

    /// Prefix operators and casts.
    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let kind = self.cursor.current_kind();

        if let Some(op) = prefix_operator(kind) {
            self.cursor.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(self.expr_span(operand));
            return Ok(self.alloc(ExprKind::Unary { op, operand }, span));
        }

        if kind == TokenKind::LParen && self.cursor.peek_next_kind().is_type_keyword() {
            self.cursor.advance();
            let ty = self.parse_type()?;
            let type_span = self.span_from(start);
            self.cursor.expect(TokenKind::RParen, "\")\"")?;
            let target = self.alloc(ExprKind::TypeLiteral(ty), type_span);
            let operand = self.parse_unary()?;
            let span = start.merge(self.expr_span(operand));
            return Ok(self.alloc(
                ExprKind::Binary {
                    op: OperatorId::TypeCast,
                    left: operand,
                    right: target,
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    /// Primary followed by any chain of `[index]` and `(args)`.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.cursor.current_kind() {
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.parse_expr()?;
                    let end = self.cursor.expect(TokenKind::RBracket, "\"]\"")?;
                    let span = self.expr_span(expr).merge(end);
                    expr = self.alloc(
                        ExprKind::Index {
                            receiver: expr,
                            index,
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    self.cursor.advance();
                    let args = self.parse_list(TokenKind::RParen, "\")\"")?;
                    let span = self.span_from(self.expr_span(expr));
                    expr = self.alloc(ExprKind::Call { callee: expr, args }, span);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Int(n) => ExprKind::Constant(Constant::Int(n)),
            TokenKind::Float(bits) => ExprKind::Constant(Constant::Float(f64::from_bits(bits))),
            TokenKind::String(text) => ExprKind::Constant(Constant::Str(text)),
            TokenKind::True => ExprKind::Constant(Constant::Bool(true)),
            TokenKind::False => ExprKind::Constant(Constant::Bool(false)),
            TokenKind::Null => ExprKind::Constant(Constant::Null),
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(TokenKind::RParen, "\")\"")?;
                return Ok(inner);
            }
            TokenKind::LBrace => {
                self.cursor.advance();
                let elements = self.parse_list(TokenKind::RBrace, "\"}\"")?;
                let span = self.span_from(token.span);
                return Ok(self.alloc(ExprKind::Array(elements), span));
            }
            _ => return Err(self.cursor.unexpected("expression")),
        };
        self.cursor.advance();
        Ok(self.alloc(kind, token.span))
    }

    /// Comma-separated expressions up to and including `close`. The opening
    /// delimiter has already been consumed.
    fn parse_list(
        &mut self,
        close: TokenKind,
        close_name: &'static str,
    ) -> Result<ExprRange, ParseError> {
        let mut items = Vec::new();
        if !self.cursor.eat(close) {
            loop {
                items.push(self.parse_expr()?);
                if self.cursor.eat(TokenKind::Comma) {
                    continue;
                }
                self.cursor.expect(close, close_name)?;
                break;
            }
        }
        Ok(self.arena.alloc_expr_list(items))
    }
}

fn prefix_operator(kind: TokenKind) -> Option<OperatorId> {
    let symbol = kind.operator_symbol()?;
    operator::resolve(symbol, Fixity::Prefix)
        .ok()
        .map(|descriptor| descriptor.id)
}
