//! Expression evaluation.

use std::rc::Rc;

use smallvec::SmallVec;

use fml_ir::{Constant, ExprId, ExprKind, ExprRange, Name, OperatorId, Span};
use fml_stack::ensure_sufficient_stack;
use fml_types::temporal::{parse_date, IsoDuration};
use fml_types::Type;

use super::Interpreter;
use crate::builtins::{call_builtin, lookup_builtin};
use crate::errors::{bug, EvalError, EvalErrorKind, EvalResult};
use crate::operators::{cast, evaluate_binary, evaluate_unary};
use crate::{AssignError, FunctionValue, Value};

/// Evaluated indices of an assignment target, outermost first.
type IndexPath = SmallVec<[(Value, Span); 2]>;

impl Interpreter<'_> {
    /// Evaluate an expression.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        let span = expr.span;
        let at = |kind: EvalErrorKind| EvalError::new(kind, span);
        match &expr.kind {
            ExprKind::Ident(name) => self.lookup(*name, span),
            ExprKind::Constant(constant) => self.constant(*constant).map_err(at),
            ExprKind::Unary { op, operand } => {
                let value = self.eval(*operand)?;
                evaluate_unary(*op, &value).map_err(at)
            }
            ExprKind::Binary {
                op: OperatorId::TypeCast,
                left,
                right,
            } => {
                let ExprKind::TypeLiteral(parsed) = &arena.get_expr(*right).kind else {
                    return Err(at(bug("cast without a target type")));
                };
                let value = self.eval(*left)?;
                cast(&value, &Type::from_parsed(parsed), self.interner).map_err(at)
            }
            ExprKind::Binary {
                op: OperatorId::And,
                left,
                right,
            } => {
                let result = self.eval(*left)?.is_truthy() && self.eval(*right)?.is_truthy();
                Ok(Value::Bool(result))
            }
            ExprKind::Binary {
                op: OperatorId::Or,
                left,
                right,
            } => {
                let result = self.eval(*left)?.is_truthy() || self.eval(*right)?.is_truthy();
                Ok(Value::Bool(result))
            }
            ExprKind::Binary { op, left, right } if op.is_assignment() => {
                self.assign(*op, *left, *right, span)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(*left)?;
                let right = self.eval(*right)?;
                evaluate_binary(*op, &left, &right).map_err(at)
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(*cond)?.is_truthy() {
                    self.eval(*then_branch)
                } else {
                    self.eval(*else_branch)
                }
            }
            ExprKind::Call { callee, args } => self.call(*callee, *args, span),
            ExprKind::Array(range) => {
                let elements = arena.get_expr_list(*range);
                let mut items = Vec::with_capacity(elements.len());
                for &element in elements {
                    items.push(self.eval(element)?);
                }
                Ok(Value::array(items))
            }
            ExprKind::Index { receiver, index } => {
                let receiver = self.eval(*receiver)?;
                let index = self.eval(*index)?;
                index_value(&receiver, &index).map_err(at)
            }
            ExprKind::TypeLiteral(_) => Err(at(bug("type used as a value"))),
        }
    }

    /// A variable, falling back to the built-in functions.
    fn lookup(&self, name: Name, span: Span) -> EvalResult {
        if let Some(value) = self.env.lookup(name) {
            return Ok(value);
        }
        let text = self.name(name);
        match lookup_builtin(text) {
            Some(builtin) => Ok(Value::Function(FunctionValue::Builtin(builtin))),
            None => Err(EvalError::new(
                EvalErrorKind::UnboundVariable {
                    name: text.to_owned(),
                },
                span,
            )),
        }
    }

    fn constant(&self, constant: Constant) -> Result<Value, EvalErrorKind> {
        Ok(match constant {
            Constant::Int(n) => Value::Int(n),
            Constant::Float(x) => Value::Float(x),
            Constant::Bool(b) => Value::Bool(b),
            Constant::Null => Value::Null,
            Constant::Str(text) => Value::string(self.name(text)),
            Constant::Date(text) => parse_date(self.name(text))
                .map(Value::Date)
                .ok_or_else(|| bug("unparsable date literal"))?,
            Constant::Duration(text) => IsoDuration::parse(self.name(text))
                .map(Value::Duration)
                .ok_or_else(|| bug("unparsable duration literal"))?,
        })
    }

    /// Plain or compound assignment, possibly through indices.
    ///
    /// Indices are evaluated before the right-hand side. Arrays along the
    /// path are copied on write, so other holders of the old array keep
    /// their values.
    fn assign(&mut self, op: OperatorId, target: ExprId, value: ExprId, span: Span) -> EvalResult {
        let mut path = IndexPath::new();
        let root = self.assignment_path(target, &mut path)?;
        let rhs = self.eval(value)?;
        let base = op.compound_base();
        match self
            .env
            .update(root, |slot| store(slot, &path, base, rhs, span))
        {
            Ok(result) => result,
            Err(AssignError::Immutable) => Err(EvalError::new(
                bug(format!("assignment to final {}", self.name(root))),
                span,
            )),
            Err(AssignError::Undefined) => Err(EvalError::new(
                EvalErrorKind::UnboundVariable {
                    name: self.name(root).to_owned(),
                },
                span,
            )),
        }
    }

    fn assignment_path(&mut self, target: ExprId, path: &mut IndexPath) -> EvalResult<Name> {
        let arena = self.arena;
        let expr = arena.get_expr(target);
        match &expr.kind {
            ExprKind::Ident(name) => Ok(*name),
            ExprKind::Index { receiver, index } => {
                let root = self.assignment_path(*receiver, path)?;
                let index = self.eval(*index)?;
                path.push((index, expr.span));
                Ok(root)
            }
            _ => Err(EvalError::new(bug("invalid assignment target"), expr.span)),
        }
    }

    fn call(&mut self, callee: ExprId, args: ExprRange, span: Span) -> EvalResult {
        let arena = self.arena;
        let callee_expr = arena.get_expr(callee);
        let (label, function) = match &callee_expr.kind {
            ExprKind::Ident(name) => {
                let label = self.name(*name);
                let function = self.lookup(*name, callee_expr.span).map_err(|err| {
                    match err.kind {
                        EvalErrorKind::UnboundVariable { name } => EvalError::new(
                            EvalErrorKind::UnresolvedMethod { name },
                            err.span,
                        ),
                        _ => err,
                    }
                })?;
                (label, function)
            }
            _ => ("function", self.eval(callee)?),
        };

        let arg_ids = arena.get_expr_list(args);
        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(arg_ids.len());
        for &arg in arg_ids {
            values.push(self.eval(arg)?);
        }

        let Value::Function(function) = function else {
            return Err(EvalError::new(
                EvalErrorKind::NotCallable {
                    ty: function.type_name(),
                },
                span,
            ));
        };
        match &function {
            FunctionValue::Builtin(name) => {
                call_builtin(*name, &values).map_err(|kind| EvalError::new(kind, span))
            }
            FunctionValue::Host(host) => host.call(&values).map_err(|message| {
                EvalError::new(
                    EvalErrorKind::HostFailure {
                        name: label.to_owned(),
                        message,
                    },
                    span,
                )
            }),
            FunctionValue::User(user) => self.call_user(user, &values, span),
        }
    }
}

/// Write `rhs` (or `slot op rhs` for compound assignment) at `path` below
/// `slot`, returning the stored value.
fn store(
    slot: &mut Value,
    path: &[(Value, Span)],
    base: Option<OperatorId>,
    rhs: Value,
    span: Span,
) -> EvalResult {
    match path.split_first() {
        None => {
            let value = match base {
                Some(op) => evaluate_binary(op, slot, &rhs).map_err(|kind| EvalError::new(kind, span))?,
                None => rhs,
            };
            *slot = value.clone();
            Ok(value)
        }
        Some(((index, index_span), rest)) => {
            let Value::Array(items) = slot else {
                return Err(EvalError::new(
                    not_indexable(slot, index),
                    *index_span,
                ));
            };
            let position =
                element_position(index, items.len()).map_err(|kind| EvalError::new(kind, *index_span))?;
            match Rc::make_mut(items).get_mut(position) {
                Some(element) => store(element, rest, base, rhs, span),
                None => Err(EvalError::new(bug("index checked against length"), *index_span)),
            }
        }
    }
}

fn index_value(receiver: &Value, index: &Value) -> Result<Value, EvalErrorKind> {
    let Value::Array(items) = receiver else {
        return Err(not_indexable(receiver, index));
    };
    let position = element_position(index, items.len())?;
    items
        .get(position)
        .cloned()
        .ok_or_else(|| bug("index checked against length"))
}

/// Position of `index` in an array of `length` elements.
fn element_position(index: &Value, length: usize) -> Result<usize, EvalErrorKind> {
    match index {
        Value::Int(n) => usize::try_from(*n)
            .ok()
            .filter(|&position| position < length)
            .ok_or(EvalErrorKind::OutOfRange { index: *n, length }),
        other => Err(EvalErrorKind::InvalidIndex {
            index: other.to_literal(),
        }),
    }
}

#[cold]
fn not_indexable(receiver: &Value, index: &Value) -> EvalErrorKind {
    EvalErrorKind::BinaryMismatch {
        op: OperatorId::Index.symbol(),
        left: receiver.type_name(),
        right: index.type_name(),
    }
}
