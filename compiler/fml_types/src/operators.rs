//! Operator typing rules.
//!
//! For every operator the registry knows, these functions decide which
//! operand types it accepts and what it produces. Results are always
//! final: an operator yields a temporary, never a slot.
//!
//! Commutative operators are retried with swapped operands, so a rule only
//! has to be written for one operand order (`duration * int` also covers
//! `int * duration`, `array + scalar` also covers `scalar + array`).

use fml_ir::OperatorId;

use crate::{Type, TypeKind};

/// Result type of `left op right`, or `None` if the operator is not defined
/// for these operands.
pub fn binary_result(op: OperatorId, left: &Type, right: &Type) -> Option<Type> {
    direct(op, left, right).or_else(|| {
        if op.is_commutative() {
            direct(op, right, left)
        } else {
            None
        }
    })
}

/// Result type of a prefix operator.
pub fn unary_result(op: OperatorId, operand: &Type) -> Option<Type> {
    if operand.is_void() {
        return None;
    }
    match op {
        OperatorId::Not => Some(Type::boolean()),
        OperatorId::Neg => match &operand.kind {
            TypeKind::Int | TypeKind::Float | TypeKind::Duration | TypeKind::Mixed => {
                Some(operand.clone().with_final(true))
            }
            TypeKind::Array { element, len } => {
                let element = unary_result(op, element)?;
                Some(Type::array(element, *len))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Right operand types `op` accepts with `left` on its left, among the
/// scalar types (and `left` itself when it is an array).
pub fn compatible_operand_types(op: OperatorId, left: &Type) -> Vec<Type> {
    let mut candidates = vec![
        Type::int(),
        Type::float(),
        Type::boolean(),
        Type::string(),
        Type::null(),
        Type::date(),
        Type::duration(),
        Type::mixed(),
    ];
    if matches!(left.kind, TypeKind::Array { .. }) {
        candidates.push(left.clone().with_final(true));
    }
    candidates
        .into_iter()
        .filter(|candidate| binary_result(op, left, candidate).is_some())
        .collect()
}

fn direct(op: OperatorId, left: &Type, right: &Type) -> Option<Type> {
    if left.is_void() || right.is_void() {
        return None;
    }
    match op {
        OperatorId::Add
        | OperatorId::Sub
        | OperatorId::Mul
        | OperatorId::Div
        | OperatorId::Mod => arithmetic(op, left, right),
        OperatorId::And | OperatorId::Or | OperatorId::Xor => Some(Type::boolean()),
        OperatorId::Eq | OperatorId::NotEq => {
            let comparable = left.assignable_by(right)
                || right.assignable_by(left)
                || left.kind == TypeKind::Null
                || right.kind == TypeKind::Null;
            comparable.then(Type::boolean)
        }
        OperatorId::Lt | OperatorId::Gt | OperatorId::LtEq | OperatorId::GtEq => {
            ordered(left, right).then(Type::boolean)
        }
        OperatorId::TypeCast => match &right.kind {
            TypeKind::TypeLiteral(target) if left.castable_to(target) => {
                Some(target.as_ref().clone().with_final(true))
            }
            _ => None,
        },
        OperatorId::Index => match (&left.kind, &right.kind) {
            (TypeKind::Array { element, .. }, TypeKind::Int | TypeKind::Mixed) => {
                Some(element.as_ref().clone().with_final(left.is_final))
            }
            (TypeKind::Mixed, TypeKind::Int | TypeKind::Mixed) => {
                Some(Type::mixed().with_final(left.is_final))
            }
            _ => None,
        },
        OperatorId::Assign => left
            .assignable_by(right)
            .then(|| left.clone().with_final(true)),
        OperatorId::AddAssign
        | OperatorId::SubAssign
        | OperatorId::MulAssign
        | OperatorId::DivAssign => {
            let base = op.compound_base()?;
            let combined = binary_result(base, left, right)?;
            left.assignable_by(&combined)
                .then(|| left.clone().with_final(true))
        }
        OperatorId::Not | OperatorId::Neg | OperatorId::Call => None,
    }
}

fn arithmetic(op: OperatorId, left: &Type, right: &Type) -> Option<Type> {
    use TypeKind as K;

    let kind = match (&left.kind, &right.kind) {
        (K::Mixed, _) | (_, K::Mixed) => K::Mixed,
        (K::Int, K::Int) => {
            if op == OperatorId::Div {
                K::Float
            } else {
                K::Int
            }
        }
        (K::Int | K::Float, K::Int | K::Float) => K::Float,
        (K::String, K::String) if op == OperatorId::Add => K::String,
        (K::Date, K::Duration) if matches!(op, OperatorId::Add | OperatorId::Sub) => K::Date,
        (K::Date, K::Date) if op == OperatorId::Sub => K::Duration,
        (K::Duration, K::Duration) if matches!(op, OperatorId::Add | OperatorId::Sub) => {
            K::Duration
        }
        (K::Duration, K::Int) if op == OperatorId::Mul => K::Duration,
        (
            K::Array {
                element: a,
                len: la,
            },
            K::Array {
                element: b,
                len: lb,
            },
        ) => {
            if let (Some(la), Some(lb)) = (la, lb) {
                if la != lb {
                    return None;
                }
            }
            let element = binary_result(op, a, b)?;
            return Some(Type::array(element, la.or(*lb)));
        }
        (K::Array { element, len }, _) => {
            let element = binary_result(op, element, right)?;
            return Some(Type::array(element, *len));
        }
        _ => return None,
    };
    Some(Type::new(kind))
}

fn ordered(left: &Type, right: &Type) -> bool {
    use TypeKind as K;

    matches!(
        (&left.kind, &right.kind),
        (K::Mixed, _)
            | (_, K::Mixed)
            | (K::Int | K::Float, K::Int | K::Float)
            | (K::String, K::String)
            | (K::Boolean, K::Boolean)
            | (K::Date, K::Date)
            | (K::Duration, K::Duration)
    )
}

#[cfg(test)]
mod tests;
