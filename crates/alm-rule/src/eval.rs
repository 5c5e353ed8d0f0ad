use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::{RuleError, RuleResult};

/// A runtime value: rule expressions only ever hold integers or booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

/// Evaluate an expression with `year` bound to the given value.
///
/// All arithmetic is checked `i64`; `and`/`or` short-circuit, matching the
/// connective semantics rule authors expect.
///
/// # Errors
///
/// Returns [`RuleError::DivisionByZero`] or [`RuleError::Overflow`] for
/// arithmetic failures, and [`RuleError::Type`] only for expressions that
/// bypassed the static check in [`Expr::ty`].
pub fn eval(expr: &Expr, year: i64) -> RuleResult<Value> {
    match expr {
        Expr::Int(value) => Ok(Value::Int(*value)),
        Expr::Year => Ok(Value::Int(year)),
        Expr::Unary { op: UnaryOp::Neg, expr } => {
            let value = int(eval(expr, year)?)?;
            value
                .checked_neg()
                .map(Value::Int)
                .ok_or(RuleError::Overflow { year })
        }
        Expr::Unary { op: UnaryOp::Not, expr } => {
            let value = boolean(eval(expr, year)?)?;
            Ok(Value::Bool(!value))
        }
        Expr::Binary { op: BinaryOp::And, lhs, rhs } => {
            if boolean(eval(lhs, year)?)? {
                eval(rhs, year)
            } else {
                Ok(Value::Bool(false))
            }
        }
        Expr::Binary { op: BinaryOp::Or, lhs, rhs } => {
            if boolean(eval(lhs, year)?)? {
                Ok(Value::Bool(true))
            } else {
                eval(rhs, year)
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = int(eval(lhs, year)?)?;
            let rhs = int(eval(rhs, year)?)?;
            apply(*op, lhs, rhs, year)
        }
    }
}

fn apply(op: BinaryOp, lhs: i64, rhs: i64, year: i64) -> RuleResult<Value> {
    let arith = |result: Option<i64>| {
        result.map(Value::Int).ok_or(RuleError::Overflow { year })
    };
    match op {
        BinaryOp::Add => arith(lhs.checked_add(rhs)),
        BinaryOp::Sub => arith(lhs.checked_sub(rhs)),
        BinaryOp::Mul => arith(lhs.checked_mul(rhs)),
        BinaryOp::Div => {
            if rhs == 0 {
                Err(RuleError::DivisionByZero { year })
            } else {
                arith(lhs.checked_div(rhs))
            }
        }
        BinaryOp::Rem => {
            if rhs == 0 {
                Err(RuleError::DivisionByZero { year })
            } else {
                arith(lhs.checked_rem(rhs))
            }
        }
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::Ne => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::Lt => Ok(Value::Bool(lhs < rhs)),
        BinaryOp::Le => Ok(Value::Bool(lhs <= rhs)),
        BinaryOp::Gt => Ok(Value::Bool(lhs > rhs)),
        BinaryOp::Ge => Ok(Value::Bool(lhs >= rhs)),
        BinaryOp::And | BinaryOp::Or => Err(RuleError::Type(
            "connectives are handled before apply".to_string(),
        )),
    }
}

fn int(value: Value) -> RuleResult<i64> {
    match value {
        Value::Int(n) => Ok(n),
        Value::Bool(_) => Err(RuleError::Type(
            "expected an integer at evaluation time".to_string(),
        )),
    }
}

fn boolean(value: Value) -> RuleResult<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Int(_) => Err(RuleError::Type(
            "expected a boolean at evaluation time".to_string(),
        )),
    }
}
