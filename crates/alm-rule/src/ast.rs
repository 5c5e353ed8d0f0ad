use crate::{RuleError, RuleResult};

/// Binary operators, grouped by the type discipline they impose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (truncating integer division)
    Div,
    /// `%` (remainder matching `/`)
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOp {
    /// True for `+ - * / %`: int operands, int result.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    /// True for the comparison operators: int operands, bool result.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Boolean `not`.
    Not,
}

/// A compiled rule expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal.
    Int(i64),
    /// The bound variable `year`.
    Year,
    /// Unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        expr: Box<Expr>,
    },
    /// Binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

/// The two types a rule expression can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    /// Integer.
    Int,
    /// Boolean.
    Bool,
}

impl Ty {
    fn name(self) -> &'static str {
        match self {
            Ty::Int => "an integer",
            Ty::Bool => "a boolean",
        }
    }
}

impl Expr {
    /// Infer the type of this expression, rejecting mixed-type operations.
    ///
    /// The grammar has no branching, so a single bottom-up pass decides the
    /// type for every possible `year` — a rule that type-checks here can
    /// never hit a type error during evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Type`] when an operator is applied to operands
    /// of the wrong type.
    pub fn ty(&self) -> RuleResult<Ty> {
        match self {
            Expr::Int(_) | Expr::Year => Ok(Ty::Int),
            Expr::Unary { op: UnaryOp::Neg, expr } => expect(expr, Ty::Int, "unary `-`"),
            Expr::Unary { op: UnaryOp::Not, expr } => expect(expr, Ty::Bool, "`not`"),
            Expr::Binary { op, lhs, rhs } if op.is_arithmetic() => {
                expect(lhs, Ty::Int, "arithmetic")?;
                expect(rhs, Ty::Int, "arithmetic")
            }
            Expr::Binary { op, lhs, rhs } if op.is_comparison() => {
                expect(lhs, Ty::Int, "comparison")?;
                expect(rhs, Ty::Int, "comparison")?;
                Ok(Ty::Bool)
            }
            Expr::Binary { lhs, rhs, .. } => {
                expect(lhs, Ty::Bool, "`and`/`or`")?;
                expect(rhs, Ty::Bool, "`and`/`or`")
            }
        }
    }
}

fn expect(expr: &Expr, want: Ty, context: &str) -> RuleResult<Ty> {
    let got = expr.ty()?;
    if got == want {
        Ok(want)
    } else {
        Err(RuleError::Type(format!(
            "{context} expects {}, got {}",
            want.name(),
            got.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_and_year_are_int() {
        assert_eq!(Expr::Int(4).ty().unwrap(), Ty::Int);
        assert_eq!(Expr::Year.ty().unwrap(), Ty::Int);
    }

    #[test]
    fn comparison_of_ints_is_bool() {
        let expr = Expr::Binary {
            op: BinaryOp::Eq,
            lhs: Box::new(Expr::Year),
            rhs: Box::new(Expr::Int(0)),
        };
        assert_eq!(expr.ty().unwrap(), Ty::Bool);
    }

    #[test]
    fn and_of_ints_is_rejected() {
        let expr = Expr::Binary {
            op: BinaryOp::And,
            lhs: Box::new(Expr::Year),
            rhs: Box::new(Expr::Int(1)),
        };
        assert!(matches!(expr.ty(), Err(RuleError::Type(_))));
    }

    #[test]
    fn not_of_int_is_rejected() {
        let expr = Expr::Unary {
            op: UnaryOp::Not,
            expr: Box::new(Expr::Year),
        };
        assert!(matches!(expr.ty(), Err(RuleError::Type(_))));
    }
}
