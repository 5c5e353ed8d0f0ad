//! Sandboxed leap-year rule expressions for Almagest calendars.
//!
//! A calendar file declares its leap-year rule as a string, e.g.
//! `"year % 4 == 0 and (year % 100 != 0 or year % 400 == 0)"`. This crate
//! compiles such a rule into a small AST at load time and evaluates it per
//! year. The language is deliberately tiny: integer literals, the single
//! variable `year`, `+ - * / %`, comparisons, and `and`/`or`/`not`. Nothing
//! else parses, so a calendar file can never run arbitrary code.

/// Expression AST and static type checking.
pub mod ast;
/// Interpreter over the compiled AST.
pub mod eval;
/// Tokenizer for rule source text.
pub mod lexer;
/// Recursive-descent parser producing the AST.
pub mod parser;

use std::fmt;

pub use ast::{BinaryOp, Expr, Ty, UnaryOp};
pub use lexer::Token;

/// Alias for `Result<T, RuleError>`.
pub type RuleResult<T> = Result<T, RuleError>;

/// Errors from compiling or evaluating a leap-year rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The source text failed to lex or parse.
    #[error("syntax error at {}..{}: {message}", span.start, span.end)]
    Syntax {
        /// Byte range of the offending input.
        span: std::ops::Range<usize>,
        /// Human-readable description of the problem.
        message: String,
    },

    /// The expression is well-formed but badly typed (e.g. `year + (year > 4)`).
    #[error("type error: {0}")]
    Type(String),

    /// Division or remainder by zero while evaluating for a specific year.
    #[error("division by zero while evaluating rule for year {year}")]
    DivisionByZero {
        /// The year being evaluated when the zero divisor appeared.
        year: i64,
    },

    /// Integer overflow while evaluating for a specific year.
    #[error("arithmetic overflow while evaluating rule for year {year}")]
    Overflow {
        /// The year being evaluated when the overflow occurred.
        year: i64,
    },
}

/// A compiled leap-year rule: a boolean expression over the variable `year`.
///
/// Compile once at calendar load time, then call [`LeapRule::evaluate`] for
/// each year of interest. Compilation rejects unknown identifiers, non-boolean
/// rules, and anything outside the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct LeapRule {
    source: String,
    expr: Expr,
}

impl LeapRule {
    /// Compile a rule from source text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Syntax`] for malformed input and
    /// [`RuleError::Type`] when the expression does not evaluate to a
    /// boolean (e.g. a bare `year % 4`).
    pub fn compile(source: &str) -> RuleResult<Self> {
        let expr = parser::parse(source)?;
        match expr.ty()? {
            Ty::Bool => Ok(Self {
                source: source.to_string(),
                expr,
            }),
            Ty::Int => Err(RuleError::Type(
                "leap-year rule must be a boolean expression, \
                 e.g. `year % 4 == 0`, not a bare number"
                    .to_string(),
            )),
        }
    }

    /// Evaluate the rule for a given year.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DivisionByZero`] or [`RuleError::Overflow`] when
    /// the arithmetic fails for this particular year. Type errors cannot
    /// occur here; they are caught by [`LeapRule::compile`].
    pub fn evaluate(&self, year: i64) -> RuleResult<bool> {
        match eval::eval(&self.expr, year)? {
            eval::Value::Bool(b) => Ok(b),
            eval::Value::Int(_) => Err(RuleError::Type(
                "rule evaluated to an integer despite type check".to_string(),
            )),
        }
    }

    /// The original source text of the rule.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for LeapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
