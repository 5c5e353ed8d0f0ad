use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::lexer::{self, Span, Token};
use crate::{RuleError, RuleResult};

/// Parse rule source text into an expression.
///
/// Grammar, lowest to highest precedence:
///
/// ```text
/// rule    := or
/// or      := and ( "or" and )*
/// and     := cmp ( "and" cmp )*
/// cmp     := sum ( ("==" | "!=" | "<" | "<=" | ">" | ">=") sum )?
/// sum     := term ( ("+" | "-") term )*
/// term    := unary ( ("*" | "/" | "%") unary )*
/// unary   := "-" unary | "not" unary | primary
/// primary := integer | "year" | "(" or ")"
/// ```
///
/// Comparisons do not chain (`1 < year < 10` is a syntax error); write
/// `1 < year and year < 10` instead.
///
/// # Errors
///
/// Returns [`RuleError::Syntax`] with a byte span for any input outside the
/// grammar, including identifiers other than `year`.
pub fn parse(source: &str) -> RuleResult<Expr> {
    let tokens = lexer::lex(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };
    let expr = parser.or_expr()?;
    parser.expect_end()?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<(Token, Span)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn here(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.clone())
            .unwrap_or(self.end..self.end)
    }

    fn error(&self, message: impl Into<String>) -> RuleError {
        RuleError::Syntax {
            span: self.here(),
            message: message.into(),
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(Token::Word(w)) if w == word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_end(&self) -> RuleResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.error(format!("unexpected `{token}` after expression"))),
        }
    }

    fn or_expr(&mut self) -> RuleResult<Expr> {
        let mut lhs = self.and_expr()?;
        while self.eat_word("or") {
            let rhs = self.and_expr()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> RuleResult<Expr> {
        let mut lhs = self.cmp_expr()?;
        while self.eat_word("and") {
            let rhs = self.cmp_expr()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn cmp_expr(&mut self) -> RuleResult<Expr> {
        let lhs = self.sum_expr()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::Ne,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.sum_expr()?;
        Ok(binary(op, lhs, rhs))
    }

    fn sum_expr(&mut self) -> RuleResult<Expr> {
        let mut lhs = self.term_expr()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term_expr()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn term_expr(&mut self) -> RuleResult<Expr> {
        let mut lhs = self.unary_expr()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary_expr()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn unary_expr(&mut self) -> RuleResult<Expr> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.pos += 1;
            let expr = self.unary_expr()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(expr),
            });
        }
        if self.eat_word("not") {
            let expr = self.unary_expr()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(expr),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> RuleResult<Expr> {
        let span = self.here();
        match self.bump() {
            Some((Token::Int(value), _)) => Ok(Expr::Int(value)),
            Some((Token::Word(word), span)) => {
                if word == "year" {
                    Ok(Expr::Year)
                } else {
                    Err(RuleError::Syntax {
                        span,
                        message: format!(
                            "unknown identifier `{word}`; only `year` is available"
                        ),
                    })
                }
            }
            Some((Token::LParen, _)) => {
                let expr = self.or_expr()?;
                match self.bump() {
                    Some((Token::RParen, _)) => Ok(expr),
                    _ => Err(self.error("expected `)`")),
                }
            }
            Some((token, span)) => Err(RuleError::Syntax {
                span,
                message: format!("expected a number, `year`, or `(`, found `{token}`"),
            }),
            None => Err(RuleError::Syntax {
                span,
                message: "unexpected end of rule".to_string(),
            }),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_mul_over_add() {
        let expr = parse("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOp::Add,
                Expr::Int(1),
                binary(BinaryOp::Mul, Expr::Int(2), Expr::Int(3)),
            )
        );
    }

    #[test]
    fn precedence_and_over_or() {
        // a or b and c  parses as  a or (b and c)
        let expr = parse("year == 1 or year == 2 and year == 3").unwrap();
        let Expr::Binary { op: BinaryOp::Or, rhs, .. } = expr else {
            panic!("expected top-level or");
        };
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn parens_override_precedence() {
        let expr = parse("(1 + 2) * 3").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOp::Mul,
                binary(BinaryOp::Add, Expr::Int(1), Expr::Int(2)),
                Expr::Int(3),
            )
        );
    }

    #[test]
    fn unary_minus_binds_tighter_than_subtraction() {
        let expr = parse("--4 - 1").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOp::Sub,
                Expr::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(Expr::Unary {
                        op: UnaryOp::Neg,
                        expr: Box::new(Expr::Int(4)),
                    }),
                },
                Expr::Int(1),
            )
        );
    }

    #[test]
    fn chained_comparison_is_rejected() {
        assert!(matches!(
            parse("1 < year < 10"),
            Err(RuleError::Syntax { .. })
        ));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(matches!(
            parse("year == 4 4"),
            Err(RuleError::Syntax { .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse(""), Err(RuleError::Syntax { .. })));
        assert!(matches!(parse("("), Err(RuleError::Syntax { .. })));
    }

    #[test]
    fn missing_close_paren() {
        assert!(matches!(
            parse("(year == 4"),
            Err(RuleError::Syntax { .. })
        ));
    }
}
