use std::fmt;

use logos::Logos;

use crate::{RuleError, RuleResult};

/// Byte range of a token in the rule source.
pub type Span = std::ops::Range<usize>;

/// Token type for rule expressions.
///
/// Words are not split into keywords here — `year`, `and`, `or` and `not`
/// all lex as [`Token::Word`] and the parser decides what they mean. Minus
/// is always its own token; negative literals are handled as unary negation
/// so that `year-4` lexes as three tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unsigned integer literal (supports `_` separators).
    Int(i64),
    /// Bare word: the variable `year` or a boolean connective.
    Word(String),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{n}"),
            Token::Word(w) => write!(f, "{w}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
        }
    }
}

/// Internal logos token — borrows from source, converted to owned `Token`
/// after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    Le,

    #[token(">")]
    Gt,

    #[token(">=")]
    Ge,

    #[regex(r"[0-9][0-9_]*")]
    Int,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
}

/// Lex rule source into a sequence of `(Token, Span)` pairs.
///
/// Unlike an IDE-facing lexer there is no error recovery: rules are one-line
/// configuration strings, so the first bad character fails the whole load.
///
/// # Errors
///
/// Returns [`RuleError::Syntax`] for unrecognized input or an integer
/// literal that does not fit in `i64`.
pub fn lex(source: &str) -> RuleResult<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = result.map_err(|()| RuleError::Syntax {
            span: span.clone(),
            message: format!("unrecognized input `{}`", lexer.slice()),
        })?;

        let token = match raw {
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::Slash => Token::Slash,
            RawToken::Percent => Token::Percent,
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::EqEq => Token::EqEq,
            RawToken::NotEq => Token::NotEq,
            RawToken::Lt => Token::Lt,
            RawToken::Le => Token::Le,
            RawToken::Gt => Token::Gt,
            RawToken::Ge => Token::Ge,
            RawToken::Int => {
                let digits = lexer.slice().replace('_', "");
                let value = digits.parse::<i64>().map_err(|_| RuleError::Syntax {
                    span: span.clone(),
                    message: format!("integer literal `{}` is out of range", lexer.slice()),
                })?;
                Token::Int(value)
            }
            RawToken::Word => Token::Word(lexer.slice().to_string()),
        };

        tokens.push((token, span));
    }

    Ok(tokens)
}
