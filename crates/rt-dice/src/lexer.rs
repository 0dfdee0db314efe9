//! Tokenizer for dice expressions.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::{DiceError, DiceResult};

/// Token type for dice expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Non-negative integer literal.
    Number(i64),
    /// The die separator `d` (either case).
    Die,
    /// Percentile sides `%` (as in `d%`).
    Percent,
    /// Keep-highest modifier `h` / `kh`.
    KeepHighest,
    /// Keep-lowest modifier `l` / `kl`.
    KeepLowest,
    /// Total modifier `t`, accepted and ignored.
    Total,
    /// Addition `+`.
    Plus,
    /// Subtraction or negation `-`.
    Minus,
    /// Multiplication `*`.
    Star,
    /// Floor division `/`.
    Slash,
    /// Left parenthesis `(`.
    LParen,
    /// Right parenthesis `)`.
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Die => write!(f, "d"),
            Token::Percent => write!(f, "%"),
            Token::KeepHighest => write!(f, "h"),
            Token::KeepLowest => write!(f, "l"),
            Token::Total => write!(f, "t"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Internal logos token, converted to `Token` after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex("[0-9]+")]
    Number,

    #[regex("[dD]")]
    Die,

    #[token("%")]
    Percent,

    #[regex("[kK]?[hH]")]
    KeepHighest,

    #[regex("[kK]?[lL]")]
    KeepLowest,

    #[regex("[tT]")]
    Total,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

/// Lex a dice expression into `(Token, Span)` pairs.
///
/// Stops at the first unrecognised character.
pub fn lex(source: &str) -> DiceResult<Vec<(Token, Range<usize>)>> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = result.map_err(|()| DiceError::UnexpectedCharacter {
            expr: source.to_string(),
            found: source[span.clone()].to_string(),
            offset: span.start,
        })?;
        let token = match raw {
            RawToken::Number => {
                let text = lexer.slice();
                let value = text
                    .parse::<i64>()
                    .map_err(|_| DiceError::NumberTooLarge(text.to_string()))?;
                Token::Number(value)
            }
            RawToken::Die => Token::Die,
            RawToken::Percent => Token::Percent,
            RawToken::KeepHighest => Token::KeepHighest,
            RawToken::KeepLowest => Token::KeepLowest,
            RawToken::Total => Token::Total,
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::Slash => Token::Slash,
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
        };
        tokens.push((token, span));
    }

    Ok(tokens)
}
