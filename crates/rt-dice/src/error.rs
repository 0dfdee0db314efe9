//! Error types for dice expressions.

/// Errors that can occur while parsing or evaluating a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// The expression was empty or only whitespace.
    #[error("empty dice expression")]
    Empty,

    /// The lexer hit a character that is not part of the dice grammar.
    #[error("unexpected character {found:?} at offset {offset} in '{expr}'")]
    UnexpectedCharacter {
        /// The full expression being parsed.
        expr: String,
        /// The offending text.
        found: String,
        /// Byte offset of the offending text.
        offset: usize,
    },

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected '{found}' at offset {offset} in '{expr}'")]
    UnexpectedToken {
        /// The full expression being parsed.
        expr: String,
        /// The offending token.
        found: String,
        /// Byte offset of the offending token.
        offset: usize,
    },

    /// The expression ended before a complete term was read.
    #[error("unexpected end of dice expression '{0}'")]
    UnexpectedEnd(String),

    /// A die with zero sides, or a dice count that does not fit.
    #[error("invalid die: {0}")]
    InvalidDie(String),

    /// A numeric literal does not fit in 64 bits.
    #[error("number too large: {0}")]
    NumberTooLarge(String),

    /// A divisor can evaluate to zero.
    #[error("division by zero possible in '{0}'")]
    DivisionByZero(String),

    /// The expression's range does not fit in 64 bits.
    #[error("arithmetic overflow in '{0}'")]
    Overflow(String),
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;
