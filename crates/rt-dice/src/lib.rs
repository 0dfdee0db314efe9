//! Dice expressions for rolltable.
//!
//! Parses formulas such as `2d6+1`, `d%`, or `4d6kh3`, rolls them, and
//! reports their exact minimum and maximum without rolling. The table engine
//! only talks to dice through [`DiceRoller::roll`], [`roll_min`], and
//! [`roll_max`].

pub mod dice;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod roller;

pub use dice::{DiceRoll, Die, Keep};
pub use error::{DiceError, DiceResult};
pub use expr::DiceExpr;
pub use roller::DiceRoller;

/// The smallest value `formula` can roll.
pub fn roll_min(formula: &str) -> DiceResult<i64> {
    Ok(DiceExpr::parse(formula)?.min())
}

/// The largest value `formula` can roll.
pub fn roll_max(formula: &str) -> DiceResult<i64> {
    Ok(DiceExpr::parse(formula)?.max())
}
