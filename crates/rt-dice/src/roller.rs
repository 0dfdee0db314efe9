//! The seedable random source shared by a whole roll request.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::DiceResult;
use crate::expr::DiceExpr;

/// Rolls dice expressions and draws uniform picks from one RNG.
///
/// Every random decision made while resolving a request goes through the same
/// roller, so seeding it reproduces the request exactly.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    rng: StdRng,
}

impl DiceRoller {
    /// Create a roller with a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a roller seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a roller from an optional seed.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Parse and roll a dice formula.
    pub fn roll(&mut self, formula: &str) -> DiceResult<i64> {
        let expr = DiceExpr::parse(formula)?;
        Ok(self.roll_expr(&expr))
    }

    /// Roll an already parsed expression.
    pub fn roll_expr(&mut self, expr: &DiceExpr) -> i64 {
        expr.roll(&mut self.rng)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Uniform value in `1..=high`. `high` must be non-zero.
    pub fn pick_position(&mut self, high: u64) -> u64 {
        self.rng.random_range(1..=high)
    }
}
