//! Single dice and groups of identical dice.

use std::fmt;
use std::num::NonZeroU32;

use rand::Rng;
use rand::rngs::StdRng;

/// A die with at least one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Die(NonZeroU32);

impl Die {
    /// The percentile die, written `d%`.
    pub const PERCENTILE: Die = Die(NonZeroU32::MIN.saturating_add(99));

    /// A die with `sides` sides, or `None` for zero.
    pub fn new(sides: u32) -> Option<Self> {
        NonZeroU32::new(sides).map(Self)
    }

    /// Number of sides.
    pub fn sides(self) -> u32 {
        self.0.get()
    }

    /// Roll once: a value in `1..=sides`.
    pub fn roll(self, rng: &mut StdRng) -> u32 {
        rng.random_range(1..=self.sides())
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Which dice of a group count toward its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// Sum every die.
    All,
    /// Sum the N highest dice.
    Highest(u32),
    /// Sum the N lowest dice.
    Lowest(u32),
}

impl Keep {
    /// How many of `count` dice are kept.
    pub fn kept_of(self, count: u32) -> u32 {
        match self {
            Self::All => count,
            Self::Highest(k) | Self::Lowest(k) => k.min(count),
        }
    }
}

/// Every value rolled for one `NdS` term, in roll order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    values: Vec<u32>,
    keep: Keep,
}

impl DiceRoll {
    /// Roll `count` copies of `die`.
    pub fn roll(count: u32, die: Die, keep: Keep, rng: &mut StdRng) -> Self {
        let values = (0..count).map(|_| die.roll(rng)).collect();
        Self { values, keep }
    }

    /// The raw values in roll order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// The values that count, sorted ascending.
    pub fn kept(&self) -> Vec<u32> {
        let mut sorted = self.values.clone();
        sorted.sort_unstable();
        let kept = self.keep.kept_of(u32::try_from(sorted.len()).unwrap_or(u32::MAX)) as usize;
        match self.keep {
            Keep::All => sorted,
            Keep::Highest(_) => sorted.split_off(sorted.len() - kept),
            Keep::Lowest(_) => {
                sorted.truncate(kept);
                sorted
            }
        }
    }

    /// Sum of the kept values.
    pub fn total(&self) -> u64 {
        self.kept().into_iter().map(u64::from).sum()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}
