//! Roll and resolver configuration.

/// How a table is rolled.
///
/// A table owns one configuration for its whole life. Inline references
/// retarget a cached table by replacing the configuration, which is validated
/// against the table before it takes effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollConfig {
    /// Dice expression for the number of results (`"1"` by default).
    pub count: String,
    /// Sample without replacement.
    pub exclusive: bool,
    /// Force out-of-range formula rolls into range instead of rejecting them.
    pub clamp: bool,
    /// Selection formula used instead of a uniform pick.
    pub formula: Option<String>,
    /// Hexflower start hex, overriding the navigator's default.
    pub start: Option<u32>,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            count: "1".to_string(),
            exclusive: false,
            clamp: false,
            formula: None,
            start: None,
        }
    }
}

impl RollConfig {
    /// Set the count expression.
    pub fn with_count(mut self, count: impl Into<String>) -> Self {
        self.count = count.into();
        self
    }

    /// Set the exclusive flag.
    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Set the clamp flag.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Set the selection formula. An empty formula clears it.
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.apply(RollOption::Formula(Some(formula.into())));
        self
    }

    /// Set the hexflower start hex.
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// The selection formula, if one is set and non-blank.
    pub fn active_formula(&self) -> Option<&str> {
        self.formula
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Apply a single option override.
    pub fn apply(&mut self, option: RollOption) {
        match option {
            RollOption::Count(count) => self.count = count,
            RollOption::Exclusive(exclusive) => self.exclusive = exclusive,
            RollOption::Clamp(clamp) => self.clamp = clamp,
            RollOption::Formula(formula) => {
                self.formula = formula.filter(|f| !f.trim().is_empty());
            }
            RollOption::Start(start) => self.start = start,
        }
    }
}

/// A single override of one [`RollConfig`] field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOption {
    /// Replace the count expression.
    Count(String),
    /// Replace the exclusive flag.
    Exclusive(bool),
    /// Replace the clamp flag.
    Clamp(bool),
    /// Replace or clear the selection formula.
    Formula(Option<String>),
    /// Replace or clear the hexflower start hex.
    Start(Option<u32>),
}

/// Configuration for one top-level roll request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// RNG seed for reproducible results. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Maximum nesting depth for inline references. `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl ResolverConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Limit how deeply inline references may nest.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}
