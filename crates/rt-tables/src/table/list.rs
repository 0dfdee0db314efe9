//! Plain lists: one entry per line.

use std::collections::HashSet;

use rt_dice::{DiceExpr, DiceRoller};

use crate::config::RollConfig;
use crate::entry::content_lines;
use crate::error::TableResult;

/// Parse a plain list. Every content line is an entry.
pub(crate) fn parse(raw: &str) -> Vec<String> {
    content_lines(raw).map(|(_, line)| line.to_string()).collect()
}

/// Draw `count` entries.
pub(crate) fn select(
    items: &[String],
    config: &RollConfig,
    count: usize,
    dice: &mut DiceRoller,
) -> TableResult<Vec<String>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let indices = match config.active_formula() {
        Some(formula) => formula_indices(items.len(), formula, config, count, dice)?,
        None if config.exclusive => sample_without_replacement(items.len(), count, dice),
        None => (0..count).map(|_| dice.pick(items.len())).collect(),
    };

    Ok(indices.into_iter().map(|i| items[i].clone()).collect())
}

/// Each draw rolls the formula as a 1-based index; an unclamped roll of 0
/// wraps to the last entry. With `exclusive`, repeated
/// indices are dropped rather than re-rolled, so fewer than `count` indices
/// may come back.
fn formula_indices(
    len: usize,
    formula: &str,
    config: &RollConfig,
    count: usize,
    dice: &mut DiceRoller,
) -> TableResult<Vec<usize>> {
    let expr = DiceExpr::parse(formula)?;
    let last = len - 1;
    let mut seen = HashSet::new();
    let mut indices = Vec::with_capacity(count);

    for _ in 0..count {
        let rolled = dice.roll_expr(&expr);
        // Unclamped rolls were range-checked at load to lie in 0..=len.
        let index = if rolled == 0 && !config.clamp {
            last
        } else {
            usize::try_from(rolled.saturating_sub(1))
                .unwrap_or(0)
                .min(last)
        };
        if config.exclusive && !seen.insert(index) {
            continue;
        }
        indices.push(index);
    }

    Ok(indices)
}

/// Partial Fisher-Yates shuffle; returns `min(count, len)` distinct indices.
pub(crate) fn sample_without_replacement(
    len: usize,
    count: usize,
    dice: &mut DiceRoller,
) -> Vec<usize> {
    let take = count.min(len);
    let mut pool: Vec<usize> = (0..len).collect();
    for i in 0..take {
        let j = i + dice.pick(len - i);
        pool.swap(i, j);
    }
    pool.truncate(take);
    pool
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_skips_comments() {
        let parsed = parse("# header\nSword\n// note\n\nShield\n; trailing");
        assert_eq!(parsed, vec!["Sword", "Shield"]);
    }

    #[test]
    fn sampling_without_replacement_is_distinct() {
        let mut dice = DiceRoller::from_seed(3);
        let mut picked = sample_without_replacement(10, 10, &mut dice);
        picked.sort_unstable();
        assert_eq!(picked, (0..10).collect::<Vec<_>>());
        assert_eq!(sample_without_replacement(3, 8, &mut dice).len(), 3);
    }

    #[test]
    fn formula_picks_one_based_index() {
        let table = items(&["a", "b", "c"]);
        let config = RollConfig::default().with_formula("2");
        let mut dice = DiceRoller::from_seed(1);
        let results = select(&table, &config, 4, &mut dice).unwrap();
        assert_eq!(results, vec!["b", "b", "b", "b"]);
    }

    #[test]
    fn formula_roll_of_zero_wraps_to_last() {
        let table = items(&["a", "b", "c"]);
        let config = RollConfig::default().with_formula("0");
        let mut dice = DiceRoller::from_seed(1);
        assert_eq!(select(&table, &config, 1, &mut dice).unwrap(), vec!["c"]);
        let clamped = config.with_clamp(true);
        assert_eq!(select(&table, &clamped, 1, &mut dice).unwrap(), vec!["a"]);
    }

    #[test]
    fn zero_based_formula_reaches_every_entry() {
        let table = items(&["a", "b"]);
        let config = RollConfig::default().with_formula("d2-1");
        let mut dice = DiceRoller::from_seed(8);
        let draws = 2_000;
        let results = select(&table, &config, draws, &mut dice).unwrap();
        let b = results.iter().filter(|r| *r == "b").count() as f64 / draws as f64;
        assert!((b - 0.5).abs() < 0.05, "b frequency was {b}");
    }

    #[test]
    fn uniform_draws_return_count_members() {
        let table = items(&["a", "b", "c", "d"]);
        let mut dice = DiceRoller::from_seed(12);
        let results = select(&table, &RollConfig::default(), 25, &mut dice).unwrap();
        assert_eq!(results.len(), 25);
        assert!(results.iter().all(|r| table.contains(r)));
    }

    #[test]
    fn clamp_forces_index_into_range() {
        let table = items(&["a", "b", "c"]);
        let mut dice = DiceRoller::from_seed(1);
        let high = RollConfig::default().with_formula("10").with_clamp(true);
        assert_eq!(select(&table, &high, 2, &mut dice).unwrap(), vec!["c", "c"]);
        let low = RollConfig::default().with_formula("-4").with_clamp(true);
        assert_eq!(select(&table, &low, 1, &mut dice).unwrap(), vec!["a"]);
    }

    #[test]
    fn exclusive_formula_does_not_resample() {
        let table = items(&["a", "b", "c"]);
        let config = RollConfig::default()
            .with_formula("3")
            .with_exclusive(true);
        let mut dice = DiceRoller::from_seed(1);
        assert_eq!(select(&table, &config, 3, &mut dice).unwrap(), vec!["c"]);
    }

    #[test]
    fn empty_table_yields_nothing() {
        let mut dice = DiceRoller::from_seed(1);
        let results = select(&[], &RollConfig::default(), 5, &mut dice).unwrap();
        assert!(results.is_empty());
    }

    proptest! {
        #[test]
        fn samples_are_distinct_and_capped(len in 1usize..40, count in 0usize..60, seed: u64) {
            let mut dice = DiceRoller::from_seed(seed);
            let picked = sample_without_replacement(len, count, &mut dice);
            prop_assert_eq!(picked.len(), count.min(len));
            let unique: HashSet<_> = picked.iter().collect();
            prop_assert_eq!(unique.len(), picked.len());
            prop_assert!(picked.iter().all(|&i| i < len));
        }

        #[test]
        fn uniform_draws_are_members(len in 1usize..20, count in 0usize..50, seed: u64) {
            let table: Vec<String> = (0..len).map(|i| format!("entry {i}")).collect();
            let mut dice = DiceRoller::from_seed(seed);
            let results = select(&table, &RollConfig::default(), count, &mut dice).unwrap();
            prop_assert_eq!(results.len(), count);
            prop_assert!(results.iter().all(|r| table.contains(r)));
        }

        #[test]
        fn clamped_formula_results_stay_in_table(formula in "[1-3]?d(4|20|100)([+-][0-9]{1,2})?", seed: u64) {
            let table = items(&["a", "b", "c", "d", "e"]);
            let config = RollConfig::default().with_formula(formula).with_clamp(true);
            let mut dice = DiceRoller::from_seed(seed);
            let results = select(&table, &config, 10, &mut dice).unwrap();
            prop_assert_eq!(results.len(), 10);
            prop_assert!(results.iter().all(|r| table.contains(r)));
        }
    }
}
