//! Weighted and numbered lists.
//!
//! Both formats reduce to entries with integer weights. A pick draws a
//! position in `1..=total_weight` and walks the cumulative weights until it
//! reaches the entry covering that position.

use std::collections::HashSet;

use rt_dice::{DiceExpr, DiceRoller};

use crate::config::RollConfig;
use crate::entry::{NumberedEntry, Weighted, WeightedEntry, content_lines};
use crate::error::{TableError, TableResult};
use crate::format::TableFormat;

/// Parse `<weight>\t<text>` lines.
///
/// A line whose first field is not a number is taken as text with weight 1.
/// A line holding only a number is an entry with empty text.
pub(crate) fn parse_weighted(raw: &str) -> TableResult<Vec<WeightedEntry>> {
    content_lines(raw)
        .map(|(number, line)| {
            let mut fields = line.split('\t');
            let first = fields.next().unwrap_or_default().trim();
            if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
                return Ok(WeightedEntry {
                    text: line.to_string(),
                    weight: 1,
                });
            }
            let weight = match first.parse::<u64>() {
                Ok(weight) if weight > 0 => weight,
                _ => {
                    return Err(TableError::invalid(
                        TableFormat::WeightedList,
                        format!("line {number}: weight '{first}' must be a positive integer"),
                    ));
                }
            };
            let text = fields
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(WeightedEntry { text, weight })
        })
        .collect()
}

/// Parse `<low>-<high>\t<text>` or `<n>\t<text>` lines.
pub(crate) fn parse_numbered(raw: &str) -> TableResult<Vec<NumberedEntry>> {
    content_lines(raw)
        .map(|(number, line)| {
            let invalid = |reason: String| {
                TableError::invalid(TableFormat::NumberedList, format!("line {number}: {reason}"))
            };
            let fields: Vec<&str> = line.split('\t').collect();
            let [range, text] = fields.as_slice() else {
                return Err(invalid(format!(
                    "expected '<low>-<high>\\t<text>', got '{line}'"
                )));
            };
            let range = range.trim();
            let parse_bound = |bound: &str| {
                bound
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("'{range}' is not a number or range")))
            };
            let (low, high) = match range.split_once('-') {
                Some((low, high)) => (parse_bound(low)?, parse_bound(high)?),
                None => {
                    let n = parse_bound(range)?;
                    (n, n)
                }
            };
            if high < low {
                return Err(invalid(format!("range '{range}' runs backwards")));
            }
            if (high - low).checked_add(1).is_none() {
                return Err(invalid(format!("range '{range}' is too wide")));
            }
            Ok(NumberedEntry {
                text: text.trim().to_string(),
                low,
                high,
            })
        })
        .collect()
}

/// Sum of all weights, saturating.
pub(crate) fn total_weight<E: Weighted>(entries: &[E]) -> u64 {
    entries
        .iter()
        .fold(0u64, |sum, entry| sum.saturating_add(entry.weight()))
}

/// Draw `count` entries by weight.
pub(crate) fn select<E: Weighted>(
    entries: &[E],
    config: &RollConfig,
    count: usize,
    dice: &mut DiceRoller,
) -> TableResult<Vec<String>> {
    let total = total_weight(entries);
    if total == 0 {
        return Ok(Vec::new());
    }

    let indices = match config.active_formula() {
        Some(formula) => formula_indices(entries, total, formula, config, count, dice)?,
        None if config.exclusive => sample_multiset(entries, total, count, dice),
        None => (0..count)
            .map(|_| entry_at(entries, dice.pick_position(total)))
            .collect(),
    };

    Ok(indices
        .into_iter()
        .map(|i| entries[i].text().to_string())
        .collect())
}

/// Index of the entry covering cumulative `position` (1-based).
fn entry_at<E: Weighted>(entries: &[E], position: u64) -> usize {
    let mut covered = 0u64;
    for (index, entry) in entries.iter().enumerate() {
        covered = covered.saturating_add(entry.weight());
        if position <= covered {
            return index;
        }
    }
    entries.len().saturating_sub(1)
}

fn formula_indices<E: Weighted>(
    entries: &[E],
    total: u64,
    formula: &str,
    config: &RollConfig,
    count: usize,
    dice: &mut DiceRoller,
) -> TableResult<Vec<usize>> {
    let expr = DiceExpr::parse(formula)?;
    let mut seen = HashSet::new();
    let mut indices = Vec::with_capacity(count);
    for _ in 0..count {
        let rolled = dice.roll_expr(&expr);
        // An unclamped 0 wraps to the last position.
        let position = if rolled == 0 && !config.clamp {
            total
        } else {
            u64::try_from(rolled).unwrap_or(0).clamp(1, total)
        };
        let index = entry_at(entries, position);
        if config.exclusive && !seen.insert(index) {
            continue;
        }
        indices.push(index);
    }
    Ok(indices)
}

/// Sample without replacement from the multiset where each entry appears
/// `weight` times. An entry may come back more than once if its weight
/// allows it.
fn sample_multiset<E: Weighted>(
    entries: &[E],
    total: u64,
    count: usize,
    dice: &mut DiceRoller,
) -> Vec<usize> {
    let mut remaining: Vec<u64> = entries.iter().map(Weighted::weight).collect();
    let mut left = total;
    let take = u64::try_from(count).unwrap_or(u64::MAX).min(total);
    let mut indices = Vec::new();

    for _ in 0..take {
        let mut position = dice.pick_position(left);
        let index = remaining
            .iter()
            .position(|&weight| {
                if position <= weight {
                    true
                } else {
                    position -= weight;
                    false
                }
            })
            .unwrap_or(remaining.len() - 1);
        remaining[index] -= 1;
        left -= 1;
        indices.push(index);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_lines() {
        let entries = parse_weighted("3\tSword\n# c\nShield\n2\tBig\tAxe\n5").unwrap();
        assert_eq!(
            entries,
            vec![
                WeightedEntry {
                    text: "Sword".into(),
                    weight: 3
                },
                WeightedEntry {
                    text: "Shield".into(),
                    weight: 1
                },
                WeightedEntry {
                    text: "Big Axe".into(),
                    weight: 2
                },
                WeightedEntry {
                    text: String::new(),
                    weight: 5
                },
            ]
        );
        assert_eq!(total_weight(&entries), 11);
    }

    #[test]
    fn zero_weight_is_invalid() {
        let err = parse_weighted("0\tNothing").unwrap_err();
        assert!(err.to_string().contains("must be a positive integer"));
    }

    #[test]
    fn numbered_lines() {
        let entries = parse_numbered("1-4\tFoo\n5\tBar\n6-10\tBaz").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].weight(), 4);
        assert_eq!(entries[1].weight(), 1);
        assert_eq!(entries[2].weight(), 5);
    }

    #[test]
    fn numbered_rejects_bad_lines() {
        for raw in ["Foo", "1-4\tFoo\tExtra", "a-b\tFoo", "5-2\tBackwards"] {
            let err = parse_numbered(raw).unwrap_err();
            assert!(matches!(
                err,
                TableError::InvalidFormat {
                    format: TableFormat::NumberedList,
                    ..
                }
            ));
        }
    }

    #[test]
    fn numbered_rejects_overflowing_range() {
        let err = parse_numbered("0-18446744073709551615\tX").unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidFormat {
                format: TableFormat::NumberedList,
                ..
            }
        ));
        assert!(err.to_string().contains("too wide"));
        assert!(parse_numbered("1-18446744073709551615\tX").is_ok());
    }

    #[test]
    fn zero_roll_wraps_to_last_position() {
        let entries = parse_numbered("1\tLow\n2\tHigh").unwrap();
        let mut dice = DiceRoller::from_seed(1);
        let config = RollConfig::default().with_formula("0");
        assert_eq!(select(&entries, &config, 1, &mut dice).unwrap(), vec!["High"]);
        let clamped = config.with_clamp(true);
        assert_eq!(select(&entries, &clamped, 1, &mut dice).unwrap(), vec!["Low"]);

        let draws = 2_000;
        let spread = RollConfig::default().with_formula("d2-1");
        let results = select(&entries, &spread, draws, &mut dice).unwrap();
        let high = results.iter().filter(|r| *r == "High").count() as f64 / draws as f64;
        assert!((high - 0.5).abs() < 0.05, "High frequency was {high}");
    }

    #[test]
    fn cumulative_lookup() {
        let entries = parse_numbered("1-4\tFoo\n5\tBar\n6-10\tBaz").unwrap();
        assert_eq!(entry_at(&entries, 1), 0);
        assert_eq!(entry_at(&entries, 4), 0);
        assert_eq!(entry_at(&entries, 5), 1);
        assert_eq!(entry_at(&entries, 10), 2);
    }

    #[test]
    fn numbered_frequency_follows_range_width() {
        let entries = parse_numbered("1-4\tFoo\n5-10\tBar").unwrap();
        let mut dice = DiceRoller::from_seed(21);
        let draws = 20_000;
        let results = select(&entries, &RollConfig::default(), draws, &mut dice).unwrap();
        let foo = results.iter().filter(|r| *r == "Foo").count() as f64 / draws as f64;
        assert!((foo - 0.4).abs() < 0.03, "Foo frequency was {foo}");
    }

    #[test]
    fn formula_maps_to_position() {
        let entries = parse_numbered("1-4\tFoo\n5\tBar\n6-10\tBaz").unwrap();
        let mut dice = DiceRoller::from_seed(1);
        let config = RollConfig::default().with_formula("5");
        assert_eq!(select(&entries, &config, 2, &mut dice).unwrap(), vec!["Bar", "Bar"]);
        let clamped = RollConfig::default().with_formula("40").with_clamp(true);
        assert_eq!(select(&entries, &clamped, 1, &mut dice).unwrap(), vec!["Baz"]);
    }

    #[test]
    fn exclusive_draws_respect_weights() {
        let entries = parse_weighted("2\tA\n1\tB").unwrap();
        let config = RollConfig::default().with_exclusive(true);
        let mut dice = DiceRoller::from_seed(5);
        let mut results = select(&entries, &config, 10, &mut dice).unwrap();
        results.sort();
        assert_eq!(results, vec!["A", "A", "B"]);
    }

    #[test]
    fn empty_table() {
        let mut dice = DiceRoller::from_seed(5);
        let entries: Vec<WeightedEntry> = Vec::new();
        assert!(
            select(&entries, &RollConfig::default(), 3, &mut dice)
                .unwrap()
                .is_empty()
        );
    }
}
