//! Chance tables: every entry is tested on its own in each pass.

use rt_dice::{DiceExpr, DiceRoller};

use crate::entry::{ChanceEntry, content_lines};
use crate::error::{TableError, TableResult};
use crate::format::TableFormat;

/// Formula used when the table has none.
pub(crate) const DEFAULT_FORMULA: &str = "d100";

/// Parse `<text>\t<percent>` lines.
pub(crate) fn parse(raw: &str) -> TableResult<Vec<ChanceEntry>> {
    content_lines(raw)
        .map(|(number, line)| {
            let (text, percent) = line.rsplit_once('\t').ok_or_else(|| {
                TableError::invalid(
                    TableFormat::Chance,
                    format!("line {number}: expected '<text>\\t<percent>', got '{line}'"),
                )
            })?;
            let threshold = percent.trim().parse::<i64>().map_err(|_| {
                TableError::invalid(
                    TableFormat::Chance,
                    format!("line {number}: '{}' is not a whole percentage", percent.trim()),
                )
            })?;
            Ok(ChanceEntry {
                text: text.trim().to_string(),
                threshold,
            })
        })
        .collect()
}

/// Run `passes` independent passes. Each pass rolls the formula once per
/// entry and keeps, in table order, the entries whose threshold is met.
pub(crate) fn roll(
    entries: &[ChanceEntry],
    formula: Option<&str>,
    passes: usize,
    dice: &mut DiceRoller,
) -> TableResult<Vec<Vec<String>>> {
    let expr = DiceExpr::parse(formula.unwrap_or(DEFAULT_FORMULA))?;
    let results = (0..passes)
        .map(|_| {
            entries
                .iter()
                .filter(|entry| dice.roll_expr(&expr) <= entry.threshold)
                .map(|entry| entry.text.clone())
                .collect()
        })
        .collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<ChanceEntry> {
        parse("Always\t100\nNever\t0\n# comment\nSometimes\t50").unwrap()
    }

    #[test]
    fn parse_lines() {
        let parsed = entries();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].text, "Always");
        assert_eq!(parsed[0].threshold, 100);
        assert_eq!(parsed[2].threshold, 50);
    }

    #[test]
    fn text_may_contain_tabs() {
        let parsed = parse("Gold\tpieces\t30").unwrap();
        assert_eq!(parsed[0].text, "Gold\tpieces");
        assert_eq!(parsed[0].threshold, 30);
    }

    #[test]
    fn missing_percent_is_invalid() {
        let err = parse("Just text").unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidFormat {
                format: TableFormat::Chance,
                ..
            }
        ));
        let err = parse("Text\tmany").unwrap_err();
        assert!(err.to_string().contains("'many' is not a whole percentage"));
    }

    #[test]
    fn thresholds_at_the_extremes() {
        let mut dice = DiceRoller::from_seed(8);
        let passes = roll(&entries(), Some("d100"), 200, &mut dice).unwrap();
        assert_eq!(passes.len(), 200);
        for hits in &passes {
            assert!(hits.contains(&"Always".to_string()));
            assert!(!hits.contains(&"Never".to_string()));
        }
    }

    #[test]
    fn hits_keep_table_order() {
        let table = parse("First\t100\nSecond\t100\nThird\t100").unwrap();
        let mut dice = DiceRoller::from_seed(2);
        let passes = roll(&table, None, 1, &mut dice).unwrap();
        assert_eq!(passes, vec![vec!["First", "Second", "Third"]]);
    }

    #[test]
    fn zero_passes() {
        let mut dice = DiceRoller::from_seed(2);
        assert!(roll(&entries(), None, 0, &mut dice).unwrap().is_empty());
    }
}
