//! Loaded tables and how they are rolled.

mod chance;
mod list;
mod weighted;

use std::fmt;
use std::path::Path;

use rt_dice::{DiceExpr, DiceRoller};
use tracing::debug;

use crate::config::{RollConfig, RollOption};
use crate::entry::{ChanceEntry, NumberedEntry, TableEntry, WeightedEntry};
use crate::error::{TableError, TableResult};
use crate::format::TableFormat;
use crate::hexflower::Hexflower;

/// Parsed table contents, one variant per format.
#[derive(Debug, Clone)]
pub enum TableKind {
    /// A plain list.
    List(Vec<String>),
    /// A chance table.
    Chance(Vec<ChanceEntry>),
    /// A weighted list.
    WeightedList(Vec<WeightedEntry>),
    /// A numbered list.
    NumberedList(Vec<NumberedEntry>),
    /// A hexflower.
    Hexflower(Hexflower),
    /// A template, emitted whole.
    Template(String),
}

impl TableKind {
    /// Parse raw file contents as `format`.
    pub fn parse(format: TableFormat, raw: &str) -> TableResult<Self> {
        Ok(match format {
            TableFormat::List => Self::List(list::parse(raw)),
            TableFormat::Chance => Self::Chance(chance::parse(raw)?),
            TableFormat::WeightedList => Self::WeightedList(weighted::parse_weighted(raw)?),
            TableFormat::NumberedList => Self::NumberedList(weighted::parse_numbered(raw)?),
            TableFormat::Hexflower => Self::Hexflower(Hexflower::parse(raw)?),
            TableFormat::Template => {
                Self::Template(raw.trim_end_matches(['\r', '\n']).to_string())
            }
        })
    }

    /// The format these contents were parsed as.
    pub fn format(&self) -> TableFormat {
        match self {
            Self::List(_) => TableFormat::List,
            Self::Chance(_) => TableFormat::Chance,
            Self::WeightedList(_) => TableFormat::WeightedList,
            Self::NumberedList(_) => TableFormat::NumberedList,
            Self::Hexflower(_) => TableFormat::Hexflower,
            Self::Template(_) => TableFormat::Template,
        }
    }
}

/// One result of rolling a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutput {
    /// A single picked entry, template copy, or visited hex.
    Text(String),
    /// The entries hit by one chance pass, in table order.
    Hits(Vec<String>),
}

impl fmt::Display for RollOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Hits(hits) => f.write_str(&hits.join(", ")),
        }
    }
}

/// A loaded table together with the configuration it is rolled with.
#[derive(Debug, Clone)]
pub struct Table {
    kind: TableKind,
    config: RollConfig,
}

impl Table {
    /// Parse `raw` as `format` and validate `config` against it.
    pub fn load(format: TableFormat, raw: &str, config: RollConfig) -> TableResult<Self> {
        let kind = TableKind::parse(format, raw)?;
        let table = Self { kind, config };
        table.check_formula_bounds(&table.config)?;
        debug!(%format, length = table.length(), "table loaded");
        Ok(table)
    }

    /// Read and load a table file.
    pub fn load_file(path: &Path, format: TableFormat, config: RollConfig) -> TableResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TableError::FileNotFound(path.to_path_buf())
            } else {
                TableError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        debug!(path = %path.display(), "reading table file");
        Self::load(format, &raw, config)
    }

    /// The table's format.
    pub fn format(&self) -> TableFormat {
        self.kind.format()
    }

    /// The parsed contents.
    pub fn kind(&self) -> &TableKind {
        &self.kind
    }

    /// The active configuration.
    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    /// The upper bound a selection formula is checked against: total weight
    /// for weighted formats, otherwise the number of entries.
    pub fn length(&self) -> u64 {
        let count = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
        match &self.kind {
            TableKind::List(items) => count(items.len()),
            TableKind::Chance(entries) => count(entries.len()),
            TableKind::WeightedList(entries) => weighted::total_weight(entries),
            TableKind::NumberedList(entries) => weighted::total_weight(entries),
            TableKind::Hexflower(flower) => count(flower.len()),
            TableKind::Template(_) => 1,
        }
    }

    /// Number of entries (hexes for a hexflower, 1 for a template).
    pub fn entry_count(&self) -> usize {
        match &self.kind {
            TableKind::List(items) => items.len(),
            TableKind::Chance(entries) => entries.len(),
            TableKind::WeightedList(entries) => entries.len(),
            TableKind::NumberedList(entries) => entries.len(),
            TableKind::Hexflower(flower) => flower.len(),
            TableKind::Template(_) => 1,
        }
    }

    /// Borrowed views of every entry.
    pub fn entries(&self) -> Vec<TableEntry<'_>> {
        match &self.kind {
            TableKind::List(items) => items
                .iter()
                .map(|item| TableEntry::Plain(item.as_str()))
                .collect(),
            TableKind::Chance(entries) => entries
                .iter()
                .map(|e| TableEntry::Chance {
                    text: &e.text,
                    threshold: e.threshold,
                })
                .collect(),
            TableKind::WeightedList(entries) => entries
                .iter()
                .map(|e| TableEntry::Weighted {
                    text: &e.text,
                    weight: e.weight,
                })
                .collect(),
            TableKind::NumberedList(entries) => entries
                .iter()
                .map(|e| TableEntry::Numbered {
                    text: &e.text,
                    low: e.low,
                    high: e.high,
                })
                .collect(),
            TableKind::Hexflower(flower) => flower
                .hexes()
                .map(|h| TableEntry::Hex {
                    id: h.id,
                    content: &h.content,
                })
                .collect(),
            TableKind::Template(text) => vec![TableEntry::Template(text)],
        }
    }

    /// Override a single option, validating the result.
    pub fn set_option(&mut self, option: RollOption) -> TableResult<()> {
        let mut config = self.config.clone();
        config.apply(option);
        self.retarget(config)
    }

    /// Replace the whole configuration. The new configuration is validated
    /// first; on error the table keeps its previous one.
    pub fn retarget(&mut self, config: RollConfig) -> TableResult<()> {
        self.check_formula_bounds(&config)?;
        debug!(format = %self.format(), ?config, "table retargeted");
        self.config = config;
        Ok(())
    }

    /// Reject formulas that can roll outside `0..=length` unless clamped.
    fn check_formula_bounds(&self, config: &RollConfig) -> TableResult<()> {
        let Some(formula) = config.active_formula() else {
            return Ok(());
        };
        let expr = DiceExpr::parse(formula)?;
        if config.clamp {
            return Ok(());
        }
        let length = self.length();
        let fits = expr.min() >= 0 && u64::try_from(expr.max()).is_ok_and(|max| max <= length);
        if fits {
            Ok(())
        } else {
            Err(TableError::FormulaRange {
                formula: formula.to_string(),
                min: expr.min(),
                max: expr.max(),
                length,
            })
        }
    }

    /// Roll the count expression. Negative counts produce nothing.
    fn rolled_count(&self, dice: &mut DiceRoller) -> TableResult<usize> {
        let rolled = dice.roll(&self.config.count)?;
        Ok(usize::try_from(rolled).unwrap_or(0))
    }

    /// Roll the table with its current configuration.
    pub fn get_results(&self, dice: &mut DiceRoller) -> TableResult<Vec<RollOutput>> {
        let count = self.rolled_count(dice)?;
        let config = &self.config;
        let texts = match &self.kind {
            TableKind::List(items) => list::select(items, config, count, dice)?,
            TableKind::WeightedList(entries) => weighted::select(entries, config, count, dice)?,
            TableKind::NumberedList(entries) => weighted::select(entries, config, count, dice)?,
            TableKind::Chance(entries) => {
                let passes = chance::roll(entries, config.active_formula(), count, dice)?;
                return Ok(passes.into_iter().map(RollOutput::Hits).collect());
            }
            TableKind::Hexflower(flower) => flower.walk(config.start, count, dice)?,
            TableKind::Template(text) => vec![text.clone(); count],
        };
        Ok(texts.into_iter().map(RollOutput::Text).collect())
    }
}
