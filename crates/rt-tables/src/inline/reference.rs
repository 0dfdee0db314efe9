//! Inline references: a marker resolved against a directory.

use std::path::{Path, PathBuf};

use rt_dice::DiceRoller;

use crate::config::RollConfig;
use crate::error::{TableError, TableResult};
use crate::format::TableFormat;
use crate::inline::marker::MarkerOptions;
use crate::paths::resolve_table_path;

/// What makes two references roll from the same pool of results.
///
/// Count, joiner, and sort are per occurrence and not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdentity {
    /// Resolved table path.
    pub path: PathBuf,
    /// Table format.
    pub format: TableFormat,
    /// `e`
    pub exclusive: bool,
    /// `cl`
    pub clamp: bool,
    /// `d<expr>`
    pub formula: Option<String>,
}

impl TableIdentity {
    /// The roll configuration for drawing `count` results from this table.
    pub fn roll_config(&self, count: usize) -> RollConfig {
        RollConfig {
            count: count.to_string(),
            exclusive: self.exclusive,
            clamp: self.clamp,
            formula: self.formula.clone(),
            start: None,
        }
    }

    /// Directory nested references inside this table resolve against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// One occurrence of a table marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineReference {
    /// Grouping identity.
    pub identity: TableIdentity,
    /// How many results this occurrence consumes, already rolled.
    pub count: usize,
    /// Joiner for this occurrence's results.
    pub joiner: String,
    /// Natural-sort the group's results.
    pub sort: bool,
}

impl InlineReference {
    /// Build a reference from parsed marker options. The `c` expression is
    /// rolled here; negative counts become 0.
    pub fn new(
        options: &MarkerOptions,
        base_dir: &Path,
        dice: &mut DiceRoller,
    ) -> TableResult<Self> {
        let path = resolve_table_path(&options.target, base_dir);
        let format = if options.format_from_extension {
            TableFormat::from_path(&path).ok_or_else(|| {
                TableError::UnknownTableFormat(
                    path.extension()
                        .and_then(|ext| ext.to_str())
                        .unwrap_or_default()
                        .to_string(),
                )
            })?
        } else {
            options.format.unwrap_or(TableFormat::List)
        };
        let count = match &options.count {
            Some(expr) => usize::try_from(dice.roll(expr)?).unwrap_or(0),
            None => 1,
        };

        Ok(Self {
            identity: TableIdentity {
                path,
                format,
                exclusive: options.exclusive,
                clamp: options.clamp,
                formula: options.formula.clone(),
            },
            count,
            joiner: options.joiner().to_string(),
            sort: options.sort,
        })
    }
}
