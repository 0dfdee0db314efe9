//! Error types for loading and rolling tables.

use std::path::PathBuf;

use miette::Diagnostic;
use rt_dice::DiceError;
use thiserror::Error;

use crate::format::TableFormat;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur while loading, rolling, or resolving tables.
#[derive(Debug, Error, Diagnostic)]
pub enum TableError {
    /// The table file does not exist.
    #[error("table file '{}' not found", .0.display())]
    #[diagnostic(code(rolltable::file_not_found))]
    FileNotFound(PathBuf),

    /// The table file exists but could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    #[diagnostic(code(rolltable::io))]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A selection formula can roll outside the table without clamping.
    #[error(
        "dice formula '{formula}' rolls {min} to {max}, but a table of length {length} \
         only accepts 0 to {length}"
    )]
    #[diagnostic(
        code(rolltable::formula_range),
        help("use a smaller formula or pass the clamp option")
    )]
    FormulaRange {
        /// The offending formula.
        formula: String,
        /// Smallest value the formula can roll.
        min: i64,
        /// Largest value the formula can roll.
        max: i64,
        /// Entry count, or total weight for weighted formats.
        length: u64,
    },

    /// A line or document does not match the table format.
    #[error("invalid {format} table: {reason}")]
    #[diagnostic(code(rolltable::invalid_format))]
    InvalidFormat {
        /// The format being parsed.
        format: TableFormat,
        /// What was wrong.
        reason: String,
    },

    /// A format name or file extension that maps to no table format.
    #[error("unknown table format '{0}'")]
    #[diagnostic(
        code(rolltable::unknown_format),
        help("known formats: list, chance, weighted-list, numbered-list, template, hexflower")
    )]
    UnknownTableFormat(String),

    /// A hexflower walk referenced a hex that is not in the flower.
    #[error("hex {0} is not part of the hexflower")]
    #[diagnostic(code(rolltable::unknown_hex))]
    UnknownHex(u32),

    /// An inline `[[...]]` marker could not be parsed.
    #[error("malformed inline marker '[[{marker}]]': {reason}")]
    #[diagnostic(code(rolltable::malformed_marker))]
    MalformedInlineMarker {
        /// The marker body between the brackets.
        marker: String,
        /// What was wrong.
        reason: String,
    },

    /// A dice formula failed to parse.
    #[error("dice formula error: {0}")]
    #[diagnostic(code(rolltable::dice_formula))]
    DiceFormula(#[from] DiceError),

    /// Inline references nested past the configured depth limit.
    #[error("inline table references nested deeper than {0} levels")]
    #[diagnostic(
        code(rolltable::recursion_limit),
        help("a table probably references itself, directly or through another table")
    )]
    RecursionLimit(usize),
}

impl TableError {
    /// True if this error came from a malformed dice formula.
    pub fn is_dice_error(&self) -> bool {
        matches!(self, Self::DiceFormula(_))
    }

    pub(crate) fn invalid(format: TableFormat, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(marker: &str, reason: impl Into<String>) -> Self {
        Self::MalformedInlineMarker {
            marker: marker.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_errors_are_flagged() {
        let err: TableError = DiceError::Empty.into();
        assert!(err.is_dice_error());
        assert!(!TableError::UnknownTableFormat("x".into()).is_dice_error());
    }

    #[test]
    fn messages() {
        let err = TableError::FormulaRange {
            formula: "d20".into(),
            min: 1,
            max: 20,
            length: 6,
        };
        assert_eq!(
            err.to_string(),
            "dice formula 'd20' rolls 1 to 20, but a table of length 6 only accepts 0 to 6"
        );
        let err = TableError::FileNotFound(PathBuf::from("loot.table"));
        assert_eq!(err.to_string(), "table file 'loot.table' not found");
        let err = TableError::malformed("loot:q", "unknown option 'q'");
        assert_eq!(
            err.to_string(),
            "malformed inline marker '[[loot:q]]': unknown option 'q'"
        );
    }
}
