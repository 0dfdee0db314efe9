//! Table formats and how they are named.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::TableError;

/// The closed set of table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableFormat {
    /// One entry per line, picked uniformly.
    List,
    /// `<text>\t<percent>` lines, each tested independently.
    Chance,
    /// `<weight>\t<text>` lines.
    WeightedList,
    /// `<low>-<high>\t<text>` lines.
    NumberedList,
    /// A JSON hex graph walked by dice.
    Hexflower,
    /// The whole file is a single entry.
    Template,
}

impl TableFormat {
    /// All formats, in display order.
    pub const ALL: [TableFormat; 6] = [
        Self::List,
        Self::Chance,
        Self::WeightedList,
        Self::NumberedList,
        Self::Hexflower,
        Self::Template,
    ];

    /// The format's command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Chance => "chance",
            Self::WeightedList => "weighted-list",
            Self::NumberedList => "numbered-list",
            Self::Hexflower => "hexflower",
            Self::Template => "template",
        }
    }

    /// Look a format up by its command-line name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Look a format up by file extension (`table`, `weighted_list`, `num_list`, ...).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.replace('_', "-").as_str() {
            "table" | "list" => Some(Self::List),
            "num-list" => Some(Self::NumberedList),
            other => Self::from_name(other),
        }
    }

    /// The format implied by a path's extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TableFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TableError::UnknownTableFormat(s.to_string()))
    }
}
