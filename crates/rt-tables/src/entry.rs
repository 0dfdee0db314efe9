//! Table entries and the line conventions shared by line-based formats.

use std::fmt;

/// An entry of a chance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanceEntry {
    /// The entry text.
    pub text: String,
    /// The entry is hit when the pass roll is at or below this value.
    pub threshold: i64,
}

/// An entry of a weighted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedEntry {
    /// The entry text (may be empty).
    pub text: String,
    /// Relative weight, at least 1.
    pub weight: u64,
}

/// An entry of a numbered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedEntry {
    /// The entry text.
    pub text: String,
    /// First number of the entry's range.
    pub low: u64,
    /// Last number of the entry's range (inclusive).
    pub high: u64,
}

impl NumberedEntry {
    /// Weight derived from the range: `high - low + 1`, saturating.
    pub fn weight(&self) -> u64 {
        self.high.saturating_sub(self.low).saturating_add(1)
    }
}

/// Something with text and a sampling weight.
pub(crate) trait Weighted {
    fn text(&self) -> &str;
    fn weight(&self) -> u64;
}

impl Weighted for WeightedEntry {
    fn text(&self) -> &str {
        &self.text
    }

    fn weight(&self) -> u64 {
        self.weight
    }
}

impl Weighted for NumberedEntry {
    fn text(&self) -> &str {
        &self.text
    }

    fn weight(&self) -> u64 {
        NumberedEntry::weight(self)
    }
}

/// A borrowed view of any table's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEntry<'a> {
    /// A plain list line.
    Plain(&'a str),
    /// A chance line.
    Chance {
        /// The entry text.
        text: &'a str,
        /// Percent threshold.
        threshold: i64,
    },
    /// A weighted list line.
    Weighted {
        /// The entry text.
        text: &'a str,
        /// Relative weight.
        weight: u64,
    },
    /// A numbered list line.
    Numbered {
        /// The entry text.
        text: &'a str,
        /// First number of the range.
        low: u64,
        /// Last number of the range.
        high: u64,
    },
    /// A hexflower cell.
    Hex {
        /// Hex id.
        id: u32,
        /// Hex content.
        content: &'a str,
    },
    /// The whole template.
    Template(&'a str),
}

impl<'a> TableEntry<'a> {
    /// The entry's text.
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Plain(text) | Self::Template(text) => text,
            Self::Chance { text, .. } | Self::Weighted { text, .. } | Self::Numbered { text, .. } => {
                text
            }
            Self::Hex { content, .. } => content,
        }
    }
}

impl fmt::Display for TableEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(text) | Self::Template(text) => write!(f, "{text}"),
            Self::Chance { text, threshold } => write!(f, "{text} ({threshold}%)"),
            Self::Weighted { text, weight } => write!(f, "{weight}\t{text}"),
            Self::Numbered { text, low, high } if low == high => write!(f, "{low}\t{text}"),
            Self::Numbered { text, low, high } => write!(f, "{low}-{high}\t{text}"),
            Self::Hex { id, content } => write!(f, "Hex {id}, containing \"{content}\""),
        }
    }
}

/// True for lines starting with `#`, `//`, or `;`.
pub fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//") || line.starts_with(';')
}

/// Trimmed, non-blank, non-comment lines with their 1-based line numbers.
pub(crate) fn content_lines(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !is_comment(line))
}
