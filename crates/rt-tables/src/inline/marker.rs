//! Finding `[[...]]` markers and parsing their options.
//!
//! A marker body is a target followed by `:`-separated options:
//!
//! | option        | meaning                                   |
//! |---------------|-------------------------------------------|
//! | `c<expr>`     | number of results, rolled                 |
//! | `cl`          | clamp the selection formula               |
//! | `d<expr>`     | selection formula                         |
//! | `e`           | exclusive                                 |
//! | `f<format>`   | table format by name                      |
//! | `j<text>`     | joiner (`\n`, `\t`, `\\` escapes allowed) |
//! | `x`           | take the format from the file extension   |
//! | `s`           | natural-sort the results                  |

use std::ops::Range;

use crate::error::{TableError, TableResult};
use crate::format::TableFormat;

/// A marker's location in the text and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Byte range of the whole `[[...]]`.
    pub span: Range<usize>,
    /// The text between the brackets.
    pub body: &'a str,
}

/// Find every `[[body]]` in `text`, left to right. Bodies are non-empty and
/// contain no brackets.
pub fn find_markers(text: &str) -> Vec<Marker<'_>> {
    let bytes = text.as_bytes();
    let mut markers = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] != b'[' || bytes[i + 1] != b'[' {
            i += 1;
            continue;
        }
        let start = i + 2;
        let end = bytes[start..]
            .iter()
            .position(|&b| b == b'[' || b == b']')
            .map_or(bytes.len(), |offset| start + offset);
        let closes =
            end > start && bytes.get(end) == Some(&b']') && bytes.get(end + 1) == Some(&b']');
        if closes {
            markers.push(Marker {
                span: i..end + 2,
                body: &text[start..end],
            });
            i = end + 2;
        } else {
            i += 1;
        }
    }
    markers
}

/// Options parsed from a marker body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerOptions {
    /// The table path or dice expression.
    pub target: String,
    /// `c<expr>`
    pub count: Option<String>,
    /// `cl`
    pub clamp: bool,
    /// `d<expr>`
    pub formula: Option<String>,
    /// `e`
    pub exclusive: bool,
    /// `f<format>`
    pub format: Option<TableFormat>,
    /// `j<text>`
    pub joiner: Option<String>,
    /// `x`
    pub format_from_extension: bool,
    /// `s`
    pub sort: bool,
}

impl MarkerOptions {
    /// Parse a marker body.
    pub fn parse(body: &str) -> TableResult<Self> {
        let mut segments = body.split(':');
        let target = segments.next().unwrap_or_default().trim();
        if target.is_empty() {
            return Err(TableError::malformed(body, "missing table or dice target"));
        }

        let mut options = Self {
            target: target.to_string(),
            ..Self::default()
        };
        for segment in segments {
            options.apply(body, segment)?;
        }
        Ok(options)
    }

    fn apply(&mut self, body: &str, segment: &str) -> TableResult<()> {
        let value = |rest: &str, what: &str| {
            if rest.is_empty() {
                Err(TableError::malformed(body, format!("option '{segment}' needs {what}")))
            } else {
                Ok(rest.to_string())
            }
        };
        match segment {
            "e" => self.exclusive = true,
            "cl" => self.clamp = true,
            "x" => self.format_from_extension = true,
            "s" => self.sort = true,
            "" => return Err(TableError::malformed(body, "empty option")),
            _ => {
                let mut chars = segment.chars();
                let flag = chars.next();
                let rest = chars.as_str();
                match flag {
                    Some('c') => self.count = Some(value(rest, "a dice expression")?),
                    Some('d') => self.formula = Some(value(rest, "a dice expression")?),
                    Some('f') => self.format = Some(rest.parse()?),
                    Some('j') => self.joiner = Some(unescape(&value(rest, "a joiner")?)),
                    _ => {
                        return Err(TableError::malformed(
                            body,
                            format!("unknown option '{segment}'"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// The joiner, `", "` when unset.
    pub fn joiner(&self) -> &str {
        self.joiner.as_deref().unwrap_or(", ")
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
