//! Tables loaded once per request and retargeted between uses.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RollConfig;
use crate::error::TableResult;
use crate::format::TableFormat;
use crate::table::Table;

/// Loaded tables keyed by path and format.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<(PathBuf, TableFormat), Table>,
    loads: usize,
}

impl TableCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached table, loading it with a default configuration on first
    /// use.
    pub fn get_or_load(&mut self, path: &Path, format: TableFormat) -> TableResult<&mut Table> {
        match self.tables.entry((path.to_path_buf(), format)) {
            Entry::Occupied(entry) => {
                debug!(path = %path.display(), %format, "inline table cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let table = Table::load_file(path, format, RollConfig::default())?;
                self.loads += 1;
                debug!(path = %path.display(), %format, "cached inline table");
                Ok(entry.insert(table))
            }
        }
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// How many files have been read.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}
