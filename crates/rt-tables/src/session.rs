//! One top-level roll request.
//!
//! A `RollSession` owns the dice roller and the inline resolver (and with it
//! the table cache), so everything rolled through one session shares one
//! random stream and loads each referenced table once.

use std::path::{Path, PathBuf};

use rt_dice::DiceRoller;
use tracing::{debug, info};

use crate::config::{ResolverConfig, RollConfig};
use crate::error::{TableError, TableResult};
use crate::format::TableFormat;
use crate::inline::InlineResolver;
use crate::table::Table;

/// A table to roll and how to roll it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollRequest {
    /// Path to the table file.
    pub path: PathBuf,
    /// Explicit format; otherwise taken from the extension. A path without
    /// an extension is a `list`.
    pub format: Option<TableFormat>,
    /// Roll configuration.
    pub config: RollConfig,
}

impl RollRequest {
    /// Roll `path` once with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            config: RollConfig::default(),
        }
    }

    /// Set the format explicitly.
    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the roll configuration.
    pub fn with_config(mut self, config: RollConfig) -> Self {
        self.config = config;
        self
    }

    /// The format the table will be loaded as. An extension that names no
    /// format is an error.
    pub fn resolved_format(&self) -> TableResult<TableFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        match self.path.extension().and_then(|ext| ext.to_str()) {
            None => Ok(TableFormat::List),
            Some(ext) => TableFormat::from_extension(ext)
                .ok_or_else(|| TableError::UnknownTableFormat(ext.to_string())),
        }
    }
}

/// Rolls tables and resolves their inline references.
#[derive(Debug)]
pub struct RollSession {
    dice: DiceRoller,
    resolver: InlineResolver,
}

impl RollSession {
    /// Create a session. The seed in `config` fixes every random draw.
    pub fn new(config: ResolverConfig) -> Self {
        let dice = DiceRoller::new(config.seed);
        Self {
            dice,
            resolver: InlineResolver::new(config),
        }
    }

    /// Load and roll a table, resolving inline markers in every result
    /// relative to the table's directory.
    pub fn roll(&mut self, request: &RollRequest) -> TableResult<Vec<String>> {
        let format = request.resolved_format()?;
        info!(path = %request.path.display(), %format, "rolling table");
        let table = Table::load_file(&request.path, format, request.config.clone())?;
        let outputs = table.get_results(&mut self.dice)?;
        debug!(results = outputs.len(), "table rolled");

        let base_dir = request.path.parent().unwrap_or_else(|| Path::new(""));
        outputs
            .iter()
            .map(|output| {
                self.resolver
                    .resolve(&output.to_string(), base_dir, &mut self.dice)
            })
            .collect()
    }

    /// Resolve the markers in an ad-hoc string.
    pub fn resolve_text(&mut self, text: &str, base_dir: &Path) -> TableResult<String> {
        self.resolver.resolve(text, base_dir, &mut self.dice)
    }

    /// Number of table files read by inline references so far.
    pub fn load_count(&self) -> usize {
        self.resolver.cache().load_count()
    }
}
