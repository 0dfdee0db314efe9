//! Random tables for tabletop games.
//!
//! Loads tables in several line-based formats (plain, chance, weighted, and
//! numbered lists, plus whole-file templates) and JSON hexflowers, rolls them
//! with optional selection formulas, and expands `[[...]]` inline references
//! in the results. Dice come from [`rt_dice`].

pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod hexflower;
pub mod inline;
pub mod paths;
pub mod session;
pub mod table;

pub use config::{ResolverConfig, RollConfig, RollOption};
pub use entry::TableEntry;
pub use error::{TableError, TableResult};
pub use format::TableFormat;
pub use hexflower::Hexflower;
pub use inline::InlineResolver;
pub use session::{RollRequest, RollSession};
pub use table::{RollOutput, Table, TableKind};
