pub mod check;
pub mod dice;
pub mod resolve;
pub mod roll;

use rt_tables::{TableFormat, TableResult};

/// Parse an optional `--format` value.
fn parse_format(format: Option<&str>) -> TableResult<Option<TableFormat>> {
    format.map(str::parse).transpose()
}
