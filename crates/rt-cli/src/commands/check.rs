use std::path::Path;

use comfy_table::{ContentArrangement, Table as Grid};
use rt_tables::{RollConfig, RollRequest, Table, TableEntry, TableFormat, TableResult};

pub fn run(
    path: &Path,
    format: Option<&str>,
    formula: Option<String>,
    clamp: bool,
) -> TableResult<()> {
    let format = match super::parse_format(format)? {
        Some(format) => format,
        None => RollRequest::new(path).resolved_format()?,
    };
    let mut config = RollConfig::default().with_clamp(clamp);
    if let Some(formula) = formula {
        config = config.with_formula(formula);
    }
    let table = Table::load_file(path, format, config)?;

    let entries = table.entries();
    if entries.is_empty() {
        println!("  '{}' has no entries.", path.display());
        return Ok(());
    }

    let mut grid = Grid::new();
    grid.set_content_arrangement(ContentArrangement::Dynamic);
    grid.set_header(header(format));
    for (index, entry) in entries.iter().enumerate() {
        grid.add_row(row(index + 1, entry));
    }

    println!("{grid}");
    println!();
    println!(
        "  {} entries, {} format, length {}",
        table.entry_count(),
        format,
        table.length()
    );
    if let Some(formula) = table.config().active_formula() {
        let note = if table.config().clamp { " (clamped)" } else { "" };
        println!("  formula {formula} fits{note}");
    }

    Ok(())
}

fn header(format: TableFormat) -> Vec<&'static str> {
    match format {
        TableFormat::List | TableFormat::Template => vec!["#", "Entry"],
        TableFormat::Chance => vec!["#", "Entry", "Chance"],
        TableFormat::WeightedList => vec!["#", "Entry", "Weight"],
        TableFormat::NumberedList => vec!["#", "Entry", "Range"],
        TableFormat::Hexflower => vec!["Hex", "Content"],
    }
}

fn row(number: usize, entry: &TableEntry<'_>) -> Vec<String> {
    let text = entry.text().to_string();
    match *entry {
        TableEntry::Plain(_) | TableEntry::Template(_) => vec![number.to_string(), text],
        TableEntry::Chance { threshold, .. } => {
            vec![number.to_string(), text, format!("{threshold}%")]
        }
        TableEntry::Weighted { weight, .. } => vec![number.to_string(), text, weight.to_string()],
        TableEntry::Numbered { low, high, .. } if low == high => {
            vec![number.to_string(), text, low.to_string()]
        }
        TableEntry::Numbered { low, high, .. } => {
            vec![number.to_string(), text, format!("{low}-{high}")]
        }
        TableEntry::Hex { id, .. } => vec![id.to_string(), text],
    }
}
