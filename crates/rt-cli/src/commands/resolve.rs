use std::path::Path;

use rt_tables::{ResolverConfig, RollSession, TableResult};

pub fn run(
    text: &str,
    base_dir: &Path,
    seed: Option<u64>,
    max_depth: Option<usize>,
) -> TableResult<()> {
    let mut session = RollSession::new(ResolverConfig { seed, max_depth });
    let resolved = session.resolve_text(text, base_dir)?;
    println!("{resolved}");
    Ok(())
}
