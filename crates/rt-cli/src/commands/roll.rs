use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use rt_tables::{ResolverConfig, RollConfig, RollRequest, RollSession, TableError, TableResult};

/// Everything `rolltable roll` takes from the command line.
pub struct RollArgs {
    pub table: PathBuf,
    pub format: Option<String>,
    pub count: String,
    pub exclusive: bool,
    pub formula: Option<String>,
    pub clamp: bool,
    pub start: Option<u32>,
    pub seed: Option<u64>,
    pub max_depth: Option<usize>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub append: bool,
}

pub fn run(args: RollArgs) -> TableResult<()> {
    let mut config = RollConfig::default()
        .with_count(args.count)
        .with_exclusive(args.exclusive)
        .with_clamp(args.clamp);
    if let Some(formula) = args.formula {
        config = config.with_formula(formula);
    }
    if let Some(start) = args.start {
        config = config.with_start(start);
    }

    let mut request = RollRequest::new(args.table).with_config(config);
    if let Some(format) = super::parse_format(args.format.as_deref())? {
        request = request.with_format(format);
    }

    let resolver = ResolverConfig {
        seed: args.seed,
        max_depth: args.max_depth,
    };
    let results = RollSession::new(resolver).roll(&request)?;

    let rendered = if args.json {
        format!("{}\n", serde_json::Value::from(results))
    } else {
        results.iter().map(|r| format!("{r}\n")).collect()
    };

    match args.output {
        Some(path) => write_output(&path, &rendered, args.append),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn write_output(path: &Path, rendered: &str, append: bool) -> TableResult<()> {
    let io_error = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(io_error)?;
    file.write_all(rendered.as_bytes()).map_err(io_error)
}
