//! Command-line roller for random tables.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use rt_tables::TableError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rolltable",
    about = "Roll on random tables and expand their inline references",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log table loads and inline resolution to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a table and print one result per line
    Roll {
        /// Path to the table file
        table: PathBuf,

        /// Table format: list, chance, weighted-list, numbered-list, template,
        /// hexflower (default: from the file extension, then list)
        #[arg(short, long)]
        format: Option<String>,

        /// How many results to roll (a dice expression)
        #[arg(short, long, default_value = "1")]
        count: String,

        /// Each entry can be rolled at most once
        #[arg(short, long)]
        exclusive: bool,

        /// Dice formula used to pick entries instead of a uniform roll
        #[arg(short = 'd', long = "dice-formula")]
        formula: Option<String>,

        /// Force out-of-range formula rolls onto the table
        #[arg(long)]
        clamp: bool,

        /// Hexflower start hex
        #[arg(long)]
        start: Option<u32>,

        /// RNG seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Fail when inline references nest deeper than this
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print results as a JSON array
        #[arg(long)]
        json: bool,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Append to the output file instead of overwriting it
        #[arg(short, long, requires = "output")]
        append: bool,
    },

    /// Expand the inline markers in a piece of text
    Resolve {
        /// Text containing `[[...]]` markers
        text: String,

        /// Directory relative table paths are resolved from
        #[arg(short, long, default_value = ".")]
        base_dir: PathBuf,

        /// RNG seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Fail when inline references nest deeper than this
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Load and validate a table, then list its entries
    Check {
        /// Path to the table file
        table: PathBuf,

        /// Table format (default: from the file extension, then list)
        #[arg(short, long)]
        format: Option<String>,

        /// Dice formula to validate against the table
        #[arg(short = 'd', long = "dice-formula")]
        formula: Option<String>,

        /// Accept formulas that roll outside the table
        #[arg(long)]
        clamp: bool,
    },

    /// Roll a dice expression
    Dice {
        /// Dice expression, e.g. 2d6+1 or 4d6kh3
        expr: String,

        /// Number of times to roll
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,

        /// RNG seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Exit status 2 is reserved for dice errors, so usage errors exit with 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Roll {
            table,
            format,
            count,
            exclusive,
            formula,
            clamp,
            start,
            seed,
            max_depth,
            json,
            output,
            append,
        } => commands::roll::run(commands::roll::RollArgs {
            table,
            format,
            count,
            exclusive,
            formula,
            clamp,
            start,
            seed,
            max_depth,
            json,
            output,
            append,
        }),
        Commands::Resolve {
            text,
            base_dir,
            seed,
            max_depth,
        } => commands::resolve::run(&text, &base_dir, seed, max_depth),
        Commands::Check {
            table,
            format,
            formula,
            clamp,
        } => commands::check::run(&table, format.as_deref(), formula, clamp),
        Commands::Dice { expr, times, seed } => commands::dice::run(&expr, times, seed),
    };

    if let Err(err) = result {
        process::exit(report(err));
    }
}

/// Print a diagnostic for `err` and return the exit status.
fn report(err: TableError) -> i32 {
    let code = if err.is_dice_error() { 2 } else { 1 };
    eprintln!("{:?}", miette::Report::new(err));
    code
}
