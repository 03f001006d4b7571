//! Sir Tet's Carpets
//!
//! Reads `width length` queries, one per line, and prints each query followed
//! by the number of ways to tile that carpet with tetrominoes.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::LevelFilter;

use tetcarpet::protocol;
use tetcarpet::SearchOptions;

/// Counts tetromino tilings of rectangular carpets.
#[derive(Parser, Debug)]
#[command(name = "tetcarpet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File of `width length` queries; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Recompute every search subtree instead of caching grid states.
    #[arg(long)]
    no_cache: bool,

    /// Log more detail (repeat for search statistics).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            memoize: !self.no_cache,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output = BufWriter::new(io::stdout().lock());

    let answered = protocol::answer(input, output, cli.search_options())
        .context("failed to answer tiling queries")?;
    log::info!("answered {answered} queries");

    Ok(())
}
