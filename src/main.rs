//! pricesift - filter product CSV files by price
//!
//! This tool loads every CSV file in a directory (or a list of files) into an
//! in-memory store, applies a single price comparison, and prints the
//! matching records as a table or as JSON.
//!
//! # Program Flow
//!
//! 1. Parse and validate command-line arguments
//! 2. Ingest the sources into a shared store
//! 3. Filter the store by price (and optionally category)
//! 4. Print the results to stdout

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pricesift::cli;
use pricesift::config::AppConfig;
use pricesift::ingest::{self, IngestStats};
use pricesift::output;
use pricesift::query;
use pricesift::store::{MemStore, PriceStore};

/// Main entry point for the pricesift utility
///
/// Configuration problems are reported before any file is read. Any source
/// or schema error aborts ingestion and exits non-zero.
fn main() -> Result<()> {
    // Step 1: Parse and validate arguments
    let args = cli::parse_args();
    let config = AppConfig::from_args(args).context("invalid arguments")?;

    init_logging(config.verbose());

    // Step 2: Load every source into the store
    let store = MemStore::new();
    let stats = load(&config, &store).context("error loading CSVs")?;
    info!(
        sources = stats.sources,
        dropped = stats.dropped,
        "loaded {} total records",
        store.len()
    );

    // Step 3: Apply the filters
    let mut matches = store.filter(config.op(), config.threshold());
    if let Some(category) = config.category() {
        matches = query::filter_category(matches, category);
    }
    if config.cheapest() {
        matches = query::cheapest(&matches).cloned().into_iter().collect();
    }

    // Step 4: Output
    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::render(&mut out, &matches, config.format()).context("failed to write results")?;
    out.flush()?;

    Ok(())
}

/// Ingest the configured directory and files into `store`
///
/// With more than one job, the directory is walked up front and its CSV
/// files are ingested together with the explicit files by concurrent workers.
fn load(config: &AppConfig, store: &MemStore) -> Result<IngestStats> {
    let schema = config.schema();

    if config.jobs() > 1 {
        let mut paths = Vec::new();
        if let Some(dir) = config.dir() {
            paths.extend(ingest::collect_csv_paths(dir)?);
        }
        paths.extend(config.files().iter().cloned());
        return Ok(ingest::ingest_sources(&paths, store, schema, config.jobs())?);
    }

    let mut stats = IngestStats::default();
    if let Some(dir) = config.dir() {
        stats += ingest::ingest_directory(dir, store, schema)?;
    }
    for file in config.files() {
        stats += ingest::ingest_source(file, store, schema)?;
    }
    Ok(stats)
}

/// Send tracing output to stderr, honouring RUST_LOG when set
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}
