//! Configuration module for pricesift
//!
//! `AppConfig` is the validated form of the command-line arguments. It is
//! built once at startup, before anything is read from disk, and passed to
//! the components that need it.

use std::path::PathBuf;

use crate::cli::SiftArgs;
use crate::error::{SiftError, SiftResult};
use crate::ingest::SourceSchema;
use crate::output::OutputFormat;
use crate::query::PriceOp;

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory walked for CSV files, if any
    dir: Option<PathBuf>,

    /// Individual files to ingest
    files: Vec<PathBuf>,

    /// Comparison operator
    op: PriceOp,

    /// Price threshold, always positive
    threshold: f64,

    /// Optional exact category filter
    category: Option<String>,

    /// Whether to report only the cheapest match
    cheapest: bool,

    /// Required column names and currency symbol
    schema: SourceSchema,

    /// Table or JSON output
    format: OutputFormat,

    /// Ingestion worker count, at least 1
    jobs: usize,

    /// Whether debug logging is enabled
    verbose: bool,
}

impl AppConfig {
    /// Validate parsed arguments
    ///
    /// # Returns
    /// * `Ok(AppConfig)` when the arguments are usable
    /// * `Err(SiftError::MissingInput)` when no directory or file was given
    /// * `Err(SiftError::InvalidOperator)` for an operator other than `<`, `=`, `>`
    /// * `Err(SiftError::InvalidThreshold)` for a threshold that is not positive
    /// * `Err(SiftError::InvalidJobs)` for a worker count of zero
    pub fn from_args(args: SiftArgs) -> SiftResult<Self> {
        if args.dir.is_none() && args.files.is_empty() {
            return Err(SiftError::MissingInput);
        }
        let op: PriceOp = args.op.parse()?;
        if args.price.is_nan() || args.price <= 0.0 {
            return Err(SiftError::InvalidThreshold(args.price));
        }
        if args.jobs == 0 {
            return Err(SiftError::InvalidJobs);
        }

        Ok(AppConfig {
            dir: args.dir,
            files: args.files,
            op,
            threshold: args.price,
            category: args.category,
            cheapest: args.cheapest,
            schema: SourceSchema::new(
                args.id_column,
                args.category_column,
                args.price_column,
                args.currency,
            ),
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Table
            },
            jobs: args.jobs,
            verbose: args.verbose,
        })
    }

    /// Directory to walk, if one was given
    pub fn dir(&self) -> Option<&PathBuf> {
        self.dir.as_ref()
    }

    /// Individual files to ingest
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Comparison operator
    pub fn op(&self) -> PriceOp {
        self.op
    }

    /// Price threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Category filter, if any
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether only the cheapest match is reported
    pub fn cheapest(&self) -> bool {
        self.cheapest
    }

    /// Required column names and currency symbol
    pub fn schema(&self) -> &SourceSchema {
        &self.schema
    }

    /// Output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Ingestion worker count
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Whether debug logging is enabled
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
