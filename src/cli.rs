//! CLI argument parsing module for pricesift
//!
//! This module defines the command-line interface using the clap crate.
//! Arguments are only parsed here; checking that they make sense is done
//! by [`crate::config::AppConfig::from_args`].

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for pricesift
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Load product CSV files into memory and filter them by price"
)]
pub struct SiftArgs {
    /// Directory searched recursively for *.csv files
    #[clap(short, long, help = "Directory containing CSV files")]
    pub dir: Option<PathBuf>,

    /// Individual CSV files to load, in addition to any --dir
    ///
    /// May be given more than once.
    #[clap(short, long = "file", help = "CSV file to load (repeatable)")]
    pub files: Vec<PathBuf>,

    /// Price comparison operator
    #[clap(short, long, help = "Price comparison operator: <, =, or >")]
    pub op: String,

    /// Threshold the price is compared against; must be positive
    #[clap(
        short,
        long,
        allow_negative_numbers = true,
        help = "Numeric price to compare against"
    )]
    pub price: f64,

    /// Emit matches as JSON instead of a table
    #[clap(long, help = "Output matches as JSON instead of a table")]
    pub json: bool,

    /// Only keep matches whose category equals this value exactly
    #[clap(long, help = "Only show matches with this category")]
    pub category: Option<String>,

    /// Only print the cheapest match
    #[clap(long, help = "Only show the lowest-priced match")]
    pub cheapest: bool,

    /// Header of the identifier column, matched case-insensitively
    #[clap(long, default_value = "companyid", help = "Header of the identifier column")]
    pub id_column: String,

    /// Header of the category column, matched case-insensitively
    #[clap(long, default_value = "kind", help = "Header of the category column")]
    pub category_column: String,

    /// Header of the price column, matched case-insensitively
    #[clap(long, default_value = "price", help = "Header of the price column")]
    pub price_column: String,

    /// Currency symbol removed from price fields before parsing
    #[clap(long, default_value = "$", help = "Currency symbol stripped from prices")]
    pub currency: String,

    /// Number of files ingested concurrently
    #[clap(short, long, default_value_t = 1, help = "Concurrent ingestion workers")]
    pub jobs: usize,

    /// Enable debug logging on stderr
    #[clap(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Parse command-line arguments into the SiftArgs structure
pub fn parse_args() -> SiftArgs {
    SiftArgs::parse()
}
