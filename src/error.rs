//! Error handling for pricesift
//!
//! This module defines the error type shared by ingestion, configuration
//! validation and output. Variants follow the failure modes of the tool:
//! configuration problems caught before any file is read, I/O failures on a
//! specific source, and schema failures when a source lacks a required column.
//!
//! Rows whose price cannot be parsed are not errors at all; ingestion drops
//! them and keeps going.

use std::path::PathBuf;

use thiserror::Error;

/// SiftError represents all fatal errors that can occur in pricesift
#[derive(Error, Debug)]
pub enum SiftError {
    /// Neither a directory nor any individual file was given
    #[error("no input given: provide --dir or at least one --file")]
    MissingInput,

    /// The comparison operator is not one of `<`, `=`, `>`
    #[error("invalid operator '{0}': must be one of \"<\", \"=\", \">\"")]
    InvalidOperator(String),

    /// The price threshold is zero, negative or not a number
    #[error("invalid price threshold {0}: must be a positive number")]
    InvalidThreshold(f64),

    /// The worker count is zero
    #[error("--jobs must be at least 1")]
    InvalidJobs,

    /// A source could not be opened or read
    #[error("open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source could not be parsed as delimited text
    #[error("read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Directory traversal failed
    #[error("walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A source header lacks one of the required columns
    #[error("{source_name} missing required column \"{column}\"")]
    MissingColumn { source_name: String, column: String },

    /// Structured output could not be encoded
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing rendered output failed
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for operations that can produce a SiftError
pub type SiftResult<T> = std::result::Result<T, SiftError>;
