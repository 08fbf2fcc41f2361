//! pricesift library crate
//!
//! This is the library component of pricesift, containing the core
//! functionality for a command-line tool that filters product CSV files by
//! price. The library provides:
//!
//! - A concurrent-safe, append-only in-memory record store
//! - CSV ingestion with case-insensitive required-column matching and
//!   tolerant price parsing (rows with unparsable prices are dropped)
//! - Directory and multi-worker ingestion
//! - Price comparison queries (`<`, `=`, `>`) over point-in-time snapshots
//! - Table and JSON rendering of results
//!
//! The store is always passed explicitly; there is no global state.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod output;
pub mod query;
pub mod record;
pub mod store;
