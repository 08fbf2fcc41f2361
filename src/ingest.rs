//! CSV ingestion for pricesift
//!
//! This module turns comma-separated sources into records and appends them to
//! a [`PriceStore`]. It provides:
//!
//! - Header matching against the three required logical columns
//! - Tolerant price parsing that drops rows whose price is not a number
//! - Leading whitespace of every field ignored, including before an opening
//!   quote, so `A1, "desk, lamp"` reads as two fields
//! - Single-source, directory and multi-worker ingestion
//!
//! Each source is parsed completely before any of its rows are appended, so a
//! source that fails (missing column, unreadable file, broken CSV structure)
//! adds nothing to the store. Ingestion is not transactional across sources:
//! files loaded before a failure stay loaded.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{SiftError, SiftResult};
use crate::record::Record;
use crate::store::PriceStore;

/// What every source must look like: its three required header names and
/// the currency symbol its prices may carry
///
/// Names are compared case-insensitively with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSchema {
    /// Column holding the record identifier
    pub identifier: String,
    /// Column holding the category label
    pub category: String,
    /// Column holding the price
    pub price: String,
    /// Currency symbol stripped from price fields before parsing
    pub currency: String,
}

impl SourceSchema {
    /// Create a schema from explicit header names and currency symbol
    pub fn new(
        identifier: impl Into<String>,
        category: impl Into<String>,
        price: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        SourceSchema {
            identifier: normalize(&identifier.into()),
            category: normalize(&category.into()),
            price: normalize(&price.into()),
            currency: currency.into(),
        }
    }
}

impl Default for SourceSchema {
    fn default() -> Self {
        SourceSchema::new("companyid", "kind", "price", "$")
    }
}

/// Positions of the required columns within one source's header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    identifier: usize,
    category: usize,
    price: usize,
}

impl ColumnMap {
    /// Build the column map for a header row
    ///
    /// When a header name repeats, its last occurrence wins.
    ///
    /// # Arguments
    /// * `headers` - Header fields as read from the source
    /// * `schema` - Required column names
    /// * `source_name` - Name reported if a column is missing
    ///
    /// # Returns
    /// * `Ok(ColumnMap)` when all three required columns are present
    /// * `Err(SiftError::MissingColumn)` naming the first absent column otherwise
    pub fn from_headers<'a, I>(
        headers: I,
        schema: &SourceSchema,
        source_name: &str,
    ) -> SiftResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let index: HashMap<String, usize> = headers
            .into_iter()
            .enumerate()
            .map(|(i, name)| (normalize(name), i))
            .collect();

        let lookup = |column: &str| {
            index
                .get(column)
                .copied()
                .ok_or_else(|| SiftError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: column.to_string(),
                })
        };

        Ok(ColumnMap {
            identifier: lookup(&schema.identifier)?,
            category: lookup(&schema.category)?,
            price: lookup(&schema.price)?,
        })
    }

    /// Turn one data row into a record
    ///
    /// Fields past the end of a short row read as empty strings. Returns
    /// `None` when the price field does not parse, which drops the row.
    pub fn parse_row(&self, row: &csv::StringRecord, currency: &str) -> Option<Record> {
        let field = |i: usize| row.get(i).unwrap_or("");
        let price = parse_price(field(self.price), currency)?;
        Some(Record::new(field(self.identifier), field(self.category), price))
    }
}

/// Parse a price field, tolerating a currency symbol and padding
///
/// Every occurrence of `currency` is removed and surrounding whitespace
/// trimmed before parsing. Returns `None` for anything that is not a finite
/// number.
pub fn parse_price(raw: &str, currency: &str) -> Option<f64> {
    let stripped = if currency.is_empty() {
        raw.to_string()
    } else {
        raw.replace(currency, "")
    };
    stripped
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

/// Drop whitespace at the start of every field, ahead of quote parsing
///
/// A field starts at the beginning of the input, after an unquoted comma and
/// after an unquoted line break. Whitespace there is removed up to the first
/// other character, so a quote that follows it still opens a quoted field.
/// Whitespace inside quotes, or after a field's first character, is kept.
/// Line breaks are never removed.
pub fn trim_leading_space(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut at_field_start = true;
    let mut quoted = false;

    while let Some(c) = chars.next() {
        if at_field_start {
            if c.is_whitespace() && c != '\n' && c != '\r' {
                continue;
            }
            at_field_start = false;
            if c == '"' {
                quoted = true;
                out.push(c);
                continue;
            }
        }

        out.push(c);
        if quoted {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    out.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            }
        } else if c == ',' || c == '\n' {
            at_field_start = true;
        }
    }
    out
}

/// Row counts produced by an ingestion call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Sources successfully ingested
    pub sources: usize,
    /// Rows added to the store
    pub accepted: usize,
    /// Rows discarded because their price did not parse
    pub dropped: usize,
}

impl AddAssign for IngestStats {
    fn add_assign(&mut self, other: Self) {
        self.sources += other.sources;
        self.accepted += other.accepted;
        self.dropped += other.dropped;
    }
}

/// Ingest CSV text from any reader
///
/// The whole source is read and parsed first; records are then appended one
/// `add` call per row. On any error nothing from this source is appended.
/// Field values have their leading whitespace removed by
/// [`trim_leading_space`] before CSV parsing.
///
/// # Arguments
/// * `source_name` - Name used in error messages and logs
/// * `reader` - Comma-separated text with a header row
/// * `store` - Store receiving the records
/// * `schema` - Required column names and currency symbol
pub fn ingest_reader<R, S>(
    source_name: &str,
    mut reader: R,
    store: &S,
    schema: &SourceSchema,
) -> SiftResult<IngestStats>
where
    R: Read,
    S: PriceStore + ?Sized,
{
    let csv_error = |source: csv::Error| SiftError::Csv {
        path: PathBuf::from(source_name),
        source,
    };

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| SiftError::Io {
            path: PathBuf::from(source_name),
            source,
        })?;
    let text = trim_leading_space(&text);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let map = {
        let headers = csv_reader.headers().map_err(csv_error)?;
        ColumnMap::from_headers(headers.iter(), schema, source_name)?
    };

    let mut records = Vec::new();
    let mut dropped = 0;
    for result in csv_reader.records() {
        let row = result.map_err(csv_error)?;
        match map.parse_row(&row, &schema.currency) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    let accepted = records.len();
    for record in records {
        store.add(record);
    }

    debug!(source = source_name, accepted, dropped, "ingested source");
    Ok(IngestStats {
        sources: 1,
        accepted,
        dropped,
    })
}

/// Ingest one CSV file
///
/// # Returns
/// * `Ok(IngestStats)` for the file
/// * `Err(SiftError::Io)` if the file cannot be opened, with its path attached
/// * Any error from [`ingest_reader`]
pub fn ingest_source<S>(path: &Path, store: &S, schema: &SourceSchema) -> SiftResult<IngestStats>
where
    S: PriceStore + ?Sized,
{
    let file = File::open(path).map_err(|source| SiftError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path.display().to_string();
    ingest_reader(&name, BufReader::new(file), store, schema)
}

/// Whether a path names a CSV source, judged by a case-insensitive `.csv` suffix
pub fn is_csv_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_lowercase().ends_with(".csv"))
        .unwrap_or(false)
}

/// Walk `dir` recursively, yielding CSV file paths in sorted walk order
///
/// The callback runs for each CSV file as it is found. The walk stops at the
/// first traversal or callback error and returns it.
fn walk_csv<F>(dir: &Path, mut visit: F) -> SiftResult<()>
where
    F: FnMut(&Path) -> SiftResult<()>,
{
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| SiftError::Walk {
            path: source.path().unwrap_or(dir).to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        if !is_csv_path(entry.path()) {
            trace!(path = %entry.path().display(), "skipping non-CSV file");
            continue;
        }
        visit(entry.path())?;
    }
    Ok(())
}

/// Collect every CSV file under `dir`, stopping at the first traversal error
pub fn collect_csv_paths(dir: &Path) -> SiftResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    walk_csv(dir, |path| {
        paths.push(path.to_path_buf());
        Ok(())
    })?;
    Ok(paths)
}

/// Ingest every CSV file under `dir`, one at a time in walk order
///
/// Non-CSV files are skipped. The first traversal or ingestion error aborts
/// the walk; files ingested before it remain in the store.
pub fn ingest_directory<S>(dir: &Path, store: &S, schema: &SourceSchema) -> SiftResult<IngestStats>
where
    S: PriceStore + ?Sized,
{
    let mut total = IngestStats::default();
    walk_csv(dir, |path| {
        total += ingest_source(path, store, schema)?;
        Ok(())
    })?;
    Ok(total)
}

/// Ingest a list of CSV files using up to `jobs` concurrent workers
///
/// Workers claim paths from a shared cursor and write into the same store.
/// After the first failure no further paths are claimed; sources already
/// ingested remain. When several sources fail, the error for the one earliest
/// in `paths` is returned. A `jobs` of 0 is treated as 1.
pub fn ingest_sources<S>(
    paths: &[PathBuf],
    store: &S,
    schema: &SourceSchema,
    jobs: usize,
) -> SiftResult<IngestStats>
where
    S: PriceStore + ?Sized,
{
    let workers = jobs.clamp(1, paths.len().max(1));
    let cursor = &AtomicUsize::new(0);
    let failed = &AtomicBool::new(false);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(move |_| {
                scope.spawn(move || {
                    let mut stats = IngestStats::default();
                    while !failed.load(Ordering::Acquire) {
                        let index = cursor.fetch_add(1, Ordering::AcqRel);
                        let Some(path) = paths.get(index) else {
                            break;
                        };
                        match ingest_source(path, store, schema) {
                            Ok(source_stats) => stats += source_stats,
                            Err(e) => {
                                failed.store(true, Ordering::Release);
                                return Err((index, e));
                            }
                        }
                    }
                    Ok(stats)
                })
            })
            .collect();

        let mut total = IngestStats::default();
        let mut first_error: Option<(usize, SiftError)> = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(stats)) => total += stats,
                Ok(Err((index, e))) => {
                    let earlier_known = matches!(&first_error, Some((earliest, _)) if *earliest < index);
                    if !earlier_known {
                        first_error = Some((index, e));
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }

        match first_error {
            Some((_, e)) => Err(e),
            None => Ok(total),
        }
    })
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
