//! Result presentation
//!
//! Renders query results either as a fixed-width table or as a pretty-printed
//! JSON array. Both renderers write to any `io::Write` so the binary can
//! target stdout and tests can target a buffer.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::SiftResult;
use crate::record::Record;

/// Output formats supported by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Fixed-width text table
    Table,
    /// JSON array of records
    Json,
}

/// Message printed in table mode when nothing matched
pub const NO_MATCHES: &str = "No matching products.";

/// Write `records` as a fixed-width table
pub fn write_table<W: Write>(out: &mut W, records: &[Record]) -> SiftResult<()> {
    if records.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(());
    }

    writeln!(out, "{:<15} {:<20} {:<15}", "CompanyID", "Kind", "Price")?;
    writeln!(out, "{}", "-".repeat(85))?;
    for record in records {
        writeln!(
            out,
            "{:<15} {:<20} {:>10.2}",
            record.identifier, record.category, record.price
        )?;
    }
    Ok(())
}

/// Write `records` as a JSON array indented by one space, followed by a newline
pub fn write_json<W: Write>(out: &mut W, records: &[Record]) -> SiftResult<()> {
    let mut serializer = Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b" "));
    records.serialize(&mut serializer)?;
    writeln!(out)?;
    Ok(())
}

/// Write `records` in the requested format
pub fn render<W: Write>(out: &mut W, records: &[Record], format: OutputFormat) -> SiftResult<()> {
    match format {
        OutputFormat::Table => write_table(out, records),
        OutputFormat::Json => write_json(out, records),
    }
}
