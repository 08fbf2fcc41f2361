//! The record type held by the store
//!
//! A `Record` is one accepted data row. It is plain data: the store hands out
//! clones and never mutates a record once it has been added.

use serde::Serialize;

/// One product row: external identifier, category label and price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Opaque external key; the store does not require it to be unique
    #[serde(rename = "company_id")]
    pub identifier: String,

    /// Free-form classification label, e.g. "desk lamp"
    #[serde(rename = "kind")]
    pub category: String,

    /// Numeric price, already stripped of its currency symbol
    pub price: f64,
}

impl Record {
    /// Create a new record
    pub fn new(identifier: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Record {
            identifier: identifier.into(),
            category: category.into(),
            price,
        }
    }
}
