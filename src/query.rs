//! Price predicates evaluated over store snapshots
//!
//! Queries never touch the store directly. They take a slice of records (a
//! snapshot, or the store's contents while its read lock is held) and return
//! the matching records as a new vector.
//!
//! Equality on price is exact `f64` comparison. A price read as `19.99`
//! matches a threshold of `19.99`, but values produced by arithmetic may not.

use std::fmt;
use std::str::FromStr;

use crate::error::SiftError;
use crate::record::Record;

/// Comparison operator applied as `price <op> threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOp {
    /// `<`
    Less,
    /// `=`
    Equal,
    /// `>`
    Greater,
}

impl PriceOp {
    /// Map an operator symbol to a `PriceOp`, or `None` if it is not `<`, `=` or `>`
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(PriceOp::Less),
            "=" => Some(PriceOp::Equal),
            ">" => Some(PriceOp::Greater),
            _ => None,
        }
    }

    /// The symbol this operator is written as on the command line
    pub fn symbol(&self) -> &'static str {
        match self {
            PriceOp::Less => "<",
            PriceOp::Equal => "=",
            PriceOp::Greater => ">",
        }
    }

    /// Whether `price <op> threshold` holds
    pub fn matches(&self, price: f64, threshold: f64) -> bool {
        match self {
            PriceOp::Less => price < threshold,
            PriceOp::Equal => price == threshold,
            PriceOp::Greater => price > threshold,
        }
    }
}

impl FromStr for PriceOp {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceOp::parse(s).ok_or_else(|| SiftError::InvalidOperator(s.to_string()))
    }
}

impl fmt::Display for PriceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Return every record whose price satisfies `op` against `threshold`
///
/// # Arguments
/// * `records` - Snapshot to evaluate
/// * `op` - Comparison operator
/// * `threshold` - Right-hand side of the comparison
///
/// # Returns
/// * The matching records in snapshot order; empty when nothing matches
pub fn evaluate(records: &[Record], op: PriceOp, threshold: f64) -> Vec<Record> {
    records
        .iter()
        .filter(|record| op.matches(record.price, threshold))
        .cloned()
        .collect()
}

/// Like [`evaluate`], but takes the operator as its symbol
///
/// An unrecognised symbol matches nothing. Rejecting bad operators is left to
/// the caller, which validates them during configuration.
pub fn filter_by_symbol(records: &[Record], symbol: &str, threshold: f64) -> Vec<Record> {
    match PriceOp::parse(symbol) {
        Some(op) => evaluate(records, op, threshold),
        None => Vec::new(),
    }
}

/// Keep only records whose category equals `category` exactly
pub fn filter_category(records: Vec<Record>, category: &str) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| record.category == category)
        .collect()
}

/// The lowest-priced record, the earliest one winning ties
pub fn cheapest(records: &[Record]) -> Option<&Record> {
    records.iter().fold(None, |best: Option<&Record>, record| match best {
        Some(current) if current.price <= record.price => Some(current),
        _ => Some(record),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("A1", "lamp", 19.99),
            Record::new("A2", "chair", 49.00),
            Record::new("A3", "lamp", 5.0),
            Record::new("A4", "desk", 19.99),
        ]
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(PriceOp::parse("<"), Some(PriceOp::Less));
        assert_eq!(PriceOp::parse("="), Some(PriceOp::Equal));
        assert_eq!(PriceOp::parse(">"), Some(PriceOp::Greater));
        assert_eq!(PriceOp::parse(">="), None);
        assert_eq!(PriceOp::parse(""), None);
        assert!(matches!(
            "!=".parse::<PriceOp>(),
            Err(SiftError::InvalidOperator(op)) if op == "!="
        ));
    }

    #[test]
    fn test_evaluate_each_operator() {
        let records = sample();

        let below = evaluate(&records, PriceOp::Less, 20.0);
        let ids: Vec<&str> = below.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A3", "A4"]);

        let above = evaluate(&records, PriceOp::Greater, 20.0);
        assert_eq!(above, vec![Record::new("A2", "chair", 49.00)]);

        let equal = evaluate(&records, PriceOp::Equal, 19.99);
        assert_eq!(equal.len(), 2);
    }

    #[test]
    fn test_operators_partition_records() {
        let records = sample();
        for threshold in [0.0, 5.0, 19.99, 20.0, 49.0, 100.0] {
            let less = evaluate(&records, PriceOp::Less, threshold);
            let equal = evaluate(&records, PriceOp::Equal, threshold);
            let greater = evaluate(&records, PriceOp::Greater, threshold);
            assert_eq!(less.len() + equal.len() + greater.len(), records.len());
            for record in &records {
                let hits = [&less, &equal, &greater]
                    .iter()
                    .filter(|group| group.contains(record))
                    .count();
                assert_eq!(hits, 1, "{record:?} at threshold {threshold}");
            }
        }
    }

    #[test]
    fn test_equality_is_exact() {
        let records = vec![Record::new("X", "misc", 0.1 + 0.2)];
        assert!(evaluate(&records, PriceOp::Equal, 0.3).is_empty());
    }

    #[test]
    fn test_unknown_symbol_matches_nothing() {
        assert!(filter_by_symbol(&sample(), ">=", 1.0).is_empty());
        assert_eq!(filter_by_symbol(&sample(), ">", 1.0).len(), 4);
    }

    #[test]
    fn test_cheapest_prefers_first_on_tie() {
        let records = vec![
            Record::new("B1", "lamp", 7.5),
            Record::new("B2", "lamp", 3.0),
            Record::new("B3", "lamp", 3.0),
        ];
        assert_eq!(cheapest(&records).map(|r| r.identifier.as_str()), Some("B2"));
        assert!(cheapest(&[]).is_none());
    }

    #[test]
    fn test_filter_category() {
        let lamps = filter_category(sample(), "lamp");
        assert_eq!(lamps.len(), 2);
        assert!(lamps.iter().all(|r| r.category == "lamp"));
    }
}
