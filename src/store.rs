//! In-memory record store
//!
//! The store is the only shared mutable state in pricesift. Ingestion workers
//! append to it concurrently and queries read from it. Every read returns an
//! owned copy, so a caller holding a snapshot never sees later appends and
//! cannot reach the store's internal vector.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::query::{self, PriceOp};
use crate::record::Record;

/// Common interface for record stores
///
/// Ingestion is written against this trait so that callers pass the store in
/// explicitly. Implementations must be safe to share between threads.
pub trait PriceStore: Send + Sync {
    /// Append one record
    fn add(&self, record: Record);

    /// Snapshot of every record, in insertion order
    fn all(&self) -> Vec<Record>;

    /// Snapshot of the records satisfying `price <op> value`
    ///
    /// `op` is one of `<`, `=` or `>`. Any other symbol matches nothing.
    fn filter_by_price(&self, op: &str, value: f64) -> Vec<Record>;

    /// Number of records currently stored
    fn len(&self) -> usize;

    /// Whether the store holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append-only store backed by a read-write lock
///
/// Readers share the lock; each append takes it exclusively, so a reader
/// observes either all of an append or none of it.
#[derive(Debug, Default)]
pub struct MemStore {
    records: RwLock<Vec<Record>>,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemStore {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the records satisfying `op`
    pub fn filter(&self, op: PriceOp, value: f64) -> Vec<Record> {
        query::evaluate(&self.read(), op, value)
    }

    // Appends are a single `push`, which leaves the vector intact even if a
    // writer panics, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Record>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Record>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PriceStore for MemStore {
    fn add(&self, record: Record) {
        self.write().push(record);
    }

    fn all(&self) -> Vec<Record> {
        self.read().clone()
    }

    fn filter_by_price(&self, op: &str, value: f64) -> Vec<Record> {
        query::filter_by_symbol(&self.read(), op, value)
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = MemStore::new();
        assert!(store.is_empty());
        assert!(store.all().is_empty());
        assert!(store.filter_by_price("<", 100.0).is_empty());
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let store = MemStore::new();
        store.add(Record::new("A", "lamp", 3.0));
        store.add(Record::new("B", "lamp", 1.0));
        store.add(Record::new("A", "desk", 2.0));

        let ids: Vec<String> = store.all().into_iter().map(|r| r.identifier).collect();
        assert_eq!(ids, vec!["A", "B", "A"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let store = MemStore::new();
        store.add(Record::new("A", "lamp", 3.0));

        let mut snapshot = store.all();
        store.add(Record::new("B", "lamp", 4.0));
        assert_eq!(snapshot.len(), 1);

        snapshot[0].price = 999.0;
        snapshot.clear();
        assert_eq!(store.all()[0].price, 3.0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_filter_matches_symbol_filter() {
        let store = MemStore::new();
        store.add(Record::new("A", "lamp", 3.0));
        store.add(Record::new("B", "lamp", 10.0));
        assert_eq!(store.filter(PriceOp::Greater, 5.0), store.filter_by_price(">", 5.0));
        assert!(store.filter_by_price("~", 5.0).is_empty());
    }
}
