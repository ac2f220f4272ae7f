//! Store statistics.
//!
//! # Usage
//!
//! ```rust
//! use nestkv_core::TransactionalStore;
//!
//! let mut store = TransactionalStore::new();
//! store.set("k1", "v1");
//! store.begin().unwrap();
//! store.delete("k1");
//! store.rollback().unwrap();
//!
//! let stats = store.stats().snapshot();
//! assert_eq!(stats.writes, 1);
//! assert_eq!(stats.transactions_rolled_back, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Store statistics and metrics.
///
/// All counters are atomic so they can be read through a shared reference.
/// Values are monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    // Operation counters
    /// Total number of `get`, `get_opt` and `try_get` calls.
    reads: AtomicU64,
    /// Total number of `set` calls.
    writes: AtomicU64,
    /// Total number of `delete` calls.
    deletes: AtomicU64,

    // Transaction counters
    /// Total number of frames pushed.
    transactions_started: AtomicU64,
    /// Total number of frames committed.
    transactions_committed: AtomicU64,
    /// Total number of frames rolled back.
    transactions_rolled_back: AtomicU64,

    // Undo log counters
    /// Total undo records appended.
    undo_records: AtomicU64,
    /// Total undo records applied during rollback.
    undo_records_applied: AtomicU64,

    // Error counters
    /// Total number of errors returned.
    errors: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    // === Increment methods (internal use) ===

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_begin(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a rollback that applied `applied` undo records.
    pub(crate) fn record_rollback(&self, applied: u64) {
        self.transactions_rolled_back.fetch_add(1, Ordering::Relaxed);
        self.undo_records_applied
            .fetch_add(applied, Ordering::Relaxed);
    }

    pub(crate) fn record_undo(&self) {
        self.undo_records.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    // === Getter methods (public API) ===

    /// Returns the total number of `get`, `get_opt` and `try_get` calls.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the total number of writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the total number of deletes.
    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions started.
    pub fn transactions_started(&self) -> u64 {
        self.transactions_started.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions committed.
    pub fn transactions_committed(&self) -> u64 {
        self.transactions_committed.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions rolled back.
    pub fn transactions_rolled_back(&self) -> u64 {
        self.transactions_rolled_back.load(Ordering::Relaxed)
    }

    /// Returns the total number of undo records appended.
    pub fn undo_records(&self) -> u64 {
        self.undo_records.load(Ordering::Relaxed)
    }

    /// Returns the total number of undo records applied by rollbacks.
    pub fn undo_records_applied(&self) -> u64 {
        self.undo_records_applied.load(Ordering::Relaxed)
    }

    /// Returns the total number of errors.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads(),
            writes: self.writes(),
            deletes: self.deletes(),
            transactions_started: self.transactions_started(),
            transactions_committed: self.transactions_committed(),
            transactions_rolled_back: self.transactions_rolled_back(),
            undo_records: self.undo_records(),
            undo_records_applied: self.undo_records_applied(),
            errors: self.errors(),
        }
    }
}

/// A point-in-time snapshot of store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Total number of reads.
    pub reads: u64,
    /// Total number of writes.
    pub writes: u64,
    /// Total number of deletes.
    pub deletes: u64,
    /// Total number of transactions started.
    pub transactions_started: u64,
    /// Total number of transactions committed.
    pub transactions_committed: u64,
    /// Total number of transactions rolled back.
    pub transactions_rolled_back: u64,
    /// Total undo records appended.
    pub undo_records: u64,
    /// Total undo records applied by rollbacks.
    pub undo_records_applied: u64,
    /// Total number of errors.
    pub errors: u64,
}
