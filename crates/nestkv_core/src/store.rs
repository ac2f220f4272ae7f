//! The transactional key-value store.

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::stats::StoreStats;
use crate::transaction::{Frame, UndoRecord};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// In-process key-value store with nested transactions.
///
/// Every mutation is applied to the live map immediately. While at least one
/// transaction is active, the topmost [`Frame`] also records how to reverse
/// it, so reads always observe in-progress work and commits never touch
/// the data.
///
/// ## Empty-stack policy
///
/// By default `commit` and `rollback` with no active transaction are silent
/// no-ops. With [`Config::strict`] they return
/// [`StoreError::NoActiveTransaction`].
///
/// # Example
///
/// ```rust
/// use nestkv_core::TransactionalStore;
///
/// let mut store = TransactionalStore::new();
/// store.set("k1", "v1");
///
/// store.begin().unwrap();
/// store.set("k1", "v2");
/// store.set("k2", "v1");
/// assert_eq!(store.get("k1"), "v2");
/// store.rollback().unwrap();
///
/// assert_eq!(store.get("k1"), "v1");
/// assert_eq!(store.get("k2"), "");
/// ```
pub struct TransactionalStore {
    /// Live state, including uncommitted work.
    data: HashMap<String, String>,
    /// Active transactions, innermost last.
    frames: Vec<Frame>,
    config: Config,
    stats: StoreStats,
}

impl TransactionalStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            data: HashMap::with_capacity(config.initial_capacity),
            frames: Vec::new(),
            config,
            stats: StoreStats::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the operation counters.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    // ========== Reads ==========

    /// Returns the current value of `key`, or `""` if it is absent.
    pub fn get(&self, key: &str) -> &str {
        self.get_opt(key).unwrap_or("")
    }

    /// Returns the current value of `key`, or `None` if it is absent.
    ///
    /// Unlike [`get`](Self::get) this tells an absent key apart from one
    /// holding the empty string.
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.stats.record_read();
        self.data.get(key).map(String::as_str)
    }

    /// Returns the current value of `key`, failing if it is absent.
    pub fn try_get(&self, key: &str) -> StoreResult<&str> {
        self.get_opt(key).ok_or_else(|| {
            self.stats.record_error();
            StoreError::key_not_found(key)
        })
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the number of keys present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over the present keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Iterates over the present entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // ========== Writes ==========

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        trace!(key = %key, depth = self.frames.len(), "set");
        self.stats.record_write();

        match self.frames.last_mut() {
            Some(frame) => {
                let previous = self.data.insert(key.clone(), value.into());
                frame.record(UndoRecord::capture(key, previous));
                self.stats.record_undo();
            }
            None => {
                self.data.insert(key, value.into());
            }
        }
    }

    /// Removes `key`. Removing an absent key is a no-op on the data, but
    /// inside a transaction it is still recorded so rollback restores the
    /// absence exactly.
    pub fn delete(&mut self, key: &str) {
        trace!(key, depth = self.frames.len(), "delete");
        self.stats.record_delete();

        let previous = self.data.remove(key);
        if let Some(frame) = self.frames.last_mut() {
            frame.record(UndoRecord::capture(key, previous));
            self.stats.record_undo();
        }
    }

    // ========== Transaction Lifecycle ==========

    /// Returns the number of active transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if at least one transaction is active.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Returns the innermost active frame.
    #[must_use]
    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Begins a new (possibly nested) transaction.
    ///
    /// Only fails if [`Config::max_depth`] is set and already reached.
    pub fn begin(&mut self) -> StoreResult<()> {
        if let Some(limit) = self.config.max_depth {
            if self.frames.len() >= limit {
                warn!(limit, "transaction depth limit reached");
                self.stats.record_error();
                return Err(StoreError::DepthLimitExceeded { limit });
            }
        }

        self.frames.push(Frame::new());
        self.stats.record_begin();
        debug!(depth = self.frames.len(), "transaction started");
        Ok(())
    }

    /// Commits the innermost transaction.
    ///
    /// Its changes are already live. If an enclosing transaction is open,
    /// the committed frame's undo records are appended to it, so rolling the
    /// enclosing transaction back still reverses the committed work. At
    /// depth 0 the records are discarded.
    pub fn commit(&mut self) -> StoreResult<()> {
        if self.commit_top() {
            Ok(())
        } else {
            self.on_empty_stack("commit")
        }
    }

    /// Rolls back the innermost transaction, restoring the state as of its
    /// `begin`.
    pub fn rollback(&mut self) -> StoreResult<()> {
        if self.rollback_top() {
            Ok(())
        } else {
            self.on_empty_stack("rollback")
        }
    }

    /// Commits every active transaction, returning how many were closed.
    ///
    /// Once the outermost frame closes nothing can be undone, so the undo
    /// logs are dropped without merging.
    pub fn commit_all(&mut self) -> usize {
        let closed = self.frames.len();
        for _ in 0..closed {
            self.stats.record_commit();
        }
        self.frames.clear();
        if closed > 0 {
            debug!(closed, "all transactions committed");
        }
        closed
    }

    /// Rolls back every active transaction, returning how many were closed.
    pub fn rollback_all(&mut self) -> usize {
        let mut closed = 0;
        while self.rollback_top() {
            closed += 1;
        }
        closed
    }

    /// Executes a function within a nested transaction.
    ///
    /// If the function returns `Ok`, the transaction is committed.
    /// If it returns `Err`, the transaction is rolled back. Any frames the
    /// function left open inside it are closed the same way.
    ///
    /// Frames the function closes itself are not reopened: if it commits
    /// the frame opened here and then returns `Err`, the error is returned
    /// but the committed work stays live (or merged into the enclosing
    /// transaction, if any).
    ///
    /// # Example
    ///
    /// ```rust
    /// use nestkv_core::{StoreError, TransactionalStore};
    ///
    /// let mut store = TransactionalStore::new();
    /// let result: Result<(), _> = store.transaction(|tx| {
    ///     tx.set("k1", "v1");
    ///     Err(StoreError::aborted("changed my mind"))
    /// });
    ///
    /// assert!(result.is_err());
    /// assert!(!store.contains_key("k1"));
    /// ```
    pub fn transaction<F, T>(&mut self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Self) -> StoreResult<T>,
    {
        self.begin()?;
        let depth = self.frames.len();

        let result = f(self);
        while self.frames.len() >= depth {
            if result.is_ok() {
                self.commit_top();
            } else {
                self.rollback_top();
            }
        }
        result
    }

    fn commit_top(&mut self) -> bool {
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        self.stats.record_commit();
        let records = frame.len();
        match self.frames.last_mut() {
            Some(parent) => {
                parent.absorb(frame);
                debug!(
                    depth = self.frames.len(),
                    merged = records,
                    "transaction committed into parent"
                );
            }
            None => {
                debug!(depth = 0, discarded = records, "transaction committed");
            }
        }
        true
    }

    fn rollback_top(&mut self) -> bool {
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        let applied = frame.unwind(&mut self.data);
        self.stats.record_rollback(applied as u64);
        debug!(depth = self.frames.len(), applied, "transaction rolled back");
        true
    }

    fn on_empty_stack(&self, operation: &'static str) -> StoreResult<()> {
        if self.config.strict {
            warn!(operation, "no active transaction");
            self.stats.record_error();
            Err(StoreError::no_active_transaction(operation))
        } else {
            debug!(operation, "no active transaction, ignoring");
            Ok(())
        }
    }
}

impl Default for TransactionalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransactionalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalStore")
            .field("len", &self.data.len())
            .field("depth", &self.frames.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
