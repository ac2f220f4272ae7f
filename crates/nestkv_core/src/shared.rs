//! Shared, lock-guarded access to a store.

use crate::config::Config;
use crate::error::StoreResult;
use crate::store::TransactionalStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// A [`TransactionalStore`] behind a single exclusive lock.
///
/// The store and its frame stack are guarded together. Individual calls each
/// take the lock once, so two callers issuing `begin` / `commit` separately
/// still share one frame stack. Use [`with`](Self::with) or
/// [`transaction`](Self::transaction) to hold the lock across a whole unit
/// of work.
///
/// # Example
///
/// ```rust
/// use nestkv_core::SharedStore;
///
/// let store = SharedStore::new();
/// let handle = store.clone();
///
/// std::thread::spawn(move || {
///     handle
///         .transaction(|tx| {
///             tx.set("k1", "v1");
///             Ok(())
///         })
///         .unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(store.get("k1"), "v1");
/// ```
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<TransactionalStore>>,
}

impl SharedStore {
    /// Creates an empty shared store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(TransactionalStore::new())
    }

    /// Creates an empty shared store with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::from_store(TransactionalStore::with_config(config))
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: TransactionalStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Returns an owned copy of the value of `key`, or `""` if absent.
    pub fn get(&self, key: &str) -> String {
        self.inner.lock().get(key).to_owned()
    }

    /// Sets `key` to `value`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().set(key, value);
    }

    /// Removes `key`.
    pub fn delete(&self, key: &str) {
        self.inner.lock().delete(key);
    }

    /// Begins a new transaction.
    pub fn begin(&self) -> StoreResult<()> {
        self.inner.lock().begin()
    }

    /// Commits the innermost transaction.
    pub fn commit(&self) -> StoreResult<()> {
        self.inner.lock().commit()
    }

    /// Rolls back the innermost transaction.
    pub fn rollback(&self) -> StoreResult<()> {
        self.inner.lock().rollback()
    }

    /// Returns the number of active transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.lock().depth()
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut TransactionalStore) -> T,
    {
        f(&mut *self.inner.lock())
    }

    /// Runs `f` inside a transaction while holding the lock.
    ///
    /// See [`TransactionalStore::transaction`].
    pub fn transaction<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut TransactionalStore) -> StoreResult<T>,
    {
        self.inner.lock().transaction(f)
    }

    /// Consumes the handle, returning the store if no other handle exists.
    pub fn try_into_inner(self) -> Result<TransactionalStore, Self> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner())
            .map_err(|inner| Self { inner })
    }
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}
