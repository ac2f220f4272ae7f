//! Test fixtures and store helpers.

use crate::model::store_contents;
use nestkv_core::{Config, TransactionalStore};
use std::collections::BTreeMap;

/// Creates a store pre-populated with `pairs`, outside any transaction.
pub fn store_with(pairs: &[(&str, &str)]) -> TransactionalStore {
    store_with_config(Config::default(), pairs)
}

/// Creates a store with the given configuration pre-populated with `pairs`.
pub fn store_with_config(config: Config, pairs: &[(&str, &str)]) -> TransactionalStore {
    let mut store = TransactionalStore::with_config(config);
    for (key, value) in pairs {
        store.set(*key, *value);
    }
    store
}

/// Runs a test with a fresh default store.
///
/// # Example
///
/// ```rust
/// use nestkv_testkit::with_store;
///
/// with_store(|store| {
///     store.set("k", "v");
///     assert_eq!(store.get("k"), "v");
/// });
/// ```
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut TransactionalStore) -> R,
{
    let mut store = TransactionalStore::new();
    f(&mut store)
}

/// Asserts that the store holds exactly `pairs`.
///
/// # Panics
///
/// Panics with both maps printed if the contents differ.
pub fn assert_contents(store: &TransactionalStore, pairs: &[(&str, &str)]) {
    let expected: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(store_contents(store), expected, "store contents differ");
}
