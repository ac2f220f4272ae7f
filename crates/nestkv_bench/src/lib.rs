//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use nestkv_core::TransactionalStore;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate a random alphanumeric string of the specified length.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate `count` distinct keys.
pub fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i:08}")).collect()
}

/// Generate `count` key/value pairs with values of `value_len` bytes.
pub fn generate_entries(count: usize, value_len: usize) -> Vec<(String, String)> {
    generate_keys(count)
        .into_iter()
        .map(|key| (key, random_string(value_len)))
        .collect()
}

/// Create a store populated outside any transaction.
pub fn populated_store(entries: &[(String, String)]) -> TransactionalStore {
    let mut store = TransactionalStore::new();
    for (key, value) in entries {
        store.set(key.as_str(), value.as_str());
    }
    store
}
