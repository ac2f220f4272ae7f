//! Property-based test generators using proptest.
//!
//! Provides strategies for generating operation sequences that exercise
//! nested transactions.

use nestkv_core::{StoreResult, TransactionalStore};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

/// Strategy for generating keys from a small pool, so that generated
/// operations frequently touch the same key.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("k[0-4]").expect("Invalid regex")
}

/// Strategy for generating values, including the empty string.
pub fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{0,6}").expect("Invalid regex")
}

/// A single store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StoreOperation {
    /// Set a key
    Set {
        /// Key
        key: String,
        /// Value
        value: String,
    },
    /// Delete a key
    Delete {
        /// Key
        key: String,
    },
    /// Read a key
    Get {
        /// Key
        key: String,
    },
    /// Begin a transaction
    Begin,
    /// Commit the innermost transaction
    Commit,
    /// Roll back the innermost transaction
    Rollback,
}

impl StoreOperation {
    /// Creates a set operation.
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a delete operation.
    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete { key: key.into() }
    }

    /// Creates a get operation.
    pub fn get(key: impl Into<String>) -> Self {
        Self::Get { key: key.into() }
    }

    /// Applies the operation to a store.
    ///
    /// Returns the value read for [`StoreOperation::Get`], `None` otherwise.
    /// Transaction control errors (strict policy, depth limit) are returned.
    pub fn apply(&self, store: &mut TransactionalStore) -> StoreResult<Option<String>> {
        match self {
            Self::Set { key, value } => store.set(key.as_str(), value.as_str()),
            Self::Delete { key } => store.delete(key),
            Self::Get { key } => return Ok(Some(store.get(key).to_owned())),
            Self::Begin => store.begin()?,
            Self::Commit => store.commit()?,
            Self::Rollback => store.rollback()?,
        }
        Ok(None)
    }
}

/// Strategy for generating a single operation.
///
/// Transaction control is weighted lower than data operations, and
/// commit/rollback may be generated with no active transaction.
pub fn operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| StoreOperation::Set { key, value }),
        2 => key_strategy().prop_map(|key| StoreOperation::Delete { key }),
        2 => key_strategy().prop_map(|key| StoreOperation::Get { key }),
        1 => Just(StoreOperation::Begin),
        1 => Just(StoreOperation::Commit),
        1 => Just(StoreOperation::Rollback),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestkv_core::{Config, StoreError};

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn keys_come_from_small_pool(key in key_strategy()) {
            prop_assert_eq!(key.len(), 2);
            prop_assert!(key.starts_with('k'));
        }

        #[test]
        fn sequence_respects_bounds(ops in operation_sequence_strategy(5, 20)) {
            prop_assert!(ops.len() >= 5);
            prop_assert!(ops.len() < 20);
        }
    }

    #[test]
    fn apply_returns_reads_only() {
        let mut store = TransactionalStore::new();
        assert_eq!(StoreOperation::set("k", "v").apply(&mut store), Ok(None));
        assert_eq!(
            StoreOperation::get("k").apply(&mut store),
            Ok(Some("v".to_string()))
        );
        assert_eq!(StoreOperation::Begin.apply(&mut store), Ok(None));
        assert_eq!(store.depth(), 1);
    }

    #[test]
    fn apply_surfaces_strict_errors() {
        let mut store = TransactionalStore::with_config(Config::new().strict(true));
        assert_eq!(
            StoreOperation::Commit.apply(&mut store),
            Err(StoreError::no_active_transaction("commit"))
        );

        let mut store = TransactionalStore::with_config(Config::new().max_depth(1));
        StoreOperation::Begin.apply(&mut store).unwrap();
        assert_eq!(
            StoreOperation::Begin.apply(&mut store),
            Err(StoreError::DepthLimitExceeded { limit: 1 })
        );
    }

    #[test]
    fn operation_json_shape() {
        let json = serde_json::to_string(&StoreOperation::set("k1", "v1")).unwrap();
        assert_eq!(json, r#"{"op":"set","key":"k1","value":"v1"}"#);

        let op: StoreOperation = serde_json::from_str(r#"{"op":"rollback"}"#).unwrap();
        assert_eq!(op, StoreOperation::Rollback);
    }
}
