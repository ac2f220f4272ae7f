//! Error types for NestKV.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// With the default [`Config`](crate::Config) none of these are produced by
/// the baseline operations: `get` reads absent keys as `""`, and `commit` /
/// `rollback` without an active transaction are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `commit` or `rollback` was called with no active transaction while
    /// the strict policy is enabled.
    #[error("no active transaction to {operation}")]
    NoActiveTransaction {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Key is absent from the store.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// `begin` would exceed the configured nesting limit.
    #[error("transaction depth limit of {limit} exceeded")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A transaction closure asked for its work to be rolled back.
    #[error("transaction aborted: {reason}")]
    Aborted {
        /// Reason for abort.
        reason: String,
    },
}

impl StoreError {
    /// Creates a no active transaction error.
    pub fn no_active_transaction(operation: &'static str) -> Self {
        Self::NoActiveTransaction { operation }
    }

    /// Creates a key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Creates an aborted error.
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: reason.into(),
        }
    }
}
