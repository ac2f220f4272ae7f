//! # NestKV Core
//!
//! In-process key-value store with nested transactions.
//!
//! This crate provides:
//! - [`TransactionalStore`]: string keys and values with `begin`, `commit`
//!   and `rollback` at any nesting depth
//! - Undo-log frames: mutations are applied eagerly and each transaction
//!   level records the pre-image needed to reverse them
//! - [`SharedStore`]: the same store behind a single exclusive lock
//! - Operation counters via [`StoreStats`]
//!
//! ## Example
//!
//! ```rust
//! use nestkv_core::TransactionalStore;
//!
//! let mut store = TransactionalStore::new();
//! store.set("k1", "v1");
//!
//! store.begin().unwrap();
//! store.set("k1", "v2");
//! store.begin().unwrap();
//! store.delete("k1");
//! store.rollback().unwrap();
//! assert_eq!(store.get("k1"), "v2");
//!
//! store.commit().unwrap();
//! assert_eq!(store.get("k1"), "v2");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod shared;
mod stats;
mod store;
mod transaction;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use shared::SharedStore;
pub use stats::{StatsSnapshot, StoreStats};
pub use store::TransactionalStore;
pub use transaction::{Frame, UndoRecord};
