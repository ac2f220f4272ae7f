//! Reference model for differential testing.
//!
//! [`ModelStore`] implements the same observable semantics as
//! [`TransactionalStore`] in the most direct way possible: `begin` saves a
//! full copy of the map and `rollback` puts it back. It is slow but
//! obviously correct, which makes it a useful oracle.

use crate::generators::StoreOperation;
use nestkv_core::TransactionalStore;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Snapshot-per-frame reference store.
#[derive(Debug, Clone, Default)]
pub struct ModelStore {
    data: HashMap<String, String>,
    snapshots: Vec<HashMap<String, String>>,
}

impl ModelStore {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of `key`, or `""` if absent.
    pub fn get(&self, key: &str) -> &str {
        self.data.get(key).map_or("", String::as_str)
    }

    /// Returns the nesting depth.
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    /// Applies an operation, returning the value read for `Get`.
    ///
    /// Commit and rollback with no active transaction are no-ops.
    pub fn apply(&mut self, op: &StoreOperation) -> Option<String> {
        match op {
            StoreOperation::Set { key, value } => {
                self.data.insert(key.clone(), value.clone());
            }
            StoreOperation::Delete { key } => {
                self.data.remove(key);
            }
            StoreOperation::Get { key } => return Some(self.get(key).to_owned()),
            StoreOperation::Begin => self.snapshots.push(self.data.clone()),
            StoreOperation::Commit => {
                self.snapshots.pop();
            }
            StoreOperation::Rollback => {
                if let Some(snapshot) = self.snapshots.pop() {
                    self.data = snapshot;
                }
            }
        }
        None
    }

    /// Returns the contents in key order.
    pub fn contents(&self) -> BTreeMap<String, String> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Returns the contents of a store in key order.
pub fn store_contents(store: &TransactionalStore) -> BTreeMap<String, String> {
    store
        .iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

/// A point where the store and the model disagreed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("divergence at step {step} ({op:?}): {detail}")]
pub struct Divergence {
    /// Index of the operation after which the states differed.
    pub step: usize,
    /// The operation applied at that step.
    pub op: StoreOperation,
    /// What differed.
    pub detail: String,
}

/// Runs `ops` against a default-configured store and the model, checking
/// reads, depth, and full contents after every step.
pub fn run_against_model(ops: &[StoreOperation]) -> Result<(), Divergence> {
    let mut store = TransactionalStore::new();
    let mut model = ModelStore::new();

    for (step, op) in ops.iter().enumerate() {
        let diverged = |detail: String| Divergence {
            step,
            op: op.clone(),
            detail,
        };

        let actual = op
            .apply(&mut store)
            .map_err(|e| diverged(format!("store error: {e}")))?;
        let expected = model.apply(op);
        if actual != expected {
            return Err(diverged(format!("read {actual:?}, expected {expected:?}")));
        }
        if store.depth() != model.depth() {
            return Err(diverged(format!(
                "depth {}, expected {}",
                store.depth(),
                model.depth()
            )));
        }
        let (actual, expected) = (store_contents(&store), model.contents());
        if actual != expected {
            return Err(diverged(format!(
                "contents {actual:?}, expected {expected:?}"
            )));
        }
    }
    Ok(())
}
