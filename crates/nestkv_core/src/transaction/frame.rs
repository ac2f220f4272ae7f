//! Frame state.

use std::collections::HashMap;

/// Instruction that reverses one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoRecord {
    /// Set the key back to its previous value.
    Restore {
        /// Key that was overwritten or deleted.
        key: String,
        /// Value it held before the mutation.
        value: String,
    },
    /// Delete the key; it was absent before the mutation.
    Remove {
        /// Key that did not exist.
        key: String,
    },
}

impl UndoRecord {
    /// Builds the record that reverses a mutation of `key`, given the value
    /// it held just before (`None` if absent).
    #[must_use]
    pub fn capture(key: impl Into<String>, previous: Option<String>) -> Self {
        let key = key.into();
        match previous {
            Some(value) => Self::Restore { key, value },
            None => Self::Remove { key },
        }
    }

    /// Returns the key this record applies to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Restore { key, .. } | Self::Remove { key } => key,
        }
    }

    /// Applies the record to `data`.
    fn apply(self, data: &mut HashMap<String, String>) {
        match self {
            Self::Restore { key, value } => {
                data.insert(key, value);
            }
            Self::Remove { key } => {
                data.remove(&key);
            }
        }
    }
}

/// One active transaction level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Undo records in the order the mutations happened.
    undo: Vec<UndoRecord>,
}

impl Frame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an undo record.
    pub fn record(&mut self, record: UndoRecord) {
        self.undo.push(record);
    }

    /// Returns the recorded undo records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[UndoRecord] {
        &self.undo
    }

    /// Returns the number of undo records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    /// Appends a committed child frame's records after this frame's own,
    /// preserving their order.
    pub fn absorb(&mut self, child: Frame) {
        self.undo.extend(child.undo);
    }

    /// Reverses every recorded mutation against `data`, newest first, and
    /// returns how many records were applied.
    pub fn unwind(self, data: &mut HashMap<String, String>) -> usize {
        let applied = self.undo.len();
        for record in self.undo.into_iter().rev() {
            record.apply(data);
        }
        applied
    }
}
