//! Store configuration.

/// Configuration for creating a [`TransactionalStore`](crate::TransactionalStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether `commit` / `rollback` with no active transaction is an error.
    ///
    /// When `false` (the default) both are silent no-ops.
    pub strict: bool,

    /// Maximum nesting depth (`None` = unlimited).
    pub max_depth: Option<usize>,

    /// Number of keys to reserve room for up front.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: None,
            initial_capacity: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether empty-stack commit/rollback is rejected.
    #[must_use]
    pub const fn strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Removes any nesting limit.
    #[must_use]
    pub const fn unlimited_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Sets the initial key capacity.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
