//! # NestKV Testkit
//!
//! Test utilities for NestKV.
//!
//! This crate provides:
//! - Store fixtures and assertion helpers
//! - Property-based test generators using proptest
//! - A snapshot-based reference model for differential testing
//! - JSON scenario vectors
//!
//! ## Usage
//!
//! ```rust
//! use nestkv_testkit::prelude::*;
//!
//! let ops = vec![
//!     StoreOperation::set("k1", "v1"),
//!     StoreOperation::Begin,
//!     StoreOperation::delete("k1"),
//!     StoreOperation::Rollback,
//! ];
//! run_against_model(&ops).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
pub use vectors::*;
