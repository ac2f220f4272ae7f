//! Scenario test vectors for NestKV.
//!
//! Each vector is an operation script plus the values its `get` operations
//! must return. Vectors serialize to JSON so the same scripts can be checked
//! into fixtures or shared with other implementations.

use crate::generators::StoreOperation;
use nestkv_core::{Config, TransactionalStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scripted scenario with expected reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Operations to apply in order.
    pub operations: Vec<StoreOperation>,
    /// Values returned by the `get` operations, in order.
    pub expected_reads: Vec<String>,
    /// Transaction depth after the script.
    #[serde(default)]
    pub expected_depth: usize,
    /// Run against a store with the strict empty-stack policy.
    #[serde(default)]
    pub strict: bool,
    /// Expected error message; the script stops at the first error.
    #[serde(default)]
    pub expected_error: Option<String>,
}

/// Failure while running a vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    /// A read returned the wrong value.
    #[error("vector {id}: read #{index} returned {actual:?}, expected {expected:?}")]
    ReadMismatch {
        /// Vector id.
        id: String,
        /// Index of the read among the vector's reads.
        index: usize,
        /// Expected value.
        expected: String,
        /// Actual value.
        actual: String,
    },
    /// The number of reads differed from `expected_reads`.
    #[error("vector {id}: {actual} reads, expected {expected}")]
    ReadCount {
        /// Vector id.
        id: String,
        /// Expected number of reads.
        expected: usize,
        /// Actual number of reads.
        actual: usize,
    },
    /// An operation failed, or failed differently than expected.
    #[error("vector {id}: error {actual:?}, expected {expected:?}")]
    Error {
        /// Vector id.
        id: String,
        /// Expected error message.
        expected: Option<String>,
        /// Actual error message.
        actual: Option<String>,
    },
    /// Final depth differed.
    #[error("vector {id}: final depth {actual}, expected {expected}")]
    Depth {
        /// Vector id.
        id: String,
        /// Expected depth.
        expected: usize,
        /// Actual depth.
        actual: usize,
    },
}

/// Runs a vector against a fresh store, strict if the vector asks for it.
pub fn run_vector(vector: &TestVector) -> Result<(), VectorError> {
    let mut store = TransactionalStore::with_config(Config::new().strict(vector.strict));
    let mut reads = Vec::new();
    let mut error = None;
    for op in &vector.operations {
        match op.apply(&mut store) {
            Ok(Some(value)) => reads.push(value),
            Ok(None) => {}
            Err(e) => {
                error = Some(e.to_string());
                break;
            }
        }
    }

    if error != vector.expected_error {
        return Err(VectorError::Error {
            id: vector.id.clone(),
            expected: vector.expected_error.clone(),
            actual: error,
        });
    }

    if reads.len() != vector.expected_reads.len() {
        return Err(VectorError::ReadCount {
            id: vector.id.clone(),
            expected: vector.expected_reads.len(),
            actual: reads.len(),
        });
    }
    for (index, (actual, expected)) in reads.iter().zip(&vector.expected_reads).enumerate() {
        if actual != expected {
            return Err(VectorError::ReadMismatch {
                id: vector.id.clone(),
                index,
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
    }
    if store.depth() != vector.expected_depth {
        return Err(VectorError::Depth {
            id: vector.id.clone(),
            expected: vector.expected_depth,
            actual: store.depth(),
        });
    }
    Ok(())
}

/// Serializes vectors to pretty-printed JSON.
pub fn vectors_to_json(vectors: &[TestVector]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(vectors)
}

/// Parses vectors from JSON.
pub fn vectors_from_json(json: &str) -> serde_json::Result<Vec<TestVector>> {
    serde_json::from_str(json)
}

/// Built-in nested transaction scenarios.
pub fn scenario_vectors() -> Vec<TestVector> {
    use StoreOperation::{Begin, Commit, Rollback};
    let set = StoreOperation::set;
    let delete = StoreOperation::delete;
    let get = StoreOperation::get;

    vec![
        TestVector {
            id: "absent_key".into(),
            description: "Unknown key reads as empty".into(),
            operations: vec![get("k1")],
            expected_reads: vec!["".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "commit".into(),
            description: "Committed overwrite stays visible".into(),
            operations: vec![set("k1", "v1"), Begin, set("k1", "v2"), Commit, get("k1")],
            expected_reads: vec!["v2".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "rollback".into(),
            description: "Rollback restores overwritten key and removes created key".into(),
            operations: vec![
                set("k1", "v1"),
                Begin,
                set("k1", "v2"),
                set("k2", "v1"),
                get("k1"),
                Rollback,
                get("k1"),
                get("k2"),
            ],
            expected_reads: vec!["v2".into(), "v1".into(), "".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "nested_commit".into(),
            description: "Inner delete committed through both levels".into(),
            operations: vec![
                set("k1", "v1"),
                Begin,
                set("k1", "v2"),
                Begin,
                get("k1"),
                delete("k1"),
                Commit,
                get("k1"),
                Commit,
                get("k1"),
            ],
            expected_reads: vec!["v2".into(), "".into(), "".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "nested_rollback".into(),
            description: "Inner delete rolled back, outer overwrite committed".into(),
            operations: vec![
                set("k1", "v1"),
                Begin,
                set("k1", "v2"),
                Begin,
                delete("k1"),
                Rollback,
                get("k1"),
                Commit,
                get("k1"),
            ],
            expected_reads: vec!["v2".into(), "v2".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "outer_rollback_after_inner_commit".into(),
            description: "Outer rollback undoes work an inner frame committed".into(),
            operations: vec![
                set("k1", "v1"),
                Begin,
                Begin,
                set("k1", "v2"),
                set("k2", "v2"),
                Commit,
                Rollback,
                get("k1"),
                get("k2"),
            ],
            expected_reads: vec!["v1".into(), "".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "empty_stack_noop".into(),
            description: "Commit and rollback without a transaction do nothing".into(),
            operations: vec![set("k1", "v1"), Commit, Rollback, get("k1")],
            expected_reads: vec!["v1".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "open_transaction".into(),
            description: "Uncommitted work is visible to reads".into(),
            operations: vec![Begin, set("k1", "v1"), Begin, get("k1")],
            expected_reads: vec!["v1".into()],
            expected_depth: 2,
            strict: false,
            expected_error: None,
        },
        TestVector {
            id: "strict_commit_without_transaction".into(),
            description: "Strict policy stops the script at an empty-stack commit".into(),
            operations: vec![
                set("k1", "v1"),
                Begin,
                Commit,
                get("k1"),
                Commit,
                set("k1", "unreached"),
            ],
            expected_reads: vec!["v1".into()],
            expected_depth: 0,
            strict: true,
            expected_error: Some("no active transaction to commit".into()),
        },
        TestVector {
            id: "strict_nested_round_trip".into(),
            description: "Balanced transactions never trip the strict policy".into(),
            operations: vec![
                set("k1", "v1"),
                Begin,
                Begin,
                delete("k1"),
                Commit,
                Rollback,
                get("k1"),
            ],
            expected_reads: vec!["v1".into()],
            expected_depth: 0,
            strict: true,
            expected_error: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::run_against_model;

    #[test]
    fn all_scenarios_pass() {
        for vector in scenario_vectors() {
            run_vector(&vector).unwrap();
        }
    }

    #[test]
    fn scenarios_agree_with_model() {
        for vector in scenario_vectors() {
            run_against_model(&vector.operations).unwrap();
        }
    }

    #[test]
    fn scenario_ids_are_unique() {
        let vectors = scenario_vectors();
        let mut ids: Vec<_> = vectors.iter().map(|v| v.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), vectors.len());
    }

    #[test]
    fn json_preserves_vectors() {
        let vectors = scenario_vectors();
        let json = vectors_to_json(&vectors).unwrap();
        assert_eq!(vectors_from_json(&json).unwrap(), vectors);
    }

    #[test]
    fn depth_defaults_to_zero_in_json() {
        let json = r#"[{
            "id": "handwritten",
            "description": "loaded from JSON",
            "operations": [
                {"op": "set", "key": "a", "value": "1"},
                {"op": "begin"},
                {"op": "delete", "key": "a"},
                {"op": "rollback"},
                {"op": "get", "key": "a"}
            ],
            "expected_reads": ["1"]
        }]"#;

        let vectors = vectors_from_json(json).unwrap();
        assert_eq!(vectors[0].expected_depth, 0);
        run_vector(&vectors[0]).unwrap();
    }

    #[test]
    fn unexpected_error_is_reported() {
        let vector = TestVector {
            id: "strict_rollback".into(),
            description: "rollback with nothing open".into(),
            operations: vec![StoreOperation::Rollback],
            expected_reads: vec![],
            expected_depth: 0,
            strict: true,
            expected_error: None,
        };

        assert_eq!(
            run_vector(&vector),
            Err(VectorError::Error {
                id: "strict_rollback".into(),
                expected: None,
                actual: Some("no active transaction to rollback".into()),
            })
        );

        // the same script is fine under the default policy
        let permissive = TestVector {
            strict: false,
            ..vector
        };
        run_vector(&permissive).unwrap();
    }

    #[test]
    fn wrong_expectation_is_reported() {
        let vector = TestVector {
            id: "broken".into(),
            description: "expects the wrong value".into(),
            operations: vec![StoreOperation::set("k", "v"), StoreOperation::get("k")],
            expected_reads: vec!["other".into()],
            expected_depth: 0,
            strict: false,
            expected_error: None,
        };

        assert_eq!(
            run_vector(&vector),
            Err(VectorError::ReadMismatch {
                id: "broken".into(),
                index: 0,
                expected: "other".into(),
                actual: "v".into(),
            })
        );
    }
}
