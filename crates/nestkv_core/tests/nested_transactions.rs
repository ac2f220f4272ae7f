//! Property and scenario tests for nested transactions.

use nestkv_core::{Config, StoreError, TransactionalStore};
use proptest::prelude::*;
use std::collections::HashMap;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn contents(store: &TransactionalStore) -> HashMap<String, String> {
    store
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone)]
enum Mutation {
    Set(String, String),
    Delete(String),
}

fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    // a small key space so mutations collide
    let key = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(str::to_string);
    prop_oneof![
        3 => (key.clone(), "[a-z]{0,3}").prop_map(|(k, v)| Mutation::Set(k, v)),
        1 => key.prop_map(Mutation::Delete),
    ]
}

fn apply(store: &mut TransactionalStore, mutation: &Mutation) {
    match mutation {
        Mutation::Set(k, v) => store.set(k.as_str(), v.as_str()),
        Mutation::Delete(k) => store.delete(k),
    }
}

fn seeded_store(seed: &[Mutation]) -> TransactionalStore {
    let mut store = TransactionalStore::new();
    for m in seed {
        apply(&mut store, m);
    }
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rollback_restores_pre_begin_state(
        seed in prop::collection::vec(mutation_strategy(), 0..10),
        work in prop::collection::vec(mutation_strategy(), 0..20),
    ) {
        let mut store = seeded_store(&seed);
        let before = contents(&store);

        store.begin().unwrap();
        for m in &work {
            apply(&mut store, m);
        }
        store.rollback().unwrap();

        prop_assert_eq!(contents(&store), before);
    }

    #[test]
    fn commit_matches_direct_application(
        seed in prop::collection::vec(mutation_strategy(), 0..10),
        work in prop::collection::vec(mutation_strategy(), 0..20),
    ) {
        let mut direct = seeded_store(&seed);
        for m in &work {
            apply(&mut direct, m);
        }

        let mut store = seeded_store(&seed);
        store.begin().unwrap();
        for m in &work {
            apply(&mut store, m);
        }
        store.commit().unwrap();

        prop_assert_eq!(contents(&store), contents(&direct));
    }

    #[test]
    fn outer_rollback_undoes_committed_inner_work(
        outer in prop::collection::vec(mutation_strategy(), 0..10),
        inner in prop::collection::vec(mutation_strategy(), 0..10),
    ) {
        let mut store = seeded_store(&[]);
        store.set("a", "base");
        let before = contents(&store);

        store.begin().unwrap();
        for m in &outer {
            apply(&mut store, m);
        }
        store.begin().unwrap();
        for m in &inner {
            apply(&mut store, m);
        }
        store.commit().unwrap();
        store.rollback().unwrap();

        prop_assert_eq!(contents(&store), before);
    }

    #[test]
    fn n_begins_n_commits_is_no_transaction(
        levels in prop::collection::vec(
            prop::collection::vec(mutation_strategy(), 0..6),
            1..6,
        ),
    ) {
        let mut direct = TransactionalStore::new();
        let mut store = TransactionalStore::new();

        for level in &levels {
            store.begin().unwrap();
            for m in level {
                apply(&mut store, m);
                apply(&mut direct, m);
            }
        }
        for _ in &levels {
            store.commit().unwrap();
        }

        prop_assert_eq!(store.depth(), 0);
        prop_assert_eq!(contents(&store), contents(&direct));
    }

    #[test]
    fn n_begins_n_rollbacks_restores_start(
        seed in prop::collection::vec(mutation_strategy(), 0..10),
        levels in prop::collection::vec(
            prop::collection::vec(mutation_strategy(), 0..6),
            1..6,
        ),
    ) {
        let mut store = seeded_store(&seed);
        let before = contents(&store);

        for level in &levels {
            store.begin().unwrap();
            for m in level {
                apply(&mut store, m);
            }
        }
        for _ in &levels {
            store.rollback().unwrap();
        }

        prop_assert_eq!(contents(&store), before);
    }

    #[test]
    fn set_then_get_at_any_depth(
        depth in 0usize..8,
        key in "[a-z]{1,8}",
        value in "[a-z0-9]{0,8}",
    ) {
        let mut store = TransactionalStore::new();
        for _ in 0..depth {
            store.begin().unwrap();
        }
        store.set(key.as_str(), value.as_str());
        prop_assert_eq!(store.get(&key), value.as_str());

        store.delete(&key);
        prop_assert_eq!(store.get(&key), "");
    }
}

#[test]
fn scenario_commit() {
    init_tracing();
    let mut store = TransactionalStore::new();
    store.set("k1", "v1");
    store.begin().unwrap();
    store.set("k1", "v2");
    store.commit().unwrap();
    assert_eq!(store.get("k1"), "v2");
}

#[test]
fn scenario_rollback() {
    init_tracing();
    let mut store = TransactionalStore::new();
    store.set("k1", "v1");
    store.begin().unwrap();
    store.set("k1", "v2");
    store.set("k2", "v1");
    store.rollback().unwrap();
    assert_eq!(store.get("k1"), "v1");
    assert_eq!(store.get("k2"), "");
}

#[test]
fn scenario_nested_rollback_then_commit() {
    init_tracing();
    let mut store = TransactionalStore::new();
    store.set("k1", "v1");
    store.begin().unwrap();
    store.set("k1", "v2");
    store.begin().unwrap();
    store.delete("k1");
    store.rollback().unwrap();
    assert_eq!(store.get("k1"), "v2");
    store.commit().unwrap();
    assert_eq!(store.get("k1"), "v2");
}

#[test]
fn unbounded_nesting() {
    let mut store = TransactionalStore::new();
    for i in 0..1_000 {
        store.begin().unwrap();
        store.set("k", i.to_string());
    }
    assert_eq!(store.depth(), 1_000);
    assert_eq!(store.get("k"), "999");

    assert_eq!(store.rollback_all(), 1_000);
    assert!(!store.contains_key("k"));
}

#[test]
fn strict_policy_round_trip() {
    let mut store = TransactionalStore::with_config(Config::new().strict(true));

    assert!(matches!(
        store.commit(),
        Err(StoreError::NoActiveTransaction { operation: "commit" })
    ));

    store.begin().unwrap();
    store.set("k", "v");
    store.rollback().unwrap();

    assert!(matches!(
        store.rollback(),
        Err(StoreError::NoActiveTransaction {
            operation: "rollback"
        })
    ));
    assert!(store.is_empty());
}
