//! Functional tests for keeping locale stores in lockstep with the key tree.
//!
//! Core guarantees exercised here:
//! - After any operation every leaf is present in every store, and every
//!   store key is a leaf.
//! - Rename/duplicate transplant values per store and respect the classified
//!   conflict (replace discards, merge unions).
//! - No-op operations leave the set clean.
//! - Writes report per-store failures without aborting the others.

use lingo_keys::{Conflict, KeyPath};
use lingo_resource::{ResourceSet, ResourceStore, WriteOptions};
use lingo_test_utils::{key, loaded_set, memory_store, three_locale_set, FailingStore};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn keys_of(set: &ResourceSet, locale: &str) -> Vec<String> {
    set.store(Some(locale)).unwrap().keys()
}

/// Loading three stores yields the union of their keys, back-filled.
///
/// A key with an empty value still counts as present, so `f` from the
/// French store must appear everywhere.
#[test]
fn three_store_load_is_union_with_backfill() {
    let set = three_locale_set();

    let leaves: Vec<String> = set.tree().leaf_paths().iter().map(ToString::to_string).collect();
    assert_eq!(leaves, vec!["a.b", "c", "d.e", "f"]);

    for locale in ["en", "nl", "fr"] {
        assert_eq!(keys_of(&set, locale), vec!["a.b", "c", "d.e", "f"]);
    }
    assert_eq!(set.translation(&key("a.b"), Some("nl")), Some("nl-ab"));
    assert_eq!(set.translation(&key("c"), Some("fr")), Some(""));
    assert!(!set.is_dirty());
    assert!(set.is_synchronized());
}

/// Adding a key that already exists is a no-op and does not dirty the set.
#[test]
fn adding_existing_key_is_noop() {
    let mut set = loaded_set(vec![memory_store("en", &[("a.b", "x")])]);

    assert!(!set.add_key(&key("a.b")));
    assert!(!set.is_dirty());
    assert_eq!(set.translation(&key("a.b"), Some("en")), Some("x"));

    assert!(set.add_key(&key("a.c")));
    assert!(set.is_dirty());
    assert_eq!(set.translation(&key("a.c"), Some("en")), Some(""));
}

/// Renaming a leaf moves its value in every store.
#[test]
fn leaf_rename_moves_values() {
    let mut set = loaded_set(vec![
        memory_store("en", &[("a.b", "hello")]),
        memory_store("nl", &[("a.b", "hallo")]),
    ]);

    let moves = set.rename_key(&key("a.b"), &key("x.y"), |_| panic!("no conflict expected")).unwrap();

    assert_eq!(moves.len(), 1);
    assert_eq!(set.translation(&key("x.y"), Some("en")), Some("hello"));
    assert_eq!(set.translation(&key("x.y"), Some("nl")), Some("hallo"));
    assert!(set.tree().find(&key("a")).is_none());
    assert_eq!(keys_of(&set, "en"), vec!["x.y"]);
}

/// Leaf onto leaf asks for a replace; the source value wins.
#[test]
fn leaf_onto_leaf_is_replace() {
    let mut set = loaded_set(vec![memory_store("en", &[("a", "A"), ("b", "B")])]);
    let mut asked = None;

    set.rename_key(&key("a"), &key("b"), |prompt| {
        asked = Some(prompt.conflict);
        true
    })
    .unwrap();

    assert_eq!(asked, Some(Conflict::Replace));
    assert_eq!(keys_of(&set, "en"), vec!["b"]);
    assert_eq!(set.translation(&key("b"), Some("en")), Some("A"));
}

/// Structural onto structural asks for a merge; both subtrees are unioned.
#[test]
fn structural_onto_structural_is_merge_union() {
    let mut set = loaded_set(vec![memory_store(
        "en",
        &[("a.x", "AX"), ("a.y", "AY"), ("b.y", "BY"), ("b.z", "BZ")],
    )]);
    let mut asked = None;

    set.rename_key(&key("a"), &key("b"), |prompt| {
        asked = Some(prompt.conflict);
        true
    })
    .unwrap();

    assert_eq!(asked, Some(Conflict::Merge));
    assert_eq!(keys_of(&set, "en"), vec!["b.x", "b.y", "b.z"]);
    assert_eq!(set.translation(&key("b.y"), Some("en")), Some("AY"));
    assert_eq!(set.translation(&key("b.z"), Some("en")), Some("BZ"));
}

/// A destination that is a leaf and a parent is still replaced wholesale.
#[test]
fn dual_role_destination_is_replaced() {
    let mut set = loaded_set(vec![memory_store("en", &[("s", "S"), ("d", "D"), ("d.child", "C")])]);

    set.rename_key(&key("s"), &key("d"), |prompt| prompt.conflict == Conflict::Replace)
        .unwrap();

    assert_eq!(keys_of(&set, "en"), vec!["d"]);
    assert_eq!(set.translation(&key("d"), Some("en")), Some("S"));
}

/// Duplicating keeps the source and copies values.
#[test]
fn duplicate_keeps_source() {
    let mut set = loaded_set(vec![
        memory_store("en", &[("a.b", "1"), ("a.c", "2")]),
        memory_store("nl", &[("a.b", "een")]),
    ]);

    set.duplicate_key(&key("a"), &key("z"), |_| true).unwrap();

    assert_eq!(keys_of(&set, "en"), vec!["a.b", "a.c", "z.b", "z.c"]);
    assert_eq!(set.translation(&key("z.b"), Some("nl")), Some("een"));
    assert_eq!(set.translation(&key("z.c"), Some("nl")), Some(""));
    assert_eq!(set.translation(&key("a.b"), Some("en")), Some("1"));
    assert!(set.is_synchronized());
}

/// A failing store is reported while the others are still written.
#[test]
fn write_failure_is_reported_per_store() {
    let mut set = ResourceSet::new();
    let failing: Box<dyn ResourceStore> = Box::new(FailingStore::new("nl"));
    set.load(vec![memory_store("en", &[("a", "1")]), failing]);
    set.add_key(&key("b"));

    let report = set.write_all(WriteOptions::default());

    assert_eq!(report.written, vec!["en"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].locale.as_deref(), Some("nl"));
    assert!(!report.is_success());
    assert!(set.is_dirty());
}

/// A store that cannot be read is left out of the set.
#[test]
fn open_reports_unreadable_store() {
    let mut set = ResourceSet::new();
    let failing: Box<dyn ResourceStore> = Box::new(FailingStore::new("nl"));

    let report = set.open(vec![memory_store("en", &[("a", "1")]), failing]);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(set.locales(), vec![Some("en")]);
    assert_eq!(report.keys, 1);
}

#[derive(Debug, Clone)]
enum Op {
    Add(KeyPath),
    Remove(KeyPath),
    Rename(KeyPath, KeyPath),
    Duplicate(KeyPath, KeyPath),
}

fn key_strategy() -> impl Strategy<Value = KeyPath> {
    proptest::collection::vec("[a-c]", 1..4).prop_map(|segments| KeyPath::from_segments(segments).unwrap())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        key_strategy().prop_map(Op::Add),
        key_strategy().prop_map(Op::Remove),
        (key_strategy(), key_strategy()).prop_map(|(a, b)| Op::Rename(a, b)),
        (key_strategy(), key_strategy()).prop_map(|(a, b)| Op::Duplicate(a, b)),
    ]
}

proptest! {
    #[test]
    fn prop_operations_keep_stores_synchronized(ops in proptest::collection::vec(op_strategy(), 1..25)) {
        let mut set = loaded_set(vec![
            memory_store("en", &[("a", "1")]),
            memory_store("nl", &[("b.c", "2")]),
        ]);

        for op in ops {
            // Rejected requests (missing source, overlap) must leave no trace.
            let _ = match op {
                Op::Add(path) => {
                    set.add_key(&path);
                    Ok(Vec::new())
                }
                Op::Remove(path) => {
                    set.remove_key(&path);
                    Ok(Vec::new())
                }
                Op::Rename(from, to) => set.rename_key(&from, &to, |_| true),
                Op::Duplicate(from, to) => set.duplicate_key(&from, &to, |_| true),
            };
            prop_assert!(set.is_synchronized());
        }
    }
}
