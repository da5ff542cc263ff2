use simplenote_core::{
    KeyValueStore, MemoryKvStore, NoteId, NoteStore, SqliteKvStore, StoreError, DEFAULT_PREFIX,
    PLACEHOLDER_CONTENT,
};
use std::cell::Cell;

const ACTIVE_KEY: &str = "simplenote_activeNote";

fn ticking_clock(start: i64) -> impl Fn() -> i64 {
    let next = Cell::new(start);
    move || {
        let now = next.get();
        next.set(now + 10);
        now
    }
}

fn memory_store() -> NoteStore<MemoryKvStore, impl Fn() -> i64> {
    NoteStore::with_clock(MemoryKvStore::new(), DEFAULT_PREFIX, ticking_clock(1_000))
}

fn assert_active_invariant<S: KeyValueStore, C: simplenote_core::Clock>(store: &NoteStore<S, C>) {
    let notes = store.list_notes().unwrap();
    let pointer = store.kv().read(ACTIVE_KEY).unwrap();
    if notes.is_empty() {
        assert_eq!(pointer, None, "empty collection must not keep a pointer");
    } else {
        let pointer = pointer.expect("non-empty collection must have a pointer");
        assert!(
            notes.iter().any(|note| note.id.as_str() == pointer),
            "pointer {pointer} names a missing note"
        );
    }
}

#[test]
fn list_notes_is_empty_for_fresh_store() {
    let store = memory_store();
    assert!(store.list_notes().unwrap().is_empty());
    assert_eq!(store.note_count().unwrap(), 0);
}

#[test]
fn active_note_on_empty_store_creates_placeholder_note() {
    let mut store = memory_store();
    let id = store.active_note().unwrap();

    let notes = store.list_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, id);
    assert_eq!(notes[0].content, PLACEHOLDER_CONTENT);
    assert_eq!(id.as_str(), "simplenote_1000");
    assert_active_invariant(&store);
}

#[test]
fn active_note_is_idempotent_without_extra_writes() {
    let mut store = memory_store();
    store.add_note().unwrap();
    store.add_note().unwrap();
    store.delete_note().unwrap();

    let first = store.active_note().unwrap();
    let writes_after_first = store.kv().mutation_count();
    let second = store.active_note().unwrap();

    assert_eq!(first, second);
    assert_eq!(store.kv().mutation_count(), writes_after_first);
}

#[test]
fn update_note_roundtrips_active_content() {
    let mut store = memory_store();
    let id = store.add_note().unwrap();

    store.update_note("groceries\n- milk\n- eggs").unwrap();
    assert_eq!(
        store.note_content(&id).unwrap().as_deref(),
        Some("groceries\n- milk\n- eggs")
    );
    let (active, content) = store.active_note_content().unwrap();
    assert_eq!(active, id);
    assert_eq!(content, "groceries\n- milk\n- eggs");
}

#[test]
fn deleting_only_note_collapses_then_recreates_exactly_one() {
    let mut store = memory_store();
    let original = store.add_note().unwrap();

    let removed = store.delete_note().unwrap();
    assert_eq!(removed, original);
    assert!(store.list_notes().unwrap().is_empty());
    assert_eq!(store.kv().read(ACTIVE_KEY).unwrap(), None);

    let recreated = store.active_note().unwrap();
    assert_ne!(recreated, original);
    let notes = store.list_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, PLACEHOLDER_CONTENT);
}

#[test]
fn deleting_active_second_note_falls_back_to_first() {
    let mut store = memory_store();
    let a = store.add_note().unwrap();
    let b = store.add_note().unwrap();
    assert_eq!(store.active_note().unwrap(), b);

    store.delete_note().unwrap();
    assert_eq!(store.note_content(&b).unwrap(), None);
    assert_eq!(store.kv().read(ACTIVE_KEY).unwrap(), None);
    assert_eq!(store.active_note().unwrap(), a);
}

#[test]
fn unset_pointer_nominates_last_enumerated_note() {
    let mut kv = MemoryKvStore::new();
    kv.write("simplenote_30", "third").unwrap();
    kv.write("simplenote_10", "first").unwrap();
    kv.write("simplenote_20", "second").unwrap();
    let mut store = NoteStore::with_clock(kv, DEFAULT_PREFIX, ticking_clock(1));

    assert_eq!(store.active_note().unwrap().as_str(), "simplenote_20");
    assert_eq!(
        store.kv().read(ACTIVE_KEY).unwrap().as_deref(),
        Some("simplenote_20")
    );
}

#[test]
fn delete_all_removes_notes_but_leaves_foreign_keys() {
    let mut kv = MemoryKvStore::new();
    kv.write("theme", "dark").unwrap();
    let mut store = NoteStore::with_clock(kv, DEFAULT_PREFIX, ticking_clock(1));
    store.add_note().unwrap();
    store.add_note().unwrap();
    store.add_note().unwrap();

    assert_eq!(store.delete_all_notes().unwrap(), 3);
    assert!(store.list_notes().unwrap().is_empty());
    assert_eq!(store.kv().read(ACTIVE_KEY).unwrap(), None);
    assert_eq!(store.kv().read("theme").unwrap().as_deref(), Some("dark"));
    assert_active_invariant(&store);
}

#[test]
fn set_active_note_switches_pointer() {
    let mut store = memory_store();
    let a = store.add_note().unwrap();
    store.add_note().unwrap();

    assert_eq!(store.set_active_note(&a).unwrap(), a);
    assert_eq!(store.active_note().unwrap(), a);
}

#[test]
fn invariant_holds_after_every_operation() {
    let mut store = memory_store();
    store.active_note().unwrap();
    assert_active_invariant(&store);

    let first = store.add_note().unwrap();
    assert_active_invariant(&store);
    store.add_note().unwrap();
    assert_active_invariant(&store);
    store.update_note("edited").unwrap();
    assert_active_invariant(&store);
    store.set_active_note(&first).unwrap();
    assert_active_invariant(&store);

    store.delete_note().unwrap();
    store.active_note().unwrap();
    assert_active_invariant(&store);

    store.delete_all_notes().unwrap();
    assert_active_invariant(&store);
    store.active_note().unwrap();
    assert_active_invariant(&store);
    assert_eq!(store.note_count().unwrap(), 1);
}

#[test]
fn quota_error_surfaces_from_sqlite_backend() {
    let kv = SqliteKvStore::open_in_memory(Some(64)).unwrap();
    let mut store = NoteStore::with_clock(kv, DEFAULT_PREFIX, ticking_clock(1_000));
    let id = store.add_note().unwrap();

    let err = store.update_note(&"z".repeat(64)).unwrap_err();
    assert!(matches!(err, StoreError::QuotaExceeded { limit: 64, .. }));
    assert!(err.to_string().contains("storage limit reached"));
    assert_eq!(
        store.note_content(&id).unwrap().as_deref(),
        Some(PLACEHOLDER_CONTENT)
    );
}

#[test]
fn custom_prefix_isolates_namespaces() {
    let mut kv = MemoryKvStore::new();
    kv.write("simplenote_5", "default namespace").unwrap();
    let mut store = NoteStore::with_clock(kv, "scratch_", ticking_clock(7));

    let id = store.active_note().unwrap();
    assert_eq!(id, NoteId::from_key("scratch_7"));
    assert_eq!(store.active_key(), "scratch_activeNote");
    assert_eq!(store.note_count().unwrap(), 1);
}
