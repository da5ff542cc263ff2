use simplenote_core::{
    Confirmation, MemoryKvStore, NoteStore, NotepadSession, SessionError, SqliteKvStore, Warning,
    BLANK_SUMMARY, DEFAULT_PREFIX, PLACEHOLDER_CONTENT,
};
use std::cell::Cell;

fn ticking_clock(start: i64) -> impl Fn() -> i64 {
    let next = Cell::new(start);
    move || {
        let now = next.get();
        next.set(now + 1);
        now
    }
}

fn open_memory_session(
    kv: MemoryKvStore,
) -> (
    NotepadSession<MemoryKvStore, impl Fn() -> i64>,
    simplenote_core::NotepadView,
) {
    NotepadSession::open(NoteStore::with_clock(kv, DEFAULT_PREFIX, ticking_clock(100))).unwrap()
}

#[test]
fn init_on_empty_store_shows_single_placeholder_note() {
    let (session, view) = open_memory_session(MemoryKvStore::new());

    assert_eq!(view.sidebar.len(), 1);
    assert_eq!(view.editor_text, PLACEHOLDER_CONTENT);
    assert_eq!(view.sidebar[0].id, view.active_id);
    assert!(view.sidebar[0].is_active);
    assert_eq!(view.sidebar[0].summary, PLACEHOLDER_CONTENT);
    assert_eq!(session.store().note_count().unwrap(), 1);
}

#[test]
fn init_keeps_existing_notes_and_pointer() {
    let mut store = NoteStore::with_clock(MemoryKvStore::new(), DEFAULT_PREFIX, ticking_clock(1));
    let first = store.add_note().unwrap();
    store.add_note().unwrap();
    store.set_active_note(&first).unwrap();

    let (_session, view) = NotepadSession::open(store).unwrap();
    assert_eq!(view.active_id, first);
    assert_eq!(view.sidebar.len(), 2);
    assert_eq!(
        view.sidebar.iter().filter(|entry| entry.is_active).count(),
        1
    );
}

#[test]
fn edit_updates_editor_and_sidebar_summary() {
    let (mut session, _) = open_memory_session(MemoryKvStore::new());

    let outcome = session.edit("shopping list\nbread").unwrap();
    assert_eq!(outcome.warning, None);
    assert_eq!(outcome.view.editor_text, "shopping list\nbread");
    assert_eq!(outcome.view.sidebar[0].summary, "shopping list");

    let outcome = session.edit("").unwrap();
    assert_eq!(outcome.view.sidebar[0].summary, BLANK_SUMMARY);
}

#[test]
fn edit_over_quota_warns_but_keeps_typed_text_visible() {
    let (mut session, _) = open_memory_session(MemoryKvStore::with_quota(64));
    let long_text = format!("kept in editor\n{}", "x".repeat(80));

    let outcome = session.edit(&long_text).unwrap();
    match outcome.warning {
        Some(Warning::StorageLimit(message)) => assert!(message.contains("storage limit")),
        None => panic!("expected a storage warning"),
    }
    assert_eq!(outcome.view.editor_text, long_text);
    assert_eq!(outcome.view.sidebar[0].summary, "kept in editor");

    let redrawn = session.refresh().unwrap();
    assert_eq!(redrawn.editor_text, PLACEHOLDER_CONTENT);
}

#[test]
fn select_switches_to_rendered_note() {
    let (mut session, first_view) = open_memory_session(MemoryKvStore::new());
    session.edit("first").unwrap();
    let second_view = session.add().unwrap();
    assert_ne!(second_view.active_id, first_view.active_id);

    let view = session.select(first_view.active_id.as_str()).unwrap();
    assert_eq!(view.active_id, first_view.active_id);
    assert_eq!(view.editor_text, "first");
}

#[test]
fn select_rejects_ids_not_in_sidebar() {
    let (mut session, view) = open_memory_session(MemoryKvStore::new());

    for bogus in ["simplenote_999999", "simplenote_activeNote", "theme"] {
        let err = session.select(bogus).unwrap_err();
        assert!(matches!(err, SessionError::UnknownNote(ref id) if id == bogus));
    }
    assert_eq!(session.refresh().unwrap().active_id, view.active_id);
}

#[test]
fn delete_shows_remaining_note() {
    let (mut session, first) = open_memory_session(MemoryKvStore::new());
    session.add().unwrap();

    let view = session.delete().unwrap();
    assert_eq!(view.active_id, first.active_id);
    assert_eq!(view.sidebar.len(), 1);
}

#[test]
fn delete_last_note_recreates_placeholder() {
    let (mut session, first) = open_memory_session(MemoryKvStore::new());

    let view = session.delete().unwrap();
    assert_ne!(view.active_id, first.active_id);
    assert_eq!(view.sidebar.len(), 1);
    assert_eq!(view.editor_text, PLACEHOLDER_CONTENT);
}

#[test]
fn delete_all_requires_confirmation() {
    let (mut session, _) = open_memory_session(MemoryKvStore::new());
    session.add().unwrap();
    session.add().unwrap();

    let declined = session.delete_all(Confirmation::Declined).unwrap();
    assert_eq!(declined.sidebar.len(), 3);

    let confirmed = session.delete_all(Confirmation::Confirmed).unwrap();
    assert_eq!(confirmed.sidebar.len(), 1);
    assert_eq!(confirmed.editor_text, PLACEHOLDER_CONTENT);
}

#[test]
fn view_serializes_for_front_ends() {
    let kv = SqliteKvStore::open_in_memory(None).unwrap();
    let store = NoteStore::with_clock(kv, DEFAULT_PREFIX, ticking_clock(1_709_622_489_000));
    let (_session, view) = NotepadSession::open(store).unwrap();

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["active_id"], "simplenote_1709622489000");
    assert_eq!(json["editor_text"], PLACEHOLDER_CONTENT);
    assert_eq!(json["sidebar"][0]["is_active"], true);
    assert!(json["sidebar"][0]["timestamp_label"]
        .as_str()
        .unwrap()
        .starts_with("2024-03-0"));
}
