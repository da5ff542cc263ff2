//! Sidebar projection over the note store.
//!
//! # Responsibility
//! - Derive one display row per note: timestamp label, summary, active flag.
//!
//! # Invariants
//! - Rows follow `NoteStore::list_notes()` order; no sorting happens here.
//! - Exactly one row is active whenever the collection is non-empty.
//! - The projection persists nothing of its own.

use crate::model::note::{Clock, NoteId};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::note_store::{NoteStore, StoreResult};
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;

/// Maximum summary length in characters, before the ellipsis.
pub const SUMMARY_MAX_CHARS: usize = 40;
/// Appended to truncated summaries.
pub const ELLIPSIS: &str = "...";
/// Summary shown for a note whose first line is empty (a non-breaking space).
pub const BLANK_SUMMARY: &str = "\u{a0}";
/// Label for ids that carry no parseable timestamp.
pub const UNKNOWN_TIMESTAMP_LABEL: &str = "unknown";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One display row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub id: NoteId,
    pub is_active: bool,
    pub timestamp_label: String,
    pub summary: String,
}

/// Renders the sidebar with timestamps in the local time zone.
pub fn render_sidebar<S, C>(store: &mut NoteStore<S, C>) -> StoreResult<Vec<SidebarEntry>>
where
    S: KeyValueStore,
    C: Clock,
{
    render_sidebar_in(store, &Local)
}

/// Renders the sidebar with timestamps in `tz`.
///
/// Resolves the active note first, so an empty store gains its placeholder
/// note before enumeration.
pub fn render_sidebar_in<S, C, Tz>(
    store: &mut NoteStore<S, C>,
    tz: &Tz,
) -> StoreResult<Vec<SidebarEntry>>
where
    S: KeyValueStore,
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let active = store.active_note()?;
    let prefix = store.prefix().to_string();
    let entries = store
        .list_notes()?
        .into_iter()
        .map(|note| SidebarEntry {
            is_active: note.id == active,
            timestamp_label: note
                .id
                .timestamp_millis(&prefix)
                .map_or_else(|| UNKNOWN_TIMESTAMP_LABEL.to_string(), |ms| timestamp_label(ms, tz)),
            summary: note_summary(&note.content),
            id: note.id,
        })
        .collect();
    Ok(entries)
}

/// One-line summary: the first line, truncated to [`SUMMARY_MAX_CHARS`].
pub fn note_summary(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.is_empty() {
        return BLANK_SUMMARY.to_string();
    }
    truncate_chars(first_line, SUMMARY_MAX_CHARS)
}

/// Formats epoch milliseconds as `YYYY-MM-DD HH:MM:SS` in `tz`.
pub fn timestamp_label<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(at) => at.format(TIMESTAMP_FORMAT).to_string(),
        None => UNKNOWN_TIMESTAMP_LABEL.to_string(),
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &value[..cut]),
        None => value.to_string(),
    }
}
