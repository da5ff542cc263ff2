//! Core logic for SimpleNote, a small note widget persisted in a
//! namespaced key-value store.
//! This crate is the single source of truth for the note invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::NotepadConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    Clock, Note, NoteId, SystemClock, ACTIVE_NOTE_SUFFIX, DEFAULT_PREFIX, PLACEHOLDER_CONTENT,
};
pub use repo::kv_repo::{KeyValueStore, KvError, KvResult, SqliteKvStore, DEFAULT_QUOTA_CHARS};
pub use repo::memory_repo::MemoryKvStore;
pub use service::note_store::{NoteStore, StoreError, StoreResult};
pub use service::session::{
    Confirmation, EditOutcome, NotepadSession, NotepadView, SessionError, SessionResult, Warning,
};
pub use service::sidebar::{
    note_summary, render_sidebar, render_sidebar_in, timestamp_label, SidebarEntry, BLANK_SUMMARY,
};

/// Opens the configured SQLite-backed note store at `db_path`.
///
/// Failure here means persistent storage is unavailable; front ends must
/// refuse to start.
pub fn open_note_store(
    db_path: impl AsRef<std::path::Path>,
    config: &NotepadConfig,
) -> KvResult<NoteStore<SqliteKvStore>> {
    let kv = SqliteKvStore::open(db_path, config.quota_chars)?;
    Ok(NoteStore::new(kv, config.prefix.clone()))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
