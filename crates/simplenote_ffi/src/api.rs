//! FFI use-case API for host UI shells.
//!
//! # Responsibility
//! - Expose one sync function per notepad UI event.
//! - Flatten core views into plain string/bool envelopes.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Every response after a successful event carries the full display.
//! - Storage is re-opened per call; nothing is cached between events.

use log::warn;
use simplenote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_note_store,
    Confirmation, NotepadConfig, NotepadSession, NotepadView, SessionResult, SidebarEntry,
    SqliteKvStore, Warning,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const NOTEPAD_DB_FILE_NAME: &str = "simplenote.sqlite3";
const NOTEPAD_DB_ENV: &str = "SIMPLENOTE_DB";
static NOTEPAD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later notepad call.
///
/// # FFI contract
/// - First call wins; repeating the same path is accepted.
/// - Returns empty string on success and an error message on conflict.
#[flutter_rust_bridge::frb(sync)]
pub fn notepad_set_db_path(path: String) -> String {
    let requested = PathBuf::from(path.trim());
    if requested.as_os_str().is_empty() {
        return "db path cannot be empty".to_string();
    }
    let active = NOTEPAD_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Sidebar row for host rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotepadSidebarItem {
    pub note_id: String,
    pub is_active: bool,
    pub timestamp_label: String,
    pub summary: String,
}

/// Full display envelope returned by every notepad event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotepadResponse {
    /// Whether the event succeeded.
    pub ok: bool,
    /// Active note id; `None` on failure.
    pub active_id: Option<String>,
    /// Text the editor should show.
    pub editor_text: String,
    pub sidebar: Vec<NotepadSidebarItem>,
    /// Dismissible warning, e.g. when storage is full.
    pub warning: Option<String>,
    /// Human-readable diagnostics.
    pub message: String,
}

impl NotepadResponse {
    fn success(view: NotepadView, warning: Option<Warning>) -> Self {
        Self {
            ok: true,
            active_id: Some(view.active_id.to_string()),
            editor_text: view.editor_text,
            sidebar: view.sidebar.into_iter().map(to_sidebar_item).collect(),
            warning: warning.map(|warning| warning.to_string()),
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            active_id: None,
            editor_text: String::new(),
            sidebar: Vec::new(),
            warning: None,
            message: message.into(),
        }
    }
}

/// Starts the notepad: creates a note when none exist and returns the display.
///
/// A failure here means persistent storage is unavailable; hosts must show
/// a static error and keep note features disabled.
#[flutter_rust_bridge::frb(sync)]
pub fn notepad_open() -> NotepadResponse {
    notepad_open_in(&resolve_db_path())
}

/// Saves editor text into the active note (also for shutdown flushes).
#[flutter_rust_bridge::frb(sync)]
pub fn notepad_edit(text: String) -> NotepadResponse {
    notepad_edit_in(&resolve_db_path(), &text)
}

/// Activates a note previously returned in `sidebar`.
#[flutter_rust_bridge::frb(sync)]
pub fn notepad_select(note_id: String) -> NotepadResponse {
    notepad_select_in(&resolve_db_path(), &note_id)
}

#[flutter_rust_bridge::frb(sync)]
pub fn notepad_add() -> NotepadResponse {
    notepad_add_in(&resolve_db_path())
}

#[flutter_rust_bridge::frb(sync)]
pub fn notepad_delete() -> NotepadResponse {
    notepad_delete_in(&resolve_db_path())
}

/// Deletes all notes when `confirmed`; hosts own the confirmation dialog.
#[flutter_rust_bridge::frb(sync)]
pub fn notepad_delete_all(confirmed: bool) -> NotepadResponse {
    notepad_delete_all_in(&resolve_db_path(), confirmed)
}

fn notepad_open_in(db_path: &Path) -> NotepadResponse {
    with_session(db_path, "notepad_open", |session| {
        Ok((session.refresh()?, None))
    })
}

fn notepad_edit_in(db_path: &Path, text: &str) -> NotepadResponse {
    with_session(db_path, "notepad_edit", |session| {
        let outcome = session.edit(text)?;
        Ok((outcome.view, outcome.warning))
    })
}

fn notepad_select_in(db_path: &Path, note_id: &str) -> NotepadResponse {
    with_session(db_path, "notepad_select", |session| {
        Ok((session.select(note_id.trim())?, None))
    })
}

fn notepad_add_in(db_path: &Path) -> NotepadResponse {
    with_session(db_path, "notepad_add", |session| Ok((session.add()?, None)))
}

fn notepad_delete_in(db_path: &Path) -> NotepadResponse {
    with_session(db_path, "notepad_delete", |session| {
        Ok((session.delete()?, None))
    })
}

fn notepad_delete_all_in(db_path: &Path, confirmed: bool) -> NotepadResponse {
    let confirmation = if confirmed {
        Confirmation::Confirmed
    } else {
        Confirmation::Declined
    };
    with_session(db_path, "notepad_delete_all", |session| {
        Ok((session.delete_all(confirmation)?, None))
    })
}

fn with_session(
    db_path: &Path,
    operation: &str,
    f: impl FnOnce(
        &mut NotepadSession<SqliteKvStore>,
    ) -> SessionResult<(NotepadView, Option<Warning>)>,
) -> NotepadResponse {
    let config = match NotepadConfig::from_env() {
        Ok(config) => config,
        Err(err) => return NotepadResponse::failure(format!("{operation} failed: {err}")),
    };
    let store = match open_note_store(db_path, &config) {
        Ok(store) => store,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation} error_code=storage_unavailable");
            return NotepadResponse::failure(format!("{operation} failed: storage unavailable: {err}"));
        }
    };
    let result = NotepadSession::open(store).and_then(|(mut session, _)| f(&mut session));
    match result {
        Ok((view, warning)) => NotepadResponse::success(view, warning),
        Err(err) => NotepadResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    NOTEPAD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(NOTEPAD_DB_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(NOTEPAD_DB_FILE_NAME)
        })
        .clone()
}

fn to_sidebar_item(entry: SidebarEntry) -> NotepadSidebarItem {
    NotepadSidebarItem {
        note_id: entry.id.to_string(),
        is_active: entry.is_active,
        timestamp_label: entry.timestamp_label,
        summary: entry.summary,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, notepad_add_in, notepad_delete_all_in, notepad_delete_in,
        notepad_edit_in, notepad_open_in, notepad_select_in,
    };
    use std::path::PathBuf;

    fn temp_db() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("notes.sqlite3");
        (dir, path)
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn open_creates_placeholder_note() {
        let (_dir, db) = temp_db();
        let response = notepad_open_in(&db);

        assert!(response.ok, "{}", response.message);
        assert_eq!(response.editor_text, "(type here)");
        assert_eq!(response.sidebar.len(), 1);
        assert!(response.sidebar[0].is_active);
        assert_eq!(response.active_id.as_deref(), Some(response.sidebar[0].note_id.as_str()));
    }

    #[test]
    fn edit_then_add_then_select_previous() {
        let (_dir, db) = temp_db();
        let first = notepad_edit_in(&db, "groceries\nmilk");
        assert!(first.ok, "{}", first.message);
        assert_eq!(first.sidebar[0].summary, "groceries");
        let first_id = first.active_id.clone().expect("active id");

        let added = notepad_add_in(&db);
        assert_eq!(added.sidebar.len(), 2);
        assert_ne!(added.active_id.as_deref(), Some(first_id.as_str()));

        let selected = notepad_select_in(&db, &first_id);
        assert!(selected.ok, "{}", selected.message);
        assert_eq!(selected.editor_text, "groceries\nmilk");
    }

    #[test]
    fn select_unknown_note_fails_without_panicking() {
        let (_dir, db) = temp_db();
        let response = notepad_select_in(&db, "simplenote_0");
        assert!(!response.ok);
        assert!(response.message.contains("no such note"));
    }

    #[test]
    fn delete_and_delete_all_keep_one_note_visible() {
        let (_dir, db) = temp_db();
        notepad_add_in(&db);
        notepad_add_in(&db);

        let after_delete = notepad_delete_in(&db);
        assert_eq!(after_delete.sidebar.len(), 2);

        let declined = notepad_delete_all_in(&db, false);
        assert_eq!(declined.sidebar.len(), 2);
        let confirmed = notepad_delete_all_in(&db, true);
        assert_eq!(confirmed.sidebar.len(), 1);
        assert_eq!(confirmed.editor_text, "(type here)");
    }

    #[test]
    fn unavailable_storage_reports_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let response = notepad_open_in(dir.path());
        assert!(!response.ok);
        assert!(response.message.contains("storage unavailable"));
    }
}
