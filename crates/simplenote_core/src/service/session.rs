//! Notepad session: the event boundary front ends drive.
//!
//! # Responsibility
//! - Translate UI events (edit, select, add, delete, delete-all) into note
//!   store calls.
//! - Rebuild the full display (editor text + sidebar) after every event.
//! - Turn storage-limit failures on edit into non-fatal warnings.
//!
//! # Invariants
//! - Every returned view names an existing active note.
//! - `select` only accepts ids present in the current sidebar render.
//! - A delete is always followed by active-note re-derivation before the
//!   view is built.

use crate::model::note::{Clock, NoteId, SystemClock};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::note_store::{NoteStore, StoreError};
use crate::service::sidebar::{note_summary, render_sidebar, SidebarEntry};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    /// Selection named an id that the sidebar does not show.
    UnknownNote(String),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNote(id) => write!(f, "no such note: `{id}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownNote(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// User answer to the "really delete all notes?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Dismissible, non-fatal notice for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Warning {
    /// The edit is visible but was not persisted.
    StorageLimit(String),
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageLimit(message) => write!(f, "storage limitation: {message}"),
        }
    }
}

/// Everything a front end needs to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotepadView {
    pub active_id: NoteId,
    pub editor_text: String,
    pub sidebar: Vec<SidebarEntry>,
}

/// Result of an edit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub view: NotepadView,
    pub warning: Option<Warning>,
}

/// One notepad session over a note store.
pub struct NotepadSession<S: KeyValueStore, C: Clock = SystemClock> {
    store: NoteStore<S, C>,
}

impl<S: KeyValueStore, C: Clock> NotepadSession<S, C> {
    /// Starts a session: guarantees at least one note, then draws.
    pub fn open(mut store: NoteStore<S, C>) -> SessionResult<(Self, NotepadView)> {
        if store.note_count()? == 0 {
            store.add_note()?;
        }
        let mut session = Self { store };
        let view = session.refresh()?;
        info!(
            "event=session_open module=session status=ok notes={} active={}",
            view.sidebar.len(),
            view.active_id
        );
        Ok((session, view))
    }

    pub fn store(&self) -> &NoteStore<S, C> {
        &self.store
    }

    pub fn into_store(self) -> NoteStore<S, C> {
        self.store
    }

    /// Rebuilds the display from storage.
    pub fn refresh(&mut self) -> SessionResult<NotepadView> {
        let (active_id, editor_text) = self.store.active_note_content()?;
        let sidebar = render_sidebar(&mut self.store)?;
        Ok(NotepadView {
            active_id,
            editor_text,
            sidebar,
        })
    }

    /// Persists editor text into the active note. Also used to flush the
    /// editor when the front end shuts down.
    pub fn edit(&mut self, text: &str) -> SessionResult<EditOutcome> {
        let warning = match self.store.update_note(text) {
            Ok(()) => None,
            Err(err @ StoreError::QuotaExceeded { .. }) => {
                warn!("event=session_edit module=session status=warning error_code=quota_exceeded");
                Some(Warning::StorageLimit(err.to_string()))
            }
            Err(err) => return Err(err.into()),
        };

        let mut view = self.refresh()?;
        if warning.is_some() {
            view.editor_text = text.to_string();
            let active_id = view.active_id.clone();
            if let Some(entry) = view.sidebar.iter_mut().find(|entry| entry.id == active_id) {
                entry.summary = note_summary(text);
            }
        }
        Ok(EditOutcome { view, warning })
    }

    /// Switches the active note to one currently shown in the sidebar.
    pub fn select(&mut self, id: &str) -> SessionResult<NotepadView> {
        let sidebar = render_sidebar(&mut self.store)?;
        let Some(entry) = sidebar.into_iter().find(|entry| entry.id.as_str() == id) else {
            warn!("event=session_select module=session status=rejected note_id={id}");
            return Err(SessionError::UnknownNote(id.to_string()));
        };
        self.store.set_active_note(&entry.id)?;
        self.refresh()
    }

    /// Creates a new placeholder note and shows it.
    pub fn add(&mut self) -> SessionResult<NotepadView> {
        self.store.add_note()?;
        self.refresh()
    }

    /// Deletes the active note, then shows whichever note becomes active.
    pub fn delete(&mut self) -> SessionResult<NotepadView> {
        self.store.delete_note()?;
        self.refresh()
    }

    /// Deletes every note once the user confirmed; a declined prompt only
    /// redraws.
    pub fn delete_all(&mut self, confirmation: Confirmation) -> SessionResult<NotepadView> {
        if confirmation == Confirmation::Confirmed {
            self.store.delete_all_notes()?;
        } else {
            info!("event=session_delete_all module=session status=declined");
        }
        self.refresh()
    }
}
