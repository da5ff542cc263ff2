//! Note store over a namespaced key-value resource.
//!
//! # Responsibility
//! - CRUD over the persisted note collection.
//! - Maintain the active-note pointer so it always names an existing note.
//!
//! # Invariants
//! - Holds no cache: every call re-reads the key-value store.
//! - After `active_note()` returns, the pointer names an existing note.
//! - Between `delete_note`/`delete_all_notes` and the next `active_note()`
//!   the pointer is unset; callers must re-derive before displaying.
//! - Note content is never written to logs.

use crate::model::note::{
    Clock, Note, NoteId, SystemClock, ACTIVE_NOTE_SUFFIX, PLACEHOLDER_CONTENT,
};
use crate::repo::kv_repo::{KeyValueStore, KvError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for note store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The key-value store refused a write because it is full.
    QuotaExceeded { requested: u64, limit: u64 },
    /// Any other storage failure.
    Kv(KvError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { requested, limit } => write!(
                f,
                "storage limit reached: {requested} characters needed, {limit} available"
            ),
            Self::Kv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Kv(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        match value {
            KvError::QuotaExceeded { requested, limit } => {
                Self::QuotaExceeded { requested, limit }
            }
            other => Self::Kv(other),
        }
    }
}

/// Note collection plus active pointer, backed by one key-value store.
pub struct NoteStore<S: KeyValueStore, C: Clock = SystemClock> {
    kv: S,
    prefix: String,
    active_key: String,
    clock: C,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Creates a store keyed under `prefix`, stamping new notes with the
    /// wall clock.
    pub fn new(kv: S, prefix: impl Into<String>) -> Self {
        Self::with_clock(kv, prefix, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> NoteStore<S, C> {
    /// Creates a store with a caller-provided time source.
    pub fn with_clock(kv: S, prefix: impl Into<String>, clock: C) -> Self {
        let prefix = prefix.into();
        let active_key = format!("{prefix}{ACTIVE_NOTE_SUFFIX}");
        Self {
            kv,
            prefix,
            active_key,
            clock,
        }
    }

    /// Namespace prefix of every key owned by this store.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Storage key of the active-note pointer.
    pub fn active_key(&self) -> &str {
        &self.active_key
    }

    /// Borrows the underlying key-value store.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Releases the underlying key-value store.
    pub fn into_inner(self) -> S {
        self.kv
    }

    /// Lists all notes in storage enumeration order.
    pub fn list_notes(&self) -> StoreResult<Vec<Note>> {
        let mut notes = Vec::new();
        for id in self.note_ids()? {
            // Keys enumerated a moment ago can only vanish through another
            // writer sharing the storage; skip them.
            if let Some(content) = self.kv.read(id.as_str())? {
                notes.push(Note { id, content });
            }
        }
        Ok(notes)
    }

    /// Number of notes without reading their content.
    pub fn note_count(&self) -> StoreResult<usize> {
        Ok(self.note_ids()?.len())
    }

    /// Content of one note, `None` when `id` is not a stored note.
    pub fn note_content(&self, id: &NoteId) -> StoreResult<Option<String>> {
        if !self.is_note_key(id.as_str()) {
            return Ok(None);
        }
        Ok(self.kv.read(id.as_str())?)
    }

    /// Resolves the active note, nominating or creating one when needed.
    ///
    /// # Side effects
    /// - Clears a pointer that names a missing note.
    /// - Persists the last enumerated note as active when the pointer is unset.
    /// - Creates a placeholder note when the collection is empty.
    pub fn active_note(&mut self) -> StoreResult<NoteId> {
        if let Some(pointer) = self.kv.read(&self.active_key)? {
            if self.is_live_note(&pointer)? {
                return Ok(NoteId::from_key(pointer));
            }
            if !pointer.is_empty() {
                warn!("event=active_note_stale module=store status=recovered note_id={pointer}");
            }
            self.kv.remove(&self.active_key)?;
        }

        match self.note_ids()?.pop() {
            Some(nominated) => {
                debug!("event=active_note_nominate module=store status=ok note_id={nominated}");
                self.set_active_note(&nominated)
            }
            None => self.add_note(),
        }
    }

    /// Content of the active note, resolving the pointer first.
    pub fn active_note_content(&mut self) -> StoreResult<(NoteId, String)> {
        let id = self.active_note()?;
        let content = self.kv.read(id.as_str())?.unwrap_or_default();
        Ok((id, content))
    }

    /// Persists `id` as the active note.
    ///
    /// No existence check happens here; selection input is validated by the
    /// session layer against what it rendered.
    pub fn set_active_note(&mut self, id: &NoteId) -> StoreResult<NoteId> {
        self.kv.write(&self.active_key, id.as_str())?;
        info!("event=active_note_set module=store status=ok note_id={id}");
        Ok(id.clone())
    }

    /// Creates a placeholder note stamped with the current time and makes
    /// it active.
    pub fn add_note(&mut self) -> StoreResult<NoteId> {
        let mut millis = self.clock.now_millis();
        let mut id = NoteId::from_timestamp(&self.prefix, millis);
        while self.kv.read(id.as_str())?.is_some() {
            millis = millis.saturating_add(1);
            id = NoteId::from_timestamp(&self.prefix, millis);
        }

        if let Err(err) = self.kv.write(id.as_str(), PLACEHOLDER_CONTENT) {
            warn!("event=note_add module=store status=error error={err}");
            return Err(err.into());
        }
        info!("event=note_add module=store status=ok note_id={id}");
        self.set_active_note(&id)
    }

    /// Replaces the content of the active note.
    ///
    /// # Errors
    /// - `StoreError::QuotaExceeded` when storage is full; the stored copy
    ///   keeps its previous content.
    pub fn update_note(&mut self, text: &str) -> StoreResult<()> {
        let id = self.active_note()?;
        match self.kv.write(id.as_str(), text) {
            Ok(()) => {
                debug!(
                    "event=note_update module=store status=ok note_id={id} chars={}",
                    text.chars().count()
                );
                Ok(())
            }
            Err(err) => {
                warn!("event=note_update module=store status=error note_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Removes the active note and clears the pointer. Returns the removed id.
    pub fn delete_note(&mut self) -> StoreResult<NoteId> {
        let id = self.active_note()?;
        self.kv.remove(id.as_str())?;
        self.kv.remove(&self.active_key)?;
        info!("event=note_delete module=store status=ok note_id={id}");
        Ok(id)
    }

    /// Removes every note and clears the pointer. Returns how many notes
    /// were removed.
    pub fn delete_all_notes(&mut self) -> StoreResult<usize> {
        let ids = self.note_ids()?;
        for id in &ids {
            self.kv.remove(id.as_str())?;
        }
        self.kv.remove(&self.active_key)?;
        info!("event=note_delete_all module=store status=ok count={}", ids.len());
        Ok(ids.len())
    }

    fn note_ids(&self) -> StoreResult<Vec<NoteId>> {
        let count = self.kv.count()?;
        let mut ids = Vec::new();
        for index in 0..count {
            if let Some(key) = self.kv.key_at(index)? {
                if self.is_note_key(&key) {
                    ids.push(NoteId::from_key(key));
                }
            }
        }
        Ok(ids)
    }

    fn is_note_key(&self, key: &str) -> bool {
        key.starts_with(&self.prefix) && key != self.active_key
    }

    fn is_live_note(&self, key: &str) -> StoreResult<bool> {
        if !self.is_note_key(key) {
            return Ok(false);
        }
        Ok(self.kv.read(key)?.is_some())
    }
}
