//! Note domain model.
//!
//! # Responsibility
//! - Define the storage-key identity of a note and its text payload.
//! - Provide the time source used to mint new identities.
//!
//! # Invariants
//! - A `NoteId` is the full storage key: namespace prefix + epoch millis.
//! - The active-pointer key is never a note, even though it shares the prefix.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Namespace prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "simplenote_";
/// Key suffix (after the prefix) of the active-note pointer entry.
pub const ACTIVE_NOTE_SUFFIX: &str = "activeNote";
/// Content written into freshly created notes.
pub const PLACEHOLDER_CONTENT: &str = "(type here)";

/// Storage key identifying one note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Builds the key for a note created at `millis`.
    pub fn from_timestamp(prefix: &str, millis: i64) -> Self {
        Self(format!("{prefix}{millis}"))
    }

    /// Wraps an existing storage key without validation.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creation time encoded in the key, or `None` when the suffix after
    /// `prefix` is not a decimal integer.
    pub fn timestamp_millis(&self, prefix: &str) -> Option<i64> {
        self.0.strip_prefix(prefix)?.parse().ok()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
}

/// Source of epoch-millisecond timestamps for new note ids.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64,
{
    fn now_millis(&self) -> i64 {
        self()
    }
}
