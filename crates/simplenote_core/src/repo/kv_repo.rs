//! Key-value store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the five storage primitives the note core depends on.
//! - Enforce the character quota on writes, like browser storage does.
//!
//! # Invariants
//! - Overwriting a key keeps its enumeration position.
//! - New keys are appended to enumeration order.
//! - A write rejected for quota leaves the store unchanged.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Default capacity, in characters of `key + value` across all entries.
pub const DEFAULT_QUOTA_CHARS: u64 = 5 * 1024 * 1024;

pub type KvResult<T> = Result<T, KvError>;

/// Error for key-value storage primitives.
#[derive(Debug)]
pub enum KvError {
    /// Underlying SQLite failure.
    Db(DbError),
    /// Write would push total stored characters above the quota.
    QuotaExceeded { requested: u64, limit: u64 },
    /// Persisted rows violate storage expectations.
    InvalidData(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { requested, limit } => write!(
                f,
                "storage quota exceeded: {requested} characters requested, limit is {limit}"
            ),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string key-value storage with index-based enumeration.
pub trait KeyValueStore {
    /// Returns the value stored under `key`.
    fn read(&self, key: &str) -> KvResult<Option<String>>;
    /// Inserts or replaces the value stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> KvResult<()>;
    /// Removes `key`. Missing keys are a no-op.
    fn remove(&mut self, key: &str) -> KvResult<()>;
    /// Number of stored entries, including keys owned by other applications.
    fn count(&self) -> KvResult<usize>;
    /// Key at enumeration position `index`, if any.
    fn key_at(&self, index: usize) -> KvResult<Option<String>>;
}

/// Character footprint of one entry, as counted against the quota.
pub(crate) fn entry_chars(key: &str, value: &str) -> u64 {
    (key.chars().count() + value.chars().count()) as u64
}

/// SQLite-backed key-value store owning its connection.
pub struct SqliteKvStore {
    conn: Connection,
    quota: Option<u64>,
}

impl SqliteKvStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>, quota: Option<u64>) -> KvResult<Self> {
        Ok(Self::from_connection(open_db(path)?, quota))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(quota: Option<u64>) -> KvResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?, quota))
    }

    /// Wraps a connection that was already opened through [`crate::db`].
    pub fn from_connection(conn: Connection, quota: Option<u64>) -> Self {
        Self { conn, quota }
    }

    /// Configured capacity in characters, `None` when unlimited.
    pub fn quota(&self) -> Option<u64> {
        self.quota
    }

    /// Borrows the raw connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn ensure_quota(&self, key: &str, value: &str) -> KvResult<()> {
        let Some(limit) = self.quota else {
            return Ok(());
        };
        let others: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(length(key) + length(value)), 0)
             FROM kv_entries
             WHERE key != ?1;",
            [key],
            |row| row.get(0),
        )?;
        let others = u64::try_from(others)
            .map_err(|_| KvError::InvalidData(format!("negative stored size `{others}`")))?;
        let requested = others + entry_chars(key, value);
        if requested > limit {
            return Err(KvError::QuotaExceeded { requested, limit });
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteKvStore {
    fn read(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.ensure_quota(key, value)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn count(&self) -> KvResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| KvError::InvalidData(format!("invalid entry count `{count}`")))
    }

    fn key_at(&self, index: usize) -> KvResult<Option<String>> {
        let offset = i64::try_from(index)
            .map_err(|_| KvError::InvalidData(format!("index `{index}` out of range")))?;
        let key = self
            .conn
            .query_row(
                "SELECT key FROM kv_entries ORDER BY seq ASC LIMIT 1 OFFSET ?1;",
                [offset],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(key)
    }
}
