//! In-process key-value store.
//!
//! Mirrors [`SqliteKvStore`](super::kv_repo::SqliteKvStore) semantics
//! (ordering, overwrite position, quota) without touching disk.

use super::kv_repo::{entry_chars, KeyValueStore, KvError, KvResult};

/// Insertion-ordered store kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Vec<(String, String)>,
    quota: Option<u64>,
    mutations: u64,
}

impl MemoryKvStore {
    /// Creates an empty store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with a character quota.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Number of accepted `write`/`remove` calls so far.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }
}

impl KeyValueStore for MemoryKvStore {
    fn read(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.position(key).map(|idx| self.entries[idx].1.clone()))
    }

    fn write(&mut self, key: &str, value: &str) -> KvResult<()> {
        if let Some(limit) = self.quota {
            let others: u64 = self
                .entries
                .iter()
                .filter(|(existing, _)| existing != key)
                .map(|(k, v)| entry_chars(k, v))
                .sum();
            let requested = others + entry_chars(key, value);
            if requested > limit {
                return Err(KvError::QuotaExceeded { requested, limit });
            }
        }

        match self.position(key) {
            Some(idx) => self.entries[idx].1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        self.mutations += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        if let Some(idx) = self.position(key) {
            self.entries.remove(idx);
        }
        self.mutations += 1;
        Ok(())
    }

    fn count(&self) -> KvResult<usize> {
        Ok(self.entries.len())
    }

    fn key_at(&self, index: usize) -> KvResult<Option<String>> {
        Ok(self.entries.get(index).map(|(key, _)| key.clone()))
    }
}
