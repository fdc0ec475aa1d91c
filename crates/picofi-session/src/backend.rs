//! Storage backends for encoded sessions.
//!
//! The store only ever hands a backend fully encoded bytes, so a backend
//! never sees half a session. [`MemoryBackend`] is the in-process default; a
//! networked cache can implement [`SessionBackend`] without touching the
//! store or its callers.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::error::{StoreError, StoreResult};

/// Key/value storage with absolute per-entry expiry.
///
/// Values are immutable `Arc<[u8]>` snapshots: readers clone the `Arc`,
/// writers swap in a new one.
pub trait SessionBackend: Send + Sync {
    /// Inserts a new entry that expires `ttl` from now.
    fn insert(&self, key: &str, value: Arc<[u8]>, ttl: Duration) -> StoreResult<()>;

    /// Returns the value of a live entry.
    fn get(&self, key: &str) -> StoreResult<Option<Arc<[u8]>>>;

    /// Swaps the value of a live entry, keeping its expiry.
    ///
    /// Returns `false` when there is no live entry to replace.
    fn replace(&self, key: &str, value: Arc<[u8]>) -> StoreResult<bool>;

    /// Time left before a live entry expires.
    fn time_to_live(&self, key: &str) -> StoreResult<Option<Duration>>;

    /// Drops every expired entry and returns how many were removed.
    fn sweep(&self) -> StoreResult<usize>;
}

#[derive(Debug)]
struct Entry {
    value: Arc<[u8]>,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-memory backend on a sharded [`DashMap`].
///
/// Each operation locks a single shard for the duration of a pointer swap or
/// clone. Expired entries are removed on the next lookup or by
/// [`SessionBackend::sweep`].
#[derive(Debug)]
pub struct MemoryBackend {
    entries: DashMap<String, Entry>,
    max_entry_bytes: usize,
}

impl MemoryBackend {
    /// Default ceiling for one encoded session.
    pub const DEFAULT_MAX_ENTRY_BYTES: usize = 64 * 1024;

    pub fn new() -> Self {
        Self::with_max_entry_bytes(Self::DEFAULT_MAX_ENTRY_BYTES)
    }

    pub fn with_max_entry_bytes(max_entry_bytes: usize) -> Self {
        MemoryBackend {
            entries: DashMap::new(),
            max_entry_bytes,
        }
    }

    /// Number of entries held, live or not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_size(&self, value: &[u8]) -> StoreResult<()> {
        if value.len() > self.max_entry_bytes {
            return Err(StoreError::EntryTooLarge {
                size: value.len(),
                max: self.max_entry_bytes,
            });
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBackend for MemoryBackend {
    fn insert(&self, key: &str, value: Arc<[u8]>, ttl: Duration) -> StoreResult<()> {
        self.check_size(&value)?;
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(StoreError::TtlOutOfRange(ttl))?;
        let entry = Entry { value, expires_at };
        self.entries.insert(key.to_owned(), entry);
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Arc<[u8]>>> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => return Ok(Some(Arc::clone(&entry.value))),
            Some(_) => {}
            None => return Ok(None),
        }

        // Shard guard is released above; re-check so a concurrent insert survives
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        Ok(None)
    }

    fn replace(&self, key: &str, value: Arc<[u8]>) -> StoreResult<bool> {
        self.check_size(&value)?;
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now) => {
                entry.value = value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn time_to_live(&self, key: &str) -> StoreResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.expires_at - now))
    }

    fn sweep(&self) -> StoreResult<usize> {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        Ok(before.saturating_sub(self.entries.len()))
    }
}
