//! Persisted cache for external encyclopedia lookups
//!
//! Entries live in a SQLite file so they survive restarts. The cache is
//! bounded two ways: entries older than the TTL are misses (and are purged),
//! and inserting past `max_entries` evicts the oldest entries first.
//!
//! A single `Mutex<Connection>` guards all access; the cache is shared across
//! request handlers through an `Arc<LookupCache>`.

use crate::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Default maximum number of cached lookups
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Default time-to-live: 7 days
pub const DEFAULT_TTL_SECS: u64 = 7 * 24 * 3600;

/// A cached external lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Normalized query key
    pub key: String,
    /// Page title
    pub title: String,
    /// Fetched extract text
    pub text: String,
    /// Page URL
    pub url: String,
    /// Fetch time, seconds since Unix epoch
    pub fetched_at: u64,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            text: text.into(),
            url: url.into(),
            fetched_at: unix_now(),
        }
    }
}

/// Bounded SQLite-backed lookup cache
pub struct LookupCache {
    conn: Mutex<Connection>,
    max_entries: usize,
    ttl: Duration,
}

impl LookupCache {
    /// Open (or create) a cache at the given path
    ///
    /// Use `:memory:` for a process-local cache (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P, max_entries: usize, ttl: Duration) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        let cache = Self {
            conn: Mutex::new(conn),
            max_entries: max_entries.max(1),
            ttl,
        };
        let purged = cache.purge_expired()?;
        if purged > 0 {
            debug!(purged, "Purged expired lookup cache entries");
        }
        Ok(cache)
    }

    /// In-memory cache with default bounds
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:", DEFAULT_MAX_ENTRIES, Duration::from_secs(DEFAULT_TTL_SECS))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn is_expired(&self, fetched_at: u64, now: u64) -> bool {
        now.saturating_sub(fetched_at) > self.ttl.as_secs()
    }

    /// Fetch a live entry; expired entries are deleted and reported as misses
    pub fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                "SELECT key, title, text, url, fetched_at FROM lookup_cache WHERE key = ?1",
                params![key],
                |row| {
                    Ok(CacheEntry {
                        key: row.get(0)?,
                        title: row.get(1)?,
                        text: row.get(2)?,
                        url: row.get(3)?,
                        fetched_at: row.get::<_, i64>(4)?.max(0) as u64,
                    })
                },
            )
            .optional()?;

        match entry {
            Some(entry) if self.is_expired(entry.fetched_at, unix_now()) => {
                conn.execute("DELETE FROM lookup_cache WHERE key = ?1", params![key])?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Insert or replace an entry, then evict the oldest entries over the bound
    pub fn put(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO lookup_cache (key, title, text, url, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![entry.key, entry.title, entry.text, entry.url, entry.fetched_at as i64],
        )?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM lookup_cache", [], |row| row.get(0))?;
        let excess = count - self.max_entries as i64;
        if excess > 0 {
            conn.execute(
                "DELETE FROM lookup_cache WHERE key IN (
                     SELECT key FROM lookup_cache ORDER BY fetched_at ASC, rowid ASC LIMIT ?1
                 )",
                params![excess],
            )?;
            debug!(evicted = excess, "Evicted oldest lookup cache entries");
        }
        Ok(())
    }

    /// Delete every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, StoreError> {
        let cutoff = unix_now().saturating_sub(self.ttl.as_secs());
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM lookup_cache WHERE fetched_at < ?1",
            params![cutoff as i64],
        )?;
        Ok(removed)
    }

    /// Number of stored entries (expired ones included until purged)
    pub fn len(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM lookup_cache", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    /// True when no entries are stored
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Remove every entry
    pub fn clear(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM lookup_cache", [])?;
        Ok(())
    }

    /// Configured maximum number of entries
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

/// Current time in seconds since Unix epoch
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
