//! Short-lived response cache for read endpoints.
//!
//! Entries carry the instant they were stored and are served while their
//! age is at most the TTL. Expired entries are dropped lazily on the read that
//! finds them. There is no size bound and no LRU; entries leave only through
//! expiry or [`TtlCache::invalidate`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    stored_at: Instant,
}

/// Key-value store with per-entry expiry.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A panic while holding the lock cannot leave a half-written entry, so
    // poisoning is ignored.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fresh value for `key`, removing it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries();
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            entries.remove(key);
            return None;
        }
        Some(entry.data.clone())
    }

    /// Store `value`, replacing any existing entry for `key`.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.entries().insert(
            key.into(),
            CacheEntry {
                data: value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove every key containing `pattern`, or everything when `None`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        match pattern {
            None => entries.clear(),
            Some(pattern) => entries.retain(|key, _| !key.contains(pattern)),
        }
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache key for a resource family, optionally scoped to one vault.
///
/// `scoped_key("agents", None)` and `scoped_key("agents", Some("v1"))` are
/// independent slots.
pub fn scoped_key(resource: &str, vault_id: Option<&str>) -> String {
    match vault_id {
        Some(id) => format!("{}:vault:{}", resource, id),
        None => resource.to_string(),
    }
}

/// Cache key for a single item.
pub fn item_key(resource: &str, id: &str) -> String {
    format!("{}:{}", resource, id)
}
