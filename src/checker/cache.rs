// src/checker/cache.rs
// =============================================================================
// A time-limited cache of probe results, keyed by absolute URL.
//
// - One freshness window (TTL) applies to every entry
// - An entry older than the TTL is treated as missing and dropped on lookup
// - put() always overwrites, so concurrent writers resolve last-write-wins
//
// The cache is shared by every probe in the process, so the map sits behind
// a Mutex. The lock is only held for a HashMap operation, never across an
// .await, which is why a plain std Mutex is enough here.
//
// Timestamps use tokio's Instant so tests can fast-forward a paused clock.
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use super::http::ValidationResult;

#[derive(Debug, Clone)]
struct CacheEntry {
    result: ValidationResult,
    created_at: Instant,
}

#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached result for `url` if it is still fresh.
    pub fn get(&self, url: &str) -> Option<ValidationResult> {
        let mut entries = self.lock();

        let fresh = match entries.get(url) {
            Some(entry) => entry.created_at.elapsed() <= self.ttl,
            None => return None,
        };

        if fresh {
            entries.get(url).map(|entry| entry.result.clone())
        } else {
            trace!(url, "cache entry expired");
            entries.remove(url);
            None
        }
    }

    pub fn put(&self, url: &str, result: ValidationResult) {
        let entry = CacheEntry {
            result,
            created_at: Instant::now(),
        };
        self.lock().insert(url.to_string(), entry);
    }

    /// Number of stored entries, expired ones included until looked up
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // A panic while holding the lock cannot leave a HashMap half-written
    // in a way we care about, so keep serving from it.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
