//! Cache backend implementations.

use super::key::Fingerprint;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone)]
struct CacheEntry {
    answers: Vec<String>,
    created_at: Instant,
}

impl CacheEntry {
    fn new(answers: Vec<String>) -> Self {
        Self {
            answers,
            created_at: Instant::now(),
        }
    }
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Storage for answer sets keyed by [`Fingerprint`].
///
/// Implementations must never hand out an entry older than their TTL. A
/// backend that can fail internally reports the failure as a miss.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &Fingerprint) -> Option<Vec<String>>;
    async fn put(&self, key: &Fingerprint, answers: &[String]);
    /// Drop every expired entry and return how many were removed.
    async fn sweep(&self) -> usize;
    async fn len(&self) -> usize;
    async fn clear(&self);
    fn name(&self) -> &'static str;
}

/// Process-local LRU store with a fixed TTL.
pub struct MemoryCache {
    entries: Mutex<LruCache<Fingerprint, CacheEntry>>,
    ttl: Duration,
}

impl MemoryCache {
    /// `max_entries` is clamped to at least one.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A panic while holding the lock cannot leave an entry half-written, so a
    // poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, LruCache<Fingerprint, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &Fingerprint) -> Option<Vec<String>> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => return Some(entry.answers.clone()),
            Some(_) => {}
            None => return None,
        }
        entries.pop(key);
        None
    }

    async fn put(&self, key: &Fingerprint, answers: &[String]) {
        self.lock()
            .put(key.clone(), CacheEntry::new(answers.to_vec()));
    }

    async fn sweep(&self) -> usize {
        let mut entries = self.lock();
        let expired: Vec<Fingerprint> = entries
            .iter()
            .filter(|(_, e)| e.is_expired(self.ttl))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    async fn len(&self) -> usize {
        self.lock()
            .iter()
            .filter(|(_, e)| !e.is_expired(self.ttl))
            .count()
    }

    async fn clear(&self) {
        self.lock().clear();
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Backend that never stores anything; every lookup misses.
pub struct NullCache;
impl NullCache {
    pub fn new() -> Self {
        Self
    }
}
impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _: &Fingerprint) -> Option<Vec<String>> {
        None
    }
    async fn put(&self, _: &Fingerprint, _: &[String]) {}
    async fn sweep(&self) -> usize {
        0
    }
    async fn len(&self) -> usize {
        0
    }
    async fn clear(&self) {}
    fn name(&self) -> &'static str {
        "null"
    }
}
