//! Answer cache handle.

use super::backend::{CacheBackend, MemoryCache, NullCache};
use super::key::Fingerprint;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Answers stay fresh for five minutes unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// A disabled cache stores nothing; every request calls the model.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub expired: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    expired: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
        }
    }
}

/// Shared handle to the answer store.
///
/// Created once and passed into every [`QaClient`](crate::QaClient) that
/// should share answers. Clones point at the same backend and counters.
#[derive(Clone)]
pub struct AnswerCache {
    backend: Arc<dyn CacheBackend>,
    stats: Arc<AtomicStats>,
}

impl AnswerCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            stats: Arc::new(AtomicStats::default()),
        }
    }

    /// In-memory cache with the default five minute TTL.
    pub fn in_memory() -> Self {
        Self::from_config(&CacheConfig::default())
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(Arc::new(MemoryCache::new(config.ttl, config.max_entries)))
        } else {
            Self::new(Arc::new(NullCache::new()))
        }
    }

    pub async fn get(&self, key: &Fingerprint) -> Option<Vec<String>> {
        let found = self.backend.get(key).await;
        if found.is_some() {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(fingerprint = key.short(), "answer cache hit");
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            debug!(fingerprint = key.short(), "answer cache miss");
        }
        found
    }

    pub async fn put(&self, key: &Fingerprint, answers: &[String]) {
        self.backend.put(key, answers).await;
        self.stats.stores.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn sweep(&self) -> usize {
        let removed = self.backend.sweep().await;
        if removed > 0 {
            self.stats.expired.fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "swept expired answer sets");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.backend.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.backend.clear().await
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

impl Default for AnswerCache {
    fn default() -> Self {
        Self::in_memory()
    }
}
