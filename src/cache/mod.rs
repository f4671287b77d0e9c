//! 答案缓存模块：按文档与问题列表的指纹缓存答案集合，并在 TTL 之后失效。
//!
//! # Answer Cache Module
//!
//! Content-addressed, time-bounded memoization of answer sets, so that asking
//! the same questions about the same document twice within the TTL costs one
//! model call.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`AnswerCache`] | Shared handle with statistics; what the client holds |
//! | [`CacheConfig`] | TTL, capacity and on/off switch |
//! | [`CacheBackend`] | Trait for implementing custom stores |
//! | [`MemoryCache`] | In-memory LRU store with a fixed TTL |
//! | [`NullCache`] | No-op store for disabling caching |
//! | [`Fingerprint`] | SHA-256 content address of a request |
//!
//! ## Expiry
//!
//! Reads never return an entry older than the TTL. Expired entries are also
//! swept opportunistically before each orchestrated call rather than by a
//! background timer, so memory held by stale entries is bounded by the TTL
//! plus the gap between calls.
//!
//! ## Example
//!
//! ```rust
//! use grounded_qa::cache::{AnswerCache, CacheConfig, Fingerprint};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache = AnswerCache::from_config(&CacheConfig::new().with_ttl(Duration::from_secs(60)));
//! let key = Fingerprint::compute("Grace period is thirty days.", &["What is the grace period?"]);
//! cache.put(&key, &["Thirty days.".to_string()]).await;
//! assert_eq!(cache.get(&key).await, Some(vec!["Thirty days.".to_string()]));
//! # }
//! ```

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use key::Fingerprint;
pub use manager::{AnswerCache, CacheConfig, CacheStats, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
