//! talentdb-cache
//!
//! Memoizes ranked results and generated summaries. Two interchangeable
//! backends sit behind [`ResultCache`]: a bounded in-process FIFO map and a
//! Redis store. [`open_cache`] prefers Redis when configured and reachable
//! and otherwise falls back to memory; it never fails.
//!
//! The in-process cache belongs to one process. Separate workers keep
//! separate caches and never invalidate each other.

pub mod key;
pub mod memory;
pub mod redis_backend;
pub mod select;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use talentdb_core::Error;

pub use key::{normalize_query, query_cache_key, summary_cache_key};
pub use memory::{Clock, ManualClock, MemoryCache, SystemClock};
pub use redis_backend::RedisCache;
pub use select::open_cache;

/// String-valued cache with per-entry TTL.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
    /// Live entry count, when the backend can report it cheaply.
    fn size(&self) -> Option<usize>;
    fn backend(&self) -> &'static str;
}

/// Deserialize a cached JSON payload. A payload that does not parse is
/// logged and reported as a miss.
pub fn get_json<T: DeserializeOwned>(cache: &dyn ResultCache, key: &str) -> Option<T> {
    let raw = cache.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            let err = Error::MalformedCacheEntry(e.to_string());
            tracing::warn!(key, error = %err, "ignoring cached value");
            None
        }
    }
}

pub fn set_json<T: Serialize>(cache: &dyn ResultCache, key: &str, value: &T, ttl: Duration) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.set(key, raw, ttl),
        Err(e) => tracing::warn!(key, error = %e, "value not cacheable"),
    }
}

pub(crate) fn prefixed(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}:{key}")
    }
}
