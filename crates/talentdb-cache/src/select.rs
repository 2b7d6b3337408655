use std::sync::Arc;
use std::time::Duration;

use talentdb_core::config::{CacheBackendKind, CacheSettings};

use crate::{MemoryCache, RedisCache, ResultCache};

/// Open the configured backend under `prefix`. Redis is used when it is
/// requested (or `auto` with a URL) and answers `PING`; every other case
/// ends in the in-process cache.
pub fn open_cache(settings: &CacheSettings, prefix: &str) -> Arc<dyn ResultCache> {
    let url = settings.redis_url.as_deref().map(str::trim).filter(|u| !u.is_empty());
    let try_external = match settings.backend {
        CacheBackendKind::Memory => false,
        CacheBackendKind::Auto => url.is_some(),
        CacheBackendKind::External => {
            if url.is_none() {
                tracing::warn!(prefix, "external cache requested without cache.redis_url; using memory");
            }
            url.is_some()
        }
    };

    if let (true, Some(url)) = (try_external, url) {
        let timeout = Duration::from_millis(settings.connect_timeout_ms.max(1));
        match RedisCache::connect(url, prefix, timeout) {
            Ok(cache) => {
                tracing::info!(prefix, "using redis cache");
                return Arc::new(cache);
            }
            Err(e) => tracing::warn!(prefix, error = %e, "redis unavailable; falling back to memory cache"),
        }
    }

    tracing::info!(prefix, capacity = settings.capacity, "using memory cache");
    Arc::new(MemoryCache::new(prefix, settings.capacity))
}
