use std::time::Duration;

use parking_lot::Mutex;
use redis::Commands;

use talentdb_core::{Error, Result};

use crate::{prefixed, ResultCache};

/// Redis-backed cache. Expiry is native (`SET .. EX`), so `size()` is
/// unknown. Runtime errors degrade to misses and are logged.
pub struct RedisCache {
    prefix: String,
    conn: Mutex<redis::Connection>,
}

impl RedisCache {
    /// Connect and `PING` within `timeout`; any failure is `CacheBackend`.
    pub fn connect(url: &str, prefix: impl Into<String>, timeout: Duration) -> Result<Self> {
        let backend = |e: redis::RedisError| Error::CacheBackend(format!("{url}: {e}"));
        let client = redis::Client::open(url).map_err(backend)?;
        let mut conn = client.get_connection_with_timeout(timeout).map_err(backend)?;
        conn.set_read_timeout(Some(timeout)).map_err(backend)?;
        conn.set_write_timeout(Some(timeout)).map_err(backend)?;
        let _: String = redis::cmd("PING").query(&mut conn).map_err(backend)?;
        Ok(Self { prefix: prefix.into(), conn: Mutex::new(conn) })
    }
}

impl ResultCache for RedisCache {
    fn get(&self, key: &str) -> Option<String> {
        let key = prefixed(&self.prefix, key);
        match self.conn.lock().get::<_, Option<String>>(&key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "redis get failed; treating as miss");
                None
            }
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let key = prefixed(&self.prefix, key);
        let seconds = ttl.as_secs().max(1);
        if let Err(e) = self.conn.lock().set_ex::<_, _, ()>(&key, value, seconds) {
            tracing::warn!(key = %key, error = %e, "redis set failed");
        }
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
