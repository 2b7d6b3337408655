use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::{prefixed, ResultCache};

/// Time source for TTL checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { start: Instant::now(), elapsed: Mutex::new(Duration::ZERO) }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}

struct Entry {
    value: String,
    inserted: Instant,
    ttl: Duration,
}

#[derive(Default)]
struct Inner {
    /// Keys in insertion order; front is evicted first.
    order: VecDeque<String>,
    entries: HashMap<String, Entry>,
}

impl Inner {
    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}

/// Bounded in-process cache. Eviction is FIFO by first insertion, not by
/// access; overwriting a live key keeps its place. TTL is checked on read.
pub struct MemoryCache {
    prefix: String,
    capacity: usize,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl MemoryCache {
    pub fn new(prefix: impl Into<String>, capacity: usize) -> Self {
        Self::with_clock(prefix, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(prefix: impl Into<String>, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            prefix: prefix.into(),
            capacity: capacity.max(1),
            clock,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.order.clear();
        inner.entries.clear();
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let key = prefixed(&self.prefix, key);
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let entry = inner.entries.get(&key)?;
        if now.saturating_duration_since(entry.inserted) < entry.ttl {
            return Some(entry.value.clone());
        }
        inner.remove(&key);
        tracing::debug!(key = %key, "cache entry expired");
        None
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let key = prefixed(&self.prefix, key);
        let inserted = self.clock.now();
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.get_mut(&key) {
            *entry = Entry { value, inserted, ttl };
            return;
        }
        while inner.entries.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else { break };
            inner.entries.remove(&oldest);
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(key, Entry { value, inserted, ttl });
    }

    /// Live entries only; expired ones still held until their next read
    /// are not counted.
    fn size(&self) -> Option<usize> {
        let now = self.clock.now();
        let inner = self.inner.lock();
        Some(inner.entries.values().filter(|e| now.saturating_duration_since(e.inserted) < e.ttl).count())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_fifo_position() {
        let cache = MemoryCache::new("", 2);
        cache.set("a", "1".into(), Duration::from_secs(60));
        cache.set("b", "2".into(), Duration::from_secs(60));
        cache.set("a", "3".into(), Duration::from_secs(60));
        cache.set("c", "4".into(), Duration::from_secs(60));
        assert_eq!(cache.get("a"), None, "a was inserted first");
        assert_eq!(cache.get("b").as_deref(), Some("2"));
        assert_eq!(cache.get("c").as_deref(), Some("4"));
    }

    #[test]
    fn expired_entries_leave_the_order_queue() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock("", 2, clock.clone());
        cache.set("a", "1".into(), Duration::from_secs(1));
        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.inner.lock().order.len(), 0);
    }
}
