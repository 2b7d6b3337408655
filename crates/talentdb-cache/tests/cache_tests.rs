use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use talentdb_cache::{
    get_json, open_cache, query_cache_key, set_json, summary_cache_key, ManualClock, MemoryCache,
    RedisCache, ResultCache,
};
use talentdb_core::config::{CacheBackendKind, CacheSettings};
use talentdb_core::Error;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Payload {
    ids: Vec<u64>,
    score: f32,
}

#[test]
fn round_trip_then_expire() {
    let clock = Arc::new(ManualClock::new());
    let cache = MemoryCache::with_clock("rag:query", 10, clock.clone());
    cache.set("k", "v".into(), Duration::from_secs(60));
    assert_eq!(cache.get("k").as_deref(), Some("v"));

    clock.advance(Duration::from_secs(59));
    assert_eq!(cache.get("k").as_deref(), Some("v"), "still fresh at 59s");

    clock.advance(Duration::from_secs(2));
    assert_eq!(cache.get("k"), None, "expired after the TTL");
    assert_eq!(cache.size(), Some(0), "expired entry dropped on read");
}

#[test]
fn size_skips_expired_entries_not_yet_read() {
    let clock = Arc::new(ManualClock::new());
    let cache = MemoryCache::with_clock("", 10, clock.clone());
    cache.set("short", "s".into(), Duration::from_secs(10));
    cache.set("long", "l".into(), Duration::from_secs(600));
    assert_eq!(cache.size(), Some(2));

    clock.advance(Duration::from_secs(30));
    assert_eq!(cache.size(), Some(1));
    assert_eq!(cache.get("long").as_deref(), Some("l"));
}

#[test]
fn fifo_capacity_two_evicts_first_insert() {
    let cache = MemoryCache::new("", 2);
    let ttl = Duration::from_secs(60);
    cache.set("A", "a".into(), ttl);
    cache.set("B", "b".into(), ttl);
    // Reading A does not refresh its position.
    assert!(cache.get("A").is_some());
    cache.set("C", "c".into(), ttl);

    assert_eq!(cache.get("A"), None);
    assert_eq!(cache.get("B").as_deref(), Some("b"));
    assert_eq!(cache.get("C").as_deref(), Some("c"));
    assert_eq!(cache.size(), Some(2));
}

#[test]
fn json_helpers_round_trip() {
    let cache = MemoryCache::new("t", 4);
    let value = Payload { ids: vec![3, 1], score: 0.5 };
    set_json(&cache, "p", &value, Duration::from_secs(5));
    assert_eq!(get_json::<Payload>(&cache, "p"), Some(value));
}

#[test]
fn malformed_entry_is_a_miss() {
    let cache = MemoryCache::new("t", 4);
    cache.set("p", "{not json".into(), Duration::from_secs(5));
    assert_eq!(get_json::<Payload>(&cache, "p"), None);
    cache.set("q", r#"{"ids": "nope"}"#.into(), Duration::from_secs(5));
    assert_eq!(get_json::<Payload>(&cache, "q"), None);
}

#[test]
fn unreachable_redis_is_a_backend_error() {
    let err = RedisCache::connect("redis://127.0.0.1:1/", "t", Duration::from_millis(200))
        .err()
        .expect("nothing listens on port 1");
    assert!(matches!(err, Error::CacheBackend(_)), "{err:?}");
}

#[test]
fn selection_falls_back_to_memory() {
    for backend in [CacheBackendKind::Auto, CacheBackendKind::External] {
        let settings = CacheSettings {
            backend,
            redis_url: Some("redis://127.0.0.1:1/".into()),
            connect_timeout_ms: 200,
            capacity: 3,
            ..CacheSettings::default()
        };
        let cache = open_cache(&settings, "rag:query");
        assert_eq!(cache.backend(), "memory");
        assert_eq!(cache.size(), Some(0));
    }

    let no_url = CacheSettings { backend: CacheBackendKind::External, ..CacheSettings::default() };
    assert_eq!(open_cache(&no_url, "x").backend(), "memory");
}

#[test]
fn prefixes_isolate_caches_sharing_a_key() {
    let settings = CacheSettings { backend: CacheBackendKind::Memory, ..CacheSettings::default() };
    let a = open_cache(&settings, "a");
    a.set("k", "1".into(), Duration::from_secs(5));
    let b = MemoryCache::new("b", 4);
    assert_eq!(b.get("k"), None);
    assert_eq!(a.get("k").as_deref(), Some("1"));
}

#[test]
fn query_keys_normalize_text_and_namespace_by_fingerprint() {
    let fp = "0123456789abcdef0123";
    assert_eq!(
        query_cache_key("  Python   Developer ", 5, fp),
        query_cache_key("python developer", 5, fp)
    );
    assert_ne!(query_cache_key("python", 5, fp), query_cache_key("python", 6, fp));
    assert_ne!(query_cache_key("python", 5, fp), query_cache_key("python", 5, "ffff"));
}

#[test]
fn summary_key_uses_top_five_ids() {
    assert_eq!(summary_cache_key(" ML Engineer ", &[4, 2, 9]), "q:ml engineer|ids:4,2,9");
    let six = summary_cache_key("q", &[1, 2, 3, 4, 5, 6]);
    assert_eq!(six, "q:q|ids:1,2,3,4,5");
}

proptest! {
    #[test]
    fn summary_key_is_bounded(query in "\\PC{0,1000}") {
        prop_assert!(summary_cache_key(&query, &[1, 2]).chars().count() <= 512);
    }
}
