use std::time::Duration;

use moka::sync::Cache;

/// Entries kept per cache before the least useful are evicted.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Keyed cache with time-to-live staleness.
///
/// A read never returns anything older than the TTL. Implementations must be
/// cheap to share across concurrent runs.
pub trait ResultCache<V>: Send + Sync {
    /// Fresh value for `key`, if one was stored within the TTL.
    fn get(&self, key: &str) -> Option<V>;

    /// Store `value` unless a fresh entry already exists.
    fn set(&self, key: &str, value: V);

    fn ttl(&self) -> Duration;
}

/// Process-wide in-memory TTL cache, bounded in size. Expired entries are
/// evicted, not just hidden.
pub struct TtlCache<V> {
    entries: Cache<String, V>,
    ttl: Duration,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { entries, ttl }
    }

    /// Number of live entries. Approximate until pending maintenance runs.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply pending evictions now instead of on the next writes.
    pub fn purge_expired(&self) {
        self.entries.run_pending_tasks();
    }
}

impl<V: Clone + Send + Sync + 'static> ResultCache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key)
    }

    fn set(&self, key: &str, value: V) {
        if self.entries.contains_key(key) {
            return;
        }
        self.entries.insert(key.to_string(), value);
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Cache that stores nothing. Every lookup goes to the collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl<V> ResultCache<V> for NoopCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn set(&self, _key: &str, _value: V) {}

    fn ttl(&self) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("addr", 7u32);
        assert_eq!(cache.get("addr"), Some(7));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_fresh_entry_is_not_overwritten() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("addr", 1u32);
        cache.set("addr", 2u32);
        assert_eq!(cache.get("addr"), Some(1));
    }

    #[test]
    fn test_expiry_after_ttl() {
        let cache = TtlCache::new(Duration::from_millis(20));
        cache.set("addr", "value".to_string());
        assert!(cache.get("addr").is_some());
        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("addr").is_none());

        // An expired key can be stored again
        cache.set("addr", "again".to_string());
        assert_eq!(cache.get("addr").as_deref(), Some("again"));
    }

    #[test]
    fn test_expired_entries_are_evicted() {
        let cache = TtlCache::new(Duration::from_millis(500));
        for i in 0..1_000u32 {
            cache.set(&format!("addr{i}"), i);
        }
        cache.purge_expired();
        assert_eq!(cache.len(), 1_000);

        std::thread::sleep(Duration::from_millis(700));
        cache.purge_expired();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_is_bounded() {
        let cache = TtlCache::with_capacity(Duration::from_secs(60), 50);
        for i in 0..1_000u32 {
            cache.set(&format!("addr{i}"), i);
        }
        cache.purge_expired();
        assert!(cache.len() <= 50);
    }

    #[test]
    fn test_noop_cache() {
        let cache = NoopCache;
        ResultCache::<u32>::set(&cache, "addr", 1);
        assert_eq!(ResultCache::<u32>::get(&cache, "addr"), None);
        assert_eq!(ResultCache::<u32>::ttl(&cache), Duration::ZERO);
    }
}
