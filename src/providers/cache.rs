//! Bounded, TTL'd response cache for provider lookups.
//!
//! Callers construct the cache and hand it to a provider; nothing in this
//! crate keeps process-wide cache state. Keys are expected to encode
//! (provider, identifier, format).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// A shared read-mostly cache. The inner mutex is held across a fill
/// closure, so there is at most one fill in flight per cache at a time;
/// fills here are in-memory computations, not network calls.
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    capacity: usize,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        ResponseCache {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, key: &str, value: V) {
        let mut entries = self.entries.lock().unwrap();
        let ttl = self.ttl;
        entries.retain(|_, e| e.stored_at.elapsed() < ttl);
        if entries.len() >= self.capacity && !entries.contains_key(key) {
            // At capacity: drop the stalest entry to make room.
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key.to_string(),
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Fetch-through: return the cached value or fill it from `compute`.
    pub fn get_or_fill(&self, key: &str, compute: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.get(key) {
            return hit;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_within_ttl() {
        let cache: ResponseCache<u32> = ResponseCache::new(4, Duration::from_secs(60));
        cache.insert("dex:pikachu", 25);
        assert_eq!(cache.get("dex:pikachu"), Some(25));
        assert_eq!(cache.get("dex:raichu"), None);
    }

    #[test]
    fn expired_entries_miss() {
        let cache: ResponseCache<u32> = ResponseCache::new(4, Duration::from_nanos(1));
        cache.insert("dex:pikachu", 25);
        std::thread::sleep(Duration::from_millis(1));
        assert_eq!(cache.get("dex:pikachu"), None);
    }

    #[test]
    fn capacity_is_bounded() {
        let cache: ResponseCache<u32> = ResponseCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert!(cache.len() <= 2);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn get_or_fill_computes_once() {
        let cache: ResponseCache<u32> = ResponseCache::new(4, Duration::from_secs(60));
        let mut calls = 0;
        let first = cache.get_or_fill("k", || {
            calls += 1;
            7
        });
        let second = cache.get_or_fill("k", || {
            calls += 1;
            8
        });
        assert_eq!((first, second), (7, 7));
        assert_eq!(calls, 1);
    }
}
