//! Bounded LRU cache shared by the repositories.
//!
//! Each cache is an independent map behind its own mutex; the lock is held
//! only for the map operation, never across store I/O. Two threads racing a
//! miss may both query the store and both populate; the last writer wins,
//! which is fine because both hold equivalent reads of the same durable row.

use lru::LruCache;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Thread-safe LRU cache with hit/miss accounting.
pub struct BoundedCache<K, V> {
    entries: Mutex<LruCache<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq, V> fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock().expect("cache lock poisoned");
        f.debug_struct("BoundedCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a key, refreshing its recency on hit.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite, evicting the least-recently-used entry when the
    /// cache is at capacity.
    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.put(key, value);
    }

    /// Remove an entry, returning whether one was present.
    pub fn evict(&self, key: &K) -> bool {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.pop(key).is_some()
    }

    /// Check for a key without touching recency or counters.
    pub fn contains(&self, key: &K) -> bool {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries.contains(key)
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
