//! Generic in-memory cache with TTL expiry.
//!
//! Thread-safe, generic over key/value types. Entries carry an absolute
//! deadline and are checked lazily on read; a periodic [`TtlCache::purge_expired`]
//! sweep keeps long-idle keys from accumulating. There is deliberately no
//! per-key timer. A zero TTL stores entries with no deadline at all; they
//! live until removed or replaced.
//!
//! Time comes from [`tokio::time::Instant`] so tests can drive expiry with
//! a paused runtime clock instead of sleeping.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

/// Cache entry with its expiry deadline; `None` means the entry never
/// expires
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: (!ttl.is_zero()).then(|| Instant::now() + ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Cache counters for monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub inserts: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Generic TTL cache
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    default_ttl: Duration,
    data: RwLock<HashMap<K, CacheEntry<V>>>,
    stats: RwLock<CacheStats>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries live for `default_ttl` unless
    /// [`TtlCache::insert_with_ttl`] overrides it per entry. A zero
    /// `default_ttl` disables expiry.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            data: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Get a value (returns `None` if expired or missing).
    ///
    /// Takes the write lock because an expired entry is removed on the
    /// spot rather than lingering until the next sweep.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut data = self.data.write();

        match data.get(key) {
            Some(entry) if entry.is_expired(now) => {
                data.remove(key);
                let mut stats = self.stats.write();
                stats.misses += 1;
                stats.expirations += 1;
                None
            }
            Some(entry) => {
                self.stats.write().hits += 1;
                Some(entry.value.clone())
            }
            None => {
                self.stats.write().misses += 1;
                None
            }
        }
    }

    /// Insert with the default TTL. Re-inserting an existing key replaces
    /// the value and restarts its lifetime.
    pub fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    /// Insert with an explicit TTL. Zero means this entry never expires.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.data.write().insert(key, CacheEntry::new(value, ttl));
        self.stats.write().inserts += 1;
    }

    /// Remove a key. Returns whether a live entry was present.
    pub fn remove(&self, key: &K) -> bool {
        let now = Instant::now();
        match self.data.write().remove(key) {
            Some(entry) => !entry.is_expired(now),
            None => false,
        }
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.data.write().clear();
    }

    /// Drop every expired entry, returning how many were removed.
    ///
    /// Called from a single periodic sweep task; correctness never depends
    /// on it because reads expire lazily.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut data = self.data.write();
        let before = data.len();
        data.retain(|_, entry| !entry.is_expired(now));
        let removed = before - data.len();
        if removed > 0 {
            self.stats.write().expirations += removed as u64;
        }
        removed
    }

    /// Number of live entries. Expired-but-unswept entries don't count.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data
            .read()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Whether the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }
}
