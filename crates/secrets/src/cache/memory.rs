//! In-memory TTL cache with background sweep.

use crate::cache::{CacheConfig, ConfigError};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-memory store for resolved secret strings with per-entry expiry.
///
/// Expired entries are dropped on read (lazy eviction) and by a periodic
/// background sweep, so keys that are set once and never read again do not
/// accumulate. The sweep task is an owned resource: it is spawned by
/// [`SecretCache::new`] and released by [`SecretCache::destroy`] (or on
/// drop). Must be constructed from within a Tokio runtime.
pub struct SecretCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    config: CacheConfig,
    stats: Arc<CacheStats>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Cache hits
    pub hits: AtomicU64,
    /// Cache misses (including reads of expired entries)
    pub misses: AtomicU64,
    /// Entries dropped by lazy eviction or the background sweep
    pub evictions: AtomicU64,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`; `0.0` before any request.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 { 0.0 } else { hits as f64 / total as f64 }
    }
}

impl SecretCache {
    /// Create a cache and start its background sweep.
    pub fn new(config: CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let entries: Arc<DashMap<String, CacheEntry>> = Arc::new(DashMap::new());
        let stats = Arc::new(CacheStats::default());

        let sweeper = {
            let entries = Arc::clone(&entries);
            let stats = Arc::clone(&stats);
            let period = config.sweep_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.tick().await; // first tick completes immediately
                loop {
                    ticker.tick().await;
                    let now = Instant::now();
                    let before = entries.len();
                    entries.retain(|_, entry| entry.expires_at > now);
                    let swept = before.saturating_sub(entries.len());
                    if swept > 0 {
                        stats.evictions.fetch_add(swept as u64, Ordering::Relaxed);
                        tracing::debug!(swept, "removed expired secret cache entries");
                    }
                }
            })
        };

        Ok(Self {
            entries,
            config,
            stats,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }

    /// Create a cache with the default configuration.
    pub fn with_defaults() -> Self {
        // Default config always validates.
        match Self::new(CacheConfig::default()) {
            Ok(cache) => cache,
            Err(_) => unreachable!("default cache config is valid"),
        }
    }

    /// Get a value if present and not expired.
    ///
    /// Reading an expired entry deletes it immediately.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) => {
                if entry.expires_at > Instant::now() {
                    self.stats.hits.fetch_add(1, Ordering::Relaxed);
                    Some(entry.value.clone())
                } else {
                    drop(entry);
                    self.entries.remove(key);
                    self.stats.misses.fetch_add(1, Ordering::Relaxed);
                    self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                    None
                }
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value, unconditionally overwriting any existing entry.
    ///
    /// Expiry is now + `ttl`, or now + the configured default when `None`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        self.entries.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Remove an entry if present.
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries currently held, expired-but-unswept ones included.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Stop the background sweep and clear all entries.
    ///
    /// Idempotent: calling this more than once is a no-op after the first.
    pub fn destroy(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
        self.entries.clear();
    }
}

impl Drop for SecretCache {
    fn drop(&mut self) {
        // A live sweep task would outlive the cache otherwise.
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_get_set_delete() {
        let cache = SecretCache::with_defaults();

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats().misses.load(Ordering::Relaxed), 1);

        cache.set("k", "v", None);
        assert_eq!(cache.get("k"), Some("v".to_string()));
        assert_eq!(cache.stats().hits.load(Ordering::Relaxed), 1);

        cache.delete("k");
        assert_eq!(cache.get("k"), None);
        cache.destroy();
    }

    #[tokio::test]
    async fn set_overwrites_existing_entry() {
        let cache = SecretCache::with_defaults();

        cache.set("k", "v1", None);
        assert_eq!(cache.get("k"), Some("v1".to_string()));

        cache.set("k", "v2", None);
        assert_eq!(cache.get("k"), Some("v2".to_string()));
        assert_eq!(cache.size(), 1);
        cache.destroy();
    }

    #[tokio::test]
    async fn expired_entry_is_absent_and_lazily_evicted() {
        let cache = SecretCache::with_defaults();

        cache.set("k", "v", Some(Duration::from_millis(40)));
        assert_eq!(cache.get("k"), Some("v".to_string()));

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.size(), 0, "read of an expired entry deletes it");
        assert!(cache.stats().evictions.load(Ordering::Relaxed) > 0);
        cache.destroy();
    }

    #[tokio::test]
    async fn background_sweep_removes_never_read_keys() {
        let config = CacheConfig {
            default_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_millis(40),
        };
        let cache = SecretCache::new(config).unwrap();

        cache.set("never-read", "v", Some(Duration::from_millis(10)));
        assert_eq!(cache.size(), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.size(), 0, "sweep runs independently of reads");
        cache.destroy();
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let cache = SecretCache::with_defaults();

        cache.set("a", "1", None);
        cache.set("b", "2", None);
        assert_eq!(cache.size(), 2);

        cache.clear();
        assert_eq!(cache.size(), 0);
        cache.destroy();
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let cache = SecretCache::with_defaults();
        cache.set("k", "v", None);

        cache.destroy();
        cache.destroy();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn hit_rate_math() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);

        stats.hits.store(7, Ordering::Relaxed);
        stats.misses.store(3, Ordering::Relaxed);
        assert_eq!(stats.hit_rate(), 0.7);
    }
}
