//! Counts snapshot cache
//!
//! Caches one `{counts, readiness, timestamp}` snapshot per collection so
//! list views avoid a store round-trip per row.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::collection::Collection;
use crate::engine::{Counts, Readiness};

use super::DEFAULT_COUNTS_TTL;

/// Configuration for the counts cache
#[derive(Debug, Clone)]
pub struct CountsCacheConfig {
    /// Default TTL for cached snapshots
    pub default_ttl: Duration,
    /// Maximum number of entries
    pub max_entries: usize,
}

impl Default for CountsCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_COUNTS_TTL,
            max_entries: 1000,
        }
    }
}

impl CountsCacheConfig {
    /// Set default TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Set max entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }
}

/// A cached counts snapshot for one collection
///
/// Counts are never stored without their timestamp pairing; this type is
/// the only way they enter the cache.
#[derive(Debug, Clone)]
pub struct CountsSnapshot {
    /// The counts at refresh time
    pub counts: Counts,
    /// Readiness derived from those counts
    pub readiness: Readiness,
    /// When this snapshot was computed
    pub cached_at: DateTime<Utc>,
    /// Fingerprint of the collection inputs the snapshot was computed from
    pub fingerprint: String,
    /// When this snapshot was stored (for eviction ordering)
    stored_at: Instant,
    /// When this snapshot expires
    expires_at: Instant,
}

impl CountsSnapshot {
    /// Check if this snapshot has expired
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Get time until expiration
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Fingerprint the inputs a snapshot depends on
///
/// Covers the rule config and both override sets: any operator mutation
/// changes the fingerprint, so a stale snapshot reads as a miss rather
/// than serving counts for a rule that no longer exists.
pub fn collection_fingerprint(collection: &Collection) -> String {
    let mut hasher = Sha256::new();
    let json = serde_json::to_string(&(
        &collection.rule_config,
        &collection.pinned_ids,
        &collection.excluded_ids,
    ))
    .unwrap_or_default();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}

/// Counts snapshot cache
///
/// Snapshot replacement is a single map insert under the write lock:
/// readers observe either the previous snapshot or the new one, never a
/// mix of the two.
#[derive(Debug)]
pub struct CountsCache {
    /// Cached entries by collection id
    entries: RwLock<HashMap<String, CountsSnapshot>>,
    /// Configuration
    config: CountsCacheConfig,
    /// Statistics
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CountsCache {
    /// Create a new cache with default config
    pub fn new() -> Self {
        Self::with_config(CountsCacheConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: CountsCacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Get a fresh snapshot for a collection
    ///
    /// Freshness requires the snapshot to be unexpired *and* computed from
    /// the same fingerprint; anything else counts as a miss.
    pub fn get(&self, collection_id: &str, fingerprint: &str) -> Option<CountsSnapshot> {
        let entries = self.entries.read().unwrap();

        match entries.get(collection_id) {
            Some(entry) if !entry.is_expired() && entry.fingerprint == fingerprint => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.clone())
            }
            Some(_) | None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a snapshot for a collection, replacing any previous one
    ///
    /// Returns the stored snapshot.
    pub fn set(
        &self,
        collection_id: &str,
        counts: Counts,
        readiness: Readiness,
        fingerprint: String,
        ttl: Option<Duration>,
    ) -> CountsSnapshot {
        let now = Instant::now();
        let ttl = ttl.unwrap_or(self.config.default_ttl);

        let snapshot = CountsSnapshot {
            counts,
            readiness,
            cached_at: Utc::now(),
            fingerprint,
            stored_at: now,
            expires_at: now + ttl,
        };

        let mut entries = self.entries.write().unwrap();

        if entries.len() >= self.config.max_entries && !entries.contains_key(collection_id) {
            self.evict_expired(&mut entries);

            if entries.len() >= self.config.max_entries {
                self.evict_oldest(&mut entries);
            }
        }

        entries.insert(collection_id.to_string(), snapshot.clone());
        snapshot
    }

    /// Drop the snapshot for a collection
    pub fn invalidate(&self, collection_id: &str) {
        self.entries.write().unwrap().remove(collection_id);
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Evict expired entries
    fn evict_expired(&self, entries: &mut HashMap<String, CountsSnapshot>) {
        let before = entries.len();
        entries.retain(|_, v| !v.is_expired());
        let evicted = before - entries.len();
        self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
    }

    /// Evict the oldest entry
    fn evict_oldest(&self, entries: &mut HashMap<String, CountsSnapshot>) {
        if let Some(oldest_key) = entries
            .iter()
            .min_by_key(|(_, v)| v.stored_at)
            .map(|(k, _)| k.clone())
        {
            entries.remove(&oldest_key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);

        CacheStats {
            entries: entries.len(),
            max_entries: self.config.max_entries,
            hits,
            misses,
            hit_rate: if hits + misses > 0 {
                hits as f64 / (hits + misses) as f64
            } else {
                0.0
            },
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl Default for CountsCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of entries
    pub entries: usize,
    /// Maximum entries allowed
    pub max_entries: usize,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
    /// Total evictions
    pub evictions: u64,
}
