//! Caching layer for collection counts
//!
//! List views read a per-collection snapshot of counts plus a timestamp
//! instead of re-running the match pipeline; detail views bypass this
//! entirely. Snapshots are swapped in atomically, expire on a TTL, and
//! carry a fingerprint of the collection's rule config and override sets
//! so operator mutations read as stale without explicit invalidation.

mod counts_cache;

pub use counts_cache::{
    collection_fingerprint, CacheStats, CountsCache, CountsCacheConfig, CountsSnapshot,
};

use std::time::Duration;

/// Default TTL for counts snapshots (5 minutes)
pub const DEFAULT_COUNTS_TTL: Duration = Duration::from_secs(300);
