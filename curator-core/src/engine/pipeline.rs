//! The collection pipeline and its two read paths
//!
//! One pipeline — validate, compile, match, override-resolve, aggregate —
//! serves both reads:
//!
//! - [`CollectionEngine::detail`] recomputes everything and materializes
//!   the ordered record list (admin detail views).
//! - [`CollectionEngine::summary`] serves the cached counts snapshot when
//!   it is fresh and recomputes otherwise (admin list views). The payload
//!   carries `cachedAt` so staleness is visible to the caller.
//!
//! Cache refreshes compute the full snapshot off to the side and swap it
//! in atomically; a failed refresh leaves the previous snapshot untouched
//! and surfaces the error to whatever triggered it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cache::{collection_fingerprint, CacheStats, CountsCache, CountsCacheConfig, CountsSnapshot};
use crate::collection::Collection;
use crate::error::{CuratorError, Result};
use crate::rules;
use crate::store::{RecordStatus, RecordStore};

use super::aggregate::{aggregate, readiness, Counts, QualifiedStatus, Readiness};
use super::compiler::{compile, CompiledRule};
use super::matcher::Matcher;
use super::overrides::{resolve_overrides, AddMethod};

/// Collection detail payload (real-time read path)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetail {
    pub matched_count: u32,
    pub published_count: u32,
    pub pending_count: u32,
    pub draft_count: u32,
    pub progress: f64,
    pub qualified_status: QualifiedStatus,
    pub recipes: Vec<CollectionEntry>,
}

/// One record in a collection detail payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    pub id: String,
    pub title: String,
    pub status: RecordStatus,
    pub add_method: AddMethod,
}

/// Collection summary payload (cached read path)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub matched_count: u32,
    pub published_count: u32,
    pub pending_count: u32,
    pub draft_count: u32,
    pub progress: f64,
    pub qualified_status: QualifiedStatus,
    pub cached_at: DateTime<Utc>,
}

impl CollectionSummary {
    fn from_snapshot(snapshot: &CountsSnapshot) -> Self {
        Self {
            matched_count: snapshot.counts.matched,
            published_count: snapshot.counts.published,
            pending_count: snapshot.counts.pending,
            draft_count: snapshot.counts.draft,
            progress: snapshot.readiness.progress,
            qualified_status: snapshot.readiness.qualified_status,
            cached_at: snapshot.cached_at,
        }
    }
}

/// The collection rule engine
///
/// Stateless apart from the counts cache; safe to share across threads
/// behind an `Arc`.
pub struct CollectionEngine {
    matcher: Matcher,
    cache: CountsCache,
}

impl CollectionEngine {
    /// Create an engine over a record store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            matcher: Matcher::new(store),
            cache: CountsCache::new(),
        }
    }

    /// Set the cache configuration
    pub fn with_cache_config(mut self, config: CountsCacheConfig) -> Self {
        self.cache = CountsCache::with_config(config);
        self
    }

    /// Set the per-status cap for materialized detail lists
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.matcher = self.matcher.with_list_limit(limit);
        self
    }

    /// Real-time read path: recompute counts and the ordered record list
    pub fn detail(&self, collection: &Collection) -> Result<CollectionDetail> {
        let run_id = Uuid::new_v4();
        debug!(collection_id = %collection.collection_id, %run_id, "resolving collection detail");

        let compiled = self.checked_compile(collection)?;
        let excluded = collection.excluded_set();

        let base = self
            .matcher
            .partition(&compiled.predicate, &collection.excluded_ids)?;
        let pinned = self.matcher.pinned_records(&collection.pinned_ids, &excluded)?;
        let resolved = resolve_overrides(base, pinned, &excluded);

        let counts = aggregate(&resolved);
        let ready = readiness(&counts, collection.min_required, collection.target_count);

        debug!(
            collection_id = %collection.collection_id,
            %run_id,
            matched = counts.matched,
            published = counts.published,
            "collection detail resolved"
        );

        Ok(CollectionDetail {
            matched_count: counts.matched,
            published_count: counts.published,
            pending_count: counts.pending,
            draft_count: counts.draft,
            progress: ready.progress,
            qualified_status: ready.qualified_status,
            recipes: resolved
                .into_iter()
                .map(|r| CollectionEntry {
                    id: r.record.record_id,
                    title: r.record.title,
                    status: r.record.status,
                    add_method: r.add_method,
                })
                .collect(),
        })
    }

    /// Cached read path: serve the snapshot when fresh, recompute otherwise
    ///
    /// A snapshot is fresh while its TTL is unexpired and the collection's
    /// rule config and override sets are unchanged since it was computed.
    pub fn summary(&self, collection: &Collection) -> Result<CollectionSummary> {
        let fingerprint = collection_fingerprint(collection);

        if let Some(snapshot) = self.cache.get(&collection.collection_id, &fingerprint) {
            debug!(collection_id = %collection.collection_id, "serving cached summary");
            return Ok(CollectionSummary::from_snapshot(&snapshot));
        }

        let snapshot = self.refresh(collection)?;
        Ok(CollectionSummary::from_snapshot(&snapshot))
    }

    /// Recompute the counts snapshot and swap it in atomically
    ///
    /// On failure the previous snapshot stays in place and the error
    /// propagates to the trigger (request handler, scheduled job).
    pub fn refresh(&self, collection: &Collection) -> Result<CountsSnapshot> {
        let run_id = Uuid::new_v4();
        debug!(collection_id = %collection.collection_id, %run_id, "refreshing counts snapshot");

        let fingerprint = collection_fingerprint(collection);
        let (counts, ready) = self.run_counts(collection)?;

        Ok(self.cache.set(
            &collection.collection_id,
            counts,
            ready,
            fingerprint,
            None,
        ))
    }

    /// Drop a collection's snapshot
    pub fn invalidate(&self, collection_id: &str) {
        self.cache.invalidate(collection_id);
    }

    /// Cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The shared count pipeline behind both read paths
    fn run_counts(&self, collection: &Collection) -> Result<(Counts, Readiness)> {
        let compiled = self.checked_compile(collection)?;
        let counts = self.matcher.counts(
            &compiled.predicate,
            &collection.pinned_ids,
            &collection.excluded_ids,
        )?;
        let ready = readiness(&counts, collection.min_required, collection.target_count);
        Ok((counts, ready))
    }

    /// Validate then compile; compilation is undefined over invalid configs
    fn checked_compile(&self, collection: &Collection) -> Result<CompiledRule> {
        let validation = rules::validate(&collection.rule_config);
        if !validation.is_valid {
            let reason = validation
                .errors
                .iter()
                .map(|issue| match &issue.path {
                    Some(path) => format!("{} at {}", issue.message, path),
                    None => issue.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CuratorError::InvalidRuleConfig { reason });
        }

        Ok(compile(&collection.rule_config, &collection.context))
    }
}
