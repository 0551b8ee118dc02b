//! Predicate evaluation against the record store
//!
//! The Matcher is the only component that performs I/O. It delegates
//! predicate evaluation to the store's query interface and applies
//! exclusions at the storage-query level, so a correctly excluded record
//! never counts toward a match regardless of how it was matched.
//!
//! Two entry points mirror the two read paths: [`Matcher::counts`] derives
//! status-partitioned counts without materializing records, and
//! [`Matcher::partition`] materializes per-status record lists for detail
//! views. Archived records are retired content and are queried on neither
//! path.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::store::{Record, RecordStatus, RecordStore};

use super::aggregate::Counts;
use super::predicate::Predicate;

/// Default per-status cap for materialized list results
pub const DEFAULT_LIST_LIMIT: usize = 500;

/// Statuses that can appear in collection views
const ACTIVE_STATUSES: [RecordStatus; 3] = [
    RecordStatus::Published,
    RecordStatus::Pending,
    RecordStatus::Draft,
];

/// Match results partitioned by lifecycle status
#[derive(Debug, Clone, Default)]
pub struct PartitionedMatches {
    /// Published matches
    pub published: Vec<Record>,
    /// Pending matches
    pub pending: Vec<Record>,
    /// Draft matches
    pub draft: Vec<Record>,
}

impl PartitionedMatches {
    /// Total records across all partitions
    pub fn len(&self) -> usize {
        self.published.len() + self.pending.len() + self.draft.len()
    }

    /// Whether no records matched
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a single record list (partition order)
    pub fn into_records(self) -> Vec<Record> {
        let mut records = self.published;
        records.extend(self.pending);
        records.extend(self.draft);
        records
    }
}

/// Evaluates predicates against a record store
#[derive(Clone)]
pub struct Matcher {
    store: Arc<dyn RecordStore>,
    list_limit: usize,
}

impl Matcher {
    /// Create a matcher over a store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Set the per-status cap for materialized lists
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Status-partitioned counts for the final match set, without
    /// materializing records
    ///
    /// Pinned ids are unioned in and excluded ids removed inside the store
    /// query itself, so the counts agree exactly with what
    /// [`Matcher::partition`] plus override resolution would produce.
    pub fn counts(
        &self,
        predicate: &Predicate,
        pinned_ids: &[String],
        excluded_ids: &[String],
    ) -> Result<Counts> {
        let effective = Predicate::and(vec![
            Predicate::or(vec![
                predicate.clone(),
                Predicate::ids(pinned_ids.to_vec()),
            ]),
            Predicate::ids_not(excluded_ids.to_vec()),
        ]);

        let published = self
            .store
            .count(&effective, Some(RecordStatus::Published))?;
        let pending = self.store.count(&effective, Some(RecordStatus::Pending))?;
        let draft = self.store.count(&effective, Some(RecordStatus::Draft))?;

        debug!(
            store = self.store.name(),
            published, pending, draft, "counted matches"
        );
        Ok(Counts::from_parts(published, pending, draft))
    }

    /// Per-status record lists for the raw rule matches, excluded ids
    /// removed at the query level
    pub fn partition(
        &self,
        predicate: &Predicate,
        excluded_ids: &[String],
    ) -> Result<PartitionedMatches> {
        let effective = Predicate::and(vec![
            predicate.clone(),
            Predicate::ids_not(excluded_ids.to_vec()),
        ]);

        let mut matches = PartitionedMatches::default();
        for status in ACTIVE_STATUSES {
            let records = self.store.list(&effective, Some(status), 0, self.list_limit)?;
            match status {
                RecordStatus::Published => matches.published = records,
                RecordStatus::Pending => matches.pending = records,
                RecordStatus::Draft => matches.draft = records,
                RecordStatus::Archived => unreachable!("archived is never queried"),
            }
        }

        debug!(
            store = self.store.name(),
            matched = matches.len(),
            "partitioned matches"
        );
        Ok(matches)
    }

    /// Materialize pinned records in pin order
    ///
    /// Dangling ids are skipped (a collection reports what actually
    /// exists), excluded ids are skipped (exclude beats pin), and archived
    /// records are skipped (pins cannot resurrect retired content).
    pub fn pinned_records(
        &self,
        pinned_ids: &[String],
        excluded: &HashSet<String>,
    ) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(pinned_ids.len());
        for record_id in pinned_ids {
            if excluded.contains(record_id) {
                continue;
            }
            match self.store.get(record_id)? {
                Some(record) if record.status.is_active() => records.push(record),
                Some(_) => {}
                None => {
                    debug!(record_id = %record_id, "pinned record not found, skipping");
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::predicate::RelationField;
    use crate::store::InMemoryStore;

    fn sichuan_predicate() -> Predicate {
        Predicate::relation(
            RelationField::Cuisine,
            vec!["cuisine-sichuan".into()],
            false,
        )
    }

    fn seeded_matcher() -> Matcher {
        let store = InMemoryStore::with_records(vec![
            Record::new("r-1", "Mapo Tofu", RecordStatus::Published)
                .with_cuisine("cuisine-sichuan"),
            Record::new("r-2", "Kung Pao Chicken", RecordStatus::Pending)
                .with_cuisine("cuisine-sichuan"),
            Record::new("r-3", "Twice Cooked Pork", RecordStatus::Draft)
                .with_cuisine("cuisine-sichuan"),
            Record::new("r-4", "Old Classic", RecordStatus::Archived)
                .with_cuisine("cuisine-sichuan"),
            Record::new("r-5", "Dim Sum", RecordStatus::Published).with_cuisine("cuisine-yue"),
        ]);
        Matcher::new(Arc::new(store))
    }

    #[test]
    fn test_counts_ignore_archived() {
        let matcher = seeded_matcher();
        let counts = matcher.counts(&sichuan_predicate(), &[], &[]).unwrap();

        assert_eq!(counts.matched, 3);
        assert_eq!(counts.published, 1);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.draft, 1);
    }

    #[test]
    fn test_counts_union_pins_and_remove_excluded() {
        let matcher = seeded_matcher();

        // r-5 pinned in from another cuisine; r-1 excluded out
        let counts = matcher
            .counts(
                &sichuan_predicate(),
                &["r-5".to_string()],
                &["r-1".to_string()],
            )
            .unwrap();

        assert_eq!(counts.matched, 3);
        assert_eq!(counts.published, 1); // r-5 only, r-1 excluded
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.draft, 1);
    }

    #[test]
    fn test_counts_pinned_and_excluded_record_stays_out() {
        let matcher = seeded_matcher();
        let counts = matcher
            .counts(
                &sichuan_predicate(),
                &["r-1".to_string()],
                &["r-1".to_string()],
            )
            .unwrap();

        assert_eq!(counts.published, 0);
        assert_eq!(counts.matched, 2);
    }

    #[test]
    fn test_partition_excludes_at_query_level() {
        let matcher = seeded_matcher();
        let matches = matcher
            .partition(&sichuan_predicate(), &["r-2".to_string()])
            .unwrap();

        assert_eq!(matches.published.len(), 1);
        assert!(matches.pending.is_empty());
        assert_eq!(matches.draft.len(), 1);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_pinned_records_order_and_skips() {
        let matcher = seeded_matcher();
        let excluded: HashSet<String> = ["r-2".to_string()].into();

        let pinned = matcher
            .pinned_records(
                &[
                    "r-5".to_string(),
                    "r-2".to_string(),  // excluded
                    "r-4".to_string(),  // archived
                    "r-missing".to_string(), // dangling
                    "r-1".to_string(),
                ],
                &excluded,
            )
            .unwrap();

        let ids: Vec<&str> = pinned.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["r-5", "r-1"]);
    }
}
