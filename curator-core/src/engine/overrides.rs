//! Override resolution
//!
//! Combines raw rule matches with a collection's pinned and excluded id
//! sets, producing the final ordered record list. Precedence is strict:
//! exclusion beats pinning beats rule matches. A record that is both
//! pinned and excluded must never appear.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::store::Record;

use super::matcher::PartitionedMatches;

/// How a record entered the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddMethod {
    /// Matched by the rule predicate
    Rule,
    /// Force-included via the pinned id set
    Manual,
}

impl std::fmt::Display for AddMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddMethod::Rule => write!(f, "rule"),
            AddMethod::Manual => write!(f, "manual"),
        }
    }
}

/// A record in the final collection list, tagged with how it got there
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub record: Record,
    pub add_method: AddMethod,
}

/// Compute the final ordered record list: `(base ∪ pinned) \ excluded`
///
/// Pinned records come first in their explicit pin order, tagged
/// [`AddMethod::Manual`]. Remaining base matches follow, most recently
/// created first, tagged [`AddMethod::Rule`]. A record that is both pinned
/// and rule-matched appears once, as Manual. Excluded ids are removed from
/// both inputs even though upstream stages already filtered them — this is
/// where the precedence invariant is enforced, independent of callers.
pub fn resolve_overrides(
    base: PartitionedMatches,
    pinned: Vec<Record>,
    excluded: &HashSet<String>,
) -> Vec<ResolvedRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut resolved = Vec::new();

    for record in pinned {
        if excluded.contains(&record.record_id) || !seen.insert(record.record_id.clone()) {
            continue;
        }
        resolved.push(ResolvedRecord {
            record,
            add_method: AddMethod::Manual,
        });
    }

    let mut matches = base.into_records();
    matches.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.record_id.cmp(&b.record_id))
    });

    for record in matches {
        if excluded.contains(&record.record_id) || !seen.insert(record.record_id.clone()) {
            continue;
        }
        resolved.push(ResolvedRecord {
            record,
            add_method: AddMethod::Rule,
        });
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStatus;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, day: u32) -> Record {
        Record::new(id, format!("Recipe {}", id), RecordStatus::Published)
            .with_created_at(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap())
    }

    fn base_with(records: Vec<Record>) -> PartitionedMatches {
        PartitionedMatches {
            published: records,
            pending: vec![],
            draft: vec![],
        }
    }

    #[test]
    fn test_pinned_first_then_recency() {
        let base = base_with(vec![record("r-old", 1), record("r-new", 20)]);
        let pinned = vec![record("p-2", 5), record("p-1", 3)];

        let resolved = resolve_overrides(base, pinned, &HashSet::new());
        let ids: Vec<&str> = resolved.iter().map(|r| r.record.record_id.as_str()).collect();

        // Pin order is explicit, not recency; base matches newest-first after
        assert_eq!(ids, vec!["p-2", "p-1", "r-new", "r-old"]);
        assert_eq!(resolved[0].add_method, AddMethod::Manual);
        assert_eq!(resolved[2].add_method, AddMethod::Rule);
    }

    #[test]
    fn test_exclude_beats_pin() {
        // r-2 is pinned AND excluded: it must not appear
        let base = base_with(vec![]);
        let pinned = vec![record("r-1", 1), record("r-2", 2)];
        let excluded: HashSet<String> = ["r-2".to_string()].into();

        let resolved = resolve_overrides(base, pinned, &excluded);
        let ids: Vec<&str> = resolved.iter().map(|r| r.record.record_id.as_str()).collect();
        assert_eq!(ids, vec!["r-1"]);
    }

    #[test]
    fn test_exclude_beats_rule_match() {
        let base = base_with(vec![record("r-1", 1), record("r-2", 2)]);
        let excluded: HashSet<String> = ["r-1".to_string()].into();

        let resolved = resolve_overrides(base, vec![], &excluded);
        let ids: Vec<&str> = resolved.iter().map(|r| r.record.record_id.as_str()).collect();
        assert_eq!(ids, vec!["r-2"]);
    }

    #[test]
    fn test_pin_adds_non_matching_record() {
        // Base predicate did not match the pinned record; pin adds it anyway
        let base = base_with(vec![record("r-1", 1)]);
        let pinned = vec![record("p-1", 2)];

        let resolved = resolve_overrides(base, pinned, &HashSet::new());
        assert_eq!(resolved.len(), 2);
        assert!(resolved
            .iter()
            .any(|r| r.record.record_id == "p-1" && r.add_method == AddMethod::Manual));
    }

    #[test]
    fn test_pinned_and_matched_dedups_as_manual() {
        let base = base_with(vec![record("r-1", 1), record("r-2", 2)]);
        let pinned = vec![record("r-1", 1)];

        let resolved = resolve_overrides(base, pinned, &HashSet::new());
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].record.record_id, "r-1");
        assert_eq!(resolved[0].add_method, AddMethod::Manual);
    }

    #[test]
    fn test_statuses_flow_through_partitions() {
        let mut base = base_with(vec![record("r-pub", 3)]);
        base.pending = vec![{
            let mut r = record("r-pen", 2);
            r.status = RecordStatus::Pending;
            r
        }];
        base.draft = vec![{
            let mut r = record("r-dra", 1);
            r.status = RecordStatus::Draft;
            r
        }];

        let resolved = resolve_overrides(base, vec![], &HashSet::new());
        assert_eq!(resolved.len(), 3);
        let ids: Vec<&str> = resolved.iter().map(|r| r.record.record_id.as_str()).collect();
        assert_eq!(ids, vec!["r-pub", "r-pen", "r-dra"]);
    }
}
