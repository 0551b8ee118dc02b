//! Count aggregation and publication readiness
//!
//! [`aggregate`] reduces a final record list into status-partitioned
//! counts; [`readiness`] derives the operator-facing progress percentage
//! and qualification flag from those counts. Both are pure reductions.

use serde::{Deserialize, Serialize};

use crate::store::RecordStatus;

use super::overrides::ResolvedRecord;

/// Status-partitioned counts for a collection's final match set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Total records in the final set
    pub matched: u32,
    /// Records in published status
    pub published: u32,
    /// Records in pending status
    pub pending: u32,
    /// Records in draft status
    pub draft: u32,
}

impl Counts {
    /// Build counts from per-status totals; `matched` is their sum
    pub fn from_parts(published: u32, pending: u32, draft: u32) -> Self {
        Self {
            matched: published + pending + draft,
            published,
            pending,
            draft,
        }
    }
}

/// Whether a collection meets its publication minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualifiedStatus {
    Qualified,
    NotQualified,
}

impl std::fmt::Display for QualifiedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualifiedStatus::Qualified => write!(f, "qualified"),
            QualifiedStatus::NotQualified => write!(f, "not_qualified"),
        }
    }
}

/// Publication-readiness figures derived from counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readiness {
    /// Published count as a percentage of the target, in [0, 100]
    pub progress: f64,
    /// Whether the published count meets the minimum
    pub qualified_status: QualifiedStatus,
}

/// Reduce a final record list into counts
pub fn aggregate(records: &[ResolvedRecord]) -> Counts {
    let mut counts = Counts {
        matched: records.len() as u32,
        ..Counts::default()
    };

    for resolved in records {
        match resolved.record.status {
            RecordStatus::Published => counts.published += 1,
            RecordStatus::Pending => counts.pending += 1,
            RecordStatus::Draft => counts.draft += 1,
            // Upstream stages never let archived records through
            RecordStatus::Archived => {}
        }
    }

    counts
}

/// Derive progress and qualification from counts
///
/// Qualification depends only on the published count versus
/// `min_required`; pending and draft records never count toward it.
/// A `target_count` of zero reads as "nothing left to target" and reports
/// 100% — qualification still gates publishing independently.
pub fn readiness(counts: &Counts, min_required: u32, target_count: u32) -> Readiness {
    let qualified_status = if counts.published >= min_required {
        QualifiedStatus::Qualified
    } else {
        QualifiedStatus::NotQualified
    };

    let progress = if target_count == 0 {
        100.0
    } else {
        (f64::from(counts.published) / f64::from(target_count) * 100.0).clamp(0.0, 100.0)
    };

    Readiness {
        progress,
        qualified_status,
    }
}
