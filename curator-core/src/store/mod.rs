//! Pluggable record store backend
//!
//! The engine never owns record persistence. It consumes a narrow query
//! interface — predicate counting, predicate listing, id lookup — and any
//! store that can answer those (SQL, a search index, an in-process map)
//! can back it. The default [`InMemoryStore`] evaluates predicates in
//! process and is what tests and demos use; [`NullStore`] is an empty
//! corpus for benchmarks.
//!
//! # Example
//!
//! ```rust
//! use curator_core::store::{InMemoryStore, Record, RecordStatus, RecordStore};
//! use curator_core::engine::Predicate;
//!
//! let store = InMemoryStore::new();
//! store.insert(Record::new("r-1", "Mapo Tofu", RecordStatus::Published)).unwrap();
//!
//! let total = store.count(&Predicate::MatchAll, None).unwrap();
//! assert_eq!(total, 1);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::Predicate;
use crate::error::{CuratorError, Result};

/// Lifecycle status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Draft,
    Pending,
    Published,
    Archived,
}

impl RecordStatus {
    /// Whether records in this status can appear in collection views
    ///
    /// Archived records are retired content: they never enter match sets
    /// and pins cannot resurrect them.
    pub fn is_active(&self) -> bool {
        !matches!(self, RecordStatus::Archived)
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Draft => write!(f, "draft"),
            RecordStatus::Pending => write!(f, "pending"),
            RecordStatus::Published => write!(f, "published"),
            RecordStatus::Archived => write!(f, "archived"),
        }
    }
}

/// A tag attached to a record through the many-to-many tag relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTag {
    /// Tag identifier
    pub tag_id: String,
    /// Tag type scope (e.g., scene, taste, crowd)
    pub tag_type: String,
}

/// A record in the external catalog, read-only to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub record_id: String,

    /// Display title
    pub title: String,

    /// Lifecycle status
    pub status: RecordStatus,

    /// Linked cuisine, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_id: Option<String>,

    /// Linked location, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,

    /// Cooking time in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,

    /// Preparation time in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,

    /// Difficulty rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,

    /// Serving count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,

    /// Attached tags
    #[serde(default)]
    pub tags: Vec<RecordTag>,

    /// Creation timestamp, drives recency ordering in views
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Create a record with no relations, tags, or numeric attributes
    pub fn new(
        record_id: impl Into<String>,
        title: impl Into<String>,
        status: RecordStatus,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            title: title.into(),
            status,
            cuisine_id: None,
            location_id: None,
            cook_time: None,
            prep_time: None,
            difficulty: None,
            servings: None,
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    /// Set the linked cuisine
    pub fn with_cuisine(mut self, cuisine_id: impl Into<String>) -> Self {
        self.cuisine_id = Some(cuisine_id.into());
        self
    }

    /// Set the linked location
    pub fn with_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// Attach a tag
    pub fn with_tag(mut self, tag_id: impl Into<String>, tag_type: impl Into<String>) -> Self {
        self.tags.push(RecordTag {
            tag_id: tag_id.into(),
            tag_type: tag_type.into(),
        });
        self
    }

    /// Set the cooking time
    pub fn with_cook_time(mut self, minutes: u32) -> Self {
        self.cook_time = Some(minutes);
        self
    }

    /// Set the preparation time
    pub fn with_prep_time(mut self, minutes: u32) -> Self {
        self.prep_time = Some(minutes);
        self
    }

    /// Set the difficulty rating
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set the serving count
    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = Some(servings);
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Record store query interface
///
/// Implement this trait to back the engine with a real store. All methods
/// take `&self` to allow interior mutability; implementations must be
/// `Send + Sync`. `status` of `None` means no status filter.
pub trait RecordStore: Send + Sync {
    /// Count records matching the predicate, optionally filtered by status.
    /// Must not materialize records.
    fn count(&self, predicate: &Predicate, status: Option<RecordStatus>) -> Result<u32>;

    /// List records matching the predicate, most-recently-created first,
    /// optionally filtered by status
    fn list(
        &self,
        predicate: &Predicate,
        status: Option<RecordStatus>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Record>>;

    /// Fetch a single record by id
    fn get(&self, record_id: &str) -> Result<Option<Record>>;

    /// Check if the backend is healthy
    fn health_check(&self) -> Result<()>;

    /// Get backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// In-memory record store (default)
///
/// Holds records in a HashMap and evaluates predicates in process.
/// Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, Record>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store seeded with records
    pub fn with_records(records: Vec<Record>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write().expect("fresh lock");
            for record in records {
                map.insert(record.record_id.clone(), record);
            }
        }
        store
    }

    /// Insert or replace a record
    pub fn insert(&self, record: Record) -> Result<()> {
        let mut records = self.records.write().map_err(|_| CuratorError::StoreLocked)?;
        records.insert(record.record_id.clone(), record);
        Ok(())
    }

    /// Remove a record
    pub fn remove(&self, record_id: &str) -> Result<()> {
        let mut records = self.records.write().map_err(|_| CuratorError::StoreLocked)?;
        records.remove(record_id);
        Ok(())
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all records
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.write() {
            records.clear();
        }
    }
}

impl RecordStore for InMemoryStore {
    fn count(&self, predicate: &Predicate, status: Option<RecordStatus>) -> Result<u32> {
        let records = self.records.read().map_err(|_| CuratorError::StoreLocked)?;
        let count = records
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .filter(|r| predicate.matches(r))
            .count();
        Ok(count as u32)
    }

    fn list(
        &self,
        predicate: &Predicate,
        status: Option<RecordStatus>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let records = self.records.read().map_err(|_| CuratorError::StoreLocked)?;
        let mut matched: Vec<Record> = records
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .filter(|r| predicate.matches(r))
            .cloned()
            .collect();

        // Most-recently-created first; id as tiebreak for stable output
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.record_id.cmp(&b.record_id))
        });

        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    fn get(&self, record_id: &str) -> Result<Option<Record>> {
        let records = self.records.read().map_err(|_| CuratorError::StoreLocked)?;
        Ok(records.get(record_id).cloned())
    }

    fn health_check(&self) -> Result<()> {
        // In-memory is always healthy if we can acquire the lock
        let _records = self.records.read().map_err(|_| CuratorError::StoreLocked)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// Null record store (empty corpus)
///
/// Useful for benchmarks or wiring tests that never touch records.
#[derive(Debug, Default, Clone)]
pub struct NullStore;

impl NullStore {
    pub fn new() -> Self {
        Self
    }
}

impl RecordStore for NullStore {
    fn count(&self, _predicate: &Predicate, _status: Option<RecordStatus>) -> Result<u32> {
        Ok(0)
    }

    fn list(
        &self,
        _predicate: &Predicate,
        _status: Option<RecordStatus>,
        _offset: usize,
        _limit: usize,
    ) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }

    fn get(&self, _record_id: &str) -> Result<Option<Record>> {
        Ok(None)
    }

    fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
