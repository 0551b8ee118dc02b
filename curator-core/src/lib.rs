//! # Curator Core - Collection Rule Engine
//!
//! Curator decides what content is ready to publish. It compiles a
//! declarative rule configuration into a matching predicate over a record
//! catalog, combines the matches with manual override sets, and derives the
//! publication-readiness aggregates that admin views rely on:
//!
//! - **Rules**: a tagged-union config (`auto` follows the collection's own
//!   cuisine/location/tag linkage; `custom` builds boolean condition groups
//!   plus an exclude list), validated with accumulated, located errors
//! - **Pipeline**: validate → compile → match → override-resolve →
//!   aggregate, with a fresh detail read path and a cached summary read
//!   path sharing the same pipeline
//! - **Overrides**: pinned records are force-included in explicit order;
//!   excluded records are force-removed and always win
//! - **Store**: matching runs against any backend implementing
//!   [`store::RecordStore`]; an in-memory store ships for tests and demos
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use curator_core::{
//!     AutoField, Collection, CollectionContext, CollectionEngine, InMemoryStore,
//!     QualifiedStatus, Record, RecordStatus, RuleConfig,
//! };
//!
//! // A small catalog
//! let store = InMemoryStore::new();
//! store.insert(
//!     Record::new("r-1", "Mapo Tofu", RecordStatus::Published)
//!         .with_cuisine("cuisine-sichuan"),
//! ).unwrap();
//! store.insert(
//!     Record::new("r-2", "Boiled Fish", RecordStatus::Pending)
//!         .with_cuisine("cuisine-sichuan"),
//! ).unwrap();
//!
//! // A collection linked to the Sichuan cuisine with an auto rule
//! let collection = Collection::new(
//!     "col-1",
//!     "Sichuan Classics",
//!     RuleConfig::auto(AutoField::CuisineId, "cuisine-sichuan"),
//! )
//! .with_context(CollectionContext::new().with_cuisine("cuisine-sichuan"))
//! .with_min_required(1)
//! .with_target_count(4);
//!
//! // Real-time read path
//! let engine = CollectionEngine::new(Arc::new(store));
//! let detail = engine.detail(&collection).unwrap();
//!
//! assert_eq!(detail.matched_count, 2);
//! assert_eq!(detail.published_count, 1);
//! assert_eq!(detail.progress, 25.0);
//! assert_eq!(detail.qualified_status, QualifiedStatus::Qualified);
//! ```

pub mod cache;
pub mod collection;
pub mod engine;
pub mod error;
pub mod rules;
pub mod store;

// Re-export main types
pub use cache::{collection_fingerprint, CacheStats, CountsCache, CountsCacheConfig, CountsSnapshot};
pub use collection::{Collection, CollectionContext};
pub use engine::{
    aggregate, compile, readiness, resolve_overrides, AddMethod, CollectionDetail,
    CollectionEngine, CollectionEntry, CollectionSummary, CompileWarning, CompiledRule, Counts,
    Matcher, PartitionedMatches, Predicate, QualifiedStatus, Readiness, ResolvedRecord,
};
pub use error::{CuratorError, ErrorCategory, ErrorDetail, ErrorResponse, Result};
pub use rules::{
    validate, AutoField, ConditionField, ConditionValue, FieldKind, GroupLogic, Operator,
    RuleCondition, RuleConfig, RuleGroup, RuleValidator, ValidationIssue, ValidationResult,
};
pub use store::{InMemoryStore, NullStore, Record, RecordStatus, RecordStore, RecordTag};
