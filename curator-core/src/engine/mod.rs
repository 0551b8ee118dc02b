//! The match pipeline
//!
//! Everything between a validated rule config and the payloads the admin
//! UI reads: predicate compilation, store-backed matching, override
//! resolution, aggregation, and the two read paths (fresh detail, cached
//! summary) that share one pipeline.
//!
//! Every stage except the [`Matcher`] is a pure function; the Matcher is
//! the single I/O boundary and delegates to [`crate::store::RecordStore`].

mod aggregate;
mod compiler;
mod matcher;
mod overrides;
mod pipeline;
mod predicate;

pub use aggregate::{aggregate, readiness, Counts, QualifiedStatus, Readiness};
pub use compiler::{compile, CompileWarning, CompiledRule};
pub use matcher::{Matcher, PartitionedMatches, DEFAULT_LIST_LIMIT};
pub use overrides::{resolve_overrides, AddMethod, ResolvedRecord};
pub use pipeline::{CollectionDetail, CollectionEngine, CollectionEntry, CollectionSummary};
pub use predicate::{Comparison, NumericField, Predicate, RelationField};
