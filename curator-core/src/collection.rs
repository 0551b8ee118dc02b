//! Collection types
//!
//! A collection is a named, rule-defined grouping of records owned by the
//! admin layer. The engine only reads collections: the rule config drives
//! matching, the pinned/excluded id sets override it, and
//! `min_required`/`target_count` feed publication-readiness.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rules::{AutoField, RuleConfig};

/// A curated collection of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub collection_id: String,

    /// Human-readable name
    pub name: String,

    /// The rule deciding which records belong
    pub rule_config: RuleConfig,

    /// The collection's own relation linkage, resolved by auto rules
    #[serde(default)]
    pub context: CollectionContext,

    /// Force-included record ids, in explicit presentation order
    #[serde(default)]
    pub pinned_ids: Vec<String>,

    /// Force-removed record ids; exclusion beats pinning and rule matches
    #[serde(default)]
    pub excluded_ids: Vec<String>,

    /// Published-record count required for the collection to qualify
    #[serde(default)]
    pub min_required: u32,

    /// Published-record count the collection is working toward
    #[serde(default)]
    pub target_count: u32,
}

impl Collection {
    /// Create a new collection with empty overrides and zero thresholds
    pub fn new(
        collection_id: impl Into<String>,
        name: impl Into<String>,
        rule_config: RuleConfig,
    ) -> Self {
        Self {
            collection_id: collection_id.into(),
            name: name.into(),
            rule_config,
            context: CollectionContext::default(),
            pinned_ids: vec![],
            excluded_ids: vec![],
            min_required: 0,
            target_count: 0,
        }
    }

    /// Set the relation linkage
    pub fn with_context(mut self, context: CollectionContext) -> Self {
        self.context = context;
        self
    }

    /// Set the pinned ids (explicit order preserved)
    pub fn with_pinned(mut self, pinned_ids: Vec<String>) -> Self {
        self.pinned_ids = pinned_ids;
        self
    }

    /// Set the excluded ids
    pub fn with_excluded(mut self, excluded_ids: Vec<String>) -> Self {
        self.excluded_ids = excluded_ids;
        self
    }

    /// Set the qualification threshold
    pub fn with_min_required(mut self, min_required: u32) -> Self {
        self.min_required = min_required;
        self
    }

    /// Set the progress target
    pub fn with_target_count(mut self, target_count: u32) -> Self {
        self.target_count = target_count;
        self
    }

    /// The excluded ids as a set for membership tests
    pub fn excluded_set(&self) -> HashSet<String> {
        self.excluded_ids.iter().cloned().collect()
    }
}

/// The relation ids a collection is linked through
///
/// Passed explicitly into compilation so the compiler stays pure; an auto
/// rule resolves its field against this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionContext {
    /// Linked cuisine id, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_id: Option<String>,

    /// Linked location id, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,

    /// Linked tag id, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<String>,
}

impl CollectionContext {
    /// Create an empty context (auto rules compile to match-nothing)
    pub fn new() -> Self {
        Self::default()
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

    /// Set the linked tag
    pub fn with_tag(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_id = Some(tag_id.into());
        self
    }

    /// Resolve an auto rule's field against this linkage
    pub fn resolve(&self, field: AutoField) -> Option<&str> {
        match field {
            AutoField::CuisineId => self.cuisine_id.as_deref(),
            AutoField::LocationId => self.location_id.as_deref(),
            AutoField::TagId => self.tag_id.as_deref(),
        }
    }
}
