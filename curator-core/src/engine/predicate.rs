//! Predicate expressions over record attributes
//!
//! A [`Predicate`] is an abstract, composable boolean expression independent
//! of any specific storage engine. Store backends translate it into their
//! native query form; [`Predicate::matches`] gives the reference in-memory
//! evaluation used by [`crate::store::InMemoryStore`] and by tests.
//!
//! The constructors normalize as they compose: `MatchAll` and `MatchNone`
//! act as neutral/absorbing elements, empty compositions collapse, and
//! single-element compositions unwrap. Compilation relies on this to drop
//! vacuous rule groups without special cases.

use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Relation attributes a predicate can test directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationField {
    Cuisine,
    Location,
}

impl std::fmt::Display for RelationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationField::Cuisine => write!(f, "cuisine"),
            RelationField::Location => write!(f, "location"),
        }
    }
}

/// Numeric attributes a predicate can compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    CookTime,
    PrepTime,
    Difficulty,
    Servings,
}

/// Ordered comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// An abstract boolean expression over record attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Matches every record
    MatchAll,
    /// Matches no records
    MatchNone,
    /// Relation membership: the record's relation id is (not) in `values`.
    /// Records without the relation never match, mirroring SQL null
    /// comparison semantics.
    Relation {
        field: RelationField,
        values: Vec<String>,
        negated: bool,
    },
    /// Tag membership: the record has at least one (`negated = false`) or
    /// none (`negated = true`) of `tag_ids`, optionally scoped by tag type.
    Tags {
        tag_type: Option<String>,
        tag_ids: Vec<String>,
        negated: bool,
    },
    /// Numeric comparison; records without the attribute never match.
    Numeric {
        field: NumericField,
        cmp: Comparison,
        value: f64,
    },
    /// Record id membership; the override/exclusion support.
    Ids { ids: Vec<String>, negated: bool },
    /// Every sub-predicate must match
    And(Vec<Predicate>),
    /// At least one sub-predicate must match
    Or(Vec<Predicate>),
    /// The sub-predicate must not match
    Not(Box<Predicate>),
}

impl Predicate {
    /// Relation membership predicate; an empty value set normalizes to the
    /// constant it denotes ("in nothing" matches nothing, "not in nothing"
    /// matches everything).
    pub fn relation(field: RelationField, values: Vec<String>, negated: bool) -> Predicate {
        if values.is_empty() {
            return if negated {
                Predicate::MatchAll
            } else {
                Predicate::MatchNone
            };
        }
        Predicate::Relation {
            field,
            values,
            negated,
        }
    }

    /// Tag membership predicate, with the same empty-set normalization
    pub fn tags(tag_type: Option<String>, tag_ids: Vec<String>, negated: bool) -> Predicate {
        if tag_ids.is_empty() {
            return if negated {
                Predicate::MatchAll
            } else {
                Predicate::MatchNone
            };
        }
        Predicate::Tags {
            tag_type,
            tag_ids,
            negated,
        }
    }

    /// Numeric comparison predicate
    pub fn numeric(field: NumericField, cmp: Comparison, value: f64) -> Predicate {
        Predicate::Numeric { field, cmp, value }
    }

    /// Id membership predicate
    pub fn ids(ids: Vec<String>) -> Predicate {
        if ids.is_empty() {
            return Predicate::MatchNone;
        }
        Predicate::Ids { ids, negated: false }
    }

    /// Negated id membership predicate ("none of these ids")
    pub fn ids_not(ids: Vec<String>) -> Predicate {
        if ids.is_empty() {
            return Predicate::MatchAll;
        }
        Predicate::Ids { ids, negated: true }
    }

    /// AND-compose, dropping neutral elements and collapsing constants
    pub fn and(preds: Vec<Predicate>) -> Predicate {
        let mut kept = Vec::with_capacity(preds.len());
        for pred in preds {
            match pred {
                Predicate::MatchAll => {}
                Predicate::MatchNone => return Predicate::MatchNone,
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Predicate::MatchAll,
            1 => kept.pop().expect("length checked"),
            _ => Predicate::And(kept),
        }
    }

    /// OR-compose, dropping neutral elements and collapsing constants
    pub fn or(preds: Vec<Predicate>) -> Predicate {
        let mut kept = Vec::with_capacity(preds.len());
        for pred in preds {
            match pred {
                Predicate::MatchNone => {}
                Predicate::MatchAll => return Predicate::MatchAll,
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Predicate::MatchNone,
            1 => kept.pop().expect("length checked"),
            _ => Predicate::Or(kept),
        }
    }

    /// Negate, collapsing constants and double negation
    pub fn negate(pred: Predicate) -> Predicate {
        match pred {
            Predicate::MatchAll => Predicate::MatchNone,
            Predicate::MatchNone => Predicate::MatchAll,
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }

    /// Whether this predicate matches no records
    pub fn is_match_none(&self) -> bool {
        matches!(self, Predicate::MatchNone)
    }

    /// Whether this predicate matches every record
    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::MatchAll)
    }

    /// Reference in-memory evaluation against a single record
    ///
    /// Status is not part of the predicate; callers filter status
    /// separately (see [`crate::store::RecordStore`]).
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::MatchAll => true,
            Predicate::MatchNone => false,
            Predicate::Relation {
                field,
                values,
                negated,
            } => {
                let attr = match field {
                    RelationField::Cuisine => record.cuisine_id.as_deref(),
                    RelationField::Location => record.location_id.as_deref(),
                };
                match attr {
                    Some(id) => values.iter().any(|v| v == id) != *negated,
                    None => false,
                }
            }
            Predicate::Tags {
                tag_type,
                tag_ids,
                negated,
            } => {
                let has_any = record.tags.iter().any(|tag| {
                    tag_type
                        .as_deref()
                        .map_or(true, |scope| tag.tag_type == scope)
                        && tag_ids.iter().any(|id| id == &tag.tag_id)
                });
                has_any != *negated
            }
            Predicate::Numeric { field, cmp, value } => {
                let attr = match field {
                    NumericField::CookTime => record.cook_time,
                    NumericField::PrepTime => record.prep_time,
                    NumericField::Difficulty => record.difficulty,
                    NumericField::Servings => record.servings,
                };
                match attr {
                    Some(v) => compare(f64::from(v), *cmp, *value),
                    None => false,
                }
            }
            Predicate::Ids { ids, negated } => {
                ids.iter().any(|id| id == &record.record_id) != *negated
            }
            Predicate::And(preds) => preds.iter().all(|p| p.matches(record)),
            Predicate::Or(preds) => preds.iter().any(|p| p.matches(record)),
            Predicate::Not(inner) => !inner.matches(record),
        }
    }
}

fn compare(lhs: f64, cmp: Comparison, rhs: f64) -> bool {
    match cmp {
        Comparison::Eq => lhs == rhs,
        Comparison::Neq => lhs != rhs,
        Comparison::Lt => lhs < rhs,
        Comparison::Lte => lhs <= rhs,
        Comparison::Gt => lhs > rhs,
        Comparison::Gte => lhs >= rhs,
    }
}
