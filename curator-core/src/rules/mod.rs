//! Rule configuration model and validation
//!
//! A rule describes which records belong to a collection. Rules come in two
//! modes: `auto` (follow the collection's own cuisine/location/tag linkage)
//! and `custom` (explicit boolean groups of conditions plus an exclude
//! list). This module owns the data model and its structural validation;
//! compilation into a matchable predicate lives in [`crate::engine`].

mod config;
mod validator;

pub use config::{
    AutoField, ConditionField, ConditionValue, FieldKind, GroupLogic, Operator, RuleCondition,
    RuleConfig, RuleGroup,
};
pub use validator::{validate, RuleValidator, ValidationIssue, ValidationResult};
