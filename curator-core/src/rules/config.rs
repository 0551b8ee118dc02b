//! Rule configuration types
//!
//! The wire/persisted form of a rule is a tagged union distinguished by a
//! `mode` discriminator:
//!
//! ```json
//! {"mode":"auto","field":"cuisineId","value":"cuisine-1"}
//! ```
//!
//! ```json
//! {"mode":"custom",
//!  "groups":[{"logic":"AND","conditions":[
//!      {"field":"tagId","operator":"eq","value":"tag-1","tagType":"scene"}]}],
//!  "exclude":[{"field":"tagId","operator":"eq","value":"tag-2","tagType":"crowd"}]}
//! ```
//!
//! These types are pure data. Structural checking lives in
//! [`super::validator`], compilation in [`crate::engine::compiler`].

use serde::{Deserialize, Serialize};

/// A rule configuration, immutable once compiled
///
/// `Auto` matches records by a single bound relation inherited from the
/// collection's own linkage. `Custom` builds the match set from explicit
/// boolean groups of conditions plus an exclude list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RuleConfig {
    /// Match records whose relation equals the collection's linked id
    Auto {
        /// Which relation the collection is linked through
        field: AutoField,
        /// The linked id as persisted on the rule (the collection linkage
        /// is authoritative at compile time)
        value: String,
    },
    /// Match records satisfying every group, minus the exclude list
    Custom {
        /// Condition groups, AND-composed across groups
        #[serde(default)]
        groups: Vec<RuleGroup>,
        /// Conditions whose matches are removed from the result
        #[serde(default)]
        exclude: Vec<RuleCondition>,
    },
}

impl RuleConfig {
    /// Create an auto rule
    pub fn auto(field: AutoField, value: impl Into<String>) -> Self {
        RuleConfig::Auto {
            field,
            value: value.into(),
        }
    }

    /// Create a custom rule with no exclude list
    pub fn custom(groups: Vec<RuleGroup>) -> Self {
        RuleConfig::Custom {
            groups,
            exclude: vec![],
        }
    }

    /// Create a custom rule with an exclude list
    pub fn custom_with_exclude(groups: Vec<RuleGroup>, exclude: Vec<RuleCondition>) -> Self {
        RuleConfig::Custom { groups, exclude }
    }

    /// The wire value of the `mode` discriminator
    pub fn mode(&self) -> &'static str {
        match self {
            RuleConfig::Auto { .. } => "auto",
            RuleConfig::Custom { .. } => "custom",
        }
    }
}

/// Relation kinds an auto rule can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoField {
    CuisineId,
    LocationId,
    TagId,
}

impl std::fmt::Display for AutoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutoField::CuisineId => write!(f, "cuisineId"),
            AutoField::LocationId => write!(f, "locationId"),
            AutoField::TagId => write!(f, "tagId"),
        }
    }
}

/// A group of conditions combined under one logic operator
///
/// Groups are AND-composed with each other; `logic` only governs the
/// conditions *inside* the group. A group with no conditions is vacuous
/// and is dropped during compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    /// How the conditions inside this group combine
    pub logic: GroupLogic,
    /// The member conditions
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
}

impl RuleGroup {
    /// Create a group requiring every condition (AND)
    pub fn all(conditions: Vec<RuleCondition>) -> Self {
        Self {
            logic: GroupLogic::And,
            conditions,
        }
    }

    /// Create a group requiring at least one condition (OR)
    pub fn any(conditions: Vec<RuleCondition>) -> Self {
        Self {
            logic: GroupLogic::Or,
            conditions,
        }
    }

    /// Whether this group has no conditions at all
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Logic operator for conditions within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupLogic {
    And,
    Or,
}

impl std::fmt::Display for GroupLogic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupLogic::And => write!(f, "AND"),
            GroupLogic::Or => write!(f, "OR"),
        }
    }
}

/// A single condition on a record attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Attribute the condition tests
    pub field: ConditionField,
    /// Comparison operator; must be legal for the field kind
    pub operator: Operator,
    /// Comparison value (scalar or list)
    pub value: ConditionValue,
    /// Tag type scope, required when `field` is the generic tag field
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "tagType")]
    pub tag_type: Option<String>,
}

impl RuleCondition {
    /// Create a relation condition (cuisine or location)
    pub fn relation(field: ConditionField, operator: Operator, value: ConditionValue) -> Self {
        Self {
            field,
            operator,
            value,
            tag_type: None,
        }
    }

    /// Create a tag condition scoped to a tag type
    pub fn tag(tag_type: impl Into<String>, operator: Operator, value: ConditionValue) -> Self {
        Self {
            field: ConditionField::TagId,
            operator,
            value,
            tag_type: Some(tag_type.into()),
        }
    }

    /// Create a numeric condition
    pub fn numeric(field: ConditionField, operator: Operator, value: f64) -> Self {
        Self {
            field,
            operator,
            value: ConditionValue::Number(value),
            tag_type: None,
        }
    }
}

/// The closed set of attributes a condition may test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionField {
    CuisineId,
    LocationId,
    TagId,
    CookTime,
    PrepTime,
    Difficulty,
    Servings,
}

/// Classification of a condition field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Direct relation on the record (cuisine, location)
    Relation,
    /// Many-to-many tag membership, scoped by tag type
    Tag,
    /// Ordered numeric attribute
    Numeric,
}

impl ConditionField {
    /// Classify this field
    pub fn kind(&self) -> FieldKind {
        match self {
            ConditionField::CuisineId | ConditionField::LocationId => FieldKind::Relation,
            ConditionField::TagId => FieldKind::Tag,
            ConditionField::CookTime
            | ConditionField::PrepTime
            | ConditionField::Difficulty
            | ConditionField::Servings => FieldKind::Numeric,
        }
    }

    /// Whether this field is a relation or tag reference
    pub fn is_reference(&self) -> bool {
        matches!(self.kind(), FieldKind::Relation | FieldKind::Tag)
    }

    /// Whether this field is numeric
    pub fn is_numeric(&self) -> bool {
        self.kind() == FieldKind::Numeric
    }

    /// The operators legal for this field kind
    ///
    /// Reference fields support equality/membership; numeric fields support
    /// equality and ordered comparison. Anything else is rejected at
    /// validation time.
    pub fn legal_operators(&self) -> &'static [Operator] {
        match self.kind() {
            FieldKind::Relation | FieldKind::Tag => &[
                Operator::Eq,
                Operator::Neq,
                Operator::In,
                Operator::NotIn,
            ],
            FieldKind::Numeric => &[
                Operator::Eq,
                Operator::Neq,
                Operator::Lt,
                Operator::Lte,
                Operator::Gt,
                Operator::Gte,
            ],
        }
    }

    /// Whether `operator` is legal on this field
    pub fn allows(&self, operator: Operator) -> bool {
        self.legal_operators().contains(&operator)
    }
}

impl std::fmt::Display for ConditionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionField::CuisineId => write!(f, "cuisineId"),
            ConditionField::LocationId => write!(f, "locationId"),
            ConditionField::TagId => write!(f, "tagId"),
            ConditionField::CookTime => write!(f, "cookTime"),
            ConditionField::PrepTime => write!(f, "prepTime"),
            ConditionField::Difficulty => write!(f, "difficulty"),
            ConditionField::Servings => write!(f, "servings"),
        }
    }
}

/// The closed set of comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Neq,
    In,
    #[serde(rename = "nin")]
    NotIn,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    /// Whether this operator tests set membership
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Whether this operator is an ordered comparison
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte
        )
    }

    /// Whether this operator negates its match (neq / nin)
    pub fn is_negated(&self) -> bool {
        matches!(self, Operator::Neq | Operator::NotIn)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Eq => write!(f, "eq"),
            Operator::Neq => write!(f, "neq"),
            Operator::In => write!(f, "in"),
            Operator::NotIn => write!(f, "nin"),
            Operator::Lt => write!(f, "lt"),
            Operator::Lte => write!(f, "lte"),
            Operator::Gt => write!(f, "gt"),
            Operator::Gte => write!(f, "gte"),
        }
    }
}

/// A condition's comparison value: scalar or list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    Number(f64),
    TextList(Vec<String>),
    NumberList(Vec<f64>),
}

impl ConditionValue {
    /// Single text value, if this is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConditionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Single numeric value, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConditionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// View the value as a list of ids: a scalar becomes a one-element list
    ///
    /// Returns `None` for numeric shapes, which cannot name ids.
    pub fn id_items(&self) -> Option<Vec<String>> {
        match self {
            ConditionValue::Text(s) => Some(vec![s.clone()]),
            ConditionValue::TextList(items) => Some(items.clone()),
            ConditionValue::Number(_) | ConditionValue::NumberList(_) => None,
        }
    }

    /// Whether this value is a list shape
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ConditionValue::TextList(_) | ConditionValue::NumberList(_)
        )
    }

    /// Whether this value is an empty string or empty list
    pub fn is_empty(&self) -> bool {
        match self {
            ConditionValue::Text(s) => s.is_empty(),
            ConditionValue::Number(_) => false,
            ConditionValue::TextList(items) => items.is_empty(),
            ConditionValue::NumberList(items) => items.is_empty(),
        }
    }

    /// Shape name for diagnostics
    pub fn shape_name(&self) -> &'static str {
        match self {
            ConditionValue::Text(_) => "text",
            ConditionValue::Number(_) => "number",
            ConditionValue::TextList(_) => "text list",
            ConditionValue::NumberList(_) => "number list",
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Text(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Text(s)
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Number(n)
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(items: Vec<String>) -> Self {
        ConditionValue::TextList(items)
    }
}
