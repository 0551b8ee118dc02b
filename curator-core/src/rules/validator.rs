//! Rule config validation
//!
//! Walks every group, condition, and exclude entry of a [`RuleConfig`] and
//! accumulates **all** violations rather than failing fast, so a caller can
//! report every problem at once. Each issue carries a structured path
//! (`groups[0].conditions[1].operator`) for per-field display at
//! rule-authoring time.

use super::config::{ConditionField, ConditionValue, FieldKind, RuleCondition, RuleConfig};

/// Validation result with detailed findings
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,

    /// Error-level issues that must be fixed
    pub errors: Vec<ValidationIssue>,

    /// Warning-level issues that should be addressed
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
            warnings: vec![],
        }
    }

    /// Add an error
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.is_valid = false;
        self.errors.push(issue);
    }

    /// Add a warning
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert into `Ok(())` iff zero violations were found
    pub fn into_result(self) -> Result<(), Vec<ValidationIssue>> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "{}: {} errors, {} warnings",
            if self.is_valid { "VALID" } else { "INVALID" },
            self.errors.len(),
            self.warnings.len()
        )
    }
}

/// A single validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Issue code
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Path to the problematic element (e.g., "groups[0].conditions[1]")
    pub path: Option<String>,

    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            suggestion: None,
        }
    }

    /// Set the path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Rule config validator
pub struct RuleValidator {
    /// Whether to flag vacuous configs (empty groups, match-everything)
    warn_on_vacuous: bool,
}

impl RuleValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            warn_on_vacuous: true,
        }
    }

    /// Disable vacuous-config warnings
    pub fn skip_vacuous_warnings(mut self) -> Self {
        self.warn_on_vacuous = false;
        self
    }

    /// Validate a rule config
    pub fn validate(&self, config: &RuleConfig) -> ValidationResult {
        let mut result = ValidationResult::valid();

        match config {
            RuleConfig::Auto { field: _, value } => {
                if value.is_empty() {
                    result.add_error(
                        ValidationIssue::new("E001", "Auto rule value cannot be empty")
                            .with_path("value")
                            .with_suggestion("Set the id of the linked cuisine, location, or tag"),
                    );
                }
            }
            RuleConfig::Custom { groups, exclude } => {
                if self.warn_on_vacuous && groups.iter().all(|g| g.is_empty()) {
                    result.add_warning(
                        ValidationIssue::new(
                            "W002",
                            "Custom rule has no conditions and will match every record",
                        )
                        .with_path("groups"),
                    );
                }

                for (i, group) in groups.iter().enumerate() {
                    let path = format!("groups[{}]", i);

                    if group.is_empty() {
                        if self.warn_on_vacuous {
                            result.add_warning(
                                ValidationIssue::new("W001", "Group has no conditions")
                                    .with_path(format!("{}.conditions", path)),
                            );
                        }
                        continue;
                    }

                    for (j, condition) in group.conditions.iter().enumerate() {
                        self.validate_condition(
                            condition,
                            &format!("{}.conditions[{}]", path, j),
                            &mut result,
                        );
                    }
                }

                for (i, condition) in exclude.iter().enumerate() {
                    self.validate_condition(condition, &format!("exclude[{}]", i), &mut result);
                }
            }
        }

        result
    }

    fn validate_condition(
        &self,
        condition: &RuleCondition,
        path: &str,
        result: &mut ValidationResult,
    ) {
        // Operator must be legal for the field kind
        if !condition.field.allows(condition.operator) {
            result.add_error(
                ValidationIssue::new(
                    "E002",
                    format!(
                        "Operator '{}' is not legal on field '{}'",
                        condition.operator, condition.field
                    ),
                )
                .with_path(format!("{}.operator", path))
                .with_suggestion(format!(
                    "Use one of: {}",
                    condition
                        .field
                        .legal_operators()
                        .iter()
                        .map(|op| op.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            );
        }

        // Tag conditions require a tag type scope
        if condition.field == ConditionField::TagId {
            match condition.tag_type.as_deref() {
                None | Some("") => {
                    result.add_error(
                        ValidationIssue::new("E003", "Tag condition requires a tagType")
                            .with_path(format!("{}.tagType", path))
                            .with_suggestion("Set the tag type scope (e.g., scene, taste, crowd)"),
                    );
                }
                Some(_) => {}
            }
        } else if condition.tag_type.is_some() {
            result.add_warning(
                ValidationIssue::new(
                    "W003",
                    format!(
                        "tagType has no effect on field '{}' and is ignored",
                        condition.field
                    ),
                )
                .with_path(format!("{}.tagType", path)),
            );
        }

        // Value shape must match the field kind
        match condition.field.kind() {
            FieldKind::Relation | FieldKind::Tag => match &condition.value {
                ConditionValue::Number(_) | ConditionValue::NumberList(_) => {
                    result.add_error(
                        ValidationIssue::new(
                            "E004",
                            format!(
                                "Field '{}' expects an id or id list, got a {}",
                                condition.field,
                                condition.value.shape_name()
                            ),
                        )
                        .with_path(format!("{}.value", path)),
                    );
                }
                value if value.is_list() && !condition.operator.is_membership() => {
                    result.add_warning(
                        ValidationIssue::new(
                            "W004",
                            format!(
                                "List value with scalar operator '{}' is treated as membership",
                                condition.operator
                            ),
                        )
                        .with_path(format!("{}.value", path)),
                    );
                }
                _ => {}
            },
            FieldKind::Numeric => match &condition.value {
                ConditionValue::Number(_) => {}
                other => {
                    result.add_error(
                        ValidationIssue::new(
                            "E004",
                            format!(
                                "Field '{}' expects a number, got a {}",
                                condition.field,
                                other.shape_name()
                            ),
                        )
                        .with_path(format!("{}.value", path)),
                    );
                }
            },
        }

        // Empty values can never match anything
        if condition.value.is_empty() {
            result.add_error(
                ValidationIssue::new("E005", "Condition value cannot be empty")
                    .with_path(format!("{}.value", path)),
            );
        }
    }
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a rule config with the default validator
pub fn validate(config: &RuleConfig) -> ValidationResult {
    RuleValidator::new().validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::config::{AutoField, GroupLogic, Operator, RuleGroup};

    #[test]
    fn test_valid_auto_config() {
        let config = RuleConfig::auto(AutoField::CuisineId, "cuisine-1");
        let result = validate(&config);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_auto_empty_value() {
        let config = RuleConfig::auto(AutoField::TagId, "");
        let result = validate(&config);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.code == "E001"));
    }

    #[test]
    fn test_valid_custom_config() {
        let config = RuleConfig::custom_with_exclude(
            vec![
                RuleGroup::all(vec![
                    RuleCondition::tag("scene", Operator::Eq, "tag-breakfast".into()),
                    RuleCondition::numeric(ConditionField::CookTime, Operator::Lte, 30.0),
                ]),
                RuleGroup::any(vec![RuleCondition::relation(
                    ConditionField::CuisineId,
                    Operator::In,
                    vec!["c-1".to_string(), "c-2".to_string()].into(),
                )]),
            ],
            vec![RuleCondition::tag("crowd", Operator::Eq, "tag-children".into())],
        );

        let result = validate(&config);
        assert!(result.is_valid, "unexpected issues: {:?}", result.errors);
    }

    #[test]
    fn test_illegal_operator_for_relation() {
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition::relation(
            ConditionField::CuisineId,
            Operator::Lt,
            "c-1".into(),
        )])]);

        let result = validate(&config);
        assert!(!result.is_valid);
        let issue = result.errors.iter().find(|e| e.code == "E002").unwrap();
        assert_eq!(
            issue.path.as_deref(),
            Some("groups[0].conditions[0].operator")
        );
        assert!(issue.suggestion.as_deref().unwrap().contains("eq"));
    }

    #[test]
    fn test_illegal_operator_for_numeric() {
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition {
            field: ConditionField::CookTime,
            operator: Operator::In,
            value: ConditionValue::NumberList(vec![10.0, 20.0]),
            tag_type: None,
        }])]);

        let result = validate(&config);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.code == "E002"));
    }

    #[test]
    fn test_tag_condition_requires_tag_type() {
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition {
            field: ConditionField::TagId,
            operator: Operator::Eq,
            value: "tag-1".into(),
            tag_type: None,
        }])]);

        let result = validate(&config);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.code == "E003"));
    }

    #[test]
    fn test_value_shape_mismatch() {
        // Number on a relation field
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition {
            field: ConditionField::CuisineId,
            operator: Operator::Eq,
            value: ConditionValue::Number(5.0),
            tag_type: None,
        }])]);
        let result = validate(&config);
        assert!(result.errors.iter().any(|e| e.code == "E004"));

        // Text on a numeric field
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition {
            field: ConditionField::Servings,
            operator: Operator::Gte,
            value: "four".into(),
            tag_type: None,
        }])]);
        let result = validate(&config);
        assert!(result.errors.iter().any(|e| e.code == "E004"));
    }

    #[test]
    fn test_all_violations_accumulate() {
        // One config with three distinct problems: every one must surface
        let config = RuleConfig::custom_with_exclude(
            vec![RuleGroup {
                logic: GroupLogic::And,
                conditions: vec![
                    RuleCondition::relation(ConditionField::CuisineId, Operator::Gt, "c-1".into()),
                    RuleCondition {
                        field: ConditionField::TagId,
                        operator: Operator::Eq,
                        value: "tag-1".into(),
                        tag_type: None,
                    },
                ],
            }],
            vec![RuleCondition::numeric(
                ConditionField::Difficulty,
                Operator::In,
                3.0,
            )],
        );

        let result = validate(&config);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result
            .errors
            .iter()
            .any(|e| e.path.as_deref() == Some("exclude[0].operator")));
    }

    #[test]
    fn test_empty_group_warns_but_passes() {
        let config = RuleConfig::custom(vec![
            RuleGroup::all(vec![]),
            RuleGroup::all(vec![RuleCondition::tag(
                "scene",
                Operator::Eq,
                "tag-1".into(),
            )]),
        ]);

        let result = validate(&config);
        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.code == "W001"));

        let quiet = RuleValidator::new().skip_vacuous_warnings().validate(&config);
        assert!(quiet.warnings.is_empty());
    }

    #[test]
    fn test_match_everything_warning() {
        let config = RuleConfig::custom(vec![]);
        let result = validate(&config);
        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.code == "W002"));
    }

    #[test]
    fn test_empty_value_rejected() {
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition::relation(
            ConditionField::LocationId,
            Operator::In,
            ConditionValue::TextList(vec![]),
        )])]);

        let result = validate(&config);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.code == "E005"));
    }

    #[test]
    fn test_into_result() {
        let ok = validate(&RuleConfig::auto(AutoField::CuisineId, "c-1"));
        assert!(ok.into_result().is_ok());

        let bad = validate(&RuleConfig::auto(AutoField::CuisineId, ""));
        let issues = bad.into_result().unwrap_err();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_summary() {
        let result = validate(&RuleConfig::auto(AutoField::CuisineId, ""));
        assert!(result.summary().starts_with("INVALID: 1 errors"));
    }
}
