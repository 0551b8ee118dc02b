//! Rule compilation
//!
//! Converts a *validated* [`RuleConfig`] plus the collection's linkage into
//! a [`Predicate`]. Pure and deterministic: the same config and context
//! always compile to the same predicate. Compiling a config the validator
//! rejects is undefined behavior — callers must validate first.
//!
//! Compilation never aborts. A dangling auto linkage or an unsupported
//! field/operator pair degrades to the empty predicate for that piece and
//! is reported as a [`CompileWarning`], so a collection with a bad rule
//! reports zero matches instead of failing a batch operation.

use tracing::warn;

use crate::collection::CollectionContext;
use crate::rules::{
    AutoField, ConditionField, FieldKind, GroupLogic, Operator, RuleCondition, RuleConfig,
};

use super::predicate::{Comparison, NumericField, Predicate, RelationField};

/// Result of compiling a rule config
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    /// The match predicate
    pub predicate: Predicate,
    /// Non-fatal degradations encountered during compilation
    pub warnings: Vec<CompileWarning>,
}

impl CompiledRule {
    /// Whether compilation degraded anywhere
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A non-fatal compilation degradation
#[derive(Debug, Clone, PartialEq)]
pub enum CompileWarning {
    /// An auto rule's linkage is absent from the collection context;
    /// the rule is inherently unsatisfiable
    UnresolvedReference { field: AutoField },
    /// A condition's field/operator/value combination cannot be compiled;
    /// the condition matches nothing
    UnsupportedCondition {
        path: String,
        field: ConditionField,
        operator: Operator,
    },
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileWarning::UnresolvedReference { field } => {
                write!(f, "auto rule field '{}' has no linked id on the collection", field)
            }
            CompileWarning::UnsupportedCondition {
                path,
                field,
                operator,
            } => write!(
                f,
                "condition at {} ('{}' {}) cannot be compiled and matches nothing",
                path, field, operator
            ),
        }
    }
}

/// Compile a validated rule config against a collection's linkage
pub fn compile(config: &RuleConfig, context: &CollectionContext) -> CompiledRule {
    let mut warnings = Vec::new();

    let predicate = match config {
        RuleConfig::Auto { field, value: _ } => compile_auto(*field, context, &mut warnings),
        RuleConfig::Custom { groups, exclude } => {
            let group_preds: Vec<Predicate> = groups
                .iter()
                .enumerate()
                .filter(|(_, group)| !group.is_empty())
                .map(|(i, group)| {
                    let conditions: Vec<Predicate> = group
                        .conditions
                        .iter()
                        .enumerate()
                        .map(|(j, condition)| {
                            compile_condition(
                                condition,
                                &format!("groups[{}].conditions[{}]", i, j),
                                &mut warnings,
                            )
                        })
                        .collect();
                    match group.logic {
                        GroupLogic::And => Predicate::and(conditions),
                        GroupLogic::Or => Predicate::or(conditions),
                    }
                })
                .collect();
            let groups_pred = Predicate::and(group_preds);

            if exclude.is_empty() {
                // No exclude list: skip the no-op negation path entirely
                groups_pred
            } else {
                let exclude_preds: Vec<Predicate> = exclude
                    .iter()
                    .enumerate()
                    .map(|(i, condition)| {
                        compile_condition(condition, &format!("exclude[{}]", i), &mut warnings)
                    })
                    .collect();
                Predicate::and(vec![
                    groups_pred,
                    Predicate::negate(Predicate::or(exclude_preds)),
                ])
            }
        }
    };

    for warning in &warnings {
        warn!(warning = %warning, mode = config.mode(), "rule compilation degraded");
    }

    CompiledRule {
        predicate,
        warnings,
    }
}

fn compile_auto(
    field: AutoField,
    context: &CollectionContext,
    warnings: &mut Vec<CompileWarning>,
) -> Predicate {
    // The collection linkage is authoritative; the config's persisted value
    // only mirrors it for display
    let Some(linked_id) = context.resolve(field) else {
        warnings.push(CompileWarning::UnresolvedReference { field });
        return Predicate::MatchNone;
    };

    match field {
        AutoField::CuisineId => {
            Predicate::relation(RelationField::Cuisine, vec![linked_id.to_string()], false)
        }
        AutoField::LocationId => {
            Predicate::relation(RelationField::Location, vec![linked_id.to_string()], false)
        }
        AutoField::TagId => Predicate::tags(None, vec![linked_id.to_string()], false),
    }
}

fn compile_condition(
    condition: &RuleCondition,
    path: &str,
    warnings: &mut Vec<CompileWarning>,
) -> Predicate {
    let unsupported = |warnings: &mut Vec<CompileWarning>| {
        warnings.push(CompileWarning::UnsupportedCondition {
            path: path.to_string(),
            field: condition.field,
            operator: condition.operator,
        });
        Predicate::MatchNone
    };

    if !condition.field.allows(condition.operator) {
        return unsupported(warnings);
    }

    match condition.field.kind() {
        FieldKind::Relation => {
            let Some(values) = condition.value.id_items() else {
                return unsupported(warnings);
            };
            let field = match condition.field {
                ConditionField::CuisineId => RelationField::Cuisine,
                ConditionField::LocationId => RelationField::Location,
                // Legality table keeps tag/numeric fields out of this arm
                _ => return unsupported(warnings),
            };
            Predicate::relation(field, values, condition.operator.is_negated())
        }
        FieldKind::Tag => {
            let Some(tag_type) = condition.tag_type.clone().filter(|t| !t.is_empty()) else {
                return unsupported(warnings);
            };
            let Some(tag_ids) = condition.value.id_items() else {
                return unsupported(warnings);
            };
            Predicate::tags(Some(tag_type), tag_ids, condition.operator.is_negated())
        }
        FieldKind::Numeric => {
            let Some(value) = condition.value.as_number() else {
                return unsupported(warnings);
            };
            let cmp = match condition.operator {
                Operator::Eq => Comparison::Eq,
                Operator::Neq => Comparison::Neq,
                Operator::Lt => Comparison::Lt,
                Operator::Lte => Comparison::Lte,
                Operator::Gt => Comparison::Gt,
                Operator::Gte => Comparison::Gte,
                Operator::In | Operator::NotIn => return unsupported(warnings),
            };
            let field = match condition.field {
                ConditionField::CookTime => NumericField::CookTime,
                ConditionField::PrepTime => NumericField::PrepTime,
                ConditionField::Difficulty => NumericField::Difficulty,
                ConditionField::Servings => NumericField::Servings,
                _ => return unsupported(warnings),
            };
            Predicate::numeric(field, cmp, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleCondition, RuleGroup};

    fn linked_context() -> CollectionContext {
        CollectionContext::new()
            .with_cuisine("cuisine-sichuan")
            .with_tag("tag-featured")
    }

    #[test]
    fn test_compile_auto_cuisine() {
        let config = RuleConfig::auto(AutoField::CuisineId, "cuisine-sichuan");
        let compiled = compile(&config, &linked_context());

        assert!(compiled.is_clean());
        assert_eq!(
            compiled.predicate,
            Predicate::relation(
                RelationField::Cuisine,
                vec!["cuisine-sichuan".into()],
                false
            )
        );
    }

    #[test]
    fn test_compile_auto_tag_unscoped() {
        let config = RuleConfig::auto(AutoField::TagId, "tag-featured");
        let compiled = compile(&config, &linked_context());

        assert_eq!(
            compiled.predicate,
            Predicate::tags(None, vec!["tag-featured".into()], false)
        );
    }

    #[test]
    fn test_compile_auto_unresolved_reference() {
        // Context has no location linkage: the rule is unsatisfiable
        let config = RuleConfig::auto(AutoField::LocationId, "loc-1");
        let compiled = compile(&config, &linked_context());

        assert_eq!(compiled.predicate, Predicate::MatchNone);
        assert_eq!(
            compiled.warnings,
            vec![CompileWarning::UnresolvedReference {
                field: AutoField::LocationId
            }]
        );
    }

    #[test]
    fn test_compile_custom_groups_and_across_or_within() {
        let config = RuleConfig::custom(vec![
            RuleGroup::all(vec![RuleCondition::tag(
                "scene",
                Operator::Eq,
                "tag-breakfast".into(),
            )]),
            RuleGroup::any(vec![
                RuleCondition::tag("taste", Operator::Eq, "tag-spicy".into()),
                RuleCondition::tag("taste", Operator::Eq, "tag-sour-spicy".into()),
            ]),
        ]);
        let compiled = compile(&config, &CollectionContext::default());

        assert!(compiled.is_clean());
        assert_eq!(
            compiled.predicate,
            Predicate::And(vec![
                Predicate::tags(Some("scene".into()), vec!["tag-breakfast".into()], false),
                Predicate::Or(vec![
                    Predicate::tags(Some("taste".into()), vec!["tag-spicy".into()], false),
                    Predicate::tags(Some("taste".into()), vec!["tag-sour-spicy".into()], false),
                ]),
            ])
        );
    }

    #[test]
    fn test_compile_exclude_wraps_negation() {
        let config = RuleConfig::custom_with_exclude(
            vec![RuleGroup::all(vec![RuleCondition::tag(
                "scene",
                Operator::Eq,
                "tag-dinner".into(),
            )])],
            vec![RuleCondition::tag("crowd", Operator::Eq, "tag-children".into())],
        );
        let compiled = compile(&config, &CollectionContext::default());

        assert_eq!(
            compiled.predicate,
            Predicate::And(vec![
                Predicate::tags(Some("scene".into()), vec!["tag-dinner".into()], false),
                Predicate::Not(Box::new(Predicate::tags(
                    Some("crowd".into()),
                    vec!["tag-children".into()],
                    false
                ))),
            ])
        );
    }

    #[test]
    fn test_compile_empty_exclude_omits_negation() {
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition::tag(
            "scene",
            Operator::Eq,
            "tag-dinner".into(),
        )])]);
        let compiled = compile(&config, &CollectionContext::default());

        // No Not node anywhere: the negation path is skipped entirely
        assert_eq!(
            compiled.predicate,
            Predicate::tags(Some("scene".into()), vec!["tag-dinner".into()], false)
        );
    }

    #[test]
    fn test_compile_drops_empty_groups() {
        let with_empty = RuleConfig::custom(vec![
            RuleGroup::all(vec![]),
            RuleGroup::all(vec![RuleCondition::numeric(
                ConditionField::CookTime,
                Operator::Lte,
                30.0,
            )]),
            RuleGroup::any(vec![]),
        ]);
        let without = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition::numeric(
            ConditionField::CookTime,
            Operator::Lte,
            30.0,
        )])]);

        let context = CollectionContext::default();
        assert_eq!(
            compile(&with_empty, &context).predicate,
            compile(&without, &context).predicate
        );
    }

    #[test]
    fn test_compile_empty_custom_matches_everything() {
        let config = RuleConfig::custom(vec![]);
        let compiled = compile(&config, &CollectionContext::default());
        assert_eq!(compiled.predicate, Predicate::MatchAll);
    }

    #[test]
    fn test_compile_unsupported_pair_degrades() {
        // Ordering operator on a relation field: matches nothing, warns
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![RuleCondition::relation(
            ConditionField::CuisineId,
            Operator::Lt,
            "c-1".into(),
        )])]);
        let compiled = compile(&config, &CollectionContext::default());

        assert_eq!(compiled.predicate, Predicate::MatchNone);
        assert_eq!(compiled.warnings.len(), 1);
        assert!(matches!(
            compiled.warnings[0],
            CompileWarning::UnsupportedCondition {
                field: ConditionField::CuisineId,
                operator: Operator::Lt,
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_condition_in_or_group_is_dropped() {
        // The poisoned branch vanishes from the OR; the healthy branch survives
        let config = RuleConfig::custom(vec![RuleGroup::any(vec![
            RuleCondition::relation(ConditionField::CuisineId, Operator::Gt, "c-1".into()),
            RuleCondition::tag("taste", Operator::Eq, "tag-spicy".into()),
        ])]);
        let compiled = compile(&config, &CollectionContext::default());

        assert_eq!(
            compiled.predicate,
            Predicate::tags(Some("taste".into()), vec!["tag-spicy".into()], false)
        );
        assert_eq!(compiled.warnings.len(), 1);
    }

    #[test]
    fn test_compile_numeric_comparisons() {
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![
            RuleCondition::numeric(ConditionField::Difficulty, Operator::Lte, 3.0),
            RuleCondition::numeric(ConditionField::Servings, Operator::Gt, 2.0),
        ])]);
        let compiled = compile(&config, &CollectionContext::default());

        assert_eq!(
            compiled.predicate,
            Predicate::And(vec![
                Predicate::numeric(NumericField::Difficulty, Comparison::Lte, 3.0),
                Predicate::numeric(NumericField::Servings, Comparison::Gt, 2.0),
            ])
        );
    }

    #[test]
    fn test_compile_membership_operators() {
        let config = RuleConfig::custom(vec![RuleGroup::all(vec![
            RuleCondition::relation(
                ConditionField::CuisineId,
                Operator::In,
                vec!["c-1".to_string(), "c-2".to_string()].into(),
            ),
            RuleCondition::tag(
                "crowd",
                Operator::NotIn,
                vec!["tag-children".to_string()].into(),
            ),
        ])]);
        let compiled = compile(&config, &CollectionContext::default());

        assert_eq!(
            compiled.predicate,
            Predicate::And(vec![
                Predicate::relation(
                    RelationField::Cuisine,
                    vec!["c-1".into(), "c-2".into()],
                    false
                ),
                Predicate::tags(Some("crowd".into()), vec!["tag-children".into()], true),
            ])
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let config = RuleConfig::custom_with_exclude(
            vec![
                RuleGroup::all(vec![RuleCondition::tag(
                    "scene",
                    Operator::Eq,
                    "tag-breakfast".into(),
                )]),
                RuleGroup::any(vec![RuleCondition::numeric(
                    ConditionField::CookTime,
                    Operator::Lt,
                    20.0,
                )]),
            ],
            vec![RuleCondition::tag("crowd", Operator::Eq, "tag-children".into())],
        );
        let context = linked_context();

        let first = compile(&config, &context);
        let second = compile(&config, &context);
        assert_eq!(first, second);
    }
}
