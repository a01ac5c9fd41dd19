//! Length, pattern, date and cross-field rules.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lc_format::{FormatCache, FormatMatch, match_value, parse_swift_date};
use lc_model::{
    CrossFieldRelation, FieldDefinition, FieldRule, MessageSchema, ValidationErrorKind,
    ValidationResult,
};

use crate::error::{Result, ValidateError};

fn violation(tag: &str, message: String, expected: String) -> ValidationResult {
    ValidationResult::fail(tag, ValidationErrorKind::RuleViolation, message).with_expected(expected)
}

/// Apply the single-field rules to a value that already matched its format.
pub(crate) fn check_field_rules(
    definition: &FieldDefinition,
    matched: &FormatMatch,
    value: &str,
) -> std::result::Result<(), ValidationResult> {
    let tag = definition.tag.as_str();

    for rule in &definition.rules {
        match rule {
            FieldRule::Length { min, max } => {
                let len = value.chars().filter(|c| *c != '\n').count();
                if len < *min || len > *max {
                    return Err(violation(
                        tag,
                        format!("field {tag} has {len} characters, allowed {min} to {max}"),
                        rule.to_string(),
                    )
                    .with_actual(len.to_string()));
                }
            }
            FieldRule::Pattern { pattern } => {
                if !pattern.is_match(value) {
                    return Err(violation(
                        tag,
                        format!("field {tag} does not match pattern {}", pattern.as_str()),
                        rule.to_string(),
                    )
                    .with_actual(value));
                }
            }
            FieldRule::Date { component } => {
                // Skipped optional components carry no date.
                let Some(text) = matched.segment(value, *component) else {
                    continue;
                };
                if parse_swift_date(text).is_none() {
                    return Err(violation(
                        tag,
                        format!("field {tag} contains '{text}', which is not a valid date"),
                        "YYMMDD".to_string(),
                    )
                    .with_actual(text));
                }
            }
            FieldRule::CrossField(_) => {}
        }
    }
    Ok(())
}

/// Evaluate cross-field rules against the whole field map.
///
/// `results` holds one entry per schema field in schema order. Only fields
/// that are present and passed their own checks are examined, and the first
/// failing rule replaces the field's result.
pub(crate) fn check_cross_field(
    schema: &MessageSchema,
    values: &BTreeMap<String, String>,
    cache: &FormatCache,
    results: &mut [ValidationResult],
) -> Result<()> {
    let present = |tag: &str| values.get(tag).is_some_and(|v| !v.trim().is_empty());

    for (definition, result) in schema.fields.iter().zip(results.iter_mut()) {
        let tag = definition.tag.as_str();
        let Some(value) = values.get(tag).filter(|_| result.valid && present(tag)) else {
            continue;
        };

        for rule in definition.cross_field_rules() {
            let other = rule.other_tag.as_str();
            let failure = match rule.relation {
                CrossFieldRelation::Requires if !present(other) => Some(violation(
                    tag,
                    format!("field {tag} requires field {other}"),
                    rule.to_string(),
                )),
                CrossFieldRelation::ExcludedBy if present(other) => Some(violation(
                    tag,
                    format!("field {tag} cannot be used together with field {other}"),
                    rule.to_string(),
                )),
                CrossFieldRelation::DateNotBefore => {
                    let Some(other_def) = schema.field(other) else {
                        continue;
                    };
                    let mine = field_date(definition, value, cache)?;
                    let theirs = match values.get(other) {
                        Some(v) if present(other) => field_date(other_def, v, cache)?,
                        _ => None,
                    };
                    match (mine, theirs) {
                        (Some(mine), Some(theirs)) if mine < theirs => Some(
                            violation(
                                tag,
                                format!(
                                    "date {mine} in field {tag} is before date {theirs} in field {other}"
                                ),
                                rule.to_string(),
                            )
                            .with_actual(mine.to_string()),
                        ),
                        _ => None,
                    }
                }
                _ => None,
            };

            if let Some(failure) = failure {
                *result = failure;
                break;
            }
        }
    }
    Ok(())
}

/// The date carried by a field: the component named by its date rule, else the first.
fn field_date(
    definition: &FieldDefinition,
    value: &str,
    cache: &FormatCache,
) -> Result<Option<NaiveDate>> {
    let format = cache
        .get_or_compile(&definition.format_spec)
        .map_err(|source| ValidateError::Format {
            tag: definition.tag.clone(),
            source,
        })?;
    let component = definition
        .rules
        .iter()
        .find_map(|rule| match rule {
            FieldRule::Date { component } => Some(*component),
            _ => None,
        })
        .unwrap_or(0);

    Ok(match_value(&format, value)
        .ok()
        .and_then(|matched| matched.segment(value, component).and_then(parse_swift_date)))
}
