#![deny(unsafe_code)]

use std::path::Path;

use lc_model::{
    CrossFieldRelation, CrossFieldRule, FieldPattern, FieldRule, RuleKind, normalize_message_type,
};

use super::Table;
use crate::error::StandardsError;

/// A business rule and the field it is attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRow {
    pub message_type: String,
    pub tag: String,
    pub rule: FieldRule,
}

/// Parse the field rule table. Unknown rule kinds and invalid patterns are errors.
pub fn parse_rules_csv(path: &Path) -> Result<Vec<RuleRow>, StandardsError> {
    let table = Table::read(path)?;
    let model_error = |source| StandardsError::Model {
        path: path.to_path_buf(),
        source,
    };

    let mut results = Vec::new();
    for (line, row) in table.numbered() {
        let message_type = normalize_message_type(&table.require(row, line, "Message Type")?);
        let tag = table.require(row, line, "Tag")?.to_ascii_uppercase();
        let kind: RuleKind = table
            .require(row, line, "Rule Kind")?
            .parse()
            .map_err(model_error)?;

        let rule = match kind {
            RuleKind::Length => {
                let min = table.number(row, line, "Min")?.unwrap_or(0);
                let max = table.number(row, line, "Max")?.ok_or_else(|| {
                    StandardsError::csv(path, format!("row {line}: length rule needs Max"))
                })?;
                if min > max {
                    return Err(StandardsError::csv(
                        path,
                        format!("row {line}: length rule has Min {min} above Max {max}"),
                    ));
                }
                FieldRule::Length { min, max }
            }
            RuleKind::Pattern => {
                let pattern = table.require(row, line, "Pattern")?;
                FieldRule::Pattern {
                    pattern: FieldPattern::new(&pattern).map_err(model_error)?,
                }
            }
            RuleKind::Date => FieldRule::Date {
                component: table.number(row, line, "Component")?.unwrap_or(0),
            },
            RuleKind::CrossField => {
                let relation: CrossFieldRelation = table
                    .require(row, line, "Relation")?
                    .parse()
                    .map_err(model_error)?;
                FieldRule::CrossField(CrossFieldRule {
                    relation,
                    other_tag: table.require(row, line, "Other Tag")?.to_ascii_uppercase(),
                })
            }
        };

        results.push(RuleRow {
            message_type,
            tag,
            rule,
        });
    }
    Ok(results)
}
