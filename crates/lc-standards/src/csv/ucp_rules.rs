#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::Path;

use lc_model::{ClassificationRule, FieldCategory, Severity};

use super::Table;
use crate::error::StandardsError;

/// Parse the UCP 600 classification table; one row per field category.
pub fn parse_ucp_rules_csv(path: &Path) -> Result<Vec<ClassificationRule>, StandardsError> {
    let table = Table::read(path)?;
    let model_error = |source| StandardsError::Model {
        path: path.to_path_buf(),
        source,
    };

    let mut seen = BTreeSet::new();
    let mut results = Vec::new();
    for (line, row) in table.numbered() {
        let category: FieldCategory = table
            .require(row, line, "Category")?
            .parse()
            .map_err(model_error)?;
        if !seen.insert(category) {
            return Err(StandardsError::csv(
                path,
                format!("row {line}: category {category} listed twice"),
            ));
        }
        let severity: Severity = table
            .require(row, line, "Severity")?
            .parse()
            .map_err(model_error)?;

        results.push(ClassificationRule {
            category,
            rule_reference: table.require(row, line, "Rule Reference")?,
            severity,
            article_text: table.get(row, "Article Text").unwrap_or_default(),
            recommendation: table.get(row, "Recommendation").unwrap_or_default(),
        });
    }
    Ok(results)
}
