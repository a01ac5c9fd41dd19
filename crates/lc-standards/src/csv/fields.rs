#![deny(unsafe_code)]

use std::path::Path;

use lc_model::{FieldDefinition, normalize_message_type};

use super::Table;
use crate::error::StandardsError;

/// A field definition together with the message type it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub message_type: String,
    pub definition: FieldDefinition,
}

pub fn parse_fields_csv(path: &Path) -> Result<Vec<FieldRow>, StandardsError> {
    let table = Table::read(path)?;

    let mut results = Vec::new();
    for (line, row) in table.numbered() {
        let message_type = normalize_message_type(&table.require(row, line, "Message Type")?);
        let tag = table.require(row, line, "Tag")?.to_ascii_uppercase();
        let sequence: u32 = table
            .number(row, line, "Sequence")?
            .ok_or_else(|| StandardsError::csv(path, format!("row {line}: missing Sequence")))?;
        let mandatory = parse_flag(&table.require(row, line, "Mandatory")?).ok_or_else(|| {
            StandardsError::csv(path, format!("row {line}: Mandatory must be Y or N"))
        })?;

        let mut definition = FieldDefinition::new(
            tag,
            table.require(row, line, "Field Name")?,
            table.require(row, line, "Format")?,
        )
        .mandatory(mandatory)
        .with_sequence(sequence);

        if let Some(values) = table.get(row, "Allowed Values") {
            definition = definition.with_allowed_values(
                values
                    .split('|')
                    .map(str::trim)
                    .filter(|v| !v.is_empty()),
            );
        }
        if let Some(max) = table.number(row, line, "Max Occurrences")? {
            definition.max_occurrences = max;
        }

        results.push(FieldRow {
            message_type,
            definition,
        });
    }
    Ok(results)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_uppercase().as_str() {
        "Y" | "YES" | "M" | "TRUE" => Some(true),
        "N" | "NO" | "O" | "FALSE" => Some(false),
        _ => None,
    }
}
