#![deny(unsafe_code)]

use std::path::Path;

use lc_model::normalize_message_type;

use super::Table;
use crate::error::StandardsError;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MessageMeta {
    pub message_type: String,
    pub name: String,
    pub version: String,
}

pub fn parse_messages_csv(path: &Path) -> Result<Vec<MessageMeta>, StandardsError> {
    let table = Table::read(path)?;

    let mut results = Vec::new();
    for (line, row) in table.numbered() {
        results.push(MessageMeta {
            message_type: normalize_message_type(&table.require(row, line, "Message Type")?),
            name: table.require(row, line, "Name")?,
            version: table.get(row, "Version").unwrap_or_default(),
        });
    }

    results.sort_by(|a, b| a.message_type.cmp(&b.message_type));
    if let Some(pair) = results
        .windows(2)
        .find(|pair| pair[0].message_type == pair[1].message_type)
    {
        return Err(StandardsError::csv(
            path,
            format!("message type MT{} listed twice", pair[0].message_type),
        ));
    }
    Ok(results)
}
