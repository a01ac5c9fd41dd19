//! Whole-message validation and SWIFT text block serialisation.

use std::collections::BTreeMap;

use lc_format::{FormatCache, normalize_line_breaks};
use lc_model::{
    ConstructedMessage, MessageSchema, MessageValidationResult, ValidationErrorKind,
    ValidationResult,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ValidateError};
use crate::field::{is_blank, validate_field};
use crate::rules::check_cross_field;

pub const BLOCK_START: &str = "{4:";
pub const BLOCK_END: &str = "-}";
pub const LINE_BREAK: &str = "\r\n";

/// Upper-case, trimmed tags and `\n` line breaks in values.
///
/// A blank value is the same as an absent field and is dropped.
pub fn normalize_values<'a, I>(values: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    values
        .into_iter()
        .filter(|(_, value)| !is_blank(Some(value.as_str())))
        .map(|(tag, value)| (tag.trim().to_ascii_uppercase(), normalize_line_breaks(value)))
        .collect()
}

/// Validate every field of the message; nothing short-circuits.
///
/// Results follow schema order; tags the schema does not define are
/// appended as `UnknownField` failures.
pub fn validate_message(
    schema: &MessageSchema,
    cache: &FormatCache,
    values: &BTreeMap<String, String>,
) -> Result<MessageValidationResult> {
    let values = normalize_values(values);

    let mut results = Vec::with_capacity(schema.fields.len());
    for definition in &schema.fields {
        let format = cache
            .get_or_compile(&definition.format_spec)
            .map_err(|source| ValidateError::Format {
                tag: definition.tag.clone(),
                source,
            })?;
        let value = values.get(&definition.tag).map(String::as_str);
        results.push(validate_field(definition, &format, value));
    }

    check_cross_field(schema, &values, cache, &mut results)?;

    for tag in values.keys().filter(|tag| schema.field(tag).is_none()) {
        results.push(
            ValidationResult::fail(
                tag.as_str(),
                ValidationErrorKind::UnknownField,
                format!("field {tag} is not defined for MT{}", schema.message_type),
            )
            .with_actual(tag.as_str()),
        );
    }

    let result = MessageValidationResult::new(&schema.message_type, results);
    debug!(
        message_type = %schema.message_type,
        fields = values.len(),
        errors = result.error_count(),
        "message validated"
    );
    Ok(result)
}

/// Outcome of constructing a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Assembly {
    Constructed(ConstructedMessage),
    Rejected(MessageValidationResult),
}

impl Assembly {
    pub fn constructed(&self) -> Option<&ConstructedMessage> {
        match self {
            Assembly::Constructed(message) => Some(message),
            Assembly::Rejected(_) => None,
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed().is_some()
    }
}

/// Validate the field map and, when it is valid, serialise it.
pub fn assemble(
    schema: &MessageSchema,
    cache: &FormatCache,
    values: &BTreeMap<String, String>,
) -> Result<Assembly> {
    let validation = validate_message(schema, cache, values)?;
    if !validation.is_valid {
        return Ok(Assembly::Rejected(validation));
    }

    let values = normalize_values(values);
    let serialized_text = serialize(schema, &values);
    let field_count = schema
        .fields
        .iter()
        .filter(|f| values.contains_key(&f.tag))
        .count();

    Ok(Assembly::Constructed(ConstructedMessage {
        message_type_code: schema.message_type.clone(),
        serialized_text,
        field_count,
        total_fields: schema.len(),
    }))
}

/// Write present fields as a SWIFT text block in schema sequence order.
///
/// `values` is expected to come from [`normalize_values`], so blank fields are already gone.
///
/// ```text
/// {4:
/// :27:1/1
/// :20:LC2024001
/// -}
/// ```
///
/// Every line ends with CRLF; multi-line values keep their internal breaks as CRLF.
pub fn serialize(schema: &MessageSchema, values: &BTreeMap<String, String>) -> String {
    let mut lines = vec![BLOCK_START.to_string()];
    for definition in &schema.fields {
        let Some(value) = values.get(&definition.tag) else {
            continue;
        };
        let value = normalize_line_breaks(value).replace('\n', LINE_BREAK);
        lines.push(format!(":{}:{value}", definition.tag));
    }
    lines.push(BLOCK_END.to_string());
    lines.join(LINE_BREAK)
}
