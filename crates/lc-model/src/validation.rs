use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    MissingMandatoryField,
    FormatMismatch,
    InvalidEnumValue,
    /// A length, pattern, date or cross-field rule failed.
    RuleViolation,
    /// The tag is not defined for the message type.
    UnknownField,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingMandatoryField => "MissingMandatoryField",
            ValidationErrorKind::FormatMismatch => "FormatMismatch",
            ValidationErrorKind::InvalidEnumValue => "InvalidEnumValue",
            ValidationErrorKind::RuleViolation => "RuleViolation",
            ValidationErrorKind::UnknownField => "UnknownField",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub tag: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ValidationErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Expected pattern, value list or rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// The offending value or segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationResult {
    pub fn ok(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            valid: true,
            error_kind: None,
            message: None,
            expected: None,
            actual: None,
        }
    }

    pub fn fail(
        tag: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            valid: false,
            error_kind: Some(kind),
            message: Some(message.into()),
            expected: None,
            actual: None,
        }
    }

    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    #[must_use]
    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

/// Aggregated field results for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageValidationResult {
    pub message_type: String,
    pub is_valid: bool,
    /// Results in schema order, followed by unknown tags.
    pub field_results: Vec<ValidationResult>,
    pub missing_mandatory: BTreeSet<String>,
}

impl MessageValidationResult {
    pub fn new(message_type: impl Into<String>, field_results: Vec<ValidationResult>) -> Self {
        let missing_mandatory = field_results
            .iter()
            .filter(|r| r.error_kind == Some(ValidationErrorKind::MissingMandatoryField))
            .map(|r| r.tag.clone())
            .collect();
        let is_valid = field_results.iter().all(|r| r.valid);
        Self {
            message_type: message_type.into(),
            is_valid,
            field_results,
            missing_mandatory,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationResult> {
        self.field_results.iter().filter(|r| !r.valid)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn result_for(&self, tag: &str) -> Option<&ValidationResult> {
        self.field_results.iter().find(|r| r.tag == tag)
    }
}

/// A serialized message built from a valid field map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructedMessage {
    pub message_type_code: String,
    pub serialized_text: String,
    /// Number of fields present in the message.
    pub field_count: usize,
    /// Number of fields defined by the schema.
    pub total_fields: usize,
}
