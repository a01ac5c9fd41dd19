use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Definition of one field (tag) of a SWIFT message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// SWIFT tag, e.g. `20` or `32B`.
    pub tag: String,
    pub name: String,
    /// Raw format specification, e.g. `3!a15d`.
    pub format_spec: String,
    pub is_mandatory: bool,
    /// Position of the field within the message; unique per schema.
    pub sequence: u32,
    /// Closed list of accepted values (checked against the canonical segment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<BTreeSet<String>>,
    #[serde(default = "default_max_occurrences")]
    pub max_occurrences: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<FieldRule>,
}

fn default_max_occurrences() -> u32 {
    1
}

impl FieldDefinition {
    pub fn new(tag: impl Into<String>, name: impl Into<String>, format_spec: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            format_spec: format_spec.into(),
            is_mandatory: false,
            sequence: 0,
            allowed_values: None,
            max_occurrences: 1,
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn mandatory(mut self, is_mandatory: bool) -> Self {
        self.is_mandatory = is_mandatory;
        self
    }

    #[must_use]
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    #[must_use]
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Cross-field rules attached to this field.
    pub fn cross_field_rules(&self) -> impl Iterator<Item = &CrossFieldRule> {
        self.rules.iter().filter_map(|rule| match rule {
            FieldRule::CrossField(cross) => Some(cross),
            _ => None,
        })
    }
}

/// Business rule attached to a field.
///
/// The set of kinds is closed; loaders reject anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldRule {
    /// Whole-value length bounds in characters (inclusive, line breaks excluded).
    Length { min: usize, max: usize },
    /// The value must match a regular expression.
    Pattern { pattern: FieldPattern },
    /// The text matched by component `component` must be a `YYMMDD` date.
    Date { component: usize },
    CrossField(CrossFieldRule),
}

impl FieldRule {
    pub fn kind(&self) -> RuleKind {
        match self {
            FieldRule::Length { .. } => RuleKind::Length,
            FieldRule::Pattern { .. } => RuleKind::Pattern,
            FieldRule::Date { .. } => RuleKind::Date,
            FieldRule::CrossField(_) => RuleKind::CrossField,
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRule::Length { min, max } => write!(f, "length {min}..={max}"),
            FieldRule::Pattern { pattern } => write!(f, "pattern {}", pattern.as_str()),
            FieldRule::Date { component } => write!(f, "date in component {}", component + 1),
            FieldRule::CrossField(cross) => write!(f, "{cross}"),
        }
    }
}

/// Names of the supported rule kinds as they appear in rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Length,
    Pattern,
    Date,
    CrossField,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Length => "length",
            RuleKind::Pattern => "pattern",
            RuleKind::Date => "date",
            RuleKind::CrossField => "cross_field",
        }
    }
}

impl FromStr for RuleKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "length" => Ok(RuleKind::Length),
            "pattern" => Ok(RuleKind::Pattern),
            "date" => Ok(RuleKind::Date),
            "cross_field" => Ok(RuleKind::CrossField),
            other => Err(ModelError::UnknownRuleKind(other.to_string())),
        }
    }
}

/// Relation between two fields of the same message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossFieldRule {
    pub relation: CrossFieldRelation,
    pub other_tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossFieldRelation {
    /// When this field is present the other must be present too.
    Requires,
    /// This field and the other may not both be present.
    ExcludedBy,
    /// The leading `YYMMDD` of this field may not precede the other's.
    DateNotBefore,
}

impl CrossFieldRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossFieldRelation::Requires => "requires",
            CrossFieldRelation::ExcludedBy => "excluded_by",
            CrossFieldRelation::DateNotBefore => "date_not_before",
        }
    }
}

impl FromStr for CrossFieldRelation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "requires" => Ok(CrossFieldRelation::Requires),
            "excluded_by" => Ok(CrossFieldRelation::ExcludedBy),
            "date_not_before" => Ok(CrossFieldRelation::DateNotBefore),
            other => Err(ModelError::UnknownRuleKind(format!("cross_field:{other}"))),
        }
    }
}

impl fmt::Display for CrossFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.relation.as_str(), self.other_tag)
    }
}

/// A compiled regular expression that serializes as its source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPattern(Regex);

impl FieldPattern {
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        Regex::new(pattern)
            .map(FieldPattern)
            .map_err(|e| ModelError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl TryFrom<String> for FieldPattern {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldPattern::new(&value)
    }
}

impl From<FieldPattern> for String {
    fn from(value: FieldPattern) -> Self {
        value.as_str().to_string()
    }
}

/// Ordered field definitions of one SWIFT message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSchema {
    /// Message type code without the `MT` prefix, e.g. `700`.
    pub message_type: String,
    pub name: String,
    pub version: String,
    /// Field definitions sorted by `sequence`.
    pub fields: Vec<FieldDefinition>,
}

impl MessageSchema {
    pub fn field(&self, tag: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.tag.eq_ignore_ascii_case(tag))
    }

    pub fn mandatory_tags(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.is_mandatory)
            .map(|f| f.tag.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Normalize a message type code: strips an `MT` prefix and surrounding spaces.
pub fn normalize_message_type(code: &str) -> String {
    let trimmed = code.trim();
    let stripped = trimmed
        .strip_prefix("MT")
        .or_else(|| trimmed.strip_prefix("mt"))
        .unwrap_or(trimmed);
    stripped.trim().to_string()
}
