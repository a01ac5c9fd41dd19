use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentRef, FieldCategory, LogicalField};
use crate::error::ModelError;

/// Severity tier of a discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" | "major" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" | "minor" => Ok(Severity::Low),
            _ => Err(ModelError::UnknownSeverity(s.to_string())),
        }
    }
}

/// How two values disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Values that must be equal are not.
    Differs,
    /// A presented amount is above what the credit permits.
    ExceedsCredit,
    /// A date falls after the date it is bounded by.
    LaterThan,
    /// One of the values could not be interpreted.
    Unreadable,
}

impl MismatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchKind::Differs => "differs",
            MismatchKind::ExceedsCredit => "exceeds_credit",
            MismatchKind::LaterThan => "later_than",
            MismatchKind::Unreadable => "unreadable",
        }
    }
}

/// A raw disagreement between two documents, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMismatch {
    /// Field as stated on `document_a`.
    pub field: LogicalField,
    /// Field as stated on `document_b`; equals `field` for like-for-like checks.
    pub counterpart: LogicalField,
    pub kind: MismatchKind,
    pub document_a: DocumentRef,
    pub value_a: String,
    pub document_b: DocumentRef,
    pub value_b: String,
    /// Set when the disagreement is only an abbreviation configured as equivalent.
    #[serde(default)]
    pub equivalent_variant: bool,
}

impl CandidateMismatch {
    pub fn category(&self) -> FieldCategory {
        self.field.category()
    }

    /// The same mismatch seen from the other document.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            field: self.counterpart,
            counterpart: self.field,
            kind: self.kind,
            document_a: self.document_b.clone(),
            value_a: self.value_b.clone(),
            document_b: self.document_a.clone(),
            value_b: self.value_a.clone(),
            equivalent_variant: self.equivalent_variant,
        }
    }
}

/// One row of the UCP 600 rule table: how mismatches of a category are judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub category: FieldCategory,
    /// UCP 600 article, e.g. `UCP600-18`.
    pub rule_reference: String,
    pub severity: Severity,
    #[serde(default)]
    pub article_text: String,
    #[serde(default)]
    pub recommendation: String,
}

/// A classified, explainable discrepancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub id: String,
    pub document_set_id: String,
    /// UCP 600 article, e.g. `UCP600-18`.
    pub rule_reference: String,
    pub field_name: String,
    pub severity: Severity,
    pub expected_value: String,
    pub actual_value: String,
    pub description: String,
    pub recommendation: String,
    pub documents: Vec<DocumentRef>,
}

/// A mismatch whose category has no rule-table entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("no UCP 600 rule for {category} mismatch on {field} ({document_a} vs {document_b})")]
pub struct ClassificationGap {
    pub field: LogicalField,
    pub category: FieldCategory,
    pub document_a: DocumentRef,
    pub document_b: DocumentRef,
    pub value_a: String,
    pub value_b: String,
}

impl ClassificationGap {
    pub fn from_mismatch(mismatch: &CandidateMismatch) -> Self {
        Self {
            field: mismatch.field,
            category: mismatch.category(),
            document_a: mismatch.document_a.clone(),
            document_b: mismatch.document_b.clone(),
            value_a: mismatch.value_a.clone(),
            value_b: mismatch.value_b.clone(),
        }
    }
}

/// Discrepancies found in one document set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyReport {
    pub document_set_id: String,
    pub discrepancies: Vec<Discrepancy>,
    pub classification_gaps: Vec<ClassificationGap>,
}

impl DiscrepancyReport {
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.discrepancies
            .iter()
            .filter(|d| d.severity >= severity)
            .count()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.discrepancies.iter().map(|d| d.severity).max()
    }

    /// True when nothing was found and nothing was left unclassified.
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty() && self.classification_gaps.is_empty()
    }
}
