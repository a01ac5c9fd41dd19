//! UCP 600 classification of candidate mismatches.

use std::collections::BTreeMap;

use lc_model::{
    CandidateMismatch, ClassificationGap, ClassificationRule, Discrepancy, FieldCategory,
    MismatchKind, Severity,
};
use sha2::{Digest, Sha256};

use crate::values::numbers_in;

/// Rule reference and base severity per field category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<FieldCategory, ClassificationRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::ucp600()
    }
}

impl RuleTable {
    /// The built-in table.
    pub fn ucp600() -> Self {
        let row = |category, reference: &str, severity, recommendation: &str| ClassificationRule {
            category,
            rule_reference: reference.to_string(),
            severity,
            article_text: String::new(),
            recommendation: recommendation.to_string(),
        };
        Self::from_rules([
            row(
                FieldCategory::Amount,
                "UCP600-18",
                Severity::Critical,
                "Obtain a corrected invoice within the credit amount or an amendment increasing the credit.",
            ),
            row(
                FieldCategory::Date,
                "UCP600-14c",
                Severity::Critical,
                "Check the dates against the credit; an amendment extending the date may be required.",
            ),
            row(
                FieldCategory::PartyName,
                "UCP600-14d",
                Severity::High,
                "Align the party name with the credit or obtain the applicant's waiver.",
            ),
            row(
                FieldCategory::Quantity,
                "UCP600-30",
                Severity::High,
                "Reconcile the quantities across the documents.",
            ),
            row(
                FieldCategory::GoodsDescription,
                "UCP600-14e",
                Severity::Low,
                "Confirm the goods description does not conflict with the credit.",
            ),
            row(
                FieldCategory::Place,
                "UCP600-14d",
                Severity::Medium,
                "Confirm the ports stated match the credit.",
            ),
            row(
                FieldCategory::Reference,
                "UCP600-14d",
                Severity::Medium,
                "Correct the credit reference on the document.",
            ),
        ])
    }

    /// Build a table from rows; a later row for a category replaces an earlier one.
    pub fn from_rules(rules: impl IntoIterator<Item = ClassificationRule>) -> Self {
        Self {
            rules: rules.into_iter().map(|rule| (rule.category, rule)).collect(),
        }
    }

    pub fn get(&self, category: FieldCategory) -> Option<&ClassificationRule> {
        self.rules.get(&category)
    }

    pub fn rules(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Classify one mismatch, or report that the table has no rule for it.
pub fn classify(
    document_set_id: &str,
    mismatch: &CandidateMismatch,
    table: &RuleTable,
) -> Result<Discrepancy, ClassificationGap> {
    let category = mismatch.category();
    let rule = table
        .get(category)
        .ok_or_else(|| ClassificationGap::from_mismatch(mismatch))?;

    let (expected_value, actual_value) = expected_and_actual(mismatch);
    let mut documents = vec![mismatch.document_a.clone(), mismatch.document_b.clone()];
    documents.sort_by_key(|document| document.index);

    Ok(Discrepancy {
        id: discrepancy_id(document_set_id, &rule.rule_reference, mismatch),
        document_set_id: document_set_id.to_string(),
        rule_reference: rule.rule_reference.clone(),
        field_name: mismatch.field.as_str().to_string(),
        severity: severity(rule.severity, mismatch),
        expected_value,
        actual_value,
        description: describe(mismatch),
        recommendation: recommendation(rule),
        documents,
    })
}

fn severity(base: Severity, mismatch: &CandidateMismatch) -> Severity {
    if mismatch.kind == MismatchKind::Unreadable {
        return base.max(Severity::High);
    }
    match mismatch.category() {
        FieldCategory::PartyName if mismatch.equivalent_variant => Severity::Low,
        FieldCategory::GoodsDescription
            if numbers_in(&mismatch.value_a) != numbers_in(&mismatch.value_b) =>
        {
            base.max(Severity::High)
        }
        _ => base,
    }
}

/// The credit's side is the expected value; otherwise the earlier document's.
fn expected_and_actual(mismatch: &CandidateMismatch) -> (String, String) {
    let a = &mismatch.document_a;
    let b = &mismatch.document_b;
    let a_expected = match (a.document_type.is_credit(), b.document_type.is_credit()) {
        (true, false) => true,
        (false, true) => false,
        _ => a.index <= b.index,
    };
    if a_expected {
        (mismatch.value_a.clone(), mismatch.value_b.clone())
    } else {
        (mismatch.value_b.clone(), mismatch.value_a.clone())
    }
}

fn describe(mismatch: &CandidateMismatch) -> String {
    let CandidateMismatch {
        field,
        counterpart,
        document_a,
        value_a,
        document_b,
        value_b,
        ..
    } = mismatch;

    match mismatch.kind {
        MismatchKind::Differs if mismatch.equivalent_variant => format!(
            "{} differs between {document_a} ('{value_a}') and {document_b} ('{value_b}') only by a configured equivalent",
            capitalize(field.label())
        ),
        MismatchKind::Differs => format!(
            "{} differs between {document_a} ('{value_a}') and {document_b} ('{value_b}')",
            capitalize(field.label())
        ),
        MismatchKind::ExceedsCredit => {
            let (credit, credit_value, presented, presented_value) =
                if document_a.document_type.is_credit() {
                    (document_a, value_a, document_b, value_b)
                } else {
                    (document_b, value_b, document_a, value_a)
                };
            format!(
                "{} on {presented} ('{presented_value}') exceeds the amount permitted by {credit} ('{credit_value}')",
                capitalize(field.label())
            )
        }
        MismatchKind::LaterThan => format!(
            "{} on {document_a} ('{value_a}') is later than the {} on {document_b} ('{value_b}')",
            capitalize(field.label()),
            counterpart.label()
        ),
        MismatchKind::Unreadable => format!(
            "{} could not be compared: {document_a} states '{value_a}', {document_b} states '{value_b}'",
            capitalize(field.label())
        ),
    }
}

fn recommendation(rule: &ClassificationRule) -> String {
    if rule.recommendation.trim().is_empty() {
        format!("Review the documents against {}.", rule.rule_reference)
    } else {
        rule.recommendation.clone()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First 16 hex characters of SHA-256 over set, rule, fields and document indices.
///
/// Fields and indices are ordered so that both orientations of a mismatch
/// share an id.
fn discrepancy_id(document_set_id: &str, rule_reference: &str, mismatch: &CandidateMismatch) -> String {
    let mut sides = [
        (mismatch.document_a.index, mismatch.field.as_str()),
        (mismatch.document_b.index, mismatch.counterpart.as_str()),
    ];
    sides.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(document_set_id.as_bytes());
    hasher.update(b"|");
    hasher.update(rule_reference.as_bytes());
    for (index, field) in sides {
        hasher.update(format!("|{field}|{index}").as_bytes());
    }
    let mut id = hex::encode(hasher.finalize());
    id.truncate(16);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_model::{Document, DocumentRef, DocumentType, LogicalField};

    fn mismatch(field: LogicalField, kind: MismatchKind, a: &str, b: &str) -> CandidateMismatch {
        CandidateMismatch {
            field,
            counterpart: field,
            kind,
            document_a: DocumentRef::of(0, &Document::new(DocumentType::Credit)),
            value_a: a.to_string(),
            document_b: DocumentRef::of(1, &Document::new(DocumentType::CommercialInvoice)),
            value_b: b.to_string(),
            equivalent_variant: false,
        }
    }

    #[test]
    fn goods_with_different_numbers_escalate() {
        let table = RuleTable::ucp600();
        let goods = LogicalField::GoodsDescription;
        let wording = mismatch(goods, MismatchKind::Differs, "5000 STEEL PIPES", "5000 PIPES OF STEEL");
        let numbers = mismatch(goods, MismatchKind::Differs, "5000 STEEL PIPES", "4000 STEEL PIPES");
        assert_eq!(classify("S", &wording, &table).unwrap().severity, Severity::Low);
        assert_eq!(classify("S", &numbers, &table).unwrap().severity, Severity::High);
    }

    #[test]
    fn unreadable_is_at_least_high() {
        let table = RuleTable::ucp600();
        let amount = mismatch(LogicalField::Amount, MismatchKind::Unreadable, "USD500000,00", "TBA");
        assert_eq!(classify("S", &amount, &table).unwrap().severity, Severity::Critical);
        let port = mismatch(LogicalField::PortOfLoading, MismatchKind::Unreadable, "HAMBURG", "?");
        assert_eq!(classify("S", &port, &table).unwrap().severity, Severity::High);
    }

    #[test]
    fn ids_ignore_orientation() {
        let m = mismatch(LogicalField::Amount, MismatchKind::ExceedsCredit, "USD500000,00", "USD 520,000.00");
        let id = discrepancy_id("SET-1", "UCP600-18", &m);
        assert_eq!(id.len(), 16);
        assert_eq!(id, discrepancy_id("SET-1", "UCP600-18", &m.swapped()));
        assert_ne!(id, discrepancy_id("SET-2", "UCP600-18", &m));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("amount"), "Amount");
        assert_eq!(capitalize(""), "");
    }
}
