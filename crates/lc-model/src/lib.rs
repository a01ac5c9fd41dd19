pub mod discrepancy;
pub mod document;
pub mod error;
pub mod field;
pub mod format;
pub mod validation;

pub use discrepancy::{
    CandidateMismatch, ClassificationGap, ClassificationRule, Discrepancy, DiscrepancyReport,
    MismatchKind, Severity,
};
pub use document::{Document, DocumentRef, DocumentSet, DocumentType, FieldCategory, LogicalField};
pub use error::{ModelError, Result};
pub use field::{
    CrossFieldRelation, CrossFieldRule, FieldDefinition, FieldPattern, FieldRule, MessageSchema,
    RuleKind, normalize_message_type,
};
pub use format::{CharClass, CompiledFormat, ComponentKind, FormatComponent, FormatError, Separator};
pub use validation::{
    ConstructedMessage, MessageValidationResult, ValidationErrorKind, ValidationResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_result_collects_missing_mandatory() {
        let result = MessageValidationResult::new(
            "700",
            vec![
                ValidationResult::ok("27"),
                ValidationResult::fail(
                    "20",
                    ValidationErrorKind::MissingMandatoryField,
                    "field 20 is mandatory",
                ),
            ],
        );
        assert!(!result.is_valid);
        assert_eq!(result.error_count(), 1);
        assert!(result.missing_mandatory.contains("20"));
    }

    #[test]
    fn severity_orders_critical_highest() {
        let mut severities = vec![Severity::Low, Severity::Critical, Severity::Medium];
        severities.sort();
        assert_eq!(severities.last(), Some(&Severity::Critical));
    }
}
