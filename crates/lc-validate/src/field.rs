//! Single-field validation.
//!
//! Checks run in order and the first failure is reported:
//!
//! 1. presence (`MissingMandatoryField`)
//! 2. format components (`FormatMismatch`)
//! 3. allowed values on the canonical segment (`InvalidEnumValue`)
//! 4. length, pattern and date rules (`RuleViolation`)
//!
//! Cross-field rules need the whole message and live in [`crate::rules`].

use lc_format::{FormatMatch, match_value, normalize_line_breaks};
use lc_model::{CompiledFormat, FieldDefinition, ValidationErrorKind, ValidationResult};

use crate::rules::check_field_rules;

/// Returns true when a value counts as absent.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Validate one field value against its definition and compiled format.
pub fn validate_field(
    definition: &FieldDefinition,
    format: &CompiledFormat,
    value: Option<&str>,
) -> ValidationResult {
    let tag = definition.tag.as_str();

    let value = match value {
        Some(v) if !is_blank(Some(v)) => normalize_line_breaks(v),
        _ => {
            if definition.is_mandatory {
                return ValidationResult::fail(
                    tag,
                    ValidationErrorKind::MissingMandatoryField,
                    format!("field {tag} ({}) is mandatory", definition.name),
                )
                .with_expected(&definition.format_spec);
            }
            return ValidationResult::ok(tag);
        }
    };

    let matched = match match_value(format, &value) {
        Ok(matched) => matched,
        Err(mismatch) => {
            return ValidationResult::fail(
                tag,
                ValidationErrorKind::FormatMismatch,
                format!("field {tag} does not match {}: {mismatch}", format.spec),
            )
            .with_expected(mismatch.expected)
            .with_actual(value);
        }
    };

    if let Some(allowed) = &definition.allowed_values {
        let canonical = canonical_segment(format, &matched, &value);
        if !allowed.contains(canonical) {
            let expected = allowed.iter().map(String::as_str).collect::<Vec<_>>().join(" | ");
            return ValidationResult::fail(
                tag,
                ValidationErrorKind::InvalidEnumValue,
                format!("field {tag} value '{canonical}' is not an allowed value"),
            )
            .with_expected(expected)
            .with_actual(canonical);
        }
    }

    if let Err(violation) = check_field_rules(definition, &matched, &value) {
        return violation;
    }

    ValidationResult::ok(tag)
}

/// The text matched by the first component for composite formats, else the whole value.
pub fn canonical_segment<'v>(format: &CompiledFormat, matched: &FormatMatch, value: &'v str) -> &'v str {
    if format.is_composite() {
        matched.segment(value, 0).unwrap_or_default()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_format::compile;

    fn form_of_credit() -> FieldDefinition {
        FieldDefinition::new("40A", "Form of Documentary Credit", "24x")
            .mandatory(true)
            .with_allowed_values(["IRREVOCABLE", "IRREVOCABLE TRANSFERABLE"])
    }

    #[test]
    fn optional_blank_is_valid() {
        let def = FieldDefinition::new("23", "Reference to Pre-Advice", "16x");
        let format = compile("16x").unwrap();
        assert!(validate_field(&def, &format, None).valid);
        assert!(validate_field(&def, &format, Some("  ")).valid);
    }

    #[test]
    fn enum_checked_after_format() {
        let def = form_of_credit();
        let format = compile("24x").unwrap();
        assert!(validate_field(&def, &format, Some("IRREVOCABLE")).valid);

        let result = validate_field(&def, &format, Some("REVOCABLE"));
        assert_eq!(result.error_kind, Some(ValidationErrorKind::InvalidEnumValue));
        assert_eq!(result.actual.as_deref(), Some("REVOCABLE"));
    }

    #[test]
    fn composite_enum_uses_first_segment() {
        let def = FieldDefinition::new("48", "Period for Presentation", "3n[/35x]")
            .with_allowed_values(["21"]);
        let format = compile("3n[/35x]").unwrap();
        assert!(validate_field(&def, &format, Some("21/DAYS AFTER SHIPMENT")).valid);
        let result = validate_field(&def, &format, Some("30/DAYS AFTER SHIPMENT"));
        assert_eq!(result.actual.as_deref(), Some("30"));
    }
}
