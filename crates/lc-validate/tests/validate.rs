use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use lc_format::FormatCache;
use lc_model::ValidationErrorKind;
use lc_standards::{SchemaRegistry, standards_root};
use lc_validate::{Assembly, MessageRequest, MessageValidator, ValidateError};
use proptest::prelude::*;

fn validator() -> MessageValidator {
    let cache = Arc::new(FormatCache::new());
    let (registry, _) =
        SchemaRegistry::verify_and_load(&standards_root(), &cache).expect("load standards");
    MessageValidator::new(Arc::new(registry), cache)
}

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(tag, value)| (tag.to_string(), value.to_string()))
        .collect()
}

fn issue_of_credit() -> BTreeMap<String, String> {
    fields(&[
        ("27", "1/1"),
        ("40A", "IRREVOCABLE"),
        ("20", "LC2024001"),
        ("31C", "240315"),
        ("40E", "UCP LATEST VERSION"),
        ("31D", "240930LONDON"),
        ("50", "XYZ IMPORTS LTD.\n12 HARBOUR ROAD\nNEW YORK"),
        ("59", "/GB29NWBK60161331926819\nXYZ EXPORT CORPORATION\nLONDON"),
        ("32B", "USD500000,00"),
        ("39A", "10/10"),
        ("41D", "ANY BANK\nBY NEGOTIATION"),
        ("44C", "240831"),
        ("45A", "5000 UNITS OF COTTON SHIRTS"),
        ("49", "CONFIRM"),
    ])
}

fn error_kind(result: &lc_model::MessageValidationResult, tag: &str) -> Option<ValidationErrorKind> {
    result.result_for(tag).and_then(|r| r.error_kind)
}

#[test]
fn complete_issue_of_credit_is_valid() {
    let validator = validator();
    let result = validator.validate_message("700", &issue_of_credit()).unwrap();
    assert!(result.is_valid, "{:?}", result.errors().collect::<Vec<_>>());
    assert!(result.missing_mandatory.is_empty());
}

#[test]
fn constructed_text_is_a_crlf_block_in_sequence_order() {
    let validator = validator();
    let assembly = validator.construct_message("MT700", &issue_of_credit()).unwrap();
    let message = assembly.constructed().expect("constructed");

    assert_eq!(message.message_type_code, "700");
    assert_eq!(message.field_count, 14);
    assert_eq!(message.total_fields, 30);
    assert!(message.serialized_text.starts_with("{4:\r\n:27:1/1\r\n:40A:IRREVOCABLE\r\n:20:LC2024001\r\n"));
    assert!(message.serialized_text.contains(":50:XYZ IMPORTS LTD.\r\n12 HARBOUR ROAD\r\nNEW YORK\r\n"));
    assert!(message.serialized_text.ends_with(":49:CONFIRM\r\n-}"));
}

#[test]
fn missing_credit_number_blocks_construction() {
    let validator = validator();
    let mut values = issue_of_credit();
    values.remove("20");

    let result = validator.validate_message("700", &values).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.missing_mandatory, BTreeSet::from(["20".to_string()]));

    match validator.construct_message("700", &values).unwrap() {
        Assembly::Rejected(rejected) => assert_eq!(rejected, result),
        Assembly::Constructed(message) => panic!("unexpected text: {}", message.serialized_text),
    }
}

#[test]
fn every_failure_is_reported() {
    let validator = validator();
    let mut values = issue_of_credit();
    values.insert("31C".into(), "24031".into());
    values.insert("40A".into(), "REVOCABLE".into());
    values.insert("99".into(), "SOMETHING".into());
    values.remove("49");

    let result = validator.validate_message("700", &values).unwrap();
    assert_eq!(result.error_count(), 4);
    assert_eq!(error_kind(&result, "31C"), Some(ValidationErrorKind::FormatMismatch));
    assert_eq!(error_kind(&result, "40A"), Some(ValidationErrorKind::InvalidEnumValue));
    assert_eq!(error_kind(&result, "99"), Some(ValidationErrorKind::UnknownField));
    assert_eq!(
        error_kind(&result, "49"),
        Some(ValidationErrorKind::MissingMandatoryField)
    );

    let issue_date = result.result_for("31C").unwrap();
    assert_eq!(issue_date.expected.as_deref(), Some("6!n"));
    assert_eq!(issue_date.actual.as_deref(), Some("24031"));
}

#[test]
fn impossible_calendar_date_is_a_rule_violation() {
    let validator = validator();
    let mut values = issue_of_credit();
    values.insert("31C".into(), "240230".into());
    let result = validator.validate_message("700", &values).unwrap();
    assert_eq!(error_kind(&result, "31C"), Some(ValidationErrorKind::RuleViolation));
}

#[test]
fn settlement_line_must_name_a_method() {
    let validator = validator();
    let mut values = issue_of_credit();
    values.insert("41D".into(), "ANY BANK\nBY CHEQUE".into());
    let result = validator.validate_message("700", &values).unwrap();
    assert_eq!(error_kind(&result, "41D"), Some(ValidationErrorKind::RuleViolation));
}

#[test]
fn cross_field_rules_are_checked() {
    let validator = validator();

    let mut values = issue_of_credit();
    values.insert("44D".into(), "SHIPMENT DURING AUGUST 2024".into());
    let result = validator.validate_message("700", &values).unwrap();
    assert_eq!(error_kind(&result, "44C"), Some(ValidationErrorKind::RuleViolation));
    assert_eq!(error_kind(&result, "44D"), Some(ValidationErrorKind::RuleViolation));

    let mut values = issue_of_credit();
    values.insert("31D".into(), "240101LONDON".into());
    let result = validator.validate_message("700", &values).unwrap();
    let expiry = result.result_for("31D").unwrap();
    assert_eq!(expiry.error_kind, Some(ValidationErrorKind::RuleViolation));
    assert_eq!(expiry.actual.as_deref(), Some("2024-01-01"));
}

#[test]
fn amendment_amount_change_requires_new_amount() {
    let validator = validator();
    let mut values = fields(&[
        ("27", "1/1"),
        ("20", "AMD2024001"),
        ("21", "LC2024001"),
        ("31C", "240315"),
        ("30", "240401"),
        ("26E", "1"),
        ("59", "XYZ EXPORT CORPORATION\nLONDON"),
        ("32B", "USD50000,"),
    ]);
    let result = validator.validate_message("707", &values).unwrap();
    assert_eq!(error_kind(&result, "32B"), Some(ValidationErrorKind::RuleViolation));

    values.insert("34B".into(), "USD550000,".into());
    assert!(validator.validate_message("707", &values).unwrap().is_valid);
}

#[test]
fn crlf_input_and_lower_case_tags_are_normalized() {
    let validator = validator();
    let values = fields(&[("20", "REF1"), ("79", "LINE ONE\r\nLINE TWO")]);
    let result = validator.validate_message("799", &values).unwrap();
    assert!(result.is_valid);

    let values = fields(&[("20", "REF1"), ("79 ", "HELLO"), ("21", "/BAD")]);
    let result = validator.validate_message("MT799", &values).unwrap();
    assert_eq!(error_kind(&result, "21"), Some(ValidationErrorKind::RuleViolation));
    assert!(result.result_for("79").unwrap().valid);
}

#[test]
fn parse_reads_constructed_text_back() {
    let validator = validator();
    let values = issue_of_credit();
    let assembly = validator.construct_message("700", &values).unwrap();
    let text = &assembly.constructed().unwrap().serialized_text;

    let parsed = validator.parse_message("700", text).unwrap();
    assert_eq!(parsed.fields, values);
    assert!(parsed.validation.is_valid);
}

#[test]
fn blank_optional_field_is_treated_as_absent() {
    let validator = validator();
    let values = fields(&[("20", "REF1"), ("21", ""), ("79", "HELLO")]);
    let assembly = validator.construct_message("799", &values).unwrap();
    let message = assembly.constructed().unwrap();
    assert_eq!(message.field_count, 2);

    let parsed = validator.parse_message("799", &message.serialized_text).unwrap();
    assert_eq!(parsed.fields, fields(&[("20", "REF1"), ("79", "HELLO")]));
    assert_eq!(parsed.fields, lc_validate::normalize_values(&values));
}

#[test]
fn blank_mandatory_field_is_missing() {
    let validator = validator();
    let values = fields(&[("20", "  "), ("79", "HELLO")]);
    let result = validator.validate_message("799", &values).unwrap();
    assert_eq!(error_kind(&result, "20"), Some(ValidationErrorKind::MissingMandatoryField));
}

#[test]
fn single_field_validation() {
    let validator = validator();
    assert!(validator.validate_field("700", "31C", Some("240315")).unwrap().valid);
    let result = validator.validate_field("700", "31C", None).unwrap();
    assert_eq!(result.error_kind, Some(ValidationErrorKind::MissingMandatoryField));
    let result = validator.validate_field("700", "ZZ", Some("X")).unwrap();
    assert_eq!(result.error_kind, Some(ValidationErrorKind::UnknownField));
}

#[test]
fn unknown_message_type_is_an_error() {
    let validator = validator();
    let err = validator.validate_message("MT999", &BTreeMap::new()).unwrap_err();
    assert!(matches!(err, ValidateError::UnknownMessageType { ref message_type } if message_type == "999"));
    assert!(validator.get_schema("701").is_err());
}

#[test]
fn batch_results_keep_input_order() {
    let validator = validator();
    let requests = vec![
        MessageRequest {
            message_type: "700".into(),
            fields: issue_of_credit(),
        },
        MessageRequest {
            message_type: "999".into(),
            fields: BTreeMap::new(),
        },
        MessageRequest {
            message_type: "799".into(),
            fields: fields(&[("20", "REF1")]),
        },
    ];
    let results = validator.validate_batch(&requests);
    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().is_valid);
    assert!(results[1].is_err());
    let free_format = results[2].as_ref().unwrap();
    assert!(free_format.missing_mandatory.contains("79"));
}

const MT700_MANDATORY: &[&str] = &["27", "40A", "20", "31C", "40E", "31D", "50", "59", "32B", "41D", "49"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn absent_mandatory_field_is_always_reported(tag in prop::sample::select(MT700_MANDATORY)) {
        let validator = validator();
        let mut values = issue_of_credit();
        values.remove(tag);
        let result = validator.validate_message("700", &values).unwrap();
        prop_assert!(!result.is_valid);
        prop_assert_eq!(&result.missing_mandatory, &BTreeSet::from([tag.to_string()]));
        prop_assert_eq!(error_kind(&result, tag), Some(ValidationErrorKind::MissingMandatoryField));
    }

    #[test]
    fn free_format_assembly_is_idempotent_and_round_trips(
        reference in "[A-Z0-9]{1,16}",
        lines in prop::collection::vec("[A-Z][A-Z0-9 .,]{0,49}", 1..12),
    ) {
        let validator = validator();
        let values = fields(&[("20", reference.as_str()), ("79", lines.join("\n").as_str())]);

        let first = validator.construct_message("799", &values).unwrap();
        let second = validator.construct_message("799", &values).unwrap();
        prop_assert_eq!(&first, &second);

        let text = &first.constructed().unwrap().serialized_text;
        let parsed = validator.parse_message("799", text).unwrap();
        prop_assert_eq!(parsed.fields, values);
    }
}
