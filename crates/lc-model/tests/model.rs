//! Tests for lc-model types.

use lc_model::{
    CandidateMismatch, CharClass, ComponentKind, CrossFieldRelation, Document, DocumentRef,
    DocumentSet, DocumentType, FieldCategory, FieldDefinition, FieldPattern, FieldRule,
    FormatComponent, LogicalField, MessageSchema, MismatchKind, RuleKind, Separator, Severity,
    normalize_message_type,
};

#[test]
fn document_type_accepts_aliases() {
    assert_eq!("MT700".parse::<DocumentType>().unwrap(), DocumentType::Credit);
    assert_eq!(
        "Commercial Invoice".parse::<DocumentType>().unwrap(),
        DocumentType::CommercialInvoice
    );
    assert!("warehouse receipt".parse::<DocumentType>().is_err());

    let json = r#"{"document_type":"invoice","extracted_fields":{"amount":"1,00"}}"#;
    let document: Document = serde_json::from_str(json).expect("deserialize document");
    assert_eq!(document.document_type, DocumentType::CommercialInvoice);
}

#[test]
fn severity_parses_major_and_minor() {
    assert_eq!("major".parse::<Severity>().unwrap(), Severity::High);
    assert_eq!("Minor".parse::<Severity>().unwrap(), Severity::Low);
    assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
}

#[test]
fn rule_kind_rejects_unknown_names() {
    assert_eq!("cross-field".parse::<RuleKind>().unwrap(), RuleKind::CrossField);
    assert!("checksum".parse::<RuleKind>().is_err());
    assert_eq!(
        "date_not_before".parse::<CrossFieldRelation>().unwrap(),
        CrossFieldRelation::DateNotBefore
    );
}

#[test]
fn field_rule_serializes_with_kind_tag() {
    let rule = FieldRule::Pattern {
        pattern: FieldPattern::new("^[A-Z]+$").unwrap(),
    };
    let json = serde_json::to_value(&rule).unwrap();
    assert_eq!(json["kind"], "pattern");
    assert_eq!(json["pattern"], "^[A-Z]+$");

    let round: FieldRule = serde_json::from_value(json).unwrap();
    assert_eq!(round, rule);
}

#[test]
fn invalid_pattern_is_an_error() {
    assert!(FieldPattern::new("(unclosed").is_err());
}

#[test]
fn schema_lookup_is_case_insensitive() {
    let schema = MessageSchema {
        message_type: "700".to_string(),
        name: "Issue of a Documentary Credit".to_string(),
        version: "2023".to_string(),
        fields: vec![
            FieldDefinition::new("20", "Documentary Credit Number", "16x")
                .mandatory(true)
                .with_sequence(3),
            FieldDefinition::new("32B", "Currency Code, Amount", "3!a15d")
                .mandatory(true)
                .with_sequence(11),
            FieldDefinition::new("39A", "Percentage Credit Amount Tolerance", "2n/2n")
                .with_sequence(12),
        ],
    };
    assert!(schema.field("32b").is_some());
    assert_eq!(schema.mandatory_tags().collect::<Vec<_>>(), vec!["20", "32B"]);
    assert_eq!(normalize_message_type(" MT700 "), "700");
}

#[test]
fn component_patterns_render_swift_notation() {
    let fixed = FormatComponent {
        kind: ComponentKind::Fixed,
        char_class: CharClass::Numeric,
        min_len: 6,
        max_len: 6,
        line_count: None,
        separator: Separator::None,
        group: None,
    };
    assert_eq!(fixed.pattern(), "6!n");

    let lines = FormatComponent {
        kind: ComponentKind::Repeated,
        char_class: CharClass::FreeText,
        min_len: 1,
        max_len: 35,
        line_count: Some(4),
        separator: Separator::Newline,
        group: None,
    };
    assert_eq!(lines.pattern(), "4*35x");
    assert_eq!(lines.to_string(), "\\n4*35x");
}

#[test]
fn swapped_mismatch_mirrors_both_sides() {
    let credit = Document::new(DocumentType::Credit);
    let invoice = Document::new(DocumentType::CommercialInvoice).with_reference("INV-1");
    let mismatch = CandidateMismatch {
        field: LogicalField::Amount,
        counterpart: LogicalField::Amount,
        kind: MismatchKind::ExceedsCredit,
        document_a: DocumentRef::of(0, &credit),
        value_a: "USD500000,00".to_string(),
        document_b: DocumentRef::of(1, &invoice),
        value_b: "USD 520,000.00".to_string(),
        equivalent_variant: false,
    };
    let swapped = mismatch.swapped();
    assert_eq!(swapped.value_a, mismatch.value_b);
    assert_eq!(swapped.document_b.index, 0);
    assert_eq!(swapped.category(), FieldCategory::Amount);
    assert_eq!(swapped.swapped(), mismatch);
}

#[test]
fn document_set_finds_credit() {
    let set = DocumentSet::new("SET-1", "LC123")
        .with_document(Document::new(DocumentType::CommercialInvoice))
        .with_document(Document::new(DocumentType::Credit));
    assert_eq!(set.credit_index(), Some(1));
    assert!(!LogicalField::ExpiryDate.must_agree());
    assert_eq!(LogicalField::PortOfLoading.category(), FieldCategory::Place);
}
