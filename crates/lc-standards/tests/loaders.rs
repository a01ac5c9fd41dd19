use lc_format::FormatCache;
use lc_model::{CrossFieldRelation, FieldCategory, FieldRule, Severity};
use lc_standards::{SchemaRegistry, standards_root};

fn bundled() -> SchemaRegistry {
    let (registry, _) = SchemaRegistry::verify_and_load(&standards_root(), &FormatCache::new())
        .expect("load bundled standards");
    registry
}

#[test]
fn bundled_message_types() {
    let registry = bundled();
    assert_eq!(
        registry.message_types().collect::<Vec<_>>(),
        ["700", "707", "799"]
    );
}

#[test]
fn mt700_issue_date_is_mandatory_six_digits() {
    let registry = bundled();
    let schema = registry.get_schema("MT700").expect("MT700 schema");
    let issue = schema.field("31C").expect("31C");
    assert_eq!(issue.format_spec, "6!n");
    assert!(issue.is_mandatory);
    assert!(issue.rules.contains(&FieldRule::Date { component: 0 }));
}

#[test]
fn mt700_fields_are_in_sequence_order() {
    let registry = bundled();
    let fields = registry.list_fields("700").unwrap();
    assert!(fields.windows(2).all(|pair| pair[0].sequence < pair[1].sequence));
    assert_eq!(fields[0].tag, "27");
    let confirmation = fields.iter().find(|f| f.tag == "49").unwrap();
    let allowed = confirmation.allowed_values.as_ref().unwrap();
    assert!(allowed.contains("MAY ADD"));
}

#[test]
fn latest_shipment_date_excludes_shipment_period() {
    let registry = bundled();
    let schema = registry.get_schema("700").unwrap();
    let relations: Vec<_> = schema
        .field("44C")
        .unwrap()
        .cross_field_rules()
        .map(|rule| (rule.relation, rule.other_tag.as_str()))
        .collect();
    assert!(relations.contains(&(CrossFieldRelation::ExcludedBy, "44D")));
    assert!(relations.contains(&(CrossFieldRelation::DateNotBefore, "31C")));
}

#[test]
fn ucp_table_covers_every_category() {
    let registry = bundled();
    let rules = registry.ucp_rules();
    assert_eq!(rules.len(), FieldCategory::ALL.len());
    let amount = rules
        .iter()
        .find(|r| r.category == FieldCategory::Amount)
        .unwrap();
    assert_eq!(amount.rule_reference, "UCP600-18");
    assert_eq!(amount.severity, Severity::Critical);
    assert!(!amount.recommendation.is_empty());
}
