//! Format specification compiler tests.

use lc_format::compile;
use lc_model::{CharClass, ComponentKind, Separator};
use proptest::prelude::*;

#[test]
fn documentary_credit_formats_compile() {
    for spec in [
        "1!n/1!n",
        "24x",
        "16x",
        "6!n",
        "30x[/35x]",
        "6!n29x",
        "4*35x",
        "[/34x]\\n4*35x",
        "3!a15d",
        "2n/2n",
        "4*35x\\n14x",
        "100*65z",
        "7!x",
        "YYYYMMDD",
    ] {
        let format = compile(spec).unwrap_or_else(|e| panic!("{spec}: {e}"));
        assert_eq!(format.spec, spec);
        assert!(!format.components.is_empty());
    }
}

#[test]
fn literal_line_breaks_match_escaped_ones() {
    let escaped = compile("4*35x\\n14x").unwrap();
    let literal = compile("4*35x\n14x").unwrap();
    let crlf = compile("4*35x\r\n14x").unwrap();
    assert_eq!(escaped.components, literal.components);
    assert_eq!(escaped.components, crlf.components);
    assert_eq!(escaped.components[1].separator, Separator::Newline);
}

#[test]
fn composite_date_and_place() {
    let format = compile("6!n29x").unwrap();
    assert!(format.is_composite());
    assert_eq!(format.components[0].kind, ComponentKind::Fixed);
    assert_eq!(format.components[1].kind, ComponentKind::Variable);
    assert_eq!(format.components[1].char_class, CharClass::FreeText);
    assert_eq!(format.max_lines(), 1);
}

#[test]
fn date_tokens_use_date_class() {
    let short = compile("YYMMDD").unwrap();
    assert_eq!(short.components[0].char_class, CharClass::Date);
    assert_eq!(short.components[0].max_len, 6);
    assert_eq!(short.components[0].pattern(), "YYMMDD");
    let long = compile("YYYYMMDD").unwrap();
    assert_eq!(long.components[0].max_len, 8);
}

#[test]
fn malformed_specs_are_rejected() {
    let cases = [
        ("15q", 0, "15q"),
        ("3!a/15q", 4, "15q"),
        ("3!a/", 3, "/"),
        ("[[35x]]", 1, "["),
        ("\\n35x", 0, "\\n"),
    ];
    for (spec, position, token) in cases {
        let err = compile(spec).unwrap_err();
        assert_eq!(err.position, position, "{spec}");
        assert_eq!(err.token, token, "{spec}");
    }
    assert!(compile("[]").is_err());
    assert!(compile("4!*35x").is_err());
    assert!(compile("35!x*4").is_err());
    assert!(compile("99999x").is_err());
}

proptest! {
    #[test]
    fn compile_is_pure(spec in "[0-9!*/a-z\\[\\]]{0,12}") {
        let first = compile(&spec);
        let second = compile(&spec);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn well_formed_components_always_compile(
        len in 1u16..200,
        lines in 1u16..100,
        class in prop::sample::select(vec!['n', 'a', 'c', 'x', 'z']),
    ) {
        let fixed = format!("{len}!{class}");
        prop_assert!(compile(&fixed).is_ok());
        let repeated = format!("{lines}*{len}{class}");
        let format = compile(&repeated).unwrap();
        prop_assert_eq!(format.components[0].line_count, Some(lines));
    }
}
