//! Textual selector integration tests
//!
//! The text grammar and the builder API must resolve to the same columns.

mod common;

use common::fixtures::{cols, multi_index, pairs, simple_index};
use impress_columns::{
    cols, parse_selector, ColumnIndex, ColumnIndexer, Dtype, Label, ParseError, Rest,
    SelectError, Selector, C,
};
use rstest::rstest;

#[rstest]
#[case(r#"C["y", "z", "x"]"#, cols!["y", "z", "x"])]
#[case(r#"C["y"] | C["z"] | C["x"]"#, cols!["y"] | cols!["z"] | cols!["x"])]
#[case(r#"C["y"] | ..."#, cols!["y"] | Rest)]
#[case(r#"C.startswith("x")"#, C::starts_with("x"))]
#[case(r#"C.endswith("x")"#, C::ends_with("x"))]
#[case("C.dtype == str", C::dtype().eq(Dtype::String))]
#[case("C.dtype == int", C::dtype().eq(Dtype::Integer))]
#[case("C.dtype.isin((str, float))", C::dtype().is_in([Dtype::String, Dtype::Floating]))]
#[case(r#"C.dtype == int & ~C["x"]"#, C::dtype().eq(Dtype::Integer) & !cols!["x"])]
fn test_text_matches_builder_on_flat_index(#[case] text: &str, #[case] built: Selector) {
    let parsed = parse_selector(text).unwrap();
    let idx = simple_index();
    assert_eq!(cols(&idx, &parsed), cols(&idx, &built));
}

#[rstest]
#[case(r#"C.levels[0]["c", "a"]"#, C::level(0).select(["c", "a"]))]
#[case(r#"C.levels["one"]["c", "a"]"#, C::level("one").select(["c", "a"]))]
#[case(r#"C.levels[0].startswith("c")"#, C::level(0).starts_with("c"))]
#[case(r#"C.levels[0].endswith("c")"#, C::level(0).ends_with("c"))]
#[case(r#"C.levels[0].contains("c")"#, C::level(0).contains("c"))]
#[case(r#"C.levels[0].match("c")"#, C::level(0).matches("c").unwrap())]
#[case(r#"C.levels[0]['c'] | ..."#, C::level(0).select(["c"]) | Rest)]
fn test_text_matches_builder_on_multi_index(#[case] text: &str, #[case] built: Selector) {
    let parsed = parse_selector(text).unwrap();
    let idx = multi_index();
    assert_eq!(cols(&idx, &parsed), cols(&idx, &built));
}

#[rstest]
#[case("C.dtype == np.str_")]
#[case("C.dtype == np.object_")]
#[case("C.dtype == np.bytes_")]
#[case("C.dtype == str160")]
fn test_numpy_string_dtype_skips_other_columns(#[case] text: &str) {
    let idx = ColumnIndex::flat([
        ("s", Dtype::String),
        ("cplx", Dtype::from_host_name("complex128")),
        ("fixed", Dtype::from_host_name("<U8")),
    ]);
    let sel = parse_selector(text).unwrap();
    assert_eq!(cols(&idx, &sel), vec![Label::from("s"), Label::from("fixed")]);
}

#[test]
fn test_text_quoted_label() {
    let idx = ColumnIndex::flat([(r#"say "hi""#, Dtype::String), ("it's", Dtype::String)]);
    let sel = parse_selector(r#"C['it\'s', "say \"hi\""]"#).unwrap();
    assert_eq!(
        cols(&idx, &sel),
        vec![Label::from("it's"), Label::from(r#"say "hi""#)]
    );
}

#[test]
fn test_text_level_subset() {
    let sel = parse_selector(r#"C.levels["one"]["c", "a"]"#).unwrap();
    assert_eq!(
        cols(&multi_index(), &sel),
        pairs(&[
            ("c", "X"),
            ("c", "Y"),
            ("c", "Z"),
            ("a", "X"),
            ("a", "Y"),
            ("a", "Z"),
        ])
    );
}

#[test]
fn test_text_unknown_level_fails_at_resolution() {
    let sel = parse_selector(r#"C.levels["nonexistent"]["a"]"#).unwrap();
    let err = multi_index().loc_columns(&sel).unwrap_err();
    assert!(matches!(err, SelectError::LevelNotFound { .. }));
}

#[test]
fn test_text_invalid_operand() {
    let err = parse_selector(r#"C["y"] | 2.5"#).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Select(SelectError::InvalidOperand(_))
    ));
}

#[test]
fn test_selector_serializes_to_json() {
    let sel = parse_selector(r#"C.levels[0].match("^c") | ..."#).unwrap();
    let json = serde_json::to_string(&sel).unwrap();
    assert!(json.contains("^c"));

    let back: Selector = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sel);
    assert_eq!(
        cols(&multi_index(), &back)[0],
        Label::from(("c", "X"))
    );
}

#[test]
fn test_json_with_bad_pattern_is_rejected() {
    let json = r#"{"ByPredicate":{"level":null,"matcher":{"Regex":"("}}}"#;
    assert!(serde_json::from_str::<Selector>(json).is_err());
}
