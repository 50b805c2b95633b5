//! Built-in modules observed through validation runs.

use fieldcheck_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn run(rule: Value, value: Value) -> (Outcome, Value) {
    let engine = Engine::new();
    let rules = Rules::from_json(&json!({ "f": rule })).expect("rules decode");
    let mut record = json!({ "f": value });
    let outcome = engine.validate(&mut record, &rules, true).expect("validation runs");
    (outcome, record["f"].clone())
}

#[rstest]
#[case::trims(json!({"validators": [], "trimValue": true}), json!("  a b  "), json!("a b"))]
#[case::trim_disabled(json!({"validators": [], "trimValue": false}), json!(" a "), json!(" a "))]
#[case::trim_ignores_numbers(json!({"validators": [], "trimValue": true}), json!(5), json!(5))]
#[case::default_fills_null(json!({"validators": [], "defaultValue": 10}), json!(null), json!(10))]
#[case::default_fills_empty(json!({"validators": [], "defaultValue": "n/a"}), json!(""), json!("n/a"))]
#[case::default_keeps_value(json!({"validators": [], "defaultValue": 10}), json!(3), json!(3))]
#[case::int_coerces(json!({"validators": [], "int": true}), json!("-17"), json!(-17))]
#[case::int_skips_fraction(json!({"validators": [], "int": true}), json!("1.5"), json!("1.5"))]
#[case::int_needs_true(json!({"validators": [], "int": 1}), json!("3"), json!("3"))]
#[case::float_coerces(json!({"validators": [], "float": true}), json!("1,25"), json!(1.25))]
#[case::float_keeps_integral(json!({"validators": [], "float": true}), json!("3"), json!(3))]
#[case::float_skips_text(json!({"validators": [], "float": true}), json!("abc"), json!("abc"))]
#[case::rounded_true(json!({"validators": [], "roundedFloat": true}), json!("2.345"), json!(2.345))]
#[case::rounded_places(json!({"validators": [], "roundedFloat": 2}), json!("2.346"), json!(2.35))]
#[case::rounded_zero(json!({"validators": [], "roundedFloat": 0}), json!("2,6"), json!(3))]
#[case::rounded_float_disabled(json!({"validators": [], "roundedFloat": 2, "float": false}), json!("2.346"), json!("2.346"))]
#[case::rounded_true_ignores_float_flag(json!({"validators": [], "roundedFloat": true, "float": false}), json!("2.5"), json!(2.5))]
#[case::int_ignores_non_ascii_digits(json!({"validators": [], "int": true}), json!("١٢٣"), json!("١٢٣"))]
fn coercion(#[case] rule: Value, #[case] input: Value, #[case] expected: Value) {
    let (outcome, value) = run(rule, input);
    assert_eq!(value, expected);
    assert!(outcome.field("f").is_some_and(|r| r.aux.is_empty()));
}

#[test]
fn coercion_runs_before_validators() {
    let (outcome, value) = run(
        json!({"validators": {"maxValue": 10}, "float": true}),
        json!("12,5"),
    );
    assert_eq!(value, json!(12.5));
    assert_eq!(
        outcome.field("f").and_then(FieldReport::first_message),
        Some("Please enter a value less than or equal to 10.")
    );
}

#[test]
fn int_format_and_coercion_agree() {
    let (outcome, value) = run(json!({"validators": "int", "int": true}), json!("١٢٣"));
    assert_eq!(value, json!("١٢٣"));
    assert!(!outcome.is_valid());

    let (outcome, value) = run(json!({"validators": "int", "int": true}), json!("123"));
    assert_eq!(value, json!(123));
    assert!(outcome.is_valid());
}

#[test]
fn default_value_satisfies_required() {
    let (outcome, value) = run(
        json!({"validators": "required", "defaultValue": "guest"}),
        json!(null),
    );
    assert_eq!(value, json!("guest"));
    assert!(outcome.is_valid());
}

#[test]
fn title_is_attached() {
    let (outcome, _) = run(json!({"validators": [], "title": "Full name"}), json!("x"));
    assert_eq!(
        outcome.field("f").map(|r| r.aux.clone()),
        Some([("title".to_owned(), json!("Full name"))].into_iter().collect())
    );
}

#[test]
fn custom_function_derives_the_value() {
    let engine = Engine::new();
    let rules = Rules::fields([(
        "full",
        FieldRule::from(FieldDescriptor::new(["required"]).with_module(
            "customFunction",
            ModuleConfig::function(|record| {
                let first = record.get("first").and_then(Value::as_str).unwrap_or_default();
                let last = record.get("last").and_then(Value::as_str).unwrap_or_default();
                json!(format!("{first} {last}").trim().to_owned())
            }),
        )),
    )]);

    let mut record = json!({"first": "Ada", "last": "Lovelace"});
    assert!(engine.is_valid(&mut record, &rules).unwrap());
    assert_eq!(record["full"], "Ada Lovelace");
}

#[test]
fn object_validator_accepts_built_rules() {
    let engine = Engine::new();
    let nested = Rules::fields([("zip", FieldRule::from(["required", "digits"]))]);
    let rules = Rules::fields([(
        "address",
        FieldRule::from(FieldDescriptor::new("object").with_module("objectValidator", nested)),
    )]);

    let mut record = json!({"address": {"zip": "12a"}});
    let outcome = engine.validate(&mut record, &rules, false).unwrap();
    let Some(FieldError::Nested(inner)) = outcome
        .field("address")
        .and_then(|r| r.errors.get("objectValidator"))
    else {
        panic!("expected a nested outcome: {outcome:?}");
    };
    assert_eq!(inner.failed_fields().collect::<Vec<_>>(), ["zip"]);
}

#[test]
fn object_validator_with_whole_record_rules() {
    let engine = Engine::new();
    let rules = Rules::from_json(&json!({
        "tags": {"validators": [], "objectValidator": {"validators": "notEmptyObject"}},
    }))
    .unwrap();
    let mut record = json!({"tags": []});
    let outcome = engine.validate(&mut record, &rules, false).unwrap();
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({
            "tags": {
                "errors": {
                    "objectValidator": {
                        "notEmptyObject": "Please enter a valid and not empty javascript object."
                    }
                }
            }
        })
    );
}
