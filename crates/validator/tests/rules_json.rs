//! Decoding declarative rule maps and normalizing every accepted shape.

use fieldcheck_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn canonical(rule: &Value) -> CanonicalRule {
    normalize(&FieldRule::from_json("field", rule).expect("rule decodes"))
}

#[rstest]
#[case::name(json!("required"))]
#[case::list(json!(["required"]))]
#[case::spec_map(json!({"required": true}))]
#[case::descriptor_name(json!({"validators": "required"}))]
#[case::descriptor_list(json!({"validators": ["required"]}))]
#[case::descriptor_map(json!({"validators": {"required": true}}))]
fn every_shape_normalizes_alike(#[case] rule: Value) {
    let expected = CanonicalRule {
        validators: [("required".to_owned(), RuleSpec::from(true))]
            .into_iter()
            .collect(),
        modules: Default::default(),
    };
    assert_eq!(canonical(&rule), expected);
}

#[test]
fn spec_shapes() {
    let rule = canonical(&json!({
        "minLength": 3,
        "lengthInRange": [2, 8],
        "email": "Use a real address",
        "digits": false,
        "equalsToField": {"values": [{"dependsField": "password"}], "message": "Mismatch"},
        "notEmptyObject": {},
    }));

    assert_eq!(rule.validators["minLength"], RuleSpec::from_values([3]));
    assert_eq!(rule.validators["lengthInRange"], RuleSpec::from_values([2, 8]));
    assert_eq!(
        rule.validators["email"],
        RuleSpec::new().with_message("Use a real address")
    );
    assert_eq!(rule.validators["digits"], RuleSpec::from(false));
    assert_eq!(
        rule.validators["equalsToField"],
        RuleSpec::new()
            .with_value(Param::depends_on("password"))
            .with_message("Mismatch")
    );
    assert_eq!(rule.validators["notEmptyObject"], RuleSpec::new());
}

#[test]
fn descriptor_order_is_preserved() {
    let rule = canonical(&json!({
        "title": "Amount",
        "validators": ["required", "float"],
        "float": true,
        "defaultValue": "0",
    }));
    let validators: Vec<_> = rule.validators.keys().map(String::as_str).collect();
    let modules: Vec<_> = rule.modules.keys().map(String::as_str).collect();
    assert_eq!(validators, ["required", "float"]);
    assert_eq!(modules, ["title", "float", "defaultValue"]);
    assert_eq!(rule.module("defaultValue"), Some(&ModuleConfig::from("0")));
}

#[test]
fn normalizing_does_not_touch_the_declaration() {
    let declared = FieldRule::from_json("f", &json!({"validators": ["required"], "trimValue": true}))
        .unwrap();
    let snapshot = declared.clone();
    let engine = Engine::new();
    let rules = Rules::fields([("f", declared)]);

    let mut record = json!({"f": "  padded  "});
    assert!(engine.is_valid(&mut record, &rules).unwrap());
    assert_eq!(record["f"], "padded");
    assert_eq!(rules, Rules::fields([("f", snapshot)]));
}

#[test]
fn invalid_shapes_are_configuration_errors() {
    for bad in [json!(true), json!(3), json!(["required", {"x": 1}])] {
        let err = FieldRule::from_json("age", &bad).unwrap_err();
        assert_eq!(err.category(), "rule");
        assert!(err.to_string().starts_with("invalid rule for `age`"));
    }
    assert!(
        Rules::from_json(&json!({"a": {"required": {"expectedResult": "yes"}}})).is_err()
    );
}
