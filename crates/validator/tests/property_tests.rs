//! Property-based tests for fieldcheck-validator.

use fieldcheck_validator::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};

const NAMES: [&str; 6] = ["required", "digits", "email", "float", "int", "notEmptyObject"];

fn text_record() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("[a-e]", ".{0,12}", 0..5)
        .prop_map(|fields| json!(fields))
}

fn length_rules(min: usize) -> Rules {
    Rules::fields([(
        "name",
        FieldRule::specs([("minLength", RuleSpec::from_values([min as i64]))]),
    )])
}

// ============================================================================
// NEUTRAL RULES: no validators never fail
// ============================================================================

proptest! {
    #[test]
    fn rules_without_validators_pass(mut record in text_record()) {
        let engine = Engine::new();
        let rules = Rules::fields(["a", "b", "c"].map(|f| (f, FieldRule::from(Vec::<String>::new()))));
        let outcome = engine.validate(&mut record, &rules, false).unwrap();
        prop_assert_eq!(outcome, Outcome::Valid);
    }
}

// ============================================================================
// CONSISTENCY: is_valid agrees with validate and with the serialized form
// ============================================================================

proptest! {
    #[test]
    fn is_valid_agrees_with_validate(name in ".{0,10}", min in 0usize..8) {
        let engine = Engine::new();
        let rules = length_rules(min);

        let mut first = json!({"name": name});
        let mut second = first.clone();
        let valid = engine.is_valid(&mut first, &rules).unwrap();
        let outcome = engine.validate(&mut second, &rules, false).unwrap();

        prop_assert_eq!(valid, outcome == Outcome::Valid);
        prop_assert_eq!(valid, is_valid_value(&serde_json::to_value(&outcome).unwrap()));
    }

    #[test]
    fn min_length_counts_characters(name in ".{1,10}", min in 0usize..12) {
        let engine = Engine::new();
        let mut record = json!({"name": name});
        let valid = engine.is_valid(&mut record, &length_rules(min)).unwrap();
        prop_assert_eq!(valid, name.chars().count() >= min);
    }

    #[test]
    fn forcing_never_changes_validity(mut record in text_record()) {
        let engine = Engine::new();
        let rules = Rules::fields(["a", "b"].map(|f| (f, FieldRule::from(["required", "digits"]))));
        let mut forced_record = record.clone();

        let plain = engine.validate(&mut record, &rules, false).unwrap();
        let forced = engine.validate(&mut forced_record, &rules, true).unwrap();
        prop_assert_eq!(plain.is_valid(), forced.is_valid());
    }
}

// ============================================================================
// NORMALIZATION: canonical rules are a fixed point
// ============================================================================

proptest! {
    #[test]
    fn normalize_is_idempotent(picks in proptest::collection::vec(0..NAMES.len(), 0..8)) {
        let names: Vec<String> = picks.iter().map(|&i| NAMES[i].to_owned()).collect();
        let once = normalize(&FieldRule::from(names));
        let twice = normalize(&FieldRule::from(once.clone()));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn templates_without_placeholders_are_kept(template in "[a-z .]{1,20}") {
        prop_assert_eq!(format_message(&template, &["x"]), template);
    }
}
