//! Translation of jQuery Validation plugin options into rule maps.
//!
//! Forms already wired for the jQuery plugin describe their rules as
//! `{rules: {field: {rule: value}}, messages: {field: {rule: text}}}`.
//! [`rules_from_jquery`] turns that into a [`RuleMap`] the engine runs.
//!
//! ```
//! use fieldcheck_validator::jquery::rules_from_jquery;
//! use fieldcheck_validator::rule::{FieldRule, Param, ValidatorSet};
//! use serde_json::json;
//!
//! let rules = rules_from_jquery(&json!({
//!     "rules": {"confirm": {"equalTo": "#password"}},
//! }))
//! .unwrap();
//!
//! let FieldRule::Descriptor(confirm) = &rules["confirm"] else { unreachable!() };
//! let ValidatorSet::Specs(specs) = &confirm.validators else { unreachable!() };
//! assert_eq!(specs["equalsTo"].values, vec![Param::depends_on("password")]);
//! ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::rule::{
    FieldDescriptor, FieldRule, Message, Param, RuleMap, RuleSpec, ValidatorSet, values_from_json,
};
use crate::value::value_type_name;

/// Plugin rule name to validator name.
const RENAMES: [(&str, &str); 5] = [
    ("minlength", "minLength"),
    ("maxlength", "maxLength"),
    ("min", "minValue"),
    ("max", "maxValue"),
    ("equalTo", "equalsTo"),
];

fn validator_name(rule: &str) -> &str {
    for (from, to) in RENAMES {
        if from == rule {
            return to;
        }
    }
    rule
}

/// Translates plugin options into a rule map.
///
/// Every field becomes a descriptor. Rule values become the validator's
/// parameters; `equalTo` becomes a dependency on the field its selector
/// names. Messages attach only to rules present for the same field.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRule`] when `rules` or `messages` are not
/// objects of objects, an `equalTo` selector is not a string, or a message is
/// not a string.
pub fn rules_from_jquery(options: &Value) -> Result<RuleMap> {
    let rules = section(options, "rules")?;
    let messages = section(options, "messages")?;

    let mut map = RuleMap::with_capacity(rules.len());
    for (field, field_rules) in rules {
        let field_rules = object(field, field_rules, "rules")?;
        let mut specs = IndexMap::with_capacity(field_rules.len());
        for (rule, value) in field_rules {
            let name = validator_name(rule);
            let values = if rule == "equalTo" {
                vec![equal_to_dependency(field, value)?]
            } else {
                values_from_json(value)
            };
            specs.insert(name.to_owned(), RuleSpec::from(values));
        }

        if let Some(field_messages) = messages.get(field) {
            for (rule, text) in object(field, field_messages, "messages")? {
                if !field_rules.contains_key(rule) {
                    continue;
                }
                let Value::String(text) = text else {
                    return Err(EngineError::invalid_rule(
                        field.as_str(),
                        format!("message for `{rule}` must be a string"),
                    ));
                };
                if let Some(spec) = specs.get_mut(validator_name(rule)) {
                    spec.message = Some(Message::from(text.clone()));
                }
            }
        }

        map.insert(
            field.clone(),
            FieldRule::Descriptor(FieldDescriptor::new(ValidatorSet::Specs(specs))),
        );
    }
    tracing::debug!(fields = map.len(), "translated jQuery validation rules");
    Ok(map)
}

fn section<'v>(options: &'v Value, key: &str) -> Result<&'v Map<String, Value>> {
    static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);
    match options.get(key) {
        None | Some(Value::Null) => Ok(&EMPTY),
        Some(value) => object(key, value, key),
    }
}

fn object<'v>(field: &str, value: &'v Value, what: &str) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        EngineError::invalid_rule(
            field,
            format!("{what} must be an object, got {}", value_type_name(value)),
        )
    })
}

fn equal_to_dependency(field: &str, selector: &Value) -> Result<Param> {
    let selector = match selector {
        Value::String(selector) => selector.as_str(),
        Value::Array(items) => match items.first() {
            Some(Value::String(selector)) => selector.as_str(),
            _ => return Err(EngineError::invalid_rule(field, "equalTo needs a selector")),
        },
        _ => return Err(EngineError::invalid_rule(field, "equalTo needs a selector")),
    };
    Ok(Param::depends_on(selector.trim_start_matches('#')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn specs(map: &RuleMap, field: &str) -> IndexMap<String, RuleSpec> {
        match &map[field] {
            FieldRule::Descriptor(FieldDescriptor {
                validators: ValidatorSet::Specs(specs),
                ..
            }) => specs.clone(),
            other => panic!("unexpected rule {other:?}"),
        }
    }

    #[test]
    fn renames_and_wraps_values() {
        let map = rules_from_jquery(&json!({
            "rules": {"name": {"required": true, "minlength": 2, "lengthInRange": [1, 5]}}
        }))
        .unwrap();
        let specs = specs(&map, "name");
        let names: Vec<_> = specs.keys().map(String::as_str).collect();
        assert_eq!(names, ["required", "minLength", "lengthInRange"]);
        assert_eq!(specs["minLength"].values, vec![Param::literal(2)]);
        assert_eq!(
            specs["lengthInRange"].values,
            vec![Param::literal(1), Param::literal(5)]
        );
    }

    #[test]
    fn messages_follow_renames() {
        let map = rules_from_jquery(&json!({
            "rules": {"age": {"min": 18}},
            "messages": {"age": {"min": "Adults only", "max": "ignored"}, "other": {"x": "y"}}
        }))
        .unwrap();
        let specs = specs(&map, "age");
        assert_eq!(specs["minValue"].message, Some(Message::from("Adults only")));
        assert!(!specs.contains_key("maxValue"));
        assert!(!map.contains_key("other"));
    }

    #[test]
    fn bad_shapes_are_rejected() {
        assert!(rules_from_jquery(&json!({"rules": [1]})).is_err());
        assert!(rules_from_jquery(&json!({"rules": {"a": {"equalTo": 5}}})).is_err());
        assert!(rules_from_jquery(&json!({})).unwrap().is_empty());
    }
}
