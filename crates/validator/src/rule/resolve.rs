use serde_json::Value;

use super::{Param, Record, RuleSpec};

/// Resolves a spec's parameters against the current record.
///
/// Computed parameters are called with the record. Dependency markers are
/// returned as they are; the evaluator substitutes them once the referenced
/// field has been validated.
#[must_use]
pub fn resolve_values(record: &Record, spec: &RuleSpec) -> Vec<Param> {
    spec.values
        .iter()
        .map(|param| match param {
            Param::Computed(f) => Param::Literal(f(record)),
            other => other.clone(),
        })
        .collect()
}

/// Reads a `values` payload from declarative rule data.
///
/// A list supplies one parameter per element. Anything else is a single
/// parameter, so `"values": 5` and `"values": [5]` mean the same thing.
/// `{"dependsField": "name"}` marks a dependency on another field.
#[must_use]
pub fn values_from_json(payload: &Value) -> Vec<Param> {
    match payload {
        Value::Array(items) => items.iter().map(param_from_json).collect(),
        other => vec![param_from_json(other)],
    }
}

pub(super) fn param_from_json(value: &Value) -> Param {
    match value {
        Value::Object(map) => match map.get("dependsField") {
            Some(Value::String(field)) => Param::DependsOn(field.clone()),
            _ => Param::Literal(value.clone()),
        },
        other => Param::Literal(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn computed_params_see_the_record() {
        let spec = RuleSpec::new()
            .with_value(Param::computed(|record| {
                record.get("limit").cloned().unwrap_or(Value::Null)
            }))
            .with_value(Param::depends_on("other"));
        let mut record = Record::new();
        record.insert("limit".into(), json!(7));

        let resolved = resolve_values(&record, &spec);
        assert_eq!(
            resolved,
            vec![Param::Literal(json!(7)), Param::depends_on("other")]
        );
    }

    #[test]
    fn scalar_payload_is_wrapped() {
        assert_eq!(values_from_json(&json!(5)), vec![Param::literal(5)]);
        assert_eq!(
            values_from_json(&json!([1, "a"])),
            vec![Param::literal(1), Param::literal("a")]
        );
    }

    #[test]
    fn depends_field_marker_is_recognized() {
        assert_eq!(
            values_from_json(&json!({"dependsField": "password"})),
            vec![Param::depends_on("password")]
        );
        assert_eq!(
            values_from_json(&json!([{"other": 1}])),
            vec![Param::literal(json!({"other": 1}))]
        );
    }
}
