use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use super::{ModuleFn, ModuleOutput, ModuleScope};
use crate::error::{EngineError, Result};
use crate::outcome::{ErrorMap, FieldError, Outcome};
use crate::patterns::Pattern;
use crate::rule::{ModuleConfig, Rules};
use crate::value::{is_blank, number_value, to_display_string};

type ModuleResult = Result<Option<ModuleOutput>>;

pub(super) fn entries() -> Vec<(&'static str, ModuleFn)> {
    vec![
        ("trimValue", Arc::new(trim_value) as ModuleFn),
        ("defaultValue", Arc::new(default_value) as ModuleFn),
        ("int", Arc::new(int) as ModuleFn),
        ("float", Arc::new(float) as ModuleFn),
        ("roundedFloat", Arc::new(rounded_float) as ModuleFn),
        ("objectValidator", Arc::new(object_validator) as ModuleFn),
        ("customFunction", Arc::new(custom_function) as ModuleFn),
        ("title", Arc::new(title) as ModuleFn),
    ]
}

fn is_literal_true(config: &ModuleConfig) -> bool {
    matches!(config, ModuleConfig::Value(Value::Bool(true)))
}

/// Text form of a scalar field value; containers and `null` never coerce.
fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text)),
        Value::Number(_) => Some(Cow::Owned(to_display_string(value))),
        _ => None,
    }
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok()
}

// ============================================================================
// COERCION
// ============================================================================

fn trim_value(config: &ModuleConfig, scope: &mut ModuleScope<'_>) -> ModuleResult {
    if !config.is_enabled() {
        return Ok(None);
    }
    let trimmed = match scope.value() {
        Value::String(text) if text.trim().len() != text.len() => text.trim().to_owned(),
        _ => return Ok(None),
    };
    scope.set_value(Value::String(trimmed));
    Ok(None)
}

fn default_value(config: &ModuleConfig, scope: &mut ModuleScope<'_>) -> ModuleResult {
    if !is_blank(scope.value()) {
        return Ok(None);
    }
    let fallback = match config {
        ModuleConfig::Value(value) => value.clone(),
        ModuleConfig::Function(f) => f(scope.record()),
        ModuleConfig::Rules(_) => {
            return Err(EngineError::invalid_rule(
                scope.field(),
                "defaultValue takes a value or a function",
            ));
        }
    };
    scope.set_value(fallback);
    Ok(None)
}

fn int(config: &ModuleConfig, scope: &mut ModuleScope<'_>) -> ModuleResult {
    if !is_literal_true(config) {
        return Ok(None);
    }
    let coerced = scalar_text(scope.value())
        .filter(|text| Pattern::Int.is_match(text))
        .and_then(|text| match text.parse::<i64>() {
            Ok(n) => Some(Value::from(n)),
            Err(_) => parse_float(&text).map(|f| number_value(f.trunc())),
        });
    if let Some(value) = coerced {
        scope.set_value(value);
    }
    Ok(None)
}

fn float(config: &ModuleConfig, scope: &mut ModuleScope<'_>) -> ModuleResult {
    if !is_literal_true(config) {
        return Ok(None);
    }
    if let Some(f) = float_field(scope) {
        scope.set_value(number_value(f));
    }
    Ok(None)
}

/// `true` coerces like `float`; an integer `n` also rounds to `n` decimals
/// unless the field's `float` module is set to `false`.
fn rounded_float(config: &ModuleConfig, scope: &mut ModuleScope<'_>) -> ModuleResult {
    let places = match config {
        ModuleConfig::Value(Value::Bool(true)) => None,
        ModuleConfig::Value(Value::Number(_)) if float_disabled(scope) => return Ok(None),
        ModuleConfig::Value(Value::Number(n)) => match n.as_i64() {
            Some(places) => Some(places.clamp(0, 15)),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };
    if let Some(f) = float_field(scope) {
        let f = match places {
            Some(places) => round_to(f, places),
            None => f,
        };
        scope.set_value(number_value(f));
    }
    Ok(None)
}

fn float_disabled(scope: &ModuleScope<'_>) -> bool {
    matches!(
        scope.sibling("float"),
        Some(ModuleConfig::Value(Value::Bool(false)))
    )
}

fn float_field(scope: &ModuleScope<'_>) -> Option<f64> {
    scalar_text(scope.value())
        .filter(|text| Pattern::Float.is_match(text))
        .and_then(|text| parse_float(&text))
}

#[allow(clippy::cast_possible_truncation)]
fn round_to(f: f64, places: i64) -> f64 {
    let factor = 10f64.powi(places as i32);
    (f * factor).round() / factor
}

fn custom_function(config: &ModuleConfig, scope: &mut ModuleScope<'_>) -> ModuleResult {
    if let ModuleConfig::Function(f) = config {
        let value = f(scope.record());
        scope.set_value(value);
    }
    Ok(None)
}

// ============================================================================
// METADATA
// ============================================================================

fn title(config: &ModuleConfig, _: &mut ModuleScope<'_>) -> ModuleResult {
    Ok(config.as_value().cloned().map(ModuleOutput::Aux))
}

// ============================================================================
// NESTED RECORDS
// ============================================================================

/// Validates the field's value as a record of its own.
///
/// Outside strict mode a blank field is skipped. A failing nested run is
/// recorded under `objectValidator` with the nested outcome as its payload.
fn object_validator(config: &ModuleConfig, scope: &mut ModuleScope<'_>) -> ModuleResult {
    if !scope.is_strict() && is_blank(scope.value()) {
        return Ok(None);
    }

    let decoded;
    let rules = match config {
        ModuleConfig::Rules(rules) => rules,
        ModuleConfig::Value(value) => {
            decoded = Rules::from_json(value).map_err(|err| match err {
                EngineError::InvalidRule { reason, .. } => {
                    EngineError::invalid_rule(scope.field(), reason)
                }
                other => other,
            })?;
            &decoded
        }
        ModuleConfig::Function(_) => {
            return Err(EngineError::invalid_rule(
                scope.field(),
                "objectValidator takes a rule map",
            ));
        }
    };

    let mut nested = scope.value().clone();
    let outcome = scope.engine().validate(&mut nested, rules, false)?;
    scope.set_value(nested);

    match outcome {
        Outcome::Valid => Ok(None),
        outcome => {
            tracing::debug!(field = scope.field(), "nested record failed validation");
            let mut errors = ErrorMap::new();
            errors.insert("objectValidator".to_owned(), FieldError::Nested(outcome));
            Ok(Some(ModuleOutput::Errors(errors)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert!((round_to(1.23456, 2) - 1.23).abs() < f64::EPSILON);
        assert!((round_to(2.5, 0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn comma_decimal_separator_parses() {
        assert_eq!(parse_float("1,5"), Some(1.5));
        assert_eq!(parse_float(" -2.25 "), Some(-2.25));
    }

    #[test]
    fn only_scalars_have_text() {
        assert_eq!(scalar_text(&Value::from(5)).as_deref(), Some("5"));
        assert!(scalar_text(&Value::Null).is_none());
        assert!(scalar_text(&Value::Bool(true)).is_none());
    }
}
