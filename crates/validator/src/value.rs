//! Loose value semantics for `serde_json::Value`.
//!
//! Rule maps are authored against dynamically typed records, so predicates
//! compare values the way form data is usually compared: numeric strings
//! equal their numbers, `null` reads as "nothing", and placeholders in
//! messages render values as plain text.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Get the type name of a Value for error messages
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract f64 from Number, trying both f64 and i64 representations
#[inline]
pub fn number_as_f64(num: &Number) -> Option<f64> {
    num.as_f64().or_else(|| num.as_i64().map(|i| i as f64))
}

/// Builds a JSON number, keeping integral values integral.
///
/// Non-finite input has no JSON representation and becomes `null`.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// A value counts as blank when it is `null` or the empty string.
///
/// Blank values skip every non-presence validator unless strict mode is on.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Truthiness as form scripts see it: containers are always truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => number_as_f64(n).is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric reading of a value, `None` when it has no numeric meaning.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => number_as_f64(n),
        Value::String(s) => parse_numeric(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [single] => to_number(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    // Rust also accepts "inf"/"nan" spellings that form input never means.
    if trimmed.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| !f.is_nan())
}

/// Plain-text rendering used for placeholders and pattern matching.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                format!("{f:.0}")
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

/// Length of a value: characters for scalars, elements for arrays.
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Loose equality: numeric strings equal their numbers, `null` only equals `null`.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(a), Value::Number(b)) => number_as_f64(a) == number_as_f64(b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => left == right,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => match (to_number(left), to_number(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        (Value::Array(_) | Value::Object(_), _) => {
            loose_eq(&Value::String(to_display_string(left)), right)
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            loose_eq(left, &Value::String(to_display_string(right)))
        }
        _ => match (to_number(left), to_number(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Relational comparison. Two strings compare lexically, anything else numerically.
///
/// `None` means the values are not comparable and every relation is false.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let left = primitive(left);
    let right = primitive(right);
    match (&left, &right) {
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => to_number(&left)?.partial_cmp(&to_number(&right)?),
    }
}

fn primitive(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(to_display_string(value)),
        other => other.clone(),
    }
}
