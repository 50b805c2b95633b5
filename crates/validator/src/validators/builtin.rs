//! Built-in validator predicates and their default messages.

use std::cmp::Ordering;

use serde_json::Value;

use super::ValidatorEntry;
use crate::patterns::Pattern;
use crate::rule::Args;
use crate::value::{compare, is_blank, is_truthy, length_of, loose_eq, to_display_string};

pub(super) fn entries() -> Vec<(&'static str, ValidatorEntry)> {
    vec![
        (
            "required",
            ValidatorEntry::new(required, "This field is required.").required_class(),
        ),
        (
            "requiredOnlyIf",
            ValidatorEntry::new(required_only_if, "The field is required").required_class(),
        ),
        (
            "minLength",
            ValidatorEntry::new(min_length, "Please enter at least {0} characters."),
        ),
        (
            "maxLength",
            ValidatorEntry::new(max_length, "Please enter no more than {0} characters."),
        ),
        (
            "lengthInRange",
            ValidatorEntry::new(
                length_in_range,
                "Please enter a string with length between {0} and {1}",
            ),
        ),
        (
            "digits",
            ValidatorEntry::new(matches(Pattern::Digits), "Please enter a valid number."),
        ),
        (
            "float",
            ValidatorEntry::new(matches(Pattern::Float), "Please enter a valid float number."),
        ),
        (
            "int",
            ValidatorEntry::new(matches(Pattern::Int), "Please enter a valid integer number."),
        ),
        (
            "greaterThan",
            ValidatorEntry::new(
                relation(|o| o == Ordering::Greater),
                "Please enter a value greater than {0}.",
            ),
        ),
        (
            "lessThan",
            ValidatorEntry::new(
                relation(|o| o == Ordering::Less),
                "Please enter a value less than {0}.",
            ),
        ),
        (
            "maxValue",
            ValidatorEntry::new(
                relation(|o| o != Ordering::Greater),
                "Please enter a value less than or equal to {0}.",
            ),
        ),
        (
            "minValue",
            ValidatorEntry::new(
                relation(|o| o != Ordering::Less),
                "Please enter a value greater than or equal to {0}.",
            ),
        ),
        (
            "betweenValues",
            ValidatorEntry::new(between_values, "Value must be between {0} and {1}"),
        ),
        (
            "equalsTo",
            ValidatorEntry::new(equals, "Please enter a value equal to {0}."),
        ),
        (
            "equalsToField",
            ValidatorEntry::new(equals, "Please enter a value equal to '{0}' field."),
        ),
        (
            "notEqualsTo",
            ValidatorEntry::new(not_equals, "Please enter a value not equal to {0}."),
        ),
        (
            "notEqualsToField",
            ValidatorEntry::new(not_equals, "Please enter a value not equal to '{0}' field."),
        ),
        ("range", ValidatorEntry::new(range, "Please enter a valid range")),
        (
            "object",
            ValidatorEntry::new(|v, _| v.is_object(), "Please enter a valid javascript object."),
        ),
        (
            "notEmptyObject",
            ValidatorEntry::new(
                not_empty_object,
                "Please enter a valid and not empty javascript object.",
            ),
        ),
        (
            "url",
            ValidatorEntry::new(matches(Pattern::Url), "Please enter a valid URL."),
        ),
        (
            "shortURL",
            ValidatorEntry::new(matches(Pattern::ShortUrl), "Please enter a valid URL."),
        ),
        (
            "validTextString",
            ValidatorEntry::new(
                matches(Pattern::TextString),
                "Please do not use invalid characters.",
            ),
        ),
        (
            "email",
            ValidatorEntry::new(matches(Pattern::Email), "Please enter a valid email address."),
        ),
        (
            "phone",
            ValidatorEntry::new(matches(Pattern::Phone), "Please enter a valid phone number"),
        ),
        (
            "customFunction",
            ValidatorEntry::new(custom_function, "OH! Something you entered is wrong..."),
        ),
    ]
}

// ============================================================================
// PRESENCE
// ============================================================================

fn required(value: &Value, _: &Args) -> bool {
    !is_blank(value)
}

/// Presence enforced only while the first argument is truthy.
fn required_only_if(value: &Value, args: &Args) -> bool {
    !is_truthy(args.value(0)) || !is_blank(value)
}

// ============================================================================
// LENGTH
// ============================================================================

fn text_length(value: &Value) -> Value {
    Value::from(to_display_string(value).chars().count())
}

fn min_length(value: &Value, args: &Args) -> bool {
    !is_truthy(value)
        || compare(&text_length(value), args.value(0)).is_some_and(|o| o != Ordering::Less)
}

fn max_length(value: &Value, args: &Args) -> bool {
    !is_truthy(value)
        || compare(&text_length(value), args.value(0)).is_some_and(|o| o != Ordering::Greater)
}

/// Only strings and arrays have a length here; other truthy values fail.
fn length_in_range(value: &Value, args: &Args) -> bool {
    if !is_truthy(value) {
        return true;
    }
    let Some(len) = length_of(value).map(Value::from) else {
        return false;
    };
    compare(&len, args.value(0)).is_some_and(|o| o != Ordering::Less)
        && compare(&len, args.value(1)).is_some_and(|o| o != Ordering::Greater)
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Orders `value` against the bound at `index`; a missing bound is incomparable.
fn compare_bound(value: &Value, args: &Args, index: usize) -> Option<Ordering> {
    args.get(index).and_then(|bound| compare(value, bound.as_value()))
}

fn relation(holds: fn(Ordering) -> bool) -> impl Fn(&Value, &Args) -> bool + Send + Sync {
    move |value, args| compare_bound(value, args, 0).is_some_and(holds)
}

fn between_values(value: &Value, args: &Args) -> bool {
    compare_bound(value, args, 0).is_some_and(|o| o != Ordering::Less)
        && compare_bound(value, args, 1).is_some_and(|o| o != Ordering::Greater)
}

fn equals(value: &Value, args: &Args) -> bool {
    loose_eq(value, args.value(0))
}

fn not_equals(value: &Value, args: &Args) -> bool {
    !loose_eq(value, args.value(0))
}

// ============================================================================
// STRUCTURE
// ============================================================================

fn not_empty_object(value: &Value, _: &Args) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        _ => false,
    }
}

/// A two-element range `[from, to]`; a zero bound leaves that side open.
fn range(value: &Value, _: &Args) -> bool {
    let Value::Array(items) = value else {
        return false;
    };
    let zero = Value::from(0);
    let (from, to) = (items.first(), items.get(1));
    from.is_some_and(|v| loose_eq(v, &zero))
        || to.is_some_and(|v| loose_eq(v, &zero))
        || matches!(
            (from, to),
            (Some(from), Some(to)) if compare(to, from).is_some_and(|o| o != Ordering::Less)
        )
}

// ============================================================================
// FORMAT
// ============================================================================

fn matches(pattern: Pattern) -> impl Fn(&Value, &Args) -> bool + Send + Sync {
    move |value, _| pattern.is_match(&to_display_string(value))
}

fn custom_function(value: &Value, args: &Args) -> bool {
    args.predicate(0).is_some_and(|f| f(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Arg;
    use serde_json::json;
    use std::sync::Arc;

    fn args(values: &[Value]) -> Args {
        values.iter().cloned().collect()
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = entries().into_iter().map(|(n, _)| n).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn length_counts_display_text() {
        assert!(min_length(&json!("abcde"), &args(&[json!(5)])));
        assert!(!min_length(&json!("abcd"), &args(&[json!(5)])));
        assert!(min_length(&json!(12345), &args(&[json!("5")])));
        assert!(min_length(&json!(""), &args(&[json!(5)])));
        assert!(max_length(&json!("привет"), &args(&[json!(6)])));
    }

    #[test]
    fn length_in_range_rejects_numbers() {
        assert!(length_in_range(&json!("abc"), &args(&[json!(1), json!(3)])));
        assert!(!length_in_range(&json!(123), &args(&[json!(1), json!(3)])));
        assert!(length_in_range(&json!(0), &args(&[json!(1), json!(3)])));
    }

    #[test]
    fn range_bounds() {
        assert!(range(&json!([1, 5]), &Args::new()));
        assert!(range(&json!([5, 0]), &Args::new()));
        assert!(!range(&json!([5, 1]), &Args::new()));
        assert!(!range(&json!("1-5"), &Args::new()));
    }

    #[test]
    fn custom_function_requires_a_predicate() {
        let f: crate::rule::PredicateFn = Arc::new(|v| v == &json!("ok"));
        let with: Args = [Arg::Predicate(f)].into_iter().collect();
        assert!(custom_function(&json!("ok"), &with));
        assert!(!custom_function(&json!("no"), &with));
        assert!(!custom_function(&json!("ok"), &args(&[json!(true)])));
    }
}
