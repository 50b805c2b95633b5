use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Canonical indices only: `{01}` is not a placeholder.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(0|[1-9][0-9]*)\}").expect("placeholder pattern is a valid regex")
});

/// Message used when a template is missing or empty.
pub const FALLBACK_MESSAGE: &str = "Error";

/// Substitutes `{n}` placeholders with the `n`-th parameter.
///
/// Placeholders past the end of `params` stay in the output as written.
///
/// ```
/// use fieldcheck_validator::engine::format_message;
///
/// assert_eq!(format_message("Between {0} and {1}", &["1", "10"]), "Between 1 and 10");
/// assert_eq!(format_message("{0} of {2}", &["1", "10"]), "1 of {2}");
/// assert_eq!(format_message("", &["1"]), "Error");
/// ```
#[must_use]
pub fn format_message<S: AsRef<str>>(template: &str, params: &[S]) -> String {
    if template.is_empty() {
        return FALLBACK_MESSAGE.to_owned();
    }
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| params.get(index))
                .map_or_else(|| caps[0].to_owned(), |param| param.as_ref().to_owned())
        })
        .into_owned()
}
