//! Validation outcomes and the result interpreter.
//!
//! Outcomes serialize to the plain JSON shapes form scripts expect:
//! `true` for a pass, `{field: {errors: {...}, <aux>...}}` for a field-keyed
//! run, and `{validator: message}` for a whole-record run.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Validator (or module) name to error.
pub type ErrorMap = IndexMap<String, FieldError>;

/// One recorded failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A formatted message.
    Message(String),
    /// The outcome of a nested validation run.
    Nested(Outcome),
}

impl FieldError {
    /// The message, when this is not a nested outcome.
    #[must_use]
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(text) => Some(text),
            Self::Nested(_) => None,
        }
    }

    /// Whether this entry makes its report invalid.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Message(_) => true,
            Self::Nested(outcome) => !outcome.is_valid(),
        }
    }
}

impl From<String> for FieldError {
    fn from(text: String) -> Self {
        Self::Message(text)
    }
}

impl From<&str> for FieldError {
    fn from(text: &str) -> Self {
        Self::Message(text.to_owned())
    }
}

/// The result for one field: its errors plus module metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldReport {
    pub errors: ErrorMap,
    /// Plain values returned by modules, keyed by module name.
    pub aux: IndexMap<String, Value>,
}

impl FieldReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.errors.values().any(FieldError::is_failure)
    }

    /// The first message in declaration order, what a form shows next to the input.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.errors.values().find_map(FieldError::as_message)
    }
}

/// Result of a single field evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    Valid,
    Checked(FieldReport),
}

impl FieldOutcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Valid => true,
            Self::Checked(report) => report.is_valid(),
        }
    }
}

/// Result of a validation run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every field passed and the run was not forced to report.
    Valid,
    /// Per-field reports of a field-keyed run.
    Fields(IndexMap<String, FieldReport>),
    /// The error map of a whole-record run.
    Errors(ErrorMap),
}

impl Outcome {
    /// Interprets the outcome as a verdict. See [`is_valid_result`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_result(self)
    }

    /// The report for one field of a field-keyed run.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        match self {
            Self::Fields(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Names of the fields holding at least one failure.
    pub fn failed_fields(&self) -> impl Iterator<Item = &str> {
        let fields = match self {
            Self::Fields(fields) => Some(fields),
            _ => None,
        };
        fields
            .into_iter()
            .flatten()
            .filter(|(_, report)| !report.is_valid())
            .map(|(name, _)| name.as_str())
    }
}

/// Collapses an outcome into a boolean.
///
/// A forced run still counts as valid when no report holds errors. A nested
/// outcome recorded by a module counts as a failure only if it fails itself.
#[must_use]
pub fn is_valid_result(outcome: &Outcome) -> bool {
    match outcome {
        Outcome::Valid => true,
        Outcome::Fields(fields) => fields.values().all(FieldReport::is_valid),
        Outcome::Errors(errors) => !errors.values().any(FieldError::is_failure),
    }
}

/// The result interpreter applied to a serialized outcome.
///
/// `true` is valid. Otherwise a top-level `errors` wrapper is unwrapped and
/// every entry must be an object whose `errors` member is absent or empty.
/// Any other entry is a failure payload.
#[must_use]
pub fn is_valid_value(result: &Value) -> bool {
    match result {
        Value::Bool(true) => true,
        Value::Object(map) => match map.get("errors") {
            Some(errors) => entries_valid(errors),
            None => map.values().all(entry_valid),
        },
        Value::Array(items) => items.iter().all(entry_valid),
        _ => false,
    }
}

/// Iterates a value the way a script's `for ... in` would.
fn entries_valid(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().all(entry_valid),
        Value::Array(items) => items.iter().all(entry_valid),
        Value::String(text) => text.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
    }
}

fn entry_valid(entry: &Value) -> bool {
    match entry {
        Value::Object(report) => report.get("errors").is_none_or(|errors| match errors {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::String(text) => text.is_empty(),
            Value::Null | Value::Bool(_) | Value::Number(_) => true,
        }),
        _ => false,
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Message(text) => serializer.serialize_str(text),
            Self::Nested(outcome) => outcome.serialize(serializer),
        }
    }
}

impl Serialize for FieldReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.aux.len()))?;
        map.serialize_entry("errors", &self.errors)?;
        for (name, value) in &self.aux {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid => serializer.serialize_bool(true),
            Self::Fields(fields) => fields.serialize(serializer),
            Self::Errors(errors) => errors.serialize(serializer),
        }
    }
}
