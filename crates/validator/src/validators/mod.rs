//! Validator registry.
//!
//! A validator is a pure predicate over `(value, args)` with a default error
//! message. Presence-checking validators are registered as *required class*:
//! they still run when the field is blank, every other validator is skipped
//! for blank values unless the engine is strict.
//!
//! # Built-ins
//!
//! - **Presence**: `required`, `requiredOnlyIf`
//! - **Length**: `minLength`, `maxLength`, `lengthInRange`
//! - **Numeric format**: `digits`, `int`, `float`
//! - **Comparison**: `greaterThan`, `lessThan`, `minValue`, `maxValue`,
//!   `betweenValues`, `equalsTo`, `equalsToField`, `notEqualsTo`, `notEqualsToField`
//! - **Structure**: `object`, `notEmptyObject`, `range`
//! - **Format**: `url`, `shortURL`, `email`, `phone`, `validTextString`
//! - **Escape hatch**: `customFunction`

mod builtin;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::rule::{Args, Message};

/// A validator predicate: the field value, then the resolved arguments.
pub type ValidatorFn = Arc<dyn Fn(&Value, &Args) -> bool + Send + Sync>;

// ============================================================================
// ENTRY
// ============================================================================

/// One registered validator.
#[derive(Clone)]
pub struct ValidatorEntry {
    predicate: ValidatorFn,
    default_message: Message,
    required_class: bool,
}

impl ValidatorEntry {
    pub fn new<F>(predicate: F, default_message: impl Into<Message>) -> Self
    where
        F: Fn(&Value, &Args) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            default_message: default_message.into(),
            required_class: false,
        }
    }

    /// Marks the validator as one that runs even for blank values.
    #[must_use = "builder methods must be chained or built"]
    pub fn required_class(mut self) -> Self {
        self.required_class = true;
        self
    }

    /// Runs the predicate.
    #[must_use]
    pub fn check(&self, value: &Value, args: &Args) -> bool {
        (self.predicate)(value, args)
    }

    #[must_use]
    pub fn default_message(&self) -> &Message {
        &self.default_message
    }

    #[must_use]
    pub fn is_required_class(&self) -> bool {
        self.required_class
    }
}

impl fmt::Debug for ValidatorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorEntry")
            .field("default_message", &self.default_message)
            .field("required_class", &self.required_class)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Append-only map from validator name to [`ValidatorEntry`].
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    entries: IndexMap<String, ValidatorEntry>,
}

impl ValidatorRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in validator.
    #[must_use]
    pub fn with_builtins() -> Self {
        let entries = builtin::entries()
            .into_iter()
            .map(|(name, entry)| (name.to_owned(), entry))
            .collect();
        Self { entries }
    }

    /// Adds a validator.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateValidator`] if the name is taken; the
    /// existing registration is left untouched.
    pub fn register(&mut self, name: impl Into<String>, entry: ValidatorEntry) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            tracing::warn!(validator = %name, "rejected duplicate validator registration");
            return Err(EngineError::DuplicateValidator { name });
        }
        tracing::debug!(
            validator = %name,
            required_class = entry.required_class,
            "registered validator"
        );
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Looks a validator up by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownValidator`] for unregistered names.
    pub fn get(&self, name: &str) -> Result<&ValidatorEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| EngineError::UnknownValidator {
                name: name.to_owned(),
            })
    }

    /// Runs a validator by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownValidator`] for unregistered names.
    pub fn invoke(&self, name: &str, value: &Value, args: &Args) -> Result<bool> {
        Ok(self.get(name)?.check(value, args))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, built-ins first, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtins_are_present() {
        let registry = ValidatorRegistry::with_builtins();
        for name in ["required", "minLength", "equalsToField", "customFunction", "phone"] {
            assert!(registry.contains(name), "{name} missing");
        }
        assert!(registry.get("required").unwrap().is_required_class());
        assert!(registry.get("requiredOnlyIf").unwrap().is_required_class());
        assert!(!registry.get("minLength").unwrap().is_required_class());
    }

    #[test]
    fn duplicate_registration_keeps_original() {
        let mut registry = ValidatorRegistry::with_builtins();
        let err = registry
            .register("required", ValidatorEntry::new(|_, _| true, "never"))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateValidator {
                name: "required".into()
            }
        );
        assert!(!registry.invoke("required", &Value::Null, &Args::new()).unwrap());
    }

    #[test]
    fn unknown_names_fail() {
        let registry = ValidatorRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.invoke("nope", &json!(1), &Args::new()),
            Err(EngineError::UnknownValidator { .. })
        ));
    }

    #[test]
    fn custom_validators_are_callable() {
        let mut registry = ValidatorRegistry::new();
        registry
            .register(
                "even",
                ValidatorEntry::new(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0), "odd"),
            )
            .unwrap();
        assert!(registry.invoke("even", &json!(4), &Args::new()).unwrap());
        assert!(!registry.invoke("even", &json!(3), &Args::new()).unwrap());
        assert_eq!(registry.names().collect::<Vec<_>>(), ["even"]);
    }
}
