//! The rule engine: field and object evaluation.
//!
//! # Examples
//!
//! ```
//! use fieldcheck_validator::prelude::*;
//! use serde_json::json;
//!
//! let engine = Engine::new();
//! let rules = Rules::from_json(&json!({
//!     "login": {"validators": ["required", "validTextString"], "trimValue": true},
//!     "password": {"minLength": 5},
//! }))
//! .unwrap();
//!
//! let mut record = json!({"login": "  neo  ", "password": "abcd"});
//! let outcome = engine.validate(&mut record, &rules, false).unwrap();
//!
//! assert_eq!(record["login"], "neo");
//! assert_eq!(
//!     outcome.field("password").and_then(FieldReport::first_message),
//!     Some("Please enter at least 5 characters.")
//! );
//! ```

mod field;
mod message;

use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::modules::{ModuleOutput, ModuleRegistry, ModuleScope};
use crate::outcome::{FieldOutcome, Outcome};
use crate::rule::{Args, FieldRule, Message, ModuleConfig, Record, RuleMap, Rules};
use crate::validators::{ValidatorEntry, ValidatorRegistry};
use crate::value::{is_truthy, value_type_name};

use field::FieldEvaluator;
pub use message::{FALLBACK_MESSAGE, format_message};

/// Field name under which a whole-record descriptor sees the record.
pub const WHOLE_RECORD_FIELD: &str = "object";

/// Validates records against rule maps.
///
/// An engine owns its validator and module registries, both seeded with the
/// built-ins, and an immutable [`EngineConfig`]. Evaluation never mutates the
/// engine, so one engine may serve any number of runs.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    validators: ValidatorRegistry,
    modules: ModuleRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with built-in validators and modules and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::from_parts(
            config,
            ValidatorRegistry::with_builtins(),
            ModuleRegistry::with_builtins(),
        )
    }

    /// An engine over caller-assembled registries.
    #[must_use]
    pub fn from_parts(
        config: EngineConfig,
        validators: ValidatorRegistry,
        modules: ModuleRegistry,
    ) -> Self {
        Self {
            config,
            validators,
            modules,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    #[must_use]
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Registers a validator.
    ///
    /// Required-class validators run even when the field is blank.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateValidator`] if the name is taken.
    pub fn register_validator<F>(
        &mut self,
        name: impl Into<String>,
        predicate: F,
        default_message: impl Into<Message>,
        required_class: bool,
    ) -> Result<()>
    where
        F: Fn(&Value, &Args) -> bool + Send + Sync + 'static,
    {
        let entry = ValidatorEntry::new(predicate, default_message);
        let entry = if required_class {
            entry.required_class()
        } else {
            entry
        };
        self.validators.register(name, entry)
    }

    /// Registers a module.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateModule`] if the name is taken.
    pub fn register_module<F>(&mut self, name: impl Into<String>, module: F) -> Result<()>
    where
        F: Fn(&ModuleConfig, &mut ModuleScope<'_>) -> Result<Option<ModuleOutput>>
            + Send
            + Sync
            + 'static,
    {
        self.modules.register(name, module)
    }

    /// Validates a record.
    ///
    /// The record is mutated in place by modules (trimming, coercion,
    /// defaults) and keeps those changes after the call.
    ///
    /// For [`Rules::Fields`] the outcome lists the failing fields, or every
    /// field when `force_return` is set, and is [`Outcome::Valid`] otherwise.
    /// For [`Rules::Whole`] the record is validated as a single value and the
    /// outcome carries its error map directly.
    ///
    /// # Errors
    ///
    /// - [`EngineError::MissingTarget`] when field rules meet a falsy record
    /// - [`EngineError::UnknownValidator`] when a rule names an unregistered validator
    /// - [`EngineError::CyclicDependency`] when dependency markers form a cycle
    /// - any error raised by a module
    pub fn validate(&self, record: &mut Value, rules: &Rules, force_return: bool) -> Result<Outcome> {
        match rules {
            Rules::Whole(descriptor) => {
                let mut synthetic = RuleMap::with_capacity(1);
                synthetic.insert(
                    WHOLE_RECORD_FIELD.to_owned(),
                    FieldRule::Descriptor(descriptor.clone()),
                );
                let mut wrapper = Record::new();
                wrapper.insert(WHOLE_RECORD_FIELD.to_owned(), std::mem::take(record));

                let result = self.evaluate_field(
                    &mut wrapper,
                    WHOLE_RECORD_FIELD,
                    &synthetic[WHOLE_RECORD_FIELD],
                    &synthetic,
                    force_return,
                );
                *record = wrapper.remove(WHOLE_RECORD_FIELD).unwrap_or(Value::Null);

                let outcome = match result? {
                    FieldOutcome::Valid => Outcome::Valid,
                    FieldOutcome::Checked(report) => Outcome::Errors(report.errors),
                };
                tracing::debug!(shape = "whole", valid = outcome.is_valid(), "validated record");
                Ok(outcome)
            }
            Rules::Fields(map) => {
                if !is_truthy(record) {
                    return Err(EngineError::MissingTarget {
                        found: value_type_name(record),
                    });
                }
                let mut scratch = Record::new();
                let fields = match record {
                    Value::Object(fields) => fields,
                    _ => &mut scratch,
                };

                let mut evaluator = FieldEvaluator::new(self, map);
                let mut reports = indexmap::IndexMap::new();
                for (name, rule) in map {
                    if let FieldOutcome::Checked(report) =
                        evaluator.evaluate(fields, name, rule, force_return)?
                    {
                        reports.insert(name.clone(), report);
                    }
                }

                let outcome = if !force_return && reports.is_empty() {
                    Outcome::Valid
                } else {
                    Outcome::Fields(reports)
                };
                tracing::debug!(
                    shape = "fields",
                    fields = map.len(),
                    valid = outcome.is_valid(),
                    "validated record"
                );
                Ok(outcome)
            }
        }
    }

    /// Decodes JSON rules and validates the record against them.
    ///
    /// # Errors
    ///
    /// Everything [`Rules::from_json`] and [`Engine::validate`] return.
    pub fn validate_json(
        &self,
        record: &mut Value,
        rules: &Value,
        force_return: bool,
    ) -> Result<Outcome> {
        self.validate(record, &Rules::from_json(rules)?, force_return)
    }

    /// Whether the record passes every rule.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::validate`].
    pub fn is_valid(&self, record: &mut Value, rules: &Rules) -> Result<bool> {
        Ok(matches!(self.validate(record, rules, false)?, Outcome::Valid))
    }

    /// Evaluates a single field of a record.
    ///
    /// `rules` is the full rule map, consulted when a dependency marker
    /// refers to another field. Fields missing from it have no rules.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::validate`], except for the missing-record check.
    pub fn evaluate_field(
        &self,
        record: &mut Record,
        field: &str,
        rule: &FieldRule,
        rules: &RuleMap,
        force_return: bool,
    ) -> Result<FieldOutcome> {
        FieldEvaluator::new(self, rules).evaluate(record, field, rule, force_return)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{FieldDescriptor, RuleSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn falsy_record_is_rejected() {
        let engine = Engine::new();
        let rules = Rules::fields([("a", "required")]);
        for record in [json!(null), json!(false), json!(0), json!("")] {
            let mut record = record;
            assert!(matches!(
                engine.validate(&mut record, &rules, false),
                Err(EngineError::MissingTarget { .. })
            ));
        }
    }

    #[test]
    fn whole_record_restores_value() {
        let engine = Engine::new();
        let rules = Rules::from(FieldDescriptor::new("object").with_module("title", "Payload"));
        let mut record = json!({"a": 1});
        assert_eq!(engine.validate(&mut record, &rules, false).unwrap(), Outcome::Valid);
        assert_eq!(record, json!({"a": 1}));

        let mut record = json!("text");
        let outcome = engine.validate(&mut record, &rules, false).unwrap();
        assert_eq!(record, json!("text"));
        assert!(!outcome.is_valid());
    }

    #[test]
    fn forced_runs_report_every_field() {
        let engine = Engine::new();
        let rules = Rules::fields([
            ("a", FieldRule::from("required")),
            ("b", FieldRule::specs([("minLength", RuleSpec::from_values([2]))])),
        ]);
        let mut record = json!({"a": "x", "b": "yy"});
        let outcome = engine.validate(&mut record, &rules, true).unwrap();
        assert!(outcome.is_valid());
        assert_eq!(outcome.failed_fields().count(), 0);
        assert!(outcome.field("a").is_some());
        assert!(outcome.field("b").is_some());
    }

    #[test]
    fn non_object_record_reads_null_fields() {
        let engine = Engine::new();
        let rules = Rules::fields([("a", "required")]);
        let mut record = json!([1, 2]);
        let outcome = engine.validate(&mut record, &rules, false).unwrap();
        assert_eq!(outcome.failed_fields().collect::<Vec<_>>(), ["a"]);
        assert_eq!(record, json!([1, 2]));
    }
}
