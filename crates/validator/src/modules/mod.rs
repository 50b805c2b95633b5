//! Module registry.
//!
//! Modules are per-field hooks configured next to a field's validators. They
//! run once per field evaluation, before any validator, and may rewrite the
//! field's value, attach metadata to the field's report, or contribute
//! errors of their own.
//!
//! A module receives its own configuration explicitly along with a
//! [`ModuleScope`] giving access to the record under validation.

mod builtin;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::outcome::ErrorMap;
use crate::rule::{CanonicalRule, ModuleConfig, Record};

/// A module function.
pub type ModuleFn =
    Arc<dyn Fn(&ModuleConfig, &mut ModuleScope<'_>) -> Result<Option<ModuleOutput>> + Send + Sync>;

static NULL: Value = Value::Null;

/// What a module hands back to the field evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleOutput {
    /// Attached to the field's report under the module's name.
    Aux(Value),
    /// Merged into the field's errors.
    Errors(ErrorMap),
}

/// The record and field a module runs against.
pub struct ModuleScope<'a> {
    engine: &'a Engine,
    record: &'a mut Record,
    field: &'a str,
    rule: &'a CanonicalRule,
}

impl<'a> ModuleScope<'a> {
    pub(crate) fn new(
        engine: &'a Engine,
        record: &'a mut Record,
        field: &'a str,
        rule: &'a CanonicalRule,
    ) -> Self {
        Self {
            engine,
            record,
            field,
            rule,
        }
    }

    /// Name of the field being evaluated.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field
    }

    /// Current value of the field; absent fields read as `null`.
    #[must_use]
    pub fn value(&self) -> &Value {
        self.record.get(self.field).unwrap_or(&NULL)
    }

    /// Replaces the field's value in the record.
    pub fn set_value(&mut self, value: Value) {
        self.record.insert(self.field.to_owned(), value);
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        self.record
    }

    /// The engine running the evaluation, for nested validation.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        self.engine
    }

    /// Configuration of another module on the same field.
    #[must_use]
    pub fn sibling(&self, module: &str) -> Option<&ModuleConfig> {
        self.rule.module(module)
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.engine.config().strict
    }
}

/// Aux values and errors collected from one field's modules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleResults {
    pub aux: IndexMap<String, Value>,
    pub errors: ErrorMap,
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Append-only map from module name to [`ModuleFn`].
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    entries: IndexMap<String, ModuleFn>,
}

impl ModuleRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in module.
    #[must_use]
    pub fn with_builtins() -> Self {
        let entries = builtin::entries()
            .into_iter()
            .map(|(name, f)| (name.to_owned(), f))
            .collect();
        Self { entries }
    }

    /// Adds a module.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateModule`] if the name is taken; the
    /// existing registration is left untouched.
    pub fn register<F>(&mut self, name: impl Into<String>, module: F) -> Result<()>
    where
        F: Fn(&ModuleConfig, &mut ModuleScope<'_>) -> Result<Option<ModuleOutput>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if self.entries.contains_key(&name) {
            tracing::warn!(module = %name, "rejected duplicate module registration");
            return Err(EngineError::DuplicateModule { name });
        }
        tracing::debug!(module = %name, "registered module");
        self.entries.insert(name, Arc::new(module));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleFn> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

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

    /// Runs every registered module configured on the scope's field, in
    /// configuration order. Configuration keys naming no registered module
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Propagates the first module error.
    pub fn run_all(&self, scope: &mut ModuleScope<'_>) -> Result<ModuleResults> {
        let mut results = ModuleResults::default();
        let rule = scope.rule;
        for (name, config) in &rule.modules {
            let Some(module) = self.entries.get(name) else {
                tracing::trace!(field = scope.field, key = %name, "no module registered for key");
                continue;
            };
            tracing::trace!(field = scope.field, module = %name, "running module");
            match module(config, scope)? {
                None => {}
                Some(ModuleOutput::Aux(value)) => {
                    results.aux.insert(name.clone(), value);
                }
                Some(ModuleOutput::Errors(errors)) => results.errors.extend(errors),
            }
        }
        Ok(results)
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_present() {
        let registry = ModuleRegistry::with_builtins();
        for name in [
            "trimValue",
            "defaultValue",
            "int",
            "float",
            "roundedFloat",
            "objectValidator",
            "customFunction",
            "title",
        ] {
            assert!(registry.contains(name), "{name} missing");
        }
        assert!(!registry.contains("target"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ModuleRegistry::with_builtins();
        let before = registry.len();
        let err = registry
            .register("title", |_: &ModuleConfig, _: &mut ModuleScope<'_>| Ok(None))
            .unwrap_err();
        assert_eq!(err.code(), "ENGINE_DUPLICATE_MODULE");
        assert_eq!(registry.len(), before);
    }
}
