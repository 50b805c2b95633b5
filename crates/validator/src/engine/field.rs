use serde_json::Value;

use super::Engine;
use super::message::format_message;
use crate::error::{EngineError, Result};
use crate::modules::ModuleScope;
use crate::outcome::{ErrorMap, FieldError, FieldOutcome, FieldReport};
use crate::rule::{Arg, Args, FieldRule, Param, Record, RuleMap, normalize, resolve_values};
use crate::value::{is_blank, to_display_string};

static NULL: Value = Value::Null;

pub(super) fn field_value<'r>(record: &'r Record, field: &str) -> &'r Value {
    record.get(field).unwrap_or(&NULL)
}

/// Arguments for one validator call, plus their placeholder renderings.
#[derive(Debug, Default)]
struct Resolved {
    args: Args,
    display: Vec<String>,
}

impl Resolved {
    fn push(&mut self, arg: Arg, display: String) {
        self.args.push(arg);
        self.display.push(display);
    }
}

/// Evaluates fields of one rule map, tracking the chain of fields whose
/// dependencies are currently being resolved.
pub(super) struct FieldEvaluator<'a> {
    engine: &'a Engine,
    rules: &'a RuleMap,
    resolving: Vec<String>,
}

impl<'a> FieldEvaluator<'a> {
    pub(super) fn new(engine: &'a Engine, rules: &'a RuleMap) -> Self {
        Self {
            engine,
            rules,
            resolving: Vec::new(),
        }
    }

    pub(super) fn evaluate(
        &mut self,
        record: &mut Record,
        field: &str,
        rule: &FieldRule,
        force_return: bool,
    ) -> Result<FieldOutcome> {
        self.resolving.push(field.to_owned());
        let outcome = self.evaluate_rule(record, field, rule, force_return);
        self.resolving.pop();
        outcome
    }

    fn evaluate_rule(
        &mut self,
        record: &mut Record,
        field: &str,
        rule: &FieldRule,
        force_return: bool,
    ) -> Result<FieldOutcome> {
        let engine = self.engine;
        let canonical = normalize(rule);

        // Every name must resolve before anything runs against the record.
        let validators = canonical
            .validators
            .iter()
            .map(|(name, spec)| Ok((name.as_str(), spec, engine.validators().get(name)?)))
            .collect::<Result<Vec<_>>>()?;

        let modules = {
            let mut scope = ModuleScope::new(engine, record, field, &canonical);
            engine.modules().run_all(&mut scope)?
        };

        let strict = engine.config().strict;
        let mut errors = ErrorMap::new();
        for (name, spec, entry) in validators {
            if !entry.is_required_class() && !strict && is_blank(field_value(record, field)) {
                tracing::trace!(field, validator = name, "blank value, validator skipped");
                continue;
            }

            let params = resolve_values(record, spec);
            let Some(resolved) = self.resolve_params(record, field, name, params)? else {
                continue;
            };

            let actual = entry.check(field_value(record, field), &resolved.args);
            if actual == spec.expected(record, &resolved.args) {
                continue;
            }

            let message = spec.message.as_ref().unwrap_or_else(|| entry.default_message());
            let template = message.template(record, &resolved.args);
            tracing::trace!(field, validator = name, "validator failed");
            errors.insert(
                name.to_owned(),
                FieldError::Message(format_message(&template, &resolved.display)),
            );
        }

        errors.extend(modules.errors);

        if !force_return && errors.is_empty() {
            Ok(FieldOutcome::Valid)
        } else {
            Ok(FieldOutcome::Checked(FieldReport {
                errors,
                aux: modules.aux,
            }))
        }
    }

    /// Turns resolved parameters into call arguments.
    ///
    /// Returns `None` when a referenced field fails its own rules; that field
    /// reports the failure, so the dependent validator is not run.
    fn resolve_params(
        &mut self,
        record: &mut Record,
        field: &str,
        validator: &str,
        params: Vec<Param>,
    ) -> Result<Option<Resolved>> {
        let mut resolved = Resolved::default();
        for param in params {
            match param {
                Param::Literal(value) => {
                    let display = to_display_string(&value);
                    resolved.push(Arg::Value(value), display);
                }
                Param::Computed(f) => {
                    let value = f(record);
                    let display = to_display_string(&value);
                    resolved.push(Arg::Value(value), display);
                }
                Param::Predicate(f) => resolved.push(Arg::Predicate(f), "[function]".to_owned()),
                Param::DependsOn(dependency) => {
                    if !self.resolve_dependency(record, &dependency)? {
                        tracing::debug!(
                            field,
                            validator,
                            dependency = %dependency,
                            "dependency failed validation, validator skipped"
                        );
                        return Ok(None);
                    }
                    let value = field_value(record, &dependency).clone();
                    resolved.push(Arg::Value(value), dependency);
                }
            }
        }
        Ok(Some(resolved))
    }

    /// Validates a referenced field, failing on a dependency cycle.
    fn resolve_dependency(&mut self, record: &mut Record, dependency: &str) -> Result<bool> {
        if self.resolving.iter().any(|f| f == dependency) {
            let mut path = self.resolving.clone();
            path.push(dependency.to_owned());
            tracing::warn!(path = %path.join(" -> "), "cyclic field dependency");
            return Err(EngineError::CyclicDependency { path });
        }
        let rules = self.rules;
        let undeclared = FieldRule::default();
        let rule = rules.get(dependency).unwrap_or(&undeclared);
        let outcome = self.evaluate(record, dependency, rule, false)?;
        Ok(matches!(outcome, FieldOutcome::Valid))
    }
}
