use indexmap::IndexMap;

use super::{FieldDescriptor, FieldRule, ModuleConfig, RuleSpec, ValidatorSet};

/// The one shape every field rule reduces to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRule {
    /// Validator name to spec, in evaluation order.
    pub validators: IndexMap<String, RuleSpec>,
    /// Module name to configuration, in evaluation order.
    pub modules: IndexMap<String, ModuleConfig>,
}

impl CanonicalRule {
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleConfig> {
        self.modules.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty() && self.modules.is_empty()
    }
}

/// Reduces any accepted rule shape to a [`CanonicalRule`].
///
/// The result owns its own copy of the rule, so the caller's declaration is
/// never mutated by evaluation. A name list gives every validator the default
/// spec, expecting `true`; repeated names collapse onto the first position.
#[must_use]
pub fn normalize(rule: &FieldRule) -> CanonicalRule {
    match rule {
        FieldRule::Descriptor(FieldDescriptor { validators, modules }) => CanonicalRule {
            validators: normalize_set(validators),
            modules: modules.clone(),
        },
        FieldRule::Name(name) => CanonicalRule {
            validators: name_specs(std::slice::from_ref(name)),
            modules: IndexMap::new(),
        },
        FieldRule::List(names) => CanonicalRule {
            validators: name_specs(names),
            modules: IndexMap::new(),
        },
        FieldRule::Specs(specs) => CanonicalRule {
            validators: specs.clone(),
            modules: IndexMap::new(),
        },
    }
}

fn normalize_set(set: &ValidatorSet) -> IndexMap<String, RuleSpec> {
    match set {
        ValidatorSet::Name(name) => name_specs(std::slice::from_ref(name)),
        ValidatorSet::List(names) => name_specs(names),
        ValidatorSet::Specs(specs) => specs.clone(),
    }
}

fn name_specs(names: &[String]) -> IndexMap<String, RuleSpec> {
    let mut specs = IndexMap::with_capacity(names.len());
    for name in names {
        specs
            .entry(name.clone())
            .or_insert_with(|| RuleSpec::from(true));
    }
    specs
}

/// A canonical rule is itself an accepted shape, which makes normalizing idempotent.
impl From<CanonicalRule> for FieldRule {
    fn from(rule: CanonicalRule) -> Self {
        Self::Descriptor(FieldDescriptor {
            validators: ValidatorSet::Specs(rule.validators),
            modules: rule.modules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Expectation, Param};
    use pretty_assertions::assert_eq;

    #[test]
    fn name_becomes_single_default_spec() {
        let canonical = normalize(&FieldRule::from("required"));
        assert_eq!(canonical.validators.len(), 1);
        assert_eq!(
            canonical.validators["required"].expected_result,
            Some(Expectation::Literal(true))
        );
        assert!(canonical.modules.is_empty());
    }

    #[test]
    fn list_keeps_order_and_collapses_repeats() {
        let canonical = normalize(&FieldRule::from(["email", "required", "email"]));
        let names: Vec<_> = canonical.validators.keys().map(String::as_str).collect();
        assert_eq!(names, ["email", "required"]);
    }

    #[test]
    fn descriptor_keeps_modules() {
        let rule = FieldRule::from(
            FieldDescriptor::new(["required"])
                .with_module("trimValue", true)
                .with_module("title", "Name"),
        );
        let canonical = normalize(&rule);
        let modules: Vec<_> = canonical.modules.keys().map(String::as_str).collect();
        assert_eq!(modules, ["trimValue", "title"]);
        assert!(canonical.validators.contains_key("required"));
    }

    #[test]
    fn normalizing_is_idempotent() {
        let rule = FieldRule::specs([(
            "minLength",
            RuleSpec::from_values([Param::literal(3)]).with_message("too short"),
        )]);
        let once = normalize(&rule);
        let twice = normalize(&FieldRule::from(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_rule_normalizes_to_empty() {
        assert!(normalize(&FieldRule::default()).is_empty());
    }
}
