//! Rule declarations.
//!
//! A [`FieldRule`] accepts every shape a rule map author may write: a single
//! validator name, a list of names, a map of validator name to [`RuleSpec`],
//! or a full [`FieldDescriptor`] carrying module configuration next to the
//! validators. [`normalize`] maps every shape onto one [`CanonicalRule`].
//!
//! # Examples
//!
//! ```
//! use fieldcheck_validator::rule::{FieldDescriptor, FieldRule, Param, RuleSpec, Rules};
//!
//! let rules = Rules::fields([
//!     ("email", FieldRule::from(["required", "email"])),
//!     (
//!         "confirm",
//!         FieldRule::specs([(
//!             "equalsToField",
//!             RuleSpec::new().with_value(Param::depends_on("email")),
//!         )]),
//!     ),
//!     (
//!         "nickname",
//!         FieldDescriptor::new(FieldRule::specs([("minLength", RuleSpec::from_values([3]))]))
//!             .with_module("trimValue", true)
//!             .into(),
//!     ),
//! ]);
//! assert!(matches!(rules, Rules::Fields(_)));
//! ```

mod args;
mod json;
mod normalize;
mod resolve;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

pub use args::{Arg, Args};
pub use normalize::{CanonicalRule, normalize};
pub use resolve::{resolve_values, values_from_json};

/// A record under validation: field name to value.
pub type Record = Map<String, Value>;

/// Lazy parameter, evaluated against the record when a rule is resolved.
pub type ComputeFn = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Caller-supplied predicate passed as a validator parameter.
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Message computed from the record and the resolved parameters.
pub type MessageFn = Arc<dyn Fn(&Record, &Args) -> String + Send + Sync>;

/// Expected result computed from the record and the resolved parameters.
pub type ExpectFn = Arc<dyn Fn(&Record, &Args) -> bool + Send + Sync>;

/// Field-keyed rule map.
pub type RuleMap = IndexMap<String, FieldRule>;

// ============================================================================
// PARAMETERS
// ============================================================================

/// One entry of a rule's `values` sequence.
#[derive(Clone)]
pub enum Param {
    /// A plain value passed through unchanged.
    Literal(Value),
    /// Computed from the record at resolution time.
    Computed(ComputeFn),
    /// Stands for another field's value once that field validates.
    DependsOn(String),
    /// A function-valued parameter, consumed by `customFunction`.
    Predicate(PredicateFn),
}

impl Param {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    pub fn depends_on(field: impl Into<String>) -> Self {
        Self::DependsOn(field.into())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// The referenced field, when this is a dependency marker.
    #[must_use]
    pub fn dependency(&self) -> Option<&str> {
        match self {
            Self::DependsOn(field) => Some(field),
            _ => None,
        }
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Literal(value.into())
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Self::Literal(value.into())
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Literal(value.into())
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Literal(value.into())
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
            Self::DependsOn(field) => f.debug_tuple("DependsOn").field(field).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Arc::ptr_eq(a, b),
            (Self::DependsOn(a), Self::DependsOn(b)) => a == b,
            (Self::Predicate(a), Self::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// MESSAGE / EXPECTATION
// ============================================================================

/// An error message template, or a function producing one.
///
/// Templates may reference resolved parameters positionally: `{0}`, `{1}`, ...
#[derive(Clone)]
pub enum Message {
    Text(Cow<'static, str>),
    Computed(MessageFn),
}

impl Message {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Record, &Args) -> String + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Produces the raw template for one failure.
    pub(crate) fn template(&self, record: &Record, args: &Args) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_ref()),
            Self::Computed(f) => Cow::Owned(f(record, args)),
        }
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The result a validator must return for the value to count as valid.
#[derive(Clone)]
pub enum Expectation {
    Literal(bool),
    Computed(ExpectFn),
}

impl Expectation {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Record, &Args) -> bool + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    pub(crate) fn evaluate(&self, record: &Record, args: &Args) -> bool {
        match self {
            Self::Literal(expected) => *expected,
            Self::Computed(f) => f(record, args),
        }
    }
}

impl From<bool> for Expectation {
    fn from(expected: bool) -> Self {
        Self::Literal(expected)
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(expected) => f.debug_tuple("Literal").field(expected).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl PartialEq for Expectation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// RULE SPEC
// ============================================================================

/// Parameters for one validator on one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSpec {
    /// Parameters passed to the validator after the field value.
    pub values: Vec<Param>,
    /// Overrides the validator's default message.
    pub message: Option<Message>,
    /// Overrides the default expected result (`true`).
    pub expected_result: Option<Expectation>,
}

impl RuleSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A spec whose only content is its parameters.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        Self::new().with_values(values)
    }

    /// Appends one parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value(mut self, value: impl Into<Param>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Appends several parameters.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Record, &Args) -> String + Send + Sync + 'static,
    {
        self.with_message(Message::computed(f))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn expect(mut self, expected: impl Into<Expectation>) -> Self {
        self.expected_result = Some(expected.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn expect_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Record, &Args) -> bool + Send + Sync + 'static,
    {
        self.expect(Expectation::computed(f))
    }

    pub(crate) fn expected(&self, record: &Record, args: &Args) -> bool {
        self.expected_result
            .as_ref()
            .is_none_or(|expected| expected.evaluate(record, args))
    }
}

/// `true`/`false` is shorthand for the expected result.
impl From<bool> for RuleSpec {
    fn from(expected: bool) -> Self {
        Self::new().expect(expected)
    }
}

/// A bare string is shorthand for the message.
impl From<&'static str> for RuleSpec {
    fn from(message: &'static str) -> Self {
        Self::new().with_message(message)
    }
}

impl From<String> for RuleSpec {
    fn from(message: String) -> Self {
        Self::new().with_message(message)
    }
}

impl From<Vec<Param>> for RuleSpec {
    fn from(values: Vec<Param>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

// ============================================================================
// FIELD RULES
// ============================================================================

/// The validators part of a rule: any shape short of a full descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorSet {
    /// A single validator name.
    Name(String),
    /// Validator names, each with its default spec.
    List(Vec<String>),
    /// Validator name to spec, in declaration order.
    Specs(IndexMap<String, RuleSpec>),
}

impl Default for ValidatorSet {
    fn default() -> Self {
        Self::Specs(IndexMap::new())
    }
}

impl From<&str> for ValidatorSet {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ValidatorSet {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl<const N: usize> From<[&str; N]> for ValidatorSet {
    fn from(names: [&str; N]) -> Self {
        Self::List(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

impl From<Vec<String>> for ValidatorSet {
    fn from(names: Vec<String>) -> Self {
        Self::List(names)
    }
}

impl From<IndexMap<String, RuleSpec>> for ValidatorSet {
    fn from(specs: IndexMap<String, RuleSpec>) -> Self {
        Self::Specs(specs)
    }
}

/// Descriptors cannot nest; a descriptor's validators keep their own shape.
impl From<FieldRule> for ValidatorSet {
    fn from(rule: FieldRule) -> Self {
        match rule {
            FieldRule::Name(name) => Self::Name(name),
            FieldRule::List(names) => Self::List(names),
            FieldRule::Specs(specs) => Self::Specs(specs),
            FieldRule::Descriptor(descriptor) => descriptor.validators,
        }
    }
}

/// Configuration handed to a module.
#[derive(Clone)]
pub enum ModuleConfig {
    /// Plain data such as `true`, a default value, or a label.
    Value(Value),
    /// A nested rule set, used by `objectValidator`.
    Rules(Rules),
    /// A function of the record, used by `customFunction`.
    Function(ComputeFn),
}

impl ModuleConfig {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the config switches its module on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Value(value) => crate::value::is_truthy(value),
            Self::Rules(_) | Self::Function(_) => true,
        }
    }
}

impl From<Value> for ModuleConfig {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for ModuleConfig {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for ModuleConfig {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for ModuleConfig {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<Rules> for ModuleConfig {
    fn from(rules: Rules) -> Self {
        Self::Rules(rules)
    }
}

impl fmt::Debug for ModuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Rules(rules) => f.debug_tuple("Rules").field(rules).finish(),
            Self::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

impl PartialEq for ModuleConfig {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Rules(a), Self::Rules(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Validators plus module configuration for one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescriptor {
    pub validators: ValidatorSet,
    pub modules: IndexMap<String, ModuleConfig>,
}

impl FieldDescriptor {
    pub fn new(validators: impl Into<ValidatorSet>) -> Self {
        Self {
            validators: validators.into(),
            modules: IndexMap::new(),
        }
    }

    /// Attaches a module configuration under the module's name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_module(mut self, name: impl Into<String>, config: impl Into<ModuleConfig>) -> Self {
        self.modules.insert(name.into(), config.into());
        self
    }
}

/// The validation configuration attached to one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    Name(String),
    List(Vec<String>),
    Specs(IndexMap<String, RuleSpec>),
    Descriptor(FieldDescriptor),
}

impl FieldRule {
    /// Builds a spec map in declaration order.
    pub fn specs<I, K, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<RuleSpec>,
    {
        Self::Specs(
            specs
                .into_iter()
                .map(|(name, spec)| (name.into(), spec.into()))
                .collect(),
        )
    }
}

impl Default for FieldRule {
    fn default() -> Self {
        Self::Specs(IndexMap::new())
    }
}

impl From<&str> for FieldRule {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for FieldRule {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl<const N: usize> From<[&str; N]> for FieldRule {
    fn from(names: [&str; N]) -> Self {
        Self::List(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

impl From<Vec<String>> for FieldRule {
    fn from(names: Vec<String>) -> Self {
        Self::List(names)
    }
}

impl From<IndexMap<String, RuleSpec>> for FieldRule {
    fn from(specs: IndexMap<String, RuleSpec>) -> Self {
        Self::Specs(specs)
    }
}

impl From<FieldDescriptor> for FieldRule {
    fn from(descriptor: FieldDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

impl From<ValidatorSet> for FieldRule {
    fn from(set: ValidatorSet) -> Self {
        match set {
            ValidatorSet::Name(name) => Self::Name(name),
            ValidatorSet::List(names) => Self::List(names),
            ValidatorSet::Specs(specs) => Self::Specs(specs),
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Top-level input to the object evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Rules {
    /// Field name to field rule.
    Fields(RuleMap),
    /// One descriptor applied to the whole record as a single value.
    Whole(FieldDescriptor),
}

impl Rules {
    pub fn fields<I, K, R>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<FieldRule>,
    {
        Self::Fields(
            fields
                .into_iter()
                .map(|(name, rule)| (name.into(), rule.into()))
                .collect(),
        )
    }
}

impl From<RuleMap> for Rules {
    fn from(map: RuleMap) -> Self {
        Self::Fields(map)
    }
}

impl From<FieldDescriptor> for Rules {
    fn from(descriptor: FieldDescriptor) -> Self {
        Self::Whole(descriptor)
    }
}
