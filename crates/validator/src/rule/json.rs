//! Decoding rule maps from declarative JSON.
//!
//! Only data can be expressed this way. Computed parameters, computed
//! messages and function modules require the Rust builders.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::resolve::values_from_json;
use super::{
    Expectation, FieldDescriptor, FieldRule, Message, ModuleConfig, RuleMap, RuleSpec, Rules,
    ValidatorSet,
};
use crate::engine::WHOLE_RECORD_FIELD;
use crate::error::{EngineError, Result};
use crate::value::value_type_name;

impl RuleSpec {
    /// Reads one validator's options.
    ///
    /// `true`/`false` set the expected result and a string sets the message.
    /// An object may carry `values`, `message` and `expectedResult`; any other
    /// value is the `values` payload itself.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRule`] when `message` is not a string or
    /// `expectedResult` is not a boolean.
    pub fn from_json(field: &str, options: &Value) -> Result<Self> {
        match options {
            Value::Bool(expected) => Ok(Self::new().expect(*expected)),
            Value::String(message) => Ok(Self::new().with_message(message.clone())),
            Value::Object(map) => {
                let values = map.get("values").map(values_from_json).unwrap_or_default();
                let message = match map.get("message") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(text)) => Some(Message::from(text.clone())),
                    Some(other) => {
                        return Err(EngineError::invalid_rule(
                            field,
                            format!("message must be a string, got {}", value_type_name(other)),
                        ));
                    }
                };
                let expected_result = match map.get("expectedResult") {
                    None | Some(Value::Null) => None,
                    Some(Value::Bool(expected)) => Some(Expectation::Literal(*expected)),
                    Some(other) => {
                        return Err(EngineError::invalid_rule(
                            field,
                            format!(
                                "expectedResult must be a boolean, got {}",
                                value_type_name(other)
                            ),
                        ));
                    }
                };
                Ok(Self {
                    values,
                    message,
                    expected_result,
                })
            }
            payload => Ok(Self::from(values_from_json(payload))),
        }
    }
}

impl ValidatorSet {
    /// Reads the `validators` entry of a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRule`] for unsupported shapes.
    pub fn from_json(field: &str, validators: &Value) -> Result<Self> {
        match validators {
            Value::String(name) => Ok(Self::Name(name.clone())),
            Value::Array(items) => names_from_json(field, items).map(Self::List),
            Value::Object(map) => specs_from_json(field, map).map(Self::Specs),
            Value::Null => Ok(Self::default()),
            other => Err(EngineError::invalid_rule(
                field,
                format!("validators cannot be a {}", value_type_name(other)),
            )),
        }
    }
}

impl FieldRule {
    /// Reads one field's rule in any of the accepted shapes.
    ///
    /// An object with a `validators` key is a descriptor; its other keys are
    /// module configurations. Any other object maps validator names to options.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRule`] for unsupported shapes.
    pub fn from_json(field: &str, rule: &Value) -> Result<Self> {
        match rule {
            Value::String(name) => Ok(Self::Name(name.clone())),
            Value::Array(items) => names_from_json(field, items).map(Self::List),
            Value::Object(map) if map.contains_key("validators") => {
                descriptor_from_json(field, map).map(Self::Descriptor)
            }
            Value::Object(map) => specs_from_json(field, map).map(Self::Specs),
            Value::Null => Ok(Self::default()),
            other => Err(EngineError::invalid_rule(
                field,
                format!("a rule cannot be a {}", value_type_name(other)),
            )),
        }
    }
}

impl Rules {
    /// Reads a whole rule map.
    ///
    /// A top-level `validators` key selects the whole-record shape; otherwise
    /// every key is a field name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRule`] when the input is not an object or
    /// any field rule is malformed.
    pub fn from_json(rules: &Value) -> Result<Self> {
        match rules {
            Value::Object(map) if map.contains_key("validators") => {
                descriptor_from_json(WHOLE_RECORD_FIELD, map).map(Self::Whole)
            }
            Value::Object(map) => map
                .iter()
                .map(|(field, rule)| Ok((field.clone(), FieldRule::from_json(field, rule)?)))
                .collect::<Result<RuleMap>>()
                .map(Self::Fields),
            other => Err(EngineError::invalid_rule(
                WHOLE_RECORD_FIELD,
                format!("a rule map must be an object, got {}", value_type_name(other)),
            )),
        }
    }
}

fn names_from_json(field: &str, items: &[Value]) -> Result<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            Value::String(name) => Ok(name.clone()),
            other => Err(EngineError::invalid_rule(
                field,
                format!(
                    "validator lists may only contain names, found a {}",
                    value_type_name(other)
                ),
            )),
        })
        .collect()
}

fn specs_from_json(field: &str, map: &Map<String, Value>) -> Result<IndexMap<String, RuleSpec>> {
    map.iter()
        .map(|(name, options)| Ok((name.clone(), RuleSpec::from_json(field, options)?)))
        .collect()
}

fn descriptor_from_json(field: &str, map: &Map<String, Value>) -> Result<FieldDescriptor> {
    let mut descriptor = FieldDescriptor::default();
    for (key, value) in map {
        if key == "validators" {
            descriptor.validators = ValidatorSet::from_json(field, value)?;
        } else {
            descriptor
                .modules
                .insert(key.clone(), ModuleConfig::Value(value.clone()));
        }
    }
    Ok(descriptor)
}
