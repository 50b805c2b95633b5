//! # fieldcheck-validator
//!
//! Declarative, rule-map driven validation of dynamically typed records.
//!
//! ## Quick Start
//!
//! ```
//! use fieldcheck_validator::prelude::*;
//! use serde_json::json;
//!
//! let engine = Engine::new();
//! let rules = Rules::from_json(&json!({
//!     "email": ["required", "email"],
//!     "password": {"minLength": 8},
//!     "confirm": {"equalsToField": {"values": {"dependsField": "password"}}},
//! }))
//! .unwrap();
//!
//! let mut record = json!({
//!     "email": "neo@example.com",
//!     "password": "correct horse",
//!     "confirm": "correct horse",
//! });
//! assert!(engine.is_valid(&mut record, &rules).unwrap());
//! ```
//!
//! ## Rules
//!
//! A field's rule may be a validator name, a list of names, a map of name to
//! [`RuleSpec`](rule::RuleSpec), or a [`FieldDescriptor`](rule::FieldDescriptor)
//! that also configures [modules](modules). Every shape reduces to one
//! [`CanonicalRule`](rule::CanonicalRule) before evaluation.
//!
//! ## Evaluation
//!
//! For each field the [`Engine`] runs the configured modules, then every
//! validator in declaration order:
//!
//! - non-presence validators skip blank values unless the engine is strict
//! - dependency markers are replaced by the referenced field's value once that
//!   field passes its own rules; if it fails, the dependent validator is skipped
//! - a result differing from the expected one records the formatted message
//!
//! Failing fields are reported as data in an [`Outcome`]. [`EngineError`] is
//! reserved for configuration mistakes.

pub mod config;
pub mod engine;
pub mod error;
pub mod jquery;
pub mod modules;
pub mod outcome;
pub mod patterns;
pub mod prelude;
pub mod rule;
pub mod validators;
pub mod value;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use outcome::{Outcome, is_valid_result, is_valid_value};
