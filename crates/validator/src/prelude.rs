//! Prelude module for convenient imports.
//!
//! ```
//! use fieldcheck_validator::prelude::*;
//!
//! let engine = Engine::with_config(EngineConfig::new().with_strict(true));
//! let rules = Rules::fields([("name", FieldRule::from(["required", "validTextString"]))]);
//! # let _ = (engine, rules);
//! ```

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::config::EngineConfig;
pub use crate::engine::{Engine, format_message};
pub use crate::error::{EngineError, Result};

// ============================================================================
// RULES
// ============================================================================

pub use crate::rule::{
    Arg, Args, CanonicalRule, Expectation, FieldDescriptor, FieldRule, Message, ModuleConfig,
    Param, Record, RuleMap, RuleSpec, Rules, ValidatorSet, normalize,
};

// ============================================================================
// REGISTRIES
// ============================================================================

pub use crate::modules::{ModuleOutput, ModuleRegistry, ModuleScope};
pub use crate::validators::{ValidatorEntry, ValidatorRegistry};

// ============================================================================
// OUTCOMES
// ============================================================================

pub use crate::outcome::{
    ErrorMap, FieldError, FieldOutcome, FieldReport, Outcome, is_valid_result, is_valid_value,
};
