//! Configuration errors raised by the engine.
//!
//! A field failing its rules is *not* an error: that outcome is data (see
//! [`Outcome`](crate::outcome::Outcome)). The variants here describe mistakes
//! in registration order or rule declarations that the caller has to fix.

/// Error type for engine setup and rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A validator with the same name is already registered.
    #[error("validator `{name}` is already registered")]
    DuplicateValidator { name: String },

    /// A module with the same name is already registered.
    #[error("module `{name}` is already registered")]
    DuplicateModule { name: String },

    /// A rule references a validator that was never registered.
    #[error("unknown validator `{name}`")]
    UnknownValidator { name: String },

    /// A field-keyed rule map was applied to a falsy record.
    #[error("nothing to validate: expected a record, got {found}")]
    MissingTarget { found: &'static str },

    /// Dependency markers form a cycle between fields.
    #[error("cyclic field dependency: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    /// A rule declaration has a shape the normalizer cannot accept.
    #[error("invalid rule for `{field}`: {reason}")]
    InvalidRule { field: String, reason: String },
}

impl EngineError {
    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::DuplicateValidator { .. } | Self::DuplicateModule { .. } => "registration",
            Self::UnknownValidator { .. } => "lookup",
            Self::MissingTarget { .. } => "input",
            Self::CyclicDependency { .. } => "dependency",
            Self::InvalidRule { .. } => "rule",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::DuplicateValidator { .. } => "ENGINE_DUPLICATE_VALIDATOR",
            Self::DuplicateModule { .. } => "ENGINE_DUPLICATE_MODULE",
            Self::UnknownValidator { .. } => "ENGINE_UNKNOWN_VALIDATOR",
            Self::MissingTarget { .. } => "ENGINE_MISSING_TARGET",
            Self::CyclicDependency { .. } => "ENGINE_CYCLIC_DEPENDENCY",
            Self::InvalidRule { .. } => "ENGINE_INVALID_RULE",
        }
    }

    pub(crate) fn invalid_rule(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
