//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Settings applied to every evaluation run by one engine.
///
/// ```
/// use fieldcheck_validator::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"strict": true}"#).unwrap();
/// assert!(config.strict);
/// assert!(!EngineConfig::default().strict);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When set, blank values no longer skip non-presence validators and
    /// nested object validation reports missing records as errors.
    pub strict: bool,
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn builder_sets_strict() {
        assert!(EngineConfig::new().with_strict(true).strict);
    }
}
