//! Registry configuration
//!
//! A registry is usually built with defaults. Embedders that keep settings in
//! a TOML file can parse a `RegistryConfig` from it:
//!
//! ```toml
//! # Context key used by `StateRegistry::global()`
//! default_context = "global"
//!
//! # Number of state types the registry reserves room for up front
//! initial_capacity = 10
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Context key used for process-wide ("global") state.
pub const DEFAULT_CONTEXT: &str = "global";

/// Default number of state types to reserve room for.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Errors raised while loading a [`RegistryConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed
    #[error("failed to parse registry config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but holds an unusable value
    #[error("invalid registry config: {0}")]
    Invalid(String),
}

/// Settings for a [`StateRegistry`](crate::StateRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Context key resolved by `global::<T>()`.
    pub default_context: String,
    /// Number of state types to pre-size the registry for.
    pub initial_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_context: DEFAULT_CONTEXT.to_string(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a config from TOML text
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if the config fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config is usable
    ///
    /// # Errors
    ///
    /// The default context key must not be empty: an empty key is what the
    /// thread-local current context holds before it is ever set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_context.is_empty() {
            return Err(ConfigError::Invalid(
                "default_context must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
