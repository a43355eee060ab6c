//! # Arena Configuration
//!
//! Sizing knobs for a [`GraphArena`](crate::GraphArena), loaded once at
//! startup from TOML.
//!
//! ```toml
//! arena_capacity = 67108864
//! title_index_estimate = 2000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a [`GraphArena`](crate::GraphArena).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Byte capacity of the arena every pool draws from. Never grows.
    pub arena_capacity: usize,
    /// Node count the title index is sized for until the walker supplies
    /// a real estimate.
    pub title_index_estimate: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            // 64MB holds a few hundred thousand nodes with their cells
            arena_capacity: 64 * 1024 * 1024,
            title_index_estimate: 1_000,
        }
    }
}

impl ArenaConfig {
    /// Small graphs and tests.
    #[must_use]
    pub const fn small() -> Self {
        Self {
            arena_capacity: 1024 * 1024,
            title_index_estimate: 100,
        }
    }

    /// Large generated graphs (call graphs, dependency dumps).
    #[must_use]
    pub const fn large() -> Self {
        Self {
            arena_capacity: 512 * 1024 * 1024,
            title_index_estimate: 50_000,
        }
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys fall back to [`ArenaConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the errors of [`ArenaConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_capacity == 0 {
            return Err(ConfigError::Invalid(
                "arena_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ArenaConfig::from_toml_str("title_index_estimate = 42").unwrap();
        assert_eq!(config.title_index_estimate, 42);
        assert_eq!(config.arena_capacity, ArenaConfig::default().arena_capacity);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ArenaConfig::from_toml_str("arena_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = ArenaConfig::from_toml_str("arena_capacity = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ArenaConfig::from_file("/nonexistent/graph_arena.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
