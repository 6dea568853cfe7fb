//! Interpreter configuration
//!
//! Read from TOML:
//!
//! ```toml
//! memory_size = 30000
//! input_hint = "value"
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::memory::DEFAULT_MEMORY_SIZE;

const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(DEFAULT_MEMORY_SIZE - 1);

/// Default prefix for input prompts
pub const DEFAULT_INPUT_HINT: &str = "enter value";

/// Errors loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Contents are not a valid configuration
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Interpreter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of memory cells; 0 selects the default
    pub memory_size: usize,

    /// Prefix of the hint passed to the input capability
    pub input_hint: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            input_hint: DEFAULT_INPUT_HINT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the number of memory cells
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    /// Set the input hint prefix
    pub fn with_input_hint(mut self, hint: impl Into<String>) -> Self {
        self.input_hint = hint.into();
        self
    }

    /// Tape capacity, substituting the default for 0
    pub fn memory_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_size).unwrap_or(DEFAULT_CAPACITY)
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.memory_size, 4096);
        assert_eq!(config.memory_capacity().get(), 4096);
        assert_eq!(config.input_hint, "enter value");
    }

    #[test]
    fn test_zero_memory_falls_back_to_default() {
        let config = EngineConfig::default().with_memory_size(0);
        assert_eq!(config.memory_capacity().get(), DEFAULT_MEMORY_SIZE);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
memory_size = 16
input_hint = "value"
"#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.memory_size, 16);
        assert_eq!(config.input_hint, "value");
    }

    #[test]
    fn test_parse_partial_config() {
        let config = EngineConfig::from_toml_str("memory_size = 8").unwrap();
        assert_eq!(config.memory_size, 8);
        assert_eq!(config.input_hint, DEFAULT_INPUT_HINT);
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_toml_str("memory_size = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "memory_size = 32").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.memory_size, 32);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("rill.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
