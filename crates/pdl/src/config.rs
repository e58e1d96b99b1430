//! Front-end configuration (pdl.toml)
//!
//! ```toml
//! [parser]
//! max_template_depth = 4
//! max_nesting_depth = 128
//!
//! [schema]
//! auto_correct = true
//! extract_fenced = false
//! max_depth = 32
//! ```
//!
//! Every key is optional and falls back to its default.

use pdl_parser::ParserConfig;
use pdl_schema::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Settings for every stage of the front end
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontendConfig {
    /// Parser limits
    pub parser: ParserConfig,
    /// Defaults for decoding model output
    pub schema: DecodeOptions,
}

impl FrontendConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FrontendConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every limit is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parser.max_nesting_depth == 0 {
            return Err(ConfigError::ValidationError(
                "parser.max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if self.schema.max_depth == 0 {
            return Err(ConfigError::ValidationError(
                "schema.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
