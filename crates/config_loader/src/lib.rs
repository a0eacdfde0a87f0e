//! # Config Loader
//!
//! Configuration loading module.
//!
//! Responsibilities:
//! - Decode TOML/JSON configuration files into `LoggerConfig`
//! - Validate every loaded configuration
//! - Render a configuration back to either format
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("multislog.toml")).unwrap();
//! println!("sinks: {}", config.sink_count());
//! ```

mod parser;
mod validator;

pub use contracts::LoggerConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Every successful load has passed both decoding and validation, so a
/// returned `LoggerConfig` can be handed straight to the logger builder.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// The format comes from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - Unsupported or missing extension
    /// - File read failure
    /// - Decode or validation failure
    pub fn load_from_path(path: &Path) -> Result<LoggerConfig, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// Decode or validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<LoggerConfig, ContractError> {
        let config = format.decode(content)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Render a configuration in `format`
    ///
    /// The output is validated first so a rendered file always loads back.
    pub fn render(config: &LoggerConfig, format: ConfigFormat) -> Result<String, ContractError> {
        validator::validate(config)?;
        format.encode(config)
    }
}
