//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded
    #[error("Failed to load configuration: {0}")]
    Config(#[from] contracts::ContractError),

    /// Malformed `--attr` argument
    #[error("Invalid attribute '{input}': {message}")]
    InvalidAttribute { input: String, message: String },

    /// Logger construction failed
    #[error("Failed to build logger: {0}")]
    Logger(#[from] multislog::MultislogError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_attribute(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
