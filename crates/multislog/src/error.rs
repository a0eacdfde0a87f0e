//! Facade error types

use contracts::ContractError;
use dispatcher::DispatcherError;
use sandbox::SandboxError;
use thiserror::Error;

/// Construction errors, distinguishable by kind
#[derive(Debug, Error)]
pub enum MultislogError {
    /// Timezone name is not a known IANA zone
    #[error("invalid timezone '{name}': {message}")]
    InvalidTimezone { name: String, message: String },

    /// Log file name rejected or file could not be opened
    #[error("log file: {0}")]
    Sandbox(#[from] SandboxError),

    /// Only one log file per logger
    #[error("log file already enabled: {path}")]
    LogFileAlreadyEnabled { path: String },

    /// SMTP transport could not be configured
    #[error("email sink: {0}")]
    Email(#[source] DispatcherError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ContractError),
}

impl MultislogError {
    pub fn invalid_timezone(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTimezone {
            name: name.into(),
            message: message.into(),
        }
    }
}
