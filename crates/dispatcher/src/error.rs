//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Only construction can fail; record handling and teardown report to the
/// diagnostic target instead of returning errors.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// A log file is already owned by the lifecycle manager
    #[error("log file already adopted: {path}")]
    FileAlreadyAdopted { path: String },
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
