//! Sandbox error types

use std::path::PathBuf;
use thiserror::Error;

/// Log file resolution errors
///
/// Policy rejections and OS-level failures are distinct variants; see
/// [`SandboxError::is_policy_violation`].
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The running executable could not be located
    #[error("resolve executable path: {0}")]
    ExecutablePath(#[source] std::io::Error),

    /// Filename rejected by the sandbox policy
    #[error("invalid log file name {name:?}: {reason}")]
    InvalidFileName { name: String, reason: &'static str },

    /// Resolved path lies outside the base directory
    #[error("log file {} escapes base directory {}", path.display(), base.display())]
    EscapesBaseDirectory { path: PathBuf, base: PathBuf },

    /// Final component is a symlink whose target cannot be verified
    #[error("log file {} is a symlink that cannot be verified", path.display())]
    SymlinkRejected { path: PathBuf },

    /// Symlink resolution failed
    #[error("resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS refused to open the file
    #[error("couldn't open {name} logfile: {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl SandboxError {
    pub(crate) fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidFileName {
            name: name.into(),
            reason,
        }
    }

    pub(crate) fn resolve(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Resolve {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn open(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Open {
            name: name.into(),
            source,
        }
    }

    /// True for sandbox-policy rejections, false for OS-level failures
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidFileName { .. }
                | Self::EscapesBaseDirectory { .. }
                | Self::SymlinkRejected { .. }
        )
    }
}
