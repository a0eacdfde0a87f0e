//! # Sandbox
//!
//! Log file path sandboxing.
//!
//! Responsibilities:
//! - Resolve the base directory (the running executable's own directory)
//! - Reject names that traverse, nest, or address absolute paths
//! - Catch symlinks that lead outside the base directory
//! - Open with the requested append/truncate and permission policy
//!
//! # Example
//!
//! ```no_run
//! use sandbox::{SandboxConfig, SandboxResolver};
//!
//! let opened = SandboxResolver::for_current_exe()
//!     .open(&SandboxConfig::new("app.log", false, false))
//!     .unwrap();
//! println!("logging to {}", opened.path.display());
//! ```

mod error;
mod resolver;

pub use error::SandboxError;
pub use resolver::{
    open_log_file, SandboxConfig, SandboxResolver, SandboxedFile, PERM_OWNER_ONLY,
    PERM_WORLD_READ,
};
