//! # Contracts
//!
//! Frozen interface contracts shared by every multislog crate: the record
//! model, the `Sink` capability set, the error taxonomy and the logger
//! configuration model.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Records are stamped in UTC at creation (`chrono_tz::Tz::UTC`)
//! - The dispatcher may rewrite the timestamp into one configured timezone,
//!   once, before any sink observes the record

mod config;
mod context;
mod error;
mod level;
mod record;
mod sink;

pub use config::*;
pub use context::AttrContext;
pub use error::*;
pub use level::Level;
pub use record::*;
pub use sink::*;

/// `tracing` target used for the library's own diagnostics.
///
/// Sink failures and teardown failures are reported on this target and never
/// raised to the caller that emitted the record.
pub const DIAGNOSTIC_TARGET: &str = "multislog::diagnostic";
