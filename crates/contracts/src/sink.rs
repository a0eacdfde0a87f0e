//! Sink trait - Dispatcher output interface
//!
//! Defines the capability set every log destination exposes.

use std::sync::Arc;

use crate::{Attr, ContractError, Level, LogRecord};

/// Log destination
///
/// All sink implementations (console, file, email, test doubles, and the
/// dispatcher itself) implement this trait. Sinks are shared behind
/// `Arc<dyn Sink>` and may be called from several threads at once.
pub trait Sink: Send + Sync {
    /// Sink name (used for diagnostics/metrics)
    fn name(&self) -> &str;

    /// Whether a record at `level` would be handled
    fn enabled(&self, level: Level) -> bool;

    /// Format and write one record
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn handle(&self, record: &LogRecord) -> Result<(), ContractError>;

    /// New sink carrying `attrs` on every record. `self` is not modified.
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink>;

    /// New sink nesting later attributes under `name`. `self` is not modified.
    fn with_group(&self, name: &str) -> Arc<dyn Sink>;

    /// Release resources held by the sink
    ///
    /// Sinks that hold nothing keep the default no-op.
    fn close(&self) -> Result<(), ContractError> {
        Ok(())
    }
}
