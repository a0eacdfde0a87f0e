//! # Multislog
//!
//! Structured logging that fans every record out to several independently
//! configured sinks: console, a sandboxed JSON log file and email alerts.
//!
//! `Multislog` composes a [`Dispatcher`] (emission) with a [`Lifecycle`]
//! (teardown). Nothing is registered globally; to route `tracing` events
//! through it, install [`MultislogLayer`] yourself.
//!
//! # Example
//!
//! ```no_run
//! use multislog::{attr, Level, Multislog};
//!
//! let mut log = Multislog::builder()
//!     .timezone("Asia/Hong_Kong")
//!     .console(Level::Info)
//!     .log_file(Level::Debug, "service.log", false, false)
//!     .build()
//!     .unwrap();
//!
//! log.logger().info("service started", &[attr("port", 8080)]);
//! log.close();
//! ```

mod builder;
mod error;
mod layer;
mod logger;

#[cfg(test)]
mod test_support;

pub use builder::MultislogBuilder;
pub use contracts::{attr, Attr, Level, LogRecord, LoggerConfig, Sink, Value};
pub use dispatcher::{EmailSettings, MailTransport, MetricsSnapshot, TeardownReport};
pub use error::MultislogError;
pub use layer::MultislogLayer;
pub use logger::Logger;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dispatcher::{Dispatcher, Lifecycle};

/// A built logger: shared dispatcher plus the teardown owner
pub struct Multislog {
    dispatcher: Arc<Dispatcher>,
    lifecycle: Lifecycle,
    log_file_path: Option<PathBuf>,
}

impl Multislog {
    pub fn builder() -> MultislogBuilder {
        MultislogBuilder::new()
    }

    /// Build from a loaded configuration
    ///
    /// # Errors
    /// Same as [`MultislogBuilder::build`]
    pub fn from_config(config: &LoggerConfig) -> Result<Self, MultislogError> {
        MultislogBuilder::from_config(config).build()
    }

    pub(crate) fn from_parts(
        dispatcher: Dispatcher,
        lifecycle: Lifecycle,
        log_file_path: Option<PathBuf>,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            lifecycle,
            log_file_path,
        }
    }

    pub fn logger(&self) -> Logger {
        Logger::new(Arc::clone(&self.dispatcher))
    }

    /// `tracing` layer emitting through this logger
    pub fn layer(&self) -> MultislogLayer {
        MultislogLayer::new(self.logger())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Resolved path of the log file, if one is enabled
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }

    /// Per-sink counters, in dispatch order
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.dispatcher.metrics()
    }

    /// Close every sink, then the log file. Runs once; later calls and drop
    /// do nothing. Failures go to the diagnostic target.
    pub fn close(&mut self) -> TeardownReport {
        self.lifecycle.close()
    }
}
