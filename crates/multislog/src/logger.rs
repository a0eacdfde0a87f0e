//! Logger - cheap-to-clone emitting handle

use std::sync::Arc;

use contracts::{Attr, Level, LogRecord};
use dispatcher::Dispatcher;

/// Emits records through a shared dispatcher.
///
/// Emission never fails: sink errors go to the diagnostic target.
#[derive(Clone)]
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
}

impl Logger {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// True if at least one sink accepts `level`
    pub fn enabled(&self, level: Level) -> bool {
        contracts::Sink::enabled(self.dispatcher.as_ref(), level)
    }

    pub fn log(&self, level: Level, message: impl Into<String>, attrs: &[Attr]) {
        if !self.enabled(level) {
            return;
        }
        let record = LogRecord::new(level, message).with_attrs(attrs.iter().cloned());
        self.dispatcher.dispatch(&record);
    }

    /// Emit a prebuilt record (timestamp is kept, then normalized)
    pub fn log_record(&self, record: &LogRecord) {
        if self.enabled(record.level()) {
            self.dispatcher.dispatch(record);
        }
    }

    pub fn trace(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Trace, message, attrs);
    }

    pub fn debug(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Debug, message, attrs);
    }

    pub fn info(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Info, message, attrs);
    }

    pub fn warn(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Warn, message, attrs);
    }

    pub fn error(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Error, message, attrs);
    }

    /// New logger whose records all carry `attrs`
    pub fn with_attrs(&self, attrs: &[Attr]) -> Logger {
        Logger::new(Arc::new(self.dispatcher.derive_with_attrs(attrs)))
    }

    /// New logger nesting later attributes under `name`
    pub fn with_group(&self, name: &str) -> Logger {
        Logger::new(Arc::new(self.dispatcher.derive_with_group(name)))
    }
}
