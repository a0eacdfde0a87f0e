//! ConsoleSink - logfmt-style text lines on stderr

use parking_lot::Mutex;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;

use contracts::{Attr, AttrContext, ContractError, Level, LogRecord, Sink};

use super::flatten_attrs;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Sink that writes one `key=value` text line per record
#[derive(Clone)]
pub struct ConsoleSink {
    name: String,
    level: Level,
    context: AttrContext,
    writer: SharedWriter,
}

impl ConsoleSink {
    /// Create a ConsoleSink writing to stderr
    pub fn new(level: Level) -> Self {
        Self::with_writer(level, std::io::stderr())
    }

    /// Create a ConsoleSink writing to `writer`
    pub fn with_writer(level: Level, writer: impl Write + Send + 'static) -> Self {
        Self {
            name: "console".to_string(),
            level,
            context: AttrContext::new(),
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Override the sink name used in diagnostics
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn format_line(&self, record: &LogRecord) -> String {
        let mut line = String::with_capacity(128);
        let _ = write!(
            line,
            "time={} level={} msg={}",
            record.rfc3339(),
            record.level(),
            quote_if_needed(record.message())
        );
        for (key, value) in flatten_attrs(&self.context.resolve(record.attrs())) {
            let _ = write!(line, " {}={}", quote_if_needed(&key), quote_if_needed(&value));
        }
        line.push('\n');
        line
    }

    fn derived(&self, context: AttrContext) -> Arc<dyn Sink> {
        Arc::new(Self {
            context,
            ..self.clone()
        })
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c == ' ' || c == '=' || c == '"' || c.is_control() || c == '\u{FFFD}')
}

fn quote_if_needed(s: &str) -> String {
    if needs_quoting(s) {
        format!("{s:?}")
    } else {
        s.to_string()
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        self.level.admits(level)
    }

    fn handle(&self, record: &LogRecord) -> Result<(), ContractError> {
        let line = self.format_line(record);
        self.writer
            .lock()
            .write_all(line.as_bytes())
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derived(self.context.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derived(self.context.with_group(name))
    }

    fn close(&self) -> Result<(), ContractError> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| ContractError::sink_close(&self.name, e.to_string()))
    }
}
