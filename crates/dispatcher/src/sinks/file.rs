//! FileSink - JSON lines into the managed log file

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;
use tracing::{debug, instrument};

use contracts::{Attr, AttrContext, ContractError, Level, LogRecord, Sink};

use crate::lifecycle::LogFileWriter;

/// Sink that writes one JSON object per record to the log file.
///
/// Holds a write-only reference; the file itself belongs to the lifecycle
/// manager and is never closed here.
#[derive(Clone)]
pub struct FileSink {
    name: String,
    level: Level,
    context: AttrContext,
    writer: LogFileWriter,
}

/// One encoded line: `time`, `level`, `msg`, then the attributes
struct JsonLine<'a> {
    record: &'a LogRecord,
    attrs: &'a [Attr],
}

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.attrs.len()))?;
        map.serialize_entry("time", &self.record.rfc3339())?;
        map.serialize_entry("level", self.record.level().as_str())?;
        map.serialize_entry("msg", self.record.message())?;
        for attr in self.attrs {
            map.serialize_entry(&attr.key, &attr.value)?;
        }
        map.end()
    }
}

impl FileSink {
    /// Create a new FileSink
    pub fn new(level: Level, writer: LogFileWriter) -> Self {
        Self {
            name: "file".to_string(),
            level,
            context: AttrContext::new(),
            writer,
        }
    }

    fn encode(&self, record: &LogRecord) -> Result<Vec<u8>, ContractError> {
        let attrs = self.context.resolve(record.attrs());
        let mut line = serde_json::to_vec(&JsonLine {
            record,
            attrs: &attrs,
        })
        .map_err(|e| ContractError::sink_write(&self.name, format!("json error: {e}")))?;
        line.push(b'\n');
        Ok(line)
    }

    fn persist_record(&self, record: &LogRecord) -> Result<(), ContractError> {
        let line = self.encode(record)?;
        self.writer
            .write_all(&line)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    fn derived(&self, context: AttrContext) -> Arc<dyn Sink> {
        Arc::new(Self {
            context,
            ..self.clone()
        })
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        self.level.admits(level)
    }

    fn handle(&self, record: &LogRecord) -> Result<(), ContractError> {
        self.persist_record(record)
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derived(self.context.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derived(self.context.with_group(name))
    }

    /// Flush only; the lifecycle manager closes the file afterwards
    #[instrument(name = "file_sink_close", skip(self))]
    fn close(&self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_close(&self.name, e.to_string()))?;
        debug!(sink = %self.name, "FileSink flushed");
        Ok(())
    }
}
