//! Lifecycle - owns sinks and the log file, tears them down once

use parking_lot::Mutex;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use contracts::{Sink, DIAGNOSTIC_TARGET};

use crate::error::DispatcherError;

type FileSlot = Arc<Mutex<Option<File>>>;

/// The open log file.
///
/// Owned by exactly one [`Lifecycle`]. Sinks only get a [`LogFileWriter`],
/// which can write and flush but never close the descriptor.
#[derive(Debug)]
pub struct ManagedFile {
    slot: FileSlot,
    path: PathBuf,
}

impl ManagedFile {
    pub fn new(file: File, path: impl Into<PathBuf>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(file))),
            path: path.into(),
        }
    }

    /// Resolved path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write-only reference for a sink
    pub fn writer(&self) -> LogFileWriter {
        LogFileWriter {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn is_open(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Flush, sync and release the descriptor.
    ///
    /// Returns `Ok(false)` if it was already released. The descriptor is
    /// dropped even when syncing fails.
    pub(crate) fn close(&self) -> io::Result<bool> {
        let Some(mut file) = self.slot.lock().take() else {
            return Ok(false);
        };
        file.flush()?;
        file.sync_all()?;
        Ok(true)
    }
}

/// Write access to a [`ManagedFile`]
#[derive(Debug, Clone)]
pub struct LogFileWriter {
    slot: FileSlot,
}

impl LogFileWriter {
    /// Append `bytes` as one write
    pub fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        match self.slot.lock().as_mut() {
            Some(file) => file.write_all(bytes),
            None => Err(closed_error()),
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        match self.slot.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "log file already closed")
}

/// Outcome of one teardown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub sinks_closed: usize,
    pub sinks_failed: usize,
    pub file_closed: bool,
    pub file_failed: bool,
}

/// Owns the registered sinks and the optional log file.
///
/// [`close`](Self::close) runs at most once; it also runs on drop.
#[derive(Default)]
pub struct Lifecycle {
    sinks: Vec<Arc<dyn Sink>>,
    log_file: Option<ManagedFile>,
    closed: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink for teardown, in order
    pub fn register_sink(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    /// Take ownership of the log file
    ///
    /// # Errors
    /// A second file is rejected; the lifecycle owns at most one.
    pub fn adopt_file(&mut self, file: ManagedFile) -> Result<(), DispatcherError> {
        if let Some(existing) = &self.log_file {
            return Err(DispatcherError::FileAlreadyAdopted {
                path: existing.path().display().to_string(),
            });
        }
        self.log_file = Some(file);
        Ok(())
    }

    pub fn log_file(&self) -> Option<&ManagedFile> {
        self.log_file.as_ref()
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close every sink in registration order, then the log file.
    ///
    /// Failures are reported on the diagnostic target and teardown moves on.
    /// Later calls do nothing.
    #[instrument(name = "lifecycle_close", skip(self), fields(sinks = self.sinks.len()))]
    pub fn close(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        if self.closed {
            debug!("Lifecycle already closed");
            return report;
        }
        self.closed = true;

        for sink in std::mem::take(&mut self.sinks) {
            match catch_unwind(AssertUnwindSafe(|| sink.close())) {
                Ok(Ok(())) => report.sinks_closed += 1,
                Ok(Err(e)) => {
                    report.sinks_failed += 1;
                    error!(
                        target: DIAGNOSTIC_TARGET,
                        sink = %sink.name(),
                        error = %e,
                        "Failed to close sink"
                    );
                }
                Err(_) => {
                    report.sinks_failed += 1;
                    error!(
                        target: DIAGNOSTIC_TARGET,
                        sink = %sink.name(),
                        "Sink panicked while closing"
                    );
                }
            }
        }

        if let Some(file) = self.log_file.take() {
            match file.close() {
                Ok(closed) => report.file_closed = closed,
                Err(e) => {
                    report.file_failed = true;
                    error!(
                        target: DIAGNOSTIC_TARGET,
                        path = %file.path().display(),
                        error = %e,
                        "Failed to close log file"
                    );
                }
            }
        }

        debug!(?report, "Lifecycle closed");
        report
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.close();
    }
}
