//! Dispatcher - fan-out of one record stream to many sinks

use chrono_tz::Tz;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

use contracts::{Attr, ContractError, Level, LogRecord, Sink, DIAGNOSTIC_TARGET};

use crate::metrics::{MetricsSnapshot, SinkMetrics};

#[derive(Clone)]
struct Slot {
    sink: Arc<dyn Sink>,
    metrics: Arc<SinkMetrics>,
}

/// Fans every record out to the sinks whose threshold admits it.
///
/// The dispatcher is itself a [`Sink`]. It holds no state that `handle`
/// writes besides atomic counters, so one instance can be shared across
/// threads. Deriving with attributes or a group builds a new dispatcher over
/// newly derived sinks and leaves this one untouched.
/// Records are normalized into UTC unless another timezone is set.
#[derive(Clone)]
pub struct Dispatcher {
    slots: Vec<Slot>,
    timezone: Tz,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            timezone: Tz::UTC,
        }
    }
}

impl Dispatcher {
    /// Create a dispatcher over `sinks`, in dispatch order
    pub fn new(sinks: impl IntoIterator<Item = Arc<dyn Sink>>) -> Self {
        Self {
            slots: sinks
                .into_iter()
                .map(|sink| Slot {
                    sink,
                    metrics: Arc::new(SinkMetrics::new()),
                })
                .collect(),
            timezone: Tz::UTC,
        }
    }

    /// Normalize every record's timestamp into `tz` before fan-out
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Append a sink while the logger is being built
    pub fn push(&mut self, sink: Arc<dyn Sink>) {
        self.slots.push(Slot {
            sink,
            metrics: Arc::new(SinkMetrics::new()),
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Contained sinks, in dispatch order
    pub fn sinks(&self) -> impl Iterator<Item = &Arc<dyn Sink>> {
        self.slots.iter().map(|slot| &slot.sink)
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.slots
            .iter()
            .map(|slot| (slot.sink.name().to_string(), slot.metrics.snapshot()))
            .collect()
    }

    /// Dispatch one record.
    ///
    /// The timestamp rewrite happens once, on a local copy, before any sink
    /// sees the record. Each sink's own threshold is re-checked. Sink errors
    /// and panics are reported on the diagnostic target and go no further.
    pub fn dispatch(&self, record: &LogRecord) {
        let record = record.clone().in_timezone(self.timezone);
        for slot in &self.slots {
            Self::dispatch_to_slot(slot, &record);
        }
    }

    fn dispatch_to_slot(slot: &Slot, record: &LogRecord) {
        if !slot.sink.enabled(record.level()) {
            slot.metrics.inc_skipped_count();
            return;
        }

        match catch_unwind(AssertUnwindSafe(|| slot.sink.handle(record))) {
            Ok(Ok(())) => slot.metrics.inc_handled_count(),
            Ok(Err(e)) => {
                slot.metrics.inc_failure_count();
                error!(
                    target: DIAGNOSTIC_TARGET,
                    sink = %slot.sink.name(),
                    level = %record.level(),
                    error = %e,
                    "Sink failed to handle record"
                );
            }
            Err(payload) => {
                slot.metrics.inc_failure_count();
                error!(
                    target: DIAGNOSTIC_TARGET,
                    sink = %slot.sink.name(),
                    level = %record.level(),
                    panic = %panic_message(payload.as_ref()),
                    "Sink panicked while handling record"
                );
            }
        }
    }

    /// New dispatcher whose sinks all carry `attrs`
    pub fn derive_with_attrs(&self, attrs: &[Attr]) -> Dispatcher {
        self.derive(|sink| sink.with_attrs(attrs))
    }

    /// New dispatcher whose sinks all open group `name`
    pub fn derive_with_group(&self, name: &str) -> Dispatcher {
        self.derive(|sink| sink.with_group(name))
    }

    fn derive(&self, f: impl Fn(&dyn Sink) -> Arc<dyn Sink>) -> Dispatcher {
        Dispatcher {
            slots: self
                .slots
                .iter()
                .map(|slot| Slot {
                    sink: f(slot.sink.as_ref()),
                    metrics: Arc::clone(&slot.metrics),
                })
                .collect(),
            timezone: self.timezone,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Sink for Dispatcher {
    fn name(&self) -> &str {
        "dispatcher"
    }

    /// True if any contained sink accepts `level`
    fn enabled(&self, level: Level) -> bool {
        self.slots.iter().any(|slot| slot.sink.enabled(level))
    }

    fn handle(&self, record: &LogRecord) -> Result<(), ContractError> {
        self.dispatch(record);
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        Arc::new(self.derive_with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        Arc::new(self.derive_with_group(name))
    }
}
