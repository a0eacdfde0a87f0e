//! Bridge from `tracing` events to multislog records

use std::cell::Cell;
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use contracts::{Attr, Level, LogRecord, Value, DIAGNOSTIC_TARGET};

use crate::logger::Logger;

thread_local! {
    static IN_DISPATCH: Cell<bool> = const { Cell::new(false) };
}

/// Clears the per-thread dispatch flag on drop
struct DispatchGuard;

impl DispatchGuard {
    /// None if this thread is already dispatching a bridged event
    fn enter() -> Option<Self> {
        if IN_DISPATCH.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(DispatchGuard)
        }
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        IN_DISPATCH.with(|flag| flag.set(false));
    }
}

/// `tracing_subscriber` layer that emits every event through a [`Logger`].
///
/// Fields become attributes, the event target is added as `target`.
/// Diagnostic events and events raised by sinks while a bridged event is
/// being dispatched are skipped.
#[derive(Clone)]
pub struct MultislogLayer {
    logger: Logger,
}

impl MultislogLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for MultislogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() == DIAGNOSTIC_TARGET {
            return;
        }
        let level = level_from_tracing(*metadata.level());
        if !self.logger.enabled(level) {
            return;
        }
        let Some(_guard) = DispatchGuard::enter() else {
            return;
        };

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        visitor
            .attrs
            .push(Attr::new("target", metadata.target()));

        let record = LogRecord::new(level, visitor.message.unwrap_or_default())
            .with_attrs(visitor.attrs);
        self.logger.log_record(&record);
    }
}

fn level_from_tracing(level: tracing::Level) -> Level {
    match level {
        tracing::Level::TRACE => Level::Trace,
        tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::ERROR => Level::Error,
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.attrs.push(Attr::new(field.name(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::F64(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::U64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Value::String(value.to_string()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, Value::String(format!("{value:?}")));
    }
}
