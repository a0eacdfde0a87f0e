//! Recording sink for unit tests

use parking_lot::Mutex;
use std::sync::Arc;

use contracts::{Attr, AttrContext, ContractError, Level, LogRecord, Sink};

pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

/// What the sink saw for one record
#[derive(Debug, Clone)]
pub(crate) struct Delivered {
    pub record: LogRecord,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Default)]
struct State {
    delivered: Mutex<Vec<Delivered>>,
    close_calls: Mutex<usize>,
    journal: Option<Journal>,
}

/// Test double: records handled records and close calls, shared across clones
/// and derivations
#[derive(Debug, Clone)]
pub(crate) struct RecordingSink {
    name: String,
    level: Level,
    context: AttrContext,
    fail_handle: bool,
    panic_handle: bool,
    fail_close: bool,
    state: Arc<State>,
}

impl RecordingSink {
    pub fn new(name: &str, level: Level) -> Self {
        Self {
            name: name.to_string(),
            level,
            context: AttrContext::new(),
            fail_handle: false,
            panic_handle: false,
            fail_close: false,
            state: Arc::new(State::default()),
        }
    }

    pub fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.state = Arc::new(State {
            journal: Some(Arc::clone(journal)),
            ..State::default()
        });
        self
    }

    pub fn failing_handle(mut self) -> Self {
        self.fail_handle = true;
        self
    }

    pub fn panicking_handle(mut self) -> Self {
        self.panic_handle = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn delivered(&self) -> Vec<Delivered> {
        self.state.delivered.lock().clone()
    }

    pub fn close_calls(&self) -> usize {
        *self.state.close_calls.lock()
    }

    fn note(&self, event: &str) {
        if let Some(journal) = &self.state.journal {
            journal.lock().push(format!("{event}:{}", self.name));
        }
    }
}

impl Sink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        self.level.admits(level)
    }

    fn handle(&self, record: &LogRecord) -> Result<(), ContractError> {
        self.note("handle");
        if self.panic_handle {
            panic!("recording sink '{}' panicked", self.name);
        }
        self.state.delivered.lock().push(Delivered {
            record: record.clone(),
            attrs: self.context.resolve(record.attrs()),
        });
        if self.fail_handle {
            return Err(ContractError::sink_write(&self.name, "mock failure"));
        }
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        let mut next = self.clone();
        next.context = self.context.with_attrs(attrs);
        Arc::new(next)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        let mut next = self.clone();
        next.context = self.context.with_group(name);
        Arc::new(next)
    }

    fn close(&self) -> Result<(), ContractError> {
        self.note("close");
        *self.state.close_calls.lock() += 1;
        if self.fail_close {
            return Err(ContractError::sink_close(&self.name, "mock close failure"));
        }
        Ok(())
    }
}
