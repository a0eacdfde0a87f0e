//! Collecting sink for facade tests

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use contracts::{Attr, AttrContext, ContractError, Level, LogRecord, Sink};

#[derive(Debug, Clone)]
pub(crate) struct Seen {
    pub record: LogRecord,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Default)]
struct Shared {
    records: Mutex<Vec<Seen>>,
    closes: AtomicUsize,
}

/// Keeps every handled record with its resolved attributes
#[derive(Debug, Clone)]
pub(crate) struct CollectingSink {
    level: Level,
    context: AttrContext,
    shared: Arc<Shared>,
}

impl CollectingSink {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            context: AttrContext::new(),
            shared: Arc::new(Shared::default()),
        }
    }

    pub fn shared(&self) -> Arc<dyn Sink> {
        Arc::new(self.clone())
    }

    pub fn records(&self) -> Vec<Seen> {
        self.shared.records.lock().clone()
    }

    pub fn closes(&self) -> usize {
        self.shared.closes.load(Ordering::SeqCst)
    }
}

impl Sink for CollectingSink {
    fn name(&self) -> &str {
        "collecting"
    }

    fn enabled(&self, level: Level) -> bool {
        self.level.admits(level)
    }

    fn handle(&self, record: &LogRecord) -> Result<(), ContractError> {
        self.shared.records.lock().push(Seen {
            record: record.clone(),
            attrs: self.context.resolve(record.attrs()),
        });
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        Arc::new(Self {
            context: self.context.with_attrs(attrs),
            ..self.clone()
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        Arc::new(Self {
            context: self.context.with_group(name),
            ..self.clone()
        })
    }

    fn close(&self) -> Result<(), ContractError> {
        self.shared.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
