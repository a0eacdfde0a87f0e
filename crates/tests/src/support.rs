//! Shared fixtures for the end-to-end tests

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use contracts::{Attr, AttrContext, ContractError, Level, LogRecord, Sink};

/// Canonical directory of the running test executable
pub fn exe_dir() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    exe.parent().unwrap().canonicalize().unwrap()
}

/// Parse every line of a JSON-lines log file
pub fn json_lines(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Log file next to the test executable, removed before and after the test
pub struct ExeDirFile {
    name: String,
    path: PathBuf,
}

impl ExeDirFile {
    pub fn new(tag: &str) -> Self {
        let name = format!("multislog-e2e-{tag}-{}.log", std::process::id());
        let path = exe_dir().join(&name);
        let _ = std::fs::remove_file(&path);
        Self { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ExeDirFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[derive(Debug, Clone)]
pub struct Seen {
    pub record: LogRecord,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Default)]
struct State {
    seen: Mutex<Vec<Seen>>,
    handle_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

/// Recording sink shared by clones and derivations
#[derive(Debug, Clone)]
pub struct TestSink {
    name: String,
    level: Level,
    context: AttrContext,
    fail_close: bool,
    state: Arc<State>,
}

impl TestSink {
    pub fn new(name: &str, level: Level) -> Self {
        Self {
            name: name.to_string(),
            level,
            context: AttrContext::new(),
            fail_close: false,
            state: Arc::new(State::default()),
        }
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn shared(&self) -> Arc<dyn Sink> {
        Arc::new(self.clone())
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().clone()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.seen().into_iter().map(|s| s.record).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.seen()
            .into_iter()
            .map(|s| s.record.message().to_string())
            .collect()
    }

    pub fn handle_calls(&self) -> usize {
        self.state.handle_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.state.close_calls.load(Ordering::SeqCst)
    }

    fn derived(&self, context: AttrContext) -> Arc<dyn Sink> {
        Arc::new(Self {
            context,
            ..self.clone()
        })
    }
}

impl Sink for TestSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        self.level.admits(level)
    }

    fn handle(&self, record: &LogRecord) -> Result<(), ContractError> {
        self.state.handle_calls.fetch_add(1, Ordering::SeqCst);
        self.state.seen.lock().push(Seen {
            record: record.clone(),
            attrs: self.context.resolve(record.attrs()),
        });
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Sink> {
        self.derived(self.context.with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Sink> {
        self.derived(self.context.with_group(name))
    }

    fn close(&self) -> Result<(), ContractError> {
        self.state.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ContractError::sink_close(&self.name, "close refused"));
        }
        Ok(())
    }
}
