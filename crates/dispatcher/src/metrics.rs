//! Sink metrics for observability

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single sink slot
///
/// Shared between a dispatcher and every dispatcher derived from it, so a
/// slot's counts include records emitted through derived loggers.
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Records the sink handled successfully
    handled_count: AtomicU64,
    /// Records the sink failed to handle
    failure_count: AtomicU64,
    /// Records below the sink's threshold
    skipped_count: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get handled count
    pub fn handled_count(&self) -> u64 {
        self.handled_count.load(Ordering::Relaxed)
    }

    /// Increment handled count
    pub fn inc_handled_count(&self) {
        self.handled_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get skipped count
    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    /// Increment skipped count
    pub fn inc_skipped_count(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            handled_count: self.handled_count(),
            failure_count: self.failure_count(),
            skipped_count: self.skipped_count(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub handled_count: u64,
    pub failure_count: u64,
    pub skipped_count: u64,
}
