//! Logger metrics for observability
//!
//! Counters describing what the worker did with queued entries. Sink
//! failures never stop the worker, so these counters (and the optional error
//! callback) are the only place such failures surface.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logging context observability
///
/// # Example
///
/// ```
/// use queued_template_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written();
///
/// assert_eq!(metrics.entries_enqueued(), 1);
/// assert_eq!(metrics.entries_written(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries accepted by the shared queue
    entries_enqueued: AtomicU64,

    /// Entries rendered and handed to at least the console sink
    entries_written: AtomicU64,

    /// Entries dropped by the logger threshold
    entries_filtered: AtomicU64,

    /// Failed or panicking sink writes
    sink_errors: AtomicU64,

    /// Producers that had to wait for a free queue slot
    blocked_enqueues: AtomicU64,

    /// Loggers whose resources were released by the worker
    loggers_released: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            entries_enqueued: AtomicU64::new(0),
            entries_written: AtomicU64::new(0),
            entries_filtered: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            blocked_enqueues: AtomicU64::new(0),
            loggers_released: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn entries_enqueued(&self) -> u64 {
        self.entries_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entries_written(&self) -> u64 {
        self.entries_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entries_filtered(&self) -> u64 {
        self.entries_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn blocked_enqueues(&self) -> u64 {
        self.blocked_enqueues.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn loggers_released(&self) -> u64 {
        self.loggers_released.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.entries_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.entries_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.entries_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_blocked(&self) -> u64 {
        self.blocked_enqueues.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_released(&self) -> u64 {
        self.loggers_released.fetch_add(1, Ordering::Relaxed)
    }

    /// Entries the worker has finished with, written or filtered
    pub fn entries_processed(&self) -> u64 {
        self.entries_written() + self.entries_filtered()
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.entries_enqueued.store(0, Ordering::Relaxed);
        self.entries_written.store(0, Ordering::Relaxed);
        self.entries_filtered.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.blocked_enqueues.store(0, Ordering::Relaxed);
        self.loggers_released.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            entries_enqueued: AtomicU64::new(self.entries_enqueued()),
            entries_written: AtomicU64::new(self.entries_written()),
            entries_filtered: AtomicU64::new(self.entries_filtered()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            blocked_enqueues: AtomicU64::new(self.blocked_enqueues()),
            loggers_released: AtomicU64::new(self.loggers_released()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.entries_enqueued(), 0);
        assert_eq!(metrics.entries_written(), 0);
        assert_eq!(metrics.entries_filtered(), 0);
        assert_eq!(metrics.sink_errors(), 0);
        assert_eq!(metrics.blocked_enqueues(), 0);
        assert_eq!(metrics.loggers_released(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_sink_error(), 0);
        assert_eq!(metrics.record_sink_error(), 1);
        assert_eq!(metrics.sink_errors(), 2);
    }

    #[test]
    fn test_entries_processed() {
        let metrics = LoggerMetrics::new();
        metrics.record_written();
        metrics.record_written();
        metrics.record_filtered();
        assert_eq!(metrics.entries_processed(), 3);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_enqueued();
        metrics.record_blocked();
        metrics.record_released();

        metrics.reset();

        assert_eq!(metrics.entries_enqueued(), 0);
        assert_eq!(metrics.blocked_enqueues(), 0);
        assert_eq!(metrics.loggers_released(), 0);
    }

    #[test]
    fn test_metrics_clone() {
        let metrics = LoggerMetrics::new();
        metrics.record_written();

        let snapshot = metrics.clone();
        metrics.record_written();

        assert_eq!(snapshot.entries_written(), 1);
        assert_eq!(metrics.entries_written(), 2);
    }
}
