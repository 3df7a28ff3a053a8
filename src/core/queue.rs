//! Bounded multi-producer / single-consumer entry queue
//!
//! One mutex guards the entries, the shutdown flag and the per-logger pending
//! counters. Producers wait on `not_full`, the worker waits on `not_empty`,
//! and flush callers wait on `idle`.
//!
//! Logger teardown is only ever performed while this lock is held, and only
//! by the worker thread (or by the destroying thread once the worker has
//! terminated), so a sink can never be closed while an entry that references
//! it is being written.

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::logger::LoggerShared;
use super::metrics::LoggerMetrics;
use chrono::Local;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;

/// Callback used to release a logger's resources while the queue lock is held
pub(crate) type Release<'a> = &'a dyn Fn(&LoggerShared);

struct QueueState {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    shutdown: bool,
    terminated: bool,
    /// Entries popped by the worker but not yet completed
    in_flight: usize,
    /// Producers currently waiting for a free slot
    waiting_producers: usize,
    /// Destroyed loggers with nothing pending, awaiting release by the worker
    retired: Vec<Arc<LoggerShared>>,
}

impl QueueState {
    fn is_idle(&self) -> bool {
        self.entries.is_empty() && self.in_flight == 0 && self.retired.is_empty()
    }
}

pub(crate) struct SharedQueue {
    state: Mutex<QueueState>,
    not_full: Condvar,
    not_empty: Condvar,
    idle: Condvar,
    metrics: Arc<LoggerMetrics>,
}

impl SharedQueue {
    pub(crate) fn new(capacity: usize, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                entries: VecDeque::with_capacity(capacity),
                capacity,
                shutdown: false,
                terminated: false,
                in_flight: 0,
                waiting_producers: 0,
                retired: Vec::new(),
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            idle: Condvar::new(),
            metrics,
        }
    }

    /// Append an entry, blocking while the queue is at capacity.
    ///
    /// An entry that had to wait is restamped once a slot is free.
    pub(crate) fn enqueue(&self, mut entry: LogEntry) -> Result<()> {
        let mut state = self.state.lock();
        let mut blocked = false;

        loop {
            if state.shutdown {
                return Err(LoggerError::ContextShutdown);
            }
            if entry.logger.is_destroyed() {
                return Err(LoggerError::LoggerDestroyed);
            }
            if state.entries.len() < state.capacity {
                break;
            }

            if !blocked {
                blocked = true;
                self.metrics.record_blocked();
            }
            state.waiting_producers += 1;
            self.not_full.wait(&mut state);
            state.waiting_producers -= 1;
        }

        if blocked {
            entry.timestamp = Local::now();
        }
        let was_empty = state.entries.is_empty();
        entry.logger.increment_pending();
        state.entries.push_back(entry);
        self.metrics.record_enqueued();
        drop(state);

        if was_empty {
            self.not_empty.notify_one();
        }
        Ok(())
    }

    /// Worker side: take the oldest entry, blocking while the queue is empty.
    ///
    /// Returns `None` once shutdown was requested and everything queued has
    /// been handed out. Retired loggers are released on every pass.
    pub(crate) fn pop(&self, release: Release<'_>) -> Option<LogEntry> {
        let mut state = self.state.lock();

        loop {
            if !state.retired.is_empty() {
                for logger in std::mem::take(&mut state.retired) {
                    release(&logger);
                }
                if state.is_idle() {
                    self.idle.notify_all();
                }
            }

            if let Some(entry) = state.entries.pop_front() {
                state.in_flight += 1;
                let wake_producer = state.waiting_producers > 0;
                drop(state);

                if wake_producer {
                    self.not_full.notify_one();
                }
                return Some(entry);
            }

            if state.shutdown {
                state.terminated = true;
                drop(state);
                self.idle.notify_all();
                return None;
            }

            self.not_empty.wait(&mut state);
        }
    }

    /// Worker side: mark `entry` as processed (written or filtered).
    ///
    /// Releases the owning logger when it was destroyed and this was its last
    /// pending entry.
    pub(crate) fn complete(&self, entry: LogEntry, release: Release<'_>) {
        let mut state = self.state.lock();
        state.in_flight -= 1;

        let logger = &entry.logger;
        let remaining = logger.decrement_pending();
        if remaining == 0 && logger.is_destroyed() {
            release(logger);
        }

        let notify = remaining == 0 || state.is_idle();
        drop(state);

        if notify {
            self.idle.notify_all();
        }
    }

    /// Request teardown of `logger` without blocking.
    ///
    /// Returns `false` if destroy had already been requested.
    pub(crate) fn retire(&self, logger: &Arc<LoggerShared>, release: Release<'_>) -> bool {
        let mut state = self.state.lock();
        if !logger.mark_destroyed() {
            return false;
        }
        if logger.pending() > 0 {
            // The worker releases it when the last entry completes.
            return true;
        }

        if state.terminated {
            release(logger);
            return true;
        }

        state.retired.push(Arc::clone(logger));
        drop(state);
        self.not_empty.notify_one();
        true
    }

    /// Ask the worker to drain and stop. Returns `false` if already requested.
    pub(crate) fn request_shutdown(&self) -> bool {
        let mut state = self.state.lock();
        if state.shutdown {
            return false;
        }
        state.shutdown = true;
        drop(state);

        self.not_empty.notify_all();
        // Blocked producers must observe the shutdown and give up.
        self.not_full.notify_all();
        true
    }

    /// Worker side: the worker is gone without draining. Blocked producers
    /// fail with `ContextShutdown` and waiting flushers return.
    pub(crate) fn mark_terminated(&self) {
        let mut state = self.state.lock();
        state.shutdown = true;
        state.terminated = true;
        drop(state);

        self.not_full.notify_all();
        self.idle.notify_all();
    }

    /// Block until nothing is queued, in flight or awaiting release
    pub(crate) fn wait_idle(&self) {
        let mut state = self.state.lock();
        while !state.is_idle() && !state.terminated {
            self.idle.wait(&mut state);
        }
    }

    /// Block until `logger` has no pending entries
    pub(crate) fn wait_drained(&self, logger: &LoggerShared) {
        let mut state = self.state.lock();
        while logger.pending() > 0 && !state.terminated {
            self.idle.wait(&mut state);
        }
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.state.lock().capacity
    }
}
