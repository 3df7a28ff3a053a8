//! The background worker draining the shared queue

use super::context::ContextShared;
use super::error::LoggerError;
use super::log_entry::LogEntry;
use super::logger::LoggerShared;
use super::template::RenderContext;
use crate::sinks::{ConsoleSink, Sink};
use std::fmt;
use std::sync::Arc;

/// Lifecycle of the worker thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Processing entries, waiting for more when idle
    Running = 0,
    /// Shutdown requested; remaining entries are still being written
    Draining = 1,
    /// Queue drained after shutdown; the thread has exited
    Terminated = 2,
}

impl WorkerState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Running,
            1 => WorkerState::Draining,
            _ => WorkerState::Terminated,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Running => write!(f, "Running"),
            WorkerState::Draining => write!(f, "Draining"),
            WorkerState::Terminated => write!(f, "Terminated"),
        }
    }
}

pub(crate) struct Worker {
    shared: Arc<ContextShared>,
    console: ConsoleSink,
}

impl Worker {
    pub(crate) fn new(shared: Arc<ContextShared>, console: ConsoleSink) -> Self {
        Self { shared, console }
    }

    /// Thread body: runs until shutdown was requested and the queue is empty.
    ///
    /// Sink failures are reported and skipped; they never end the loop.
    pub(crate) fn run(mut self) {
        let shared = Arc::clone(&self.shared);
        let _terminated = TerminateOnExit(Arc::clone(&shared));
        let release = |logger: &LoggerShared| shared.release_logger(logger);

        while let Some(entry) = shared.queue().pop(&release) {
            self.process(&entry);
            shared.queue().complete(entry, &release);
        }

        if let Err(e) = self.console.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush console during shutdown: {}", e);
        }
    }

    fn process(&mut self, entry: &LogEntry) {
        let shared = Arc::clone(&self.shared);
        let logger = &entry.logger;

        if entry.level < logger.threshold() {
            shared.metrics().record_filtered();
            return;
        }

        let ctx = RenderContext::new(entry.level, entry.timestamp, &entry.message)
            .with_logger_name(logger.name());
        let capacity = shared.settings().max_rendered_len;

        let text = logger.console_template(entry.level).render(&ctx, capacity);
        write_isolated(&shared, &mut self.console, &text);

        let mut sink = logger.sink().lock();
        if let Some(file) = sink.as_mut() {
            let text = logger.file_template(entry.level).render(&ctx, capacity);
            write_isolated(&shared, file, &text);
        }

        shared.metrics().record_written();
    }
}

/// Marks the worker terminated when the thread body exits, including by
/// unwinding, so a dead worker is never reported as alive
struct TerminateOnExit(Arc<ContextShared>);

impl Drop for TerminateOnExit {
    fn drop(&mut self) {
        if std::thread::panicking() {
            eprintln!("[LOGGER ERROR] Worker thread exiting after a panic");
            self.0.queue().mark_terminated();
        }
        self.0.set_worker_state(WorkerState::Terminated);
    }
}

/// Write and flush one rendered entry, containing errors and panics so the
/// other sink and later entries are unaffected
fn write_isolated(shared: &ContextShared, sink: &mut dyn Sink, text: &str) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        sink.write_rendered(text)?;
        sink.flush()
    }));

    let error = match result {
        Ok(Ok(())) => return,
        Ok(Err(e)) => e,
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            LoggerError::sink_panicked(sink.name(), panic_msg)
        }
    };

    shared.report_error(sink.name(), error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggerConfig, LoggingContext};

    #[test]
    fn test_state_roundtrip() {
        for state in [
            WorkerState::Running,
            WorkerState::Draining,
            WorkerState::Terminated,
        ] {
            assert_eq!(WorkerState::from_u8(state as u8), state);
        }
    }

    #[test]
    fn test_unwinding_worker_reports_terminated() {
        let context = LoggingContext::builder()
            .console_writer(std::io::sink())
            .build()
            .unwrap();
        let shared = Arc::clone(context.shared());

        let result = std::thread::spawn(move || {
            let _terminated = TerminateOnExit(shared);
            panic!("worker body failed");
        })
        .join();

        assert!(result.is_err());
        assert_eq!(context.worker_state(), WorkerState::Terminated);
        assert!(!context.is_alive());
        assert!(matches!(
            context.create_logger(LoggerConfig::with_default_templates()),
            Err(LoggerError::ContextShutdown)
        ));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(WorkerState::Draining.to_string(), "Draining");
    }
}
