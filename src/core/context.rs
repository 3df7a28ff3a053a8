//! Logging context: the shared queue plus its worker thread
//!
//! A [`LoggingContext`] is an explicit value with a defined start
//! ([`LoggingContextBuilder::build`]) and end ([`LoggingContext::shutdown`]).
//! Every logger it creates submits to the same bounded queue, so entries from
//! all of them reach the sinks in one global order.

use super::config::LoggerConfig;
use super::error::{LoggerError, Result};
use super::logger::{Logger, LoggerShared};
use super::metrics::LoggerMetrics;
use super::queue::SharedQueue;
use super::worker::{Worker, WorkerState};
use crate::sinks::{ConsoleSink, FileSink, DEFAULT_PATH_TEMPLATE};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default shutdown timeout used when a context is dropped (5 seconds)
///
/// For custom timeout control, use [`LoggingContext::shutdown_and_wait`].
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of entries the shared queue holds before producers block
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Default maximum length in bytes of a message and of a rendered entry
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1024;

/// Callback invoked by the worker for every sink failure
///
/// Runs on the worker thread, possibly while the queue lock is held; it must
/// not log through the same context.
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ContextSettings {
    pub(crate) max_message_len: usize,
    pub(crate) max_rendered_len: usize,
}

/// State shared by the context handle, its loggers and the worker
pub(crate) struct ContextShared {
    queue: SharedQueue,
    metrics: Arc<LoggerMetrics>,
    settings: ContextSettings,
    worker_state: AtomicU8,
    on_error: Option<ErrorCallback>,
}

impl ContextShared {
    pub(crate) fn queue(&self) -> &SharedQueue {
        &self.queue
    }

    pub(crate) fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub(crate) fn settings(&self) -> ContextSettings {
        self.settings
    }

    pub(crate) fn worker_state(&self) -> WorkerState {
        WorkerState::from_u8(self.worker_state.load(Ordering::Acquire))
    }

    pub(crate) fn set_worker_state(&self, state: WorkerState) {
        self.worker_state.store(state as u8, Ordering::Release);
    }

    /// Record a sink failure without interrupting the worker
    pub(crate) fn report_error(&self, sink: &str, error: LoggerError) {
        self.metrics.record_sink_error();
        eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink, error);
        if let Some(ref callback) = self.on_error {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(&error)));
            if result.is_err() {
                eprintln!("[LOGGER ERROR] Error callback panicked while handling: {}", error);
            }
        }
    }

    /// Close a destroyed logger's sink; called with the queue lock held
    pub(crate) fn release_logger(&self, logger: &LoggerShared) {
        match logger.release() {
            None | Some(Ok(())) => {}
            Some(Err(e)) => self.report_error("file", e),
        }
        self.metrics.record_released();
    }
}

/// The process-wide logging engine: one bounded queue, one worker thread
///
/// # Example
///
/// ```
/// use queued_template_logger::{LoggingContext, LoggerConfig};
///
/// let context = LoggingContext::new(64).unwrap();
/// let logger = context
///     .create_logger(LoggerConfig::new().console_templates("[#l] #t\n"))
///     .unwrap();
///
/// logger.info("service started").unwrap();
/// logger.destroy();
///
/// assert!(context.shutdown_and_wait(std::time::Duration::from_secs(5)));
/// ```
pub struct LoggingContext {
    shared: Arc<ContextShared>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl LoggingContext {
    /// Start a context with a queue of `capacity` entries writing to stdout
    pub fn new(capacity: usize) -> Result<Self> {
        Self::builder().capacity(capacity).build()
    }

    #[must_use]
    pub fn builder() -> LoggingContextBuilder {
        LoggingContextBuilder::new()
    }

    /// Validate `config`, open its file sink if it names one, and return a
    /// logger feeding this context.
    ///
    /// Fails with [`LoggerError::InvalidConfiguration`] before touching the
    /// filesystem, or with [`LoggerError::IoOperation`] if the sink cannot be
    /// opened. Nothing is retained on failure.
    pub fn create_logger(&self, config: LoggerConfig) -> Result<Logger> {
        if self.shared.queue.is_shutdown() {
            return Err(LoggerError::ContextShutdown);
        }

        config.validate()?;

        let sink = match config.filename_template {
            Some(ref filename) => Some(FileSink::resolve(
                config.path_template.as_deref().unwrap_or(DEFAULT_PATH_TEMPLATE),
                filename,
                config.name.as_deref(),
            )?),
            None => None,
        };

        let shared = LoggerShared::from_config(&config, sink);
        Ok(Logger::new(shared, Arc::clone(&self.shared)))
    }

    /// Request shutdown without waiting.
    ///
    /// The worker keeps writing until the queue is empty, then exits. New
    /// entries and new loggers are rejected from now on.
    pub fn shutdown(&self) {
        if self.shared.queue.request_shutdown() {
            let _ = self.shared.worker_state.compare_exchange(
                WorkerState::Running as u8,
                WorkerState::Draining as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
    }

    /// Request shutdown and wait up to `timeout` for the worker to flush
    /// everything and exit.
    ///
    /// Returns `true` if the worker terminated within the timeout.
    pub fn shutdown_and_wait(&self, timeout: Duration) -> bool {
        self.shutdown();

        let Some(handle) = self.worker.lock().take() else {
            return self.shared.worker_state() == WorkerState::Terminated;
        };

        let start = std::time::Instant::now();
        loop {
            if handle.is_finished() {
                // Thread finished, join it to check for panics
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Worker thread panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Worker thread did not finish within {:?}. \
                     Some entries may not have been written.",
                    timeout
                );
                *self.worker.lock() = Some(handle);
                return false;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Block until every queued entry has been processed and every destroyed
    /// logger released. Does not stop the worker.
    pub fn flush(&self) {
        self.shared.queue.wait_idle();
    }

    /// Whether the worker thread is still running (or draining)
    pub fn is_alive(&self) -> bool {
        self.worker_state() != WorkerState::Terminated
    }

    pub fn worker_state(&self) -> WorkerState {
        self.shared.worker_state()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    /// Entries currently waiting in the queue
    pub fn queued(&self) -> usize {
        self.shared.queue.len()
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<ContextShared> {
        &self.shared
    }
}

impl Drop for LoggingContext {
    fn drop(&mut self) {
        self.shutdown_and_wait(DEFAULT_SHUTDOWN_TIMEOUT);

        let errors = self.shared.metrics.sink_errors();
        if errors > 0 {
            eprintln!(
                "[LOGGER WARNING] Logging context shut down after {} sink errors",
                errors
            );
        }
    }
}

/// Builder for [`LoggingContext`]
///
/// # Example
///
/// ```
/// use queued_template_logger::{LoggerError, LoggingContext};
/// use std::sync::Arc;
///
/// let context = LoggingContext::builder()
///     .capacity(256)
///     .max_message_len(512)
///     .on_error(Arc::new(|err: &LoggerError| eprintln!("log sink failed: {}", err)))
///     .build()
///     .unwrap();
/// ```
pub struct LoggingContextBuilder {
    capacity: usize,
    max_message_len: usize,
    max_rendered_len: usize,
    console: Option<ConsoleSink>,
    worker_name: String,
    on_error: Option<ErrorCallback>,
}

impl LoggingContextBuilder {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            max_message_len: DEFAULT_MAX_MESSAGE_LENGTH,
            max_rendered_len: DEFAULT_MAX_MESSAGE_LENGTH,
            console: None,
            worker_name: "log-worker".to_string(),
            on_error: None,
        }
    }

    /// Number of entries the queue holds before `log` blocks
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Longest message kept per entry; longer messages are truncated
    #[must_use = "builder methods return a new value"]
    pub fn max_message_len(mut self, len: usize) -> Self {
        self.max_message_len = len;
        self
    }

    /// Longest rendered output per sink write; longer output is truncated
    #[must_use = "builder methods return a new value"]
    pub fn max_rendered_len(mut self, len: usize) -> Self {
        self.max_rendered_len = len;
        self
    }

    /// Send console output to `writer` instead of stdout
    #[must_use = "builder methods return a new value"]
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.console = Some(ConsoleSink::with_writer(Box::new(writer)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    /// Set a callback for sink failures
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Start the worker thread and return the context
    pub fn build(self) -> Result<LoggingContext> {
        if self.capacity == 0 {
            return Err(LoggerError::config(
                "LoggingContext",
                "queue capacity must be at least 1",
            ));
        }

        let metrics = Arc::new(LoggerMetrics::new());
        let shared = Arc::new(ContextShared {
            queue: SharedQueue::new(self.capacity, Arc::clone(&metrics)),
            metrics,
            settings: ContextSettings {
                max_message_len: self.max_message_len,
                max_rendered_len: self.max_rendered_len,
            },
            worker_state: AtomicU8::new(WorkerState::Running as u8),
            on_error: self.on_error,
        });

        let worker = Worker::new(Arc::clone(&shared), self.console.unwrap_or_default());
        let handle = thread::Builder::new()
            .name(self.worker_name)
            .spawn(move || worker.run())
            .map_err(|e| LoggerError::resource("worker thread", e.to_string()))?;

        Ok(LoggingContext {
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }
}

impl Default for LoggingContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = LoggingContext::builder().capacity(0).build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let context = LoggingContext::builder()
            .console_writer(Capture::default())
            .build()
            .unwrap();
        assert_eq!(context.capacity(), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(context.worker_state(), WorkerState::Running);
        assert!(context.is_alive());
    }

    #[test]
    fn test_state_transitions_on_shutdown() {
        let context = LoggingContext::builder()
            .console_writer(Capture::default())
            .build()
            .unwrap();

        assert!(context.shutdown_and_wait(DEFAULT_SHUTDOWN_TIMEOUT));
        assert_eq!(context.worker_state(), WorkerState::Terminated);
        assert!(!context.is_alive());

        // A second wait has nothing left to join
        assert!(context.shutdown_and_wait(Duration::from_millis(10)));
    }

    #[test]
    fn test_create_logger_after_shutdown_rejected() {
        let context = LoggingContext::builder()
            .console_writer(Capture::default())
            .build()
            .unwrap();
        context.shutdown();

        let result = context.create_logger(LoggerConfig::with_default_templates());
        assert!(matches!(result, Err(LoggerError::ContextShutdown)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let context = LoggingContext::builder()
            .console_writer(Capture::default())
            .build()
            .unwrap();

        let result = context.create_logger(LoggerConfig::new());
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_logs_reach_console() {
        let capture = Capture::default();
        let context = LoggingContext::builder()
            .console_writer(capture.clone())
            .build()
            .unwrap();
        let logger = context
            .create_logger(LoggerConfig::new().console_templates("#l:#t;"))
            .unwrap();

        logger.warn("disk low").unwrap();
        logger.log_args(LogLevel::Error, format_args!("code {}", 7)).unwrap();
        logger.flush();

        assert_eq!(capture.text(), "WARN:disk low;ERROR:code 7;");
        assert_eq!(context.metrics().entries_written(), 2);
    }
}
