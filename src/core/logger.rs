//! Logger handles
//!
//! A [`Logger`] is created by [`LoggingContext::create_logger`] and feeds the
//! context's shared queue. Its templates, threshold and optional file sink
//! live in a [`LoggerShared`] that queued entries keep referencing until the
//! worker has written them.
//!
//! [`LoggingContext::create_logger`]: crate::LoggingContext::create_logger

use super::bounded::BoundedString;
use super::config::LoggerConfig;
use super::context::ContextShared;
use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::template::{Template, TemplateSet};
use crate::sinks::FileSink;
use parking_lot::Mutex;
use std::fmt::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

/// State shared between a logger handle, its queued entries and the worker
pub(crate) struct LoggerShared {
    name: Option<String>,
    threshold: AtomicU8,
    console_templates: TemplateSet,
    file_templates: TemplateSet,
    sink: Mutex<Option<FileSink>>,
    /// Entries enqueued but not yet completed; only changed under the queue lock
    pending: AtomicUsize,
    destroy_requested: AtomicBool,
    released: AtomicBool,
}

impl LoggerShared {
    /// Build from an already validated config
    pub(crate) fn from_config(config: &LoggerConfig, sink: Option<FileSink>) -> Self {
        Self {
            name: config.name.clone(),
            threshold: AtomicU8::new(config.threshold as u8),
            console_templates: config.compile_console(),
            file_templates: config.compile_file(),
            sink: Mutex::new(sink),
            pending: AtomicUsize::new(0),
            destroy_requested: AtomicBool::new(false),
            released: AtomicBool::new(false),
        }
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn threshold(&self) -> LogLevel {
        // Only ever stored from a LogLevel
        LogLevel::try_from(self.threshold.load(Ordering::Relaxed)).unwrap_or_default()
    }

    fn set_threshold(&self, level: LogLevel) {
        self.threshold.store(level as u8, Ordering::Relaxed);
    }

    pub(crate) fn console_template(&self, level: LogLevel) -> &Template {
        self.console_templates.get(level)
    }

    pub(crate) fn file_template(&self, level: LogLevel) -> &Template {
        self.file_templates.get(level)
    }

    pub(crate) fn sink(&self) -> &Mutex<Option<FileSink>> {
        &self.sink
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub(crate) fn increment_pending(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns the remaining count
    pub(crate) fn decrement_pending(&self) -> usize {
        self.pending.fetch_sub(1, Ordering::AcqRel) - 1
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroy_requested.load(Ordering::Acquire)
    }

    /// Returns `false` if destroy had already been requested
    pub(crate) fn mark_destroyed(&self) -> bool {
        !self.destroy_requested.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Close the file sink. Returns the sink's close result; later calls are no-ops.
    pub(crate) fn release(&self) -> Option<Result<()>> {
        if self.released.swap(true, Ordering::AcqRel) {
            return None;
        }
        let sink = self.sink.lock().take();
        sink.map(|mut sink| sink.close())
    }
}

/// Handle used by application code to submit entries
///
/// Dropping the handle requests destruction, exactly like [`Logger::destroy`].
pub struct Logger {
    shared: Arc<LoggerShared>,
    context: Arc<ContextShared>,
}

impl Logger {
    pub(crate) fn new(shared: LoggerShared, context: Arc<ContextShared>) -> Self {
        Self {
            shared: Arc::new(shared),
            context,
        }
    }

    /// Queue `message` at `level`.
    ///
    /// The message is cut to the context's maximum message length. Blocks
    /// only while the shared queue is full. Entries below the threshold are
    /// still queued and discarded by the worker.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        let entry = LogEntry::new(
            Arc::clone(&self.shared),
            level,
            message.into(),
            self.context.settings().max_message_len,
        );
        self.context.queue().enqueue(entry)
    }

    /// Queue a pre-formatted message, formatting straight into a bounded
    /// buffer.
    pub fn log_args(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<()> {
        let mut buf = BoundedString::new(self.context.settings().max_message_len);
        // BoundedString never reports an error; overflow is truncated.
        let _ = buf.write_fmt(args);
        self.log(level, buf.into_string())
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    /// Request teardown without blocking.
    ///
    /// Entries already queued are still written; the file sink is closed by
    /// the worker after the last of them. Further `log` calls fail with
    /// [`LoggerError::LoggerDestroyed`](crate::LoggerError::LoggerDestroyed).
    /// Calling it more than once is harmless.
    pub fn destroy(&self) {
        let context = &self.context;
        context
            .queue()
            .retire(&self.shared, &|logger| context.release_logger(logger));
    }

    /// Block until every entry this logger queued has been processed
    pub fn flush(&self) {
        self.context.queue().wait_drained(&self.shared);
    }

    pub fn name(&self) -> Option<&str> {
        self.shared.name()
    }

    pub fn threshold(&self) -> LogLevel {
        self.shared.threshold()
    }

    /// Change the threshold; applies to entries the worker has not yet filtered
    pub fn set_threshold(&self, level: LogLevel) {
        self.shared.set_threshold(level);
    }

    /// Entries queued or being written right now
    pub fn pending(&self) -> usize {
        self.shared.pending()
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.is_destroyed()
    }

    /// Whether the worker has released this logger's resources
    pub fn is_released(&self) -> bool {
        self.shared.is_released()
    }

    /// Path of the file sink, if one is still open
    pub fn file_path(&self) -> Option<PathBuf> {
        self.shared
            .sink()
            .lock()
            .as_ref()
            .map(|sink| sink.path().to_path_buf())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("threshold", &self.threshold())
            .field("pending", &self.pending())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.destroy();
    }
}
