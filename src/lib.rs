//! # Queued Template Logger
//!
//! An asynchronous logging engine built around one bounded, shared queue and
//! a single background worker thread.
//!
//! ## Features
//!
//! - **Explicit context**: a [`LoggingContext`] owns the queue and the worker;
//!   shutting it down drains everything that was queued
//! - **Backpressure**: `log` blocks only while the queue is full
//! - **Strict ordering**: entries from every logger reach the sinks in
//!   enqueue order
//! - **Templates**: per-level console and file templates with `#` placeholders
//!   for time fields, level name, styling and the message
//! - **Deferred teardown**: destroying a logger never blocks; its file is
//!   closed once its last queued entry has been written
//!
//! ```
//! use queued_template_logger::prelude::*;
//!
//! let context = LoggingContext::new(16)?;
//! let logger = context.create_logger(
//!     LoggerConfig::new()
//!         .console_templates("[#h:#m:#s] #{#l#} #t\n")
//!         .threshold(LogLevel::Debug),
//! )?;
//!
//! logger.debug("connecting")?;
//! queued_template_logger::info!(logger, "connected in {} ms", 42)?;
//! logger.flush();
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ErrorCallback, LogLevel, Logger, LoggerConfig, LoggerError, LoggerMetrics,
        LoggingContext, LoggingContextBuilder, Result, WorkerState, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use crate::core::{
    BoundedString, ErrorCallback, LogEntry, LogLevel, Logger, LoggerConfig, LoggerError,
    LoggerMetrics, LoggingContext, LoggingContextBuilder, RenderContext, Result, Template,
    WorkerState, DEFAULT_CONSOLE_TEMPLATE, DEFAULT_FILE_TEMPLATE, DEFAULT_MAX_MESSAGE_LENGTH,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT, STYLE_RESET,
};
pub use sinks::{ConsoleSink, FileSink, Sink};
