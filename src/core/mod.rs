//! Core logger types: levels, templates, the shared queue and its worker

pub mod bounded;
pub mod config;
pub mod context;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
mod queue;
pub mod template;
pub mod worker;

pub use bounded::BoundedString;
pub use config::{LoggerConfig, DEFAULT_CONSOLE_TEMPLATE, DEFAULT_FILE_TEMPLATE};
pub use context::{
    ErrorCallback, LoggingContext, LoggingContextBuilder, DEFAULT_MAX_MESSAGE_LENGTH,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::{LogLevel, STYLE_RESET};
pub use logger::Logger;
pub use metrics::LoggerMetrics;
pub use template::{RenderContext, Template};
pub use worker::WorkerState;
