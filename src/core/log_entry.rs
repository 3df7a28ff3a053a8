//! Log entry structure

use super::bounded::truncate_to_capacity;
use super::log_level::LogLevel;
use super::logger::LoggerShared;
use chrono::{DateTime, Local};
use std::fmt;
use std::sync::Arc;

/// One queued record awaiting rendering and delivery
pub struct LogEntry {
    pub(crate) logger: Arc<LoggerShared>,
    pub level: LogLevel,
    pub message: String,
    /// Time the entry entered the queue; rendered time fields use this, not
    /// the time of writing
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub(crate) fn new(
        logger: Arc<LoggerShared>,
        level: LogLevel,
        message: String,
        max_message_len: usize,
    ) -> Self {
        Self {
            logger,
            level,
            message: truncate_to_capacity(message, max_message_len),
            timestamp: Local::now(),
        }
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("logger", &self.logger.name())
            .field("level", &self.level)
            .field("message", &self.message)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
