//! Formatting macros for logger handles.
//!
//! The message is formatted straight into a buffer bounded by the context's
//! maximum message length. Each macro returns the `Result` of the enqueue.
//!
//! # Examples
//!
//! ```
//! use queued_template_logger::prelude::*;
//! use queued_template_logger::info;
//!
//! let context = LoggingContext::new(8)?;
//! let logger = context.create_logger(LoggerConfig::new().console_templates("#l #t\n"))?;
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a formatted message at an explicit level.
///
/// ```
/// # use queued_template_logger::prelude::*;
/// # let context = LoggingContext::new(8)?;
/// # let logger = context.create_logger(LoggerConfig::new().console_templates("#t\n"))?;
/// use queued_template_logger::log;
/// log!(logger, LogLevel::Error, "Error code: {}", 500)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_args($level, format_args!($($arg)+))
    };
}

/// Log a formatted trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a formatted debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log a formatted info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a formatted warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log a formatted error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a formatted fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, LoggerConfig, LoggingContext};
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

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

    #[test]
    fn test_level_macros() {
        let capture = Capture::default();
        let context = LoggingContext::builder()
            .console_writer(capture.clone())
            .build()
            .unwrap();
        let logger = context
            .create_logger(
                LoggerConfig::new()
                    .console_templates("#l=#t\n")
                    .threshold(LogLevel::Trace),
            )
            .unwrap();

        trace!(logger, "t{}", 1).unwrap();
        debug!(logger, "d{}", 2).unwrap();
        info!(logger, "i{}", 3).unwrap();
        warn!(logger, "w{}", 4).unwrap();
        error!(logger, "e{}", 5).unwrap();
        fatal!(logger, "plain").unwrap();
        log!(logger, LogLevel::Info, "{}+{}", 1, 1).unwrap();
        logger.flush();

        let text = String::from_utf8_lossy(&capture.0.lock()).into_owned();
        assert_eq!(
            text,
            "TRACE=t1\nDEBUG=d2\nINFO=i3\nWARN=w4\nERROR=e5\nFATAL=plain\nINFO=1+1\n"
        );
    }

    #[test]
    fn test_formatted_message_is_bounded() {
        let capture = Capture::default();
        let context = LoggingContext::builder()
            .console_writer(capture.clone())
            .max_message_len(4)
            .build()
            .unwrap();
        let logger = context
            .create_logger(LoggerConfig::new().console_templates("#t"))
            .unwrap();

        info!(logger, "{}", "abcdefgh").unwrap();
        logger.flush();

        assert_eq!(&capture.0.lock()[..], b"abcd");
    }
}
