//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A resource needed during setup could not be acquired
    #[error("Resource exhausted ({resource}): {message}")]
    ResourceExhausted { resource: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The logging context no longer accepts entries
    #[error("Logging context has been shut down")]
    ContextShutdown,

    /// The logger has been asked to release its resources
    #[error("Logger has been destroyed")]
    LoggerDestroyed,

    /// A sink panicked while handling an entry
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a resource exhaustion error
    pub fn resource(resource: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ResourceExhausted {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("LoggerConfig", "missing console template");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::resource("worker thread", "spawn failed");
        assert!(matches!(err, LoggerError::ResourceExhausted { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("path_template", "must end with a path separator");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for path_template: must end with a path separator"
        );

        assert_eq!(
            LoggerError::ContextShutdown.to_string(),
            "Logging context has been shut down"
        );

        let err = LoggerError::sink_panicked("console", "boom");
        assert_eq!(err.to_string(), "Sink 'console' panicked: boom");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "logs/app.txt", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("logs/app.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
