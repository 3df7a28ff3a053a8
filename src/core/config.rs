//! Per-logger configuration
//!
//! A [`LoggerConfig`] is plain data; nothing is validated or opened until it
//! is handed to [`LoggingContext::create_logger`](crate::LoggingContext::create_logger).

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::template::{Template, TemplateSet};
use serde::{Deserialize, Serialize};
use std::path::is_separator;

/// Console template used by [`LoggerConfig::with_default_templates`]
pub const DEFAULT_CONSOLE_TEMPLATE: &str = "[#h:#m:#s] #{#l#} #t\n";

/// File template used by [`LoggerConfig::with_default_templates`]
pub const DEFAULT_FILE_TEMPLATE: &str = "#y-#M-#d #h:#m:#s [#l] #t\n";

/// Configuration for a single logger
///
/// # Example
///
/// ```
/// use queued_template_logger::{LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::new()
///     .name("net")
///     .console_templates("#{#l#} #t\n")
///     .console_template(LogLevel::Fatal, "#{ FATAL #} #h:#m:#s #t\n")
///     .path_template("./logs/#y/")
///     .filename_template("#n_#d.#M.log")
///     .threshold(LogLevel::Debug);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Optional name, rendered by `#n`
    pub name: Option<String>,
    /// Directory template; must end with a path separator
    pub path_template: Option<String>,
    /// File name template; `None` disables the file sink
    pub filename_template: Option<String>,
    /// Console template per level, indexed by [`LogLevel::index`]
    pub console_templates: [Option<String>; LogLevel::COUNT],
    /// File template per level; a missing entry falls back to the console template
    pub file_templates: [Option<String>; LogLevel::COUNT],
    /// Minimum level delivered to the sinks
    pub threshold: LogLevel,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with the built-in console and file templates for every level
    pub fn with_default_templates() -> Self {
        Self::new()
            .console_templates(DEFAULT_CONSOLE_TEMPLATE)
            .file_templates(DEFAULT_FILE_TEMPLATE)
    }

    /// Parse a config from JSON
    ///
    /// ```
    /// use queued_template_logger::{LogLevel, LoggerConfig};
    ///
    /// let config = LoggerConfig::from_json(r##"{
    ///     "name": "db",
    ///     "console_templates": ["#t\n", "#t\n", "#t\n", "#t\n", "#t\n", "#t\n"],
    ///     "threshold": "Warn"
    /// }"##).unwrap();
    ///
    /// assert_eq!(config.threshold, LogLevel::Warn);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn path_template(mut self, template: impl Into<String>) -> Self {
        self.path_template = Some(template.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn filename_template(mut self, template: impl Into<String>) -> Self {
        self.filename_template = Some(template.into());
        self
    }

    /// Set the console template of one level
    #[must_use = "builder methods return a new value"]
    pub fn console_template(mut self, level: LogLevel, template: impl Into<String>) -> Self {
        self.console_templates[level.index()] = Some(template.into());
        self
    }

    /// Use one console template for every level
    #[must_use = "builder methods return a new value"]
    pub fn console_templates(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.console_templates = std::array::from_fn(|_| Some(template.clone()));
        self
    }

    /// Set the file template of one level
    #[must_use = "builder methods return a new value"]
    pub fn file_template(mut self, level: LogLevel, template: impl Into<String>) -> Self {
        self.file_templates[level.index()] = Some(template.into());
        self
    }

    /// Use one file template for every level
    #[must_use = "builder methods return a new value"]
    pub fn file_templates(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.file_templates = std::array::from_fn(|_| Some(template.clone()));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    /// Check the config without touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.path_template {
            if !path.chars().last().is_some_and(is_separator) {
                return Err(LoggerError::config(
                    "path_template",
                    format!("'{}' must end with a path separator", path),
                ));
            }
        }

        if let Some(level) = LogLevel::ALL
            .iter()
            .find(|level| self.console_templates[level.index()].is_none())
        {
            return Err(LoggerError::config(
                "console_templates",
                format!("missing console template for level {}", level),
            ));
        }

        Ok(())
    }

    /// Compile console templates. Call after [`validate`](Self::validate).
    pub(crate) fn compile_console(&self) -> TemplateSet {
        TemplateSet::new(std::array::from_fn(|i| {
            Template::parse(self.console_templates[i].as_deref().unwrap_or_default())
        }))
    }

    /// Compile file templates, falling back to the console template per level
    pub(crate) fn compile_file(&self) -> TemplateSet {
        TemplateSet::new(std::array::from_fn(|i| {
            let source = self.file_templates[i]
                .as_deref()
                .or(self.console_templates[i].as_deref())
                .unwrap_or_default();
            Template::parse(source)
        }))
    }
}
