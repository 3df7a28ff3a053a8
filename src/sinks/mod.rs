//! Output destinations for rendered entries

pub mod console;
pub mod file;

pub use console::ConsoleSink;
pub use file::{FileSink, DEFAULT_PATH_TEMPLATE};

use crate::core::Result;

/// A destination the worker writes rendered text to.
///
/// Text is written exactly as rendered; templates carry their own line
/// endings. The worker calls `flush` once after every entry.
pub trait Sink: Send {
    fn write_rendered(&mut self, text: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
