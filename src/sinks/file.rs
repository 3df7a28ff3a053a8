//! File sink and its resolver
//!
//! The resolver renders the path and filename templates, creates every
//! missing directory along the rendered path and opens the final file,
//! truncating whatever was there before.

use super::Sink;
use crate::core::template::{self, RenderContext};
use crate::core::{LogLevel, LoggerError, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{is_separator, Path, PathBuf};

/// Directory used when a file sink is requested without a path template
pub const DEFAULT_PATH_TEMPLATE: &str = "./logs/";

/// Capacity of the rendered directory path
pub const PATH_CAPACITY: usize = 512;

/// Capacity of the rendered file name
pub const FILENAME_CAPACITY: usize = 256;

pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Resolve templates against the current local time and open the file
    pub fn resolve(
        path_template: &str,
        filename_template: &str,
        logger_name: Option<&str>,
    ) -> Result<Self> {
        Self::resolve_at(path_template, filename_template, logger_name, Local::now())
    }

    /// Resolve templates against an explicit timestamp
    pub fn resolve_at(
        path_template: &str,
        filename_template: &str,
        logger_name: Option<&str>,
        time: DateTime<Local>,
    ) -> Result<Self> {
        let ctx = RenderContext::new(LogLevel::Trace, time, "").with_logger_name(logger_name);
        let dir = template::render(path_template, &ctx, PATH_CAPACITY);
        let filename = template::render(filename_template, &ctx, FILENAME_CAPACITY);

        create_dirs(&dir)?;

        let path = PathBuf::from(format!("{}{}", dir, filename));
        let file = File::create(&path).map_err(|e| {
            LoggerError::io_operation("opening log file", path.display().to_string(), e)
        })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the underlying file. Later writes fail.
    pub fn close(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush().map_err(|e| {
                LoggerError::io_operation("closing log file", self.path.display().to_string(), e)
            }),
            None => Ok(()),
        }
    }
}

/// Create each directory along `dir`, segment by segment
fn create_dirs(dir: &str) -> Result<()> {
    for (idx, c) in dir.char_indices() {
        if !is_separator(c) || idx == 0 {
            continue;
        }

        let prefix = Path::new(&dir[..idx]);
        if prefix.is_dir() {
            continue;
        }

        match fs::create_dir(prefix) {
            Ok(()) => {}
            // Another thread or process created it in the meantime
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && prefix.is_dir() => {}
            Err(e) => {
                return Err(LoggerError::io_operation(
                    "creating log directory",
                    prefix.display().to_string(),
                    e,
                ))
            }
        }
    }
    Ok(())
}

impl Sink for FileSink {
    fn write_rendered(&mut self, text: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::io_operation(
                "writing log file",
                self.path.display().to_string(),
                io::Error::new(io::ErrorKind::NotConnected, "file sink is closed"),
            )
        })?;

        writer.write_all(text.as_bytes()).map_err(|e| {
            LoggerError::io_operation("writing log file", self.path.display().to_string(), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush().map_err(|e| {
                LoggerError::io_operation("flushing log file", self.path.display().to_string(), e)
            }),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 7, 4, 9, 30, 0)
            .single()
            .expect("valid local datetime")
    }

    fn dir_template(root: &TempDir, rest: &str) -> String {
        format!("{}/{}", root.path().display(), rest)
    }

    #[test]
    fn test_creates_nested_directories() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path_template = dir_template(&root, "a/b/#y/");

        let sink = FileSink::resolve_at(&path_template, "#d.#M.txt", None, fixed_time())
            .expect("Failed to resolve sink");

        let expected = root.path().join("a").join("b").join("2024").join("04.06.txt");
        assert_eq!(sink.path(), expected.as_path());
        assert!(expected.exists());
    }

    #[test]
    fn test_existing_directories_are_fine() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(root.path().join("logs")).unwrap();
        let path_template = dir_template(&root, "logs/");

        let first = FileSink::resolve_at(&path_template, "one.txt", None, fixed_time());
        let second = FileSink::resolve_at(&path_template, "two.txt", None, fixed_time());
        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[test]
    fn test_truncates_existing_file() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let target = root.path().join("app.log");
        fs::write(&target, "stale contents\n").unwrap();

        let path_template = dir_template(&root, "");
        let mut sink = FileSink::resolve_at(&path_template, "app.log", None, fixed_time())
            .expect("Failed to resolve sink");
        sink.write_rendered("fresh\n").unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "fresh\n");
    }

    #[test]
    fn test_logger_name_in_filename() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path_template = dir_template(&root, "");
        let sink = FileSink::resolve_at(&path_template, "#n.log", Some("net"), fixed_time())
            .expect("Failed to resolve sink");
        assert_eq!(sink.path(), root.path().join("net.log").as_path());
    }

    #[test]
    fn test_directory_blocked_by_file_fails() {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::write(root.path().join("occupied"), "").unwrap();
        let path_template = dir_template(&root, "occupied/inner/");

        let result = FileSink::resolve_at(&path_template, "x.log", None, fixed_time());
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
    }

    #[test]
    fn test_write_after_close_fails() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path_template = dir_template(&root, "");
        let mut sink = FileSink::resolve_at(&path_template, "closed.log", None, fixed_time())
            .expect("Failed to resolve sink");

        sink.close().unwrap();
        assert!(sink.write_rendered("late").is_err());
        assert!(sink.flush().is_ok());
    }

    #[test]
    fn test_writes_reach_disk_on_flush() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path_template = dir_template(&root, "");
        let mut sink = FileSink::resolve_at(&path_template, "buffered.log", None, fixed_time())
            .expect("Failed to resolve sink");

        sink.write_rendered("pending\n").unwrap();
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "");

        sink.flush().unwrap();
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "pending\n");
    }
}
