//! File logging example
//!
//! Demonstrates templated log paths, per-level file templates and deferred
//! teardown: `destroy` returns immediately and the worker closes the file
//! once the last queued entry is written.
//!
//! Run with: cargo run --example file_logging

use queued_template_logger::prelude::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== Queued Template Logger - File Logging Example ===\n");

    let context = LoggingContext::new(32)?;

    let logger = context.create_logger(
        LoggerConfig::with_default_templates()
            .name("file_demo")
            .path_template("./logs/#y/")
            .filename_template("#n_#d-#M.log")
            .file_template(LogLevel::Error, "#y-#M-#d #h:#m:#s !!! #l #t\n")
            .threshold(LogLevel::Debug),
    )?;

    let path = logger.file_path();
    println!("Writing to {:?}\n", path);

    for i in 0..10 {
        queued_template_logger::debug!(logger, "Processing item {}", i)?;
    }
    logger.warn("Disk usage above 80%")?;
    logger.error("Failed to reach upstream")?;

    logger.destroy();
    println!("\ndestroy() returned; pending entries: {}", logger.pending());

    context.flush();
    println!("released: {}", logger.is_released());

    if let Some(path) = path {
        let content = fs::read_to_string(&path)?;
        println!("\nFile contents ({} lines):", content.lines().count());
        print!("{}", content);
    }

    context.shutdown_and_wait(DEFAULT_SHUTDOWN_TIMEOUT);
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
