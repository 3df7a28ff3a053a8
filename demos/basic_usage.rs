//! Basic logger usage example
//!
//! Demonstrates console logging through a context, per-level templates and
//! threshold filtering.
//!
//! Run with: cargo run --example basic_usage

use queued_template_logger::prelude::*;
use queued_template_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Queued Template Logger - Basic Usage Example ===\n");

    let context = LoggingContext::new(16)?;

    // Styled level name with the time of day
    let logger = context.create_logger(
        LoggerConfig::new()
            .name("basic")
            .console_templates("[#h:#m:#s] #{#l#} #n: #t\n")
            .threshold(LogLevel::Trace),
    )?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.fatal("This is a fatal message")?;
    logger.flush();

    println!("\n2. Raising the threshold to INFO:");
    logger.set_threshold(LogLevel::Info);
    logger.trace("Trace message (hidden)")?;
    logger.debug("Debug message (hidden)")?;
    info!(logger, "Info message (visible), {} of {}", 1, 2)?;
    warn!(logger, "Warning message (visible), {} of {}", 2, 2)?;
    logger.flush();

    println!("\n3. Directives inside a message are printed as-is:");
    logger.info("#h #l #t stays literal")?;
    logger.flush();

    drop(logger);
    context.shutdown_and_wait(DEFAULT_SHUTDOWN_TIMEOUT);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
