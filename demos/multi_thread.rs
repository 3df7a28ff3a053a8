//! Multi-threaded logging example
//!
//! Several threads share one context with a deliberately small queue, so
//! producers block on backpressure while the single worker keeps up.
//!
//! Run with: cargo run --example multi_thread

use queued_template_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() -> Result<()> {
    println!("=== Queued Template Logger - Multi-threaded Example ===\n");

    let context = Arc::new(LoggingContext::builder().capacity(4).build()?);

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let context = Arc::clone(&context);
            thread::spawn(move || -> Result<()> {
                let logger = context.create_logger(
                    LoggerConfig::new()
                        .name(format!("thread-{}", t))
                        .console_templates("#h:#m:#s #{#n#} #t\n"),
                )?;
                for i in 0..5 {
                    queued_template_logger::info!(logger, "message {}", i)?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        if let Ok(Err(e)) = handle.join() {
            eprintln!("producer failed: {}", e);
        }
    }
    context.flush();

    let metrics = context.metrics();
    println!(
        "\n{} entries written in {:?}, producers blocked {} times",
        metrics.entries_written(),
        start.elapsed(),
        metrics.blocked_enqueues()
    );

    context.shutdown_and_wait(DEFAULT_SHUTDOWN_TIMEOUT);
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
