//! Basic download example
//!
//! This example demonstrates the core functionality of webtoon-dl:
//! - Building a configuration
//! - Creating a download worker for one collection
//! - Subscribing to events
//! - Starting the run and waiting for it to finish

use std::sync::Arc;
use webtoon_dl::{
    CollectionDescriptor, CollectionKind, Config, Credentials, DownloadWorker, Event, HttpFetcher,
    LogProgressSink,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Default configuration saves under ./downloads and talks to the live catalog
    let config = Config::default();
    let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);

    // Create a worker for one collection
    let worker = DownloadWorker::new(
        CollectionDescriptor::new(CollectionKind::Webtoon, "758037", "참교육"),
        config,
        fetcher,
        Credentials::none(),
        Arc::new(LogProgressSink),
    )?;

    // Subscribe to events
    let mut events = worker.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::RunStarted { total } => {
                    println!("✓ Run started: {} installments", total);
                }
                Event::ItemStarted { ordinal, title } => {
                    println!("⬇ Downloading #{}: {}", ordinal, title);
                }
                Event::ItemAlreadyPresent { ordinal, .. } => {
                    println!("↷ Skipping #{}: already downloaded", ordinal);
                }
                Event::ItemCompleted {
                    ordinal,
                    assets_written,
                } => {
                    println!("✓ Completed #{} ({} images)", ordinal, assets_written);
                }
                Event::ItemFetchFailed { ordinal, error } => {
                    println!("✗ Failed #{}: {}", ordinal, error);
                }
                Event::RunCompleted => {
                    println!("✓ All installments done");
                }
                Event::RunFailed { error } => {
                    println!("✗ Run failed: {}", error);
                }
                _ => {}
            }
        }
    });

    // Start the run and wait for it (Ctrl+C requests a graceful shutdown)
    worker.start().await?;
    webtoon_dl::run_with_shutdown(worker).await;

    Ok(())
}
