//! Pause/resume control example
//!
//! This example demonstrates the worker's cooperative control operations:
//! - Pausing a running download
//! - Resuming it
//! - Requesting a graceful shutdown
//!
//! Pause and shutdown take effect at the worker's checkpoints (before each
//! image, and once more after each installment), never mid-fetch.

use std::sync::Arc;
use std::time::Duration;
use webtoon_dl::{
    CollectionDescriptor, CollectionKind, Config, Credentials, DownloadWorker, HttpFetcher,
    LogProgressSink,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let config = Config::default();
    let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);

    let worker = DownloadWorker::new(
        CollectionDescriptor::new(CollectionKind::Webtoon, "758037", "참교육"),
        config,
        fetcher,
        Credentials::none(),
        Arc::new(LogProgressSink),
    )?;

    worker.start().await?;
    println!("State after start: {:?}", worker.state().await);

    // Let a few images download, then pause
    tokio::time::sleep(Duration::from_secs(10)).await;
    worker.pause().await;
    println!("State after pause: {:?}", worker.state().await);

    // The worker is suspended at a checkpoint; nothing downloads while paused
    tokio::time::sleep(Duration::from_secs(5)).await;

    worker.resume().await;
    println!("State after resume: {:?}", worker.state().await);

    // Let it run a little longer, then shut down gracefully. Already-written
    // files stay on disk; a later run skips every completed installment.
    tokio::time::sleep(Duration::from_secs(10)).await;
    worker.shutdown().await;
    worker.join().await;
    println!("State after shutdown: {:?}", worker.state().await);

    Ok(())
}
