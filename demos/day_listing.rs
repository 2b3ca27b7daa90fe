//! Day listing example
//!
//! This example demonstrates the catalog's day listing:
//! - Fetching the collections published on one weekday
//! - Turning a listing entry into a descriptor
//! - Downloading the first listed collection

use std::sync::Arc;
use webtoon_dl::{
    CatalogWalker, Config, Credentials, DownloadWorker, HttpFetcher, LogProgressSink, Weekday,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let config = Config::default();
    let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);

    // List everything published on Fridays
    let walker = CatalogWalker::new(fetcher.clone(), config.fetch.base_url.parse()?);
    let collections = walker.list_by_day(Weekday::Friday, &Credentials::none()).await?;

    println!("Friday catalog: {} collections", collections.len());
    for summary in &collections {
        println!("  [{}] {}", summary.title_id, summary.title);
    }

    // Download the first one
    let Some(first) = collections.first() else {
        println!("Nothing listed for Friday");
        return Ok(());
    };

    let worker = DownloadWorker::new(
        first.descriptor(),
        config,
        fetcher,
        Credentials::none(),
        Arc::new(LogProgressSink),
    )?;

    worker.start().await?;
    worker.join().await;

    Ok(())
}
