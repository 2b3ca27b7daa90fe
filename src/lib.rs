//! # webtoon-dl
//!
//! Embeddable library for crawling a paginated webtoon catalog and
//! downloading each installment's image sequence into a structured local
//! store.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Cooperative control** - One background task per worker; pause, resume
//!   and shutdown are observed at defined checkpoints, never preemptively
//! - **Resumable by layout** - A pre-existing item folder is treated as
//!   already downloaded, so re-runs skip completed work without a database
//! - **Event-driven** - Every per-unit skip is a structured event consumers
//!   subscribe to, not just a log line
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use webtoon_dl::{
//!     CollectionDescriptor, CollectionKind, Config, Credentials, DownloadWorker, HttpFetcher,
//!     LogProgressSink,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
//!
//!     let worker = DownloadWorker::new(
//!         CollectionDescriptor::new(CollectionKind::Webtoon, "758037", "참교육"),
//!         config,
//!         fetcher,
//!         Credentials::none(),
//!         Arc::new(LogProgressSink),
//!     )?;
//!
//!     // Subscribe to run events
//!     let mut events = worker.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     worker.start().await?;
//!     webtoon_dl::run_with_shutdown(worker).await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Catalog traversal (pagination and field extraction)
pub mod catalog;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Page and asset byte fetching
pub mod fetcher;
/// Destination folder naming and sanitization
pub mod naming;
/// Progress sink interface and counters
pub mod progress;
/// Core types and events
pub mod types;
/// Download worker (lifecycle control and pipeline)
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use catalog::{CatalogWalker, ItemPage};
pub use config::{Config, CounterBounds, FetchConfig, ProgressConfig, StorageConfig};
pub use error::{Error, Result};
pub use fetcher::{Fetcher, HttpFetcher};
pub use naming::sanitize_name;
pub use progress::{LogProgressSink, NoOpProgressSink, ProgressSink};
pub use types::{
    CollectionDescriptor, CollectionKind, CollectionSummary, Credentials, Event, RunState, Weekday,
};
pub use worker::DownloadWorker;

/// Helper function to run a started worker with graceful signal handling.
///
/// Waits for a termination signal, requests `shutdown()` on the worker, and
/// returns once its pipeline has stopped.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use webtoon_dl::{
///     CollectionDescriptor, CollectionKind, Config, Credentials, DownloadWorker, HttpFetcher,
///     NoOpProgressSink, run_with_shutdown,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
///     let worker = DownloadWorker::new(
///         CollectionDescriptor::new(CollectionKind::Webtoon, "758037", "참교육"),
///         config,
///         fetcher,
///         Credentials::none(),
///         Arc::new(NoOpProgressSink),
///     )?;
///
///     worker.start().await?;
///     run_with_shutdown(worker).await;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(worker: DownloadWorker) {
    wait_for_signal().await;
    worker.shutdown().await;
    worker.join().await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
