//! Download worker: run lifecycle and the per-item download pipeline
//!
//! A worker is created once per (collection, destination root) pair and runs
//! its pipeline on a dedicated tokio task. The caller interacts with it only
//! through the four control operations — [`start`](DownloadWorker::start),
//! [`pause`](DownloadWorker::pause), [`resume`](DownloadWorker::resume),
//! [`shutdown`](DownloadWorker::shutdown) — and observes it through the
//! progress sink and the event stream.
//!
//! Submodules:
//! - [`control`] - lifecycle operations and checkpoint logic
//! - [`pipeline`] - the run-once download pipeline

mod control;
mod pipeline;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::catalog::CatalogWalker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::progress::ProgressSink;
use crate::types::{CollectionDescriptor, Credentials, Event, RunState};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Lifecycle state shared between the control surface and the pipeline task.
///
/// All four control operations and every state read serialize on `state`;
/// the pipeline observes requests only at its checkpoints.
pub(crate) struct Lifecycle {
    /// Current run state, guarded by the worker's single state lock
    pub(crate) state: tokio::sync::Mutex<RunState>,
    /// Wakes the pipeline out of a paused checkpoint. `notify_one` stores a
    /// permit, so a resume issued between the pipeline's state check and its
    /// await is never lost.
    pub(crate) resume: tokio::sync::Notify,
    /// Set by the first `start()`; a worker runs its pipeline at most once
    pub(crate) started: AtomicBool,
}

/// Crawl-and-download worker for one collection (cloneable - all shared
/// fields are Arc-wrapped; clones control the same run).
///
/// Run at most one worker per destination root and collection: the
/// resumability rule probes folder existence, and two concurrent runs over
/// the same root race those probes. Workers on disjoint roots are safe.
#[derive(Clone)]
pub struct DownloadWorker {
    /// The collection this worker downloads; immutable for the worker's lifetime
    pub(crate) descriptor: CollectionDescriptor,
    /// Configuration (wrapped in Arc for sharing with the pipeline task)
    pub(crate) config: Arc<Config>,
    /// Catalog walker the pipeline probes pages through
    pub(crate) walker: CatalogWalker,
    /// Byte fetcher for asset downloads
    pub(crate) fetcher: Arc<dyn Fetcher>,
    /// Opaque credential bundle forwarded to every fetch
    pub(crate) credentials: Credentials,
    /// Progress observer, called synchronously at each update point
    pub(crate) sink: Arc<dyn ProgressSink>,
    /// Shared lifecycle state
    pub(crate) lifecycle: Arc<Lifecycle>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Handle of the spawned pipeline task, for `join()`
    pub(crate) pipeline_task:
        Arc<tokio::sync::Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl DownloadWorker {
    /// Create a new worker in the `Stopped` (not yet started) state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration fails validation
    /// (invalid base URL, zero size bound, inverted counter bounds).
    pub fn new(
        descriptor: CollectionDescriptor,
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        credentials: Credentials,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Self> {
        config.validate()?;
        let base_url = url::Url::parse(&config.fetch.base_url).map_err(|e| Error::Config {
            message: format!("'{}' is not a valid URL: {e}", config.fetch.base_url),
            key: Some("fetch.base_url".to_string()),
        })?;

        let walker = CatalogWalker::new(fetcher.clone(), base_url);

        // Buffer size matches the busiest realistic run; lagging subscribers
        // receive RecvError::Lagged rather than stalling the pipeline.
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        Ok(Self {
            descriptor,
            config: Arc::new(config),
            walker,
            fetcher,
            credentials,
            sink,
            lifecycle: Arc::new(Lifecycle {
                state: tokio::sync::Mutex::new(RunState::Stopped),
                resume: tokio::sync::Notify::new(),
                started: AtomicBool::new(false),
            }),
            event_tx,
            pipeline_task: Arc::new(tokio::sync::Mutex::new(None)),
        })
    }

    /// The collection this worker was created for.
    pub fn descriptor(&self) -> &CollectionDescriptor {
        &self.descriptor
    }

    /// Subscribe to run events.
    ///
    /// Multiple subscribers are supported; each receives all events
    /// independently. Every per-item and per-asset skip is surfaced here, so
    /// "why did item N produce no output" is answerable from the stream.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// downloads never block on observers.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
