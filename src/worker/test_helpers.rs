//! Shared fixtures for worker tests: a scripted collection, a worker wired to
//! a temp destination root, and small async wait/drain utilities.

use crate::config::{Config, FetchConfig, StorageConfig};
use crate::test_support::{AssetScript, RecordingSink, ScriptedFetcher, detail_page_html, list_page_html};
use crate::types::{CollectionDescriptor, CollectionKind, Credentials, Event};
use crate::worker::DownloadWorker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub(crate) const BASE: &str = "http://catalog.test";

pub(crate) fn list_url() -> String {
    format!("{BASE}/webtoon/list.nhn?titleId=42")
}

pub(crate) fn item_url(ordinal: u32) -> String {
    format!("{BASE}/webtoon/detail.nhn?titleId=42&no={ordinal}")
}

/// Script a whole collection: the list page reports `items.len()` installments
/// and each item gets a detail page plus byte bodies for its asset URLs (each
/// asset's body is its own URL string, so file contents are checkable).
pub(crate) fn script_collection(fetcher: &ScriptedFetcher, items: &[(&str, &[&str])]) {
    fetcher.add_page(&list_url(), list_page_html(items.len() as u32));
    for (i, (title, assets)) in items.iter().enumerate() {
        let ordinal = i as u32 + 1;
        fetcher.add_page(&item_url(ordinal), detail_page_html(title, assets));
        for url in *assets {
            fetcher.add_asset(url, AssetScript::Bytes(url.as_bytes().to_vec()));
        }
    }
}

/// A worker under test plus everything needed to observe it.
pub(crate) struct Harness {
    pub(crate) worker: DownloadWorker,
    pub(crate) fetcher: Arc<ScriptedFetcher>,
    pub(crate) sink: Arc<RecordingSink>,
    pub(crate) events: tokio::sync::broadcast::Receiver<Event>,
    pub(crate) root: tempfile::TempDir,
}

impl Harness {
    /// The collection's destination folder under the temp root.
    pub(crate) fn collection_dir(&self) -> PathBuf {
        self.root.path().join("네이버 웹툰").join("Test Toon")
    }
}

/// Build a worker over `fetcher` saving into a fresh temp root.
pub(crate) fn create_test_worker(fetcher: Arc<ScriptedFetcher>) -> Harness {
    let root = tempfile::tempdir().unwrap();
    let (worker, sink) = create_test_worker_in(fetcher.clone(), root.path());
    let events = worker.subscribe();
    Harness {
        worker,
        fetcher,
        sink,
        events,
        root,
    }
}

/// Build a worker over `fetcher` saving into an existing root (for re-run
/// resumability tests that share a destination across worker instances).
pub(crate) fn create_test_worker_in(
    fetcher: Arc<ScriptedFetcher>,
    save_root: &Path,
) -> (DownloadWorker, Arc<RecordingSink>) {
    let config = Config {
        storage: StorageConfig {
            save_root: save_root.to_path_buf(),
        },
        fetch: FetchConfig {
            base_url: BASE.to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let sink = Arc::new(RecordingSink::default());
    let worker = DownloadWorker::new(
        CollectionDescriptor::new(CollectionKind::Webtoon, "42", "Test Toon"),
        config,
        fetcher,
        Credentials::none(),
        sink.clone(),
    )
    .unwrap();
    (worker, sink)
}

/// Drain every event currently buffered on the receiver.
pub(crate) fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Poll `predicate` until it holds, panicking after two seconds.
pub(crate) async fn wait_until(what: &str, predicate: impl Fn() -> bool) {
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while !predicate() {
        assert!(
            std::time::Instant::now() < deadline,
            "timed out waiting for: {what}"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Await the worker's pipeline with a hang guard.
pub(crate) async fn join_with_timeout(worker: &DownloadWorker) {
    tokio::time::timeout(Duration::from_secs(5), worker.join())
        .await
        .expect("pipeline did not terminate within 5s");
}

/// Relative paths of every file under `root`, sorted, for layout comparisons.
pub(crate) fn file_set(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
