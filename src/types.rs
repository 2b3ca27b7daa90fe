//! Core types and events for webtoon-dl

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The catalog section a collection belongs to.
///
/// Exactly three kinds exist; each maps to a fixed, localized destination
/// folder name and to its own catalog URL namespace. No other values are
/// valid inputs to the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// The main serialized webtoon catalog
    Webtoon,
    /// The "best challenge" amateur catalog
    BestChallenge,
    /// The open "challenge" catalog
    Challenge,
}

impl CollectionKind {
    /// The fixed destination folder name for this kind.
    ///
    /// These names are part of the on-disk layout contract: a store produced
    /// by one implementation must be resumable by another, so the strings are
    /// not configurable.
    pub fn folder_name(&self) -> &'static str {
        match self {
            CollectionKind::Webtoon => "네이버 웹툰",
            CollectionKind::BestChallenge => "베스트 도전",
            CollectionKind::Challenge => "도전만화",
        }
    }

    /// The URL path segment under which this kind's catalog pages live.
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            CollectionKind::Webtoon => "webtoon",
            CollectionKind::BestChallenge => "bestChallenge",
            CollectionKind::Challenge => "challenge",
        }
    }
}

/// Identifies one collection (a series) within the catalog.
///
/// Immutable once a worker is started with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    /// Which catalog section the collection lives in
    pub kind: CollectionKind,
    /// The catalog's identifier for the collection (the `titleId` query value)
    pub title_id: String,
    /// The collection's display title, used for the destination folder name
    pub title: String,
}

impl CollectionDescriptor {
    /// Create a new descriptor.
    pub fn new(
        kind: CollectionKind,
        title_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title_id: title_id.into(),
            title: title.into(),
        }
    }
}

/// One entry of a day listing: enough metadata to begin a traversal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// The catalog's identifier for the collection
    pub title_id: String,
    /// The collection's display title
    pub title: String,
    /// Thumbnail image URL, when the listing carried a resolvable one
    pub thumbnail: Option<url::Url>,
}

impl CollectionSummary {
    /// Turn this listing entry into a descriptor for the main webtoon catalog
    /// (day listings only exist for [`CollectionKind::Webtoon`]).
    pub fn descriptor(&self) -> CollectionDescriptor {
        CollectionDescriptor::new(CollectionKind::Webtoon, &*self.title_id, &*self.title)
    }
}

/// Day of the week a day listing can be requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// The query parameter value the catalog expects for this day.
    pub fn query_value(&self) -> &'static str {
        match self {
            Weekday::Monday => "mon",
            Weekday::Tuesday => "tue",
            Weekday::Wednesday => "wed",
            Weekday::Thursday => "thu",
            Weekday::Friday => "fri",
            Weekday::Saturday => "sat",
            Weekday::Sunday => "sun",
        }
    }
}

/// Lifecycle state of a [`DownloadWorker`](crate::worker::DownloadWorker).
///
/// Transitions: `Running → Paused` (pause), `Paused → Running` (resume),
/// `{Running, Paused} → ShuttingDown` (shutdown, which always clears pause),
/// `ShuttingDown → Stopped` (observed at the next checkpoint). `Stopped` is
/// terminal; a worker also begins in `Stopped` until `start()` is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Pipeline is executing (or will at the next checkpoint)
    Running,
    /// Pipeline is suspended at a checkpoint until resumed or shut down
    Paused,
    /// Shutdown requested; the pipeline unwinds at its next checkpoint
    ShuttingDown,
    /// Terminal: not yet started, finished, or shut down
    Stopped,
}

/// Opaque credential bundle passed through to every fetch.
///
/// The key/value pairs are sent as cookies; the library never interprets,
/// refreshes, or validates them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(BTreeMap<String, String>);

impl Credentials {
    /// An empty credential bundle (for sources that require none).
    pub fn none() -> Self {
        Self::default()
    }

    /// Add one key/value pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Render the bundle as a `Cookie` header value, or `None` when empty.
    pub fn cookie_header(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(
            self.0
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

impl FromIterator<(String, String)> for Credentials {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Event emitted during a worker run
///
/// Every per-unit skip is surfaced here so "why did item N produce no output"
/// is answerable without grepping logs. Subscribers that fall behind the
/// broadcast buffer receive a lagged error, not stalled downloads.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Total item count discovered; the main loop is about to begin
    RunStarted {
        /// Number of items the run will iterate
        total: u32,
    },

    /// An item's page was fetched and its download is beginning
    ItemStarted {
        /// 1-based position in the collection
        ordinal: u32,
        /// Title discovered on the item's page
        title: String,
    },

    /// An item was skipped because its destination folder already exists
    /// (the resumability rule)
    ItemAlreadyPresent {
        /// 1-based position in the collection
        ordinal: u32,
        /// The pre-existing destination folder
        path: PathBuf,
    },

    /// An item's page could not be fetched or parsed; the item was skipped
    ItemFetchFailed {
        /// 1-based position in the collection
        ordinal: u32,
        /// Error message
        error: String,
    },

    /// An item's destination folder could not be created; the item was skipped
    ItemFolderFailed {
        /// 1-based position in the collection
        ordinal: u32,
        /// The folder that could not be created
        path: PathBuf,
        /// Error message
        error: String,
    },

    /// An asset's bytes could not be fetched; the asset was skipped
    AssetFetchFailed {
        /// 1-based position of the owning item
        ordinal: u32,
        /// 0-based position of the asset within the item's sequence
        index: usize,
        /// Error message
        error: String,
    },

    /// An asset's file could not be written; the asset was skipped
    AssetWriteFailed {
        /// 1-based position of the owning item
        ordinal: u32,
        /// The file path the write was addressing
        path: PathBuf,
        /// Error message
        error: String,
    },

    /// All of an item's assets were attempted
    ItemCompleted {
        /// 1-based position in the collection
        ordinal: u32,
        /// Number of asset files actually written
        assets_written: u32,
    },

    /// The run iterated every item without a shutdown
    RunCompleted,

    /// The run was ended early by `shutdown()`
    RunInterrupted {
        /// The ordinal that was being processed when shutdown was observed
        last_ordinal: u32,
    },

    /// Total-count discovery failed; the run aborted before the main loop
    RunFailed {
        /// Error message
        error: String,
    },
}
