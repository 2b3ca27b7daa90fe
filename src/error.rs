//! Error types for webtoon-dl
//!
//! The taxonomy follows the failure modes of the crawl-and-download pipeline:
//! - Source failures (network, non-success HTTP) while fetching catalog pages
//!   or image bytes
//! - Structural failures (an expected signal missing from a fetched page)
//! - Oversized asset payloads
//! - Filesystem failures while laying out the destination tree
//!
//! During a run, only total-count discovery errors are fatal; every other
//! occurrence is logged, surfaced as an [`Event`](crate::types::Event), and the
//! affected unit is skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for webtoon-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for webtoon-dl
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog page or asset could not be fetched (network failure or
    /// non-success HTTP status)
    #[error("source unavailable: {url}: {reason}")]
    SourceUnavailable {
        /// The URL that could not be fetched
        url: String,
        /// Why the fetch failed (transport error or HTTP status)
        reason: String,
    },

    /// A fetched page is missing a structural signal the extractor relies on
    /// (distinct from a valid zero-total or zero-asset page)
    #[error("malformed listing: {0}")]
    MalformedListing(String),

    /// An asset body exceeds the configured download size bound
    #[error("payload too large: {url} exceeds {limit_bytes} bytes")]
    PayloadTooLarge {
        /// The asset URL whose body was over the bound
        url: String,
        /// The configured size bound in bytes
        limit_bytes: usize,
    },

    /// Directory or file creation/write failed
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        /// The path the operation was addressing
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "fetch.base_url")
        key: Option<String>,
    },

    /// `start()` was called a second time on the same worker instance
    #[error("worker already started: a worker runs its pipeline exactly once")]
    AlreadyStarted,
}

impl Error {
    /// Build a [`Error::Filesystem`] from a path and an I/O error.
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Build a [`Error::SourceUnavailable`] from a URL and a reason.
    pub(crate) fn source_unavailable(url: impl ToString, reason: impl ToString) -> Self {
        Error::SourceUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
