//! Configuration types for webtoon-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
///
/// Every field has a sensible default; `Config::default()` produces a working
/// configuration that saves under `./downloads` and talks to the live catalog.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where downloads land on disk
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog endpoint and fetch bounds
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Progress counter bounds reported through the sink
    #[serde(default)]
    pub progress: ProgressConfig,
}

impl Config {
    /// Validate the configuration, returning a [`Error::Config`] naming the
    /// offending key on failure.
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.fetch.base_url).is_err() {
            return Err(Error::Config {
                message: format!("'{}' is not a valid URL", self.fetch.base_url),
                key: Some("fetch.base_url".to_string()),
            });
        }
        if self.fetch.max_asset_bytes == 0 {
            return Err(Error::Config {
                message: "asset size bound must be non-zero".to_string(),
                key: Some("fetch.max_asset_bytes".to_string()),
            });
        }
        self.progress.overall.validate("progress.overall")?;
        self.progress.partial.validate("progress.partial")?;
        Ok(())
    }
}

/// Destination store configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory the kind/collection/item tree is created under
    /// (default: "./downloads")
    #[serde(default = "default_save_root")]
    pub save_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_root: default_save_root(),
        }
    }
}

/// Catalog endpoint and HTTP fetch configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL the catalog's list/detail pages are addressed under
    /// (default: the live catalog)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on a single asset's body size in bytes (default: 10 MiB).
    ///
    /// Bodies over the bound fail with
    /// [`Error::PayloadTooLarge`](crate::error::Error::PayloadTooLarge) and the
    /// asset is skipped. This is the only built-in fetch limit; the worker
    /// imposes no per-request timeout.
    #[serde(default = "default_max_asset_bytes")]
    pub max_asset_bytes: usize,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_asset_bytes: default_max_asset_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

/// Bounds for both progress counters
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Overall counter (one unit per item)
    #[serde(default)]
    pub overall: CounterBounds,

    /// Partial counter (one unit per asset within the current item)
    #[serde(default)]
    pub partial: CounterBounds,
}

/// Fixed minimum/maximum of one progress counter
///
/// Fixed at worker construction; only the current value moves during a run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CounterBounds {
    /// Counter value before any work has happened (default: 0)
    #[serde(default)]
    pub min: u32,

    /// Counter value at completion (default: 100)
    #[serde(default = "default_counter_max")]
    pub max: u32,
}

impl CounterBounds {
    fn validate(&self, key: &str) -> Result<()> {
        if self.max <= self.min {
            return Err(Error::Config {
                message: format!("counter maximum {} must exceed minimum {}", self.max, self.min),
                key: Some(key.to_string()),
            });
        }
        Ok(())
    }
}

impl Default for CounterBounds {
    fn default() -> Self {
        Self {
            min: 0,
            max: default_counter_max(),
        }
    }
}

fn default_save_root() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_base_url() -> String {
    "https://comic.naver.com".to_string()
}

fn default_max_asset_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!("webtoon-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_counter_max() -> u32 {
    100
}
