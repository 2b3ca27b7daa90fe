//! Shared doubles for catalog and worker tests: a scripted in-memory
//! [`Fetcher`] and a recording [`ProgressSink`].

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::progress::ProgressSink;
use crate::types::Credentials;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use url::Url;

/// What a scripted asset URL should produce.
#[derive(Clone, Debug)]
pub(crate) enum AssetScript {
    /// Deliver these bytes
    Bytes(Vec<u8>),
    /// Fail with `PayloadTooLarge`
    TooLarge,
    /// Fail with `SourceUnavailable`
    Unavailable,
}

/// In-memory [`Fetcher`] serving canned pages and assets, recording every
/// fetch so tests can assert what was (and was not) requested.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    pages: Mutex<BTreeMap<String, String>>,
    assets: Mutex<BTreeMap<String, AssetScript>>,
    page_log: Mutex<Vec<String>>,
    asset_log: Mutex<Vec<String>>,
    /// When set, `fetch_page` of a URL containing the substring consumes one
    /// semaphore permit first — lets a test hold the pipeline at a known spot.
    page_gate: Mutex<Option<(String, Arc<tokio::sync::Semaphore>)>>,
}

impl ScriptedFetcher {
    pub(crate) fn add_page(&self, url: &str, html: String) {
        self.pages.lock().unwrap().insert(url.to_string(), html);
    }

    pub(crate) fn add_asset(&self, url: &str, script: AssetScript) {
        self.assets.lock().unwrap().insert(url.to_string(), script);
    }

    pub(crate) fn gate_pages(&self, url_fragment: &str) -> Arc<tokio::sync::Semaphore> {
        let semaphore = Arc::new(tokio::sync::Semaphore::new(0));
        *self.page_gate.lock().unwrap() = Some((url_fragment.to_string(), semaphore.clone()));
        semaphore
    }

    pub(crate) fn page_fetches(&self) -> Vec<String> {
        self.page_log.lock().unwrap().clone()
    }

    pub(crate) fn asset_fetches(&self) -> Vec<String> {
        self.asset_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &Url, _credentials: &Credentials) -> Result<String> {
        let gate = self.page_gate.lock().unwrap().clone();
        if let Some((fragment, semaphore)) = gate
            && url.as_str().contains(&fragment)
        {
            semaphore.acquire().await.unwrap().forget();
        }

        self.page_log.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::source_unavailable(url, "no scripted page"))
    }

    async fn fetch_bytes(
        &self,
        url: &Url,
        _referer: &Url,
        _credentials: &Credentials,
    ) -> Result<Vec<u8>> {
        self.asset_log.lock().unwrap().push(url.to_string());
        let script = self.assets.lock().unwrap().get(url.as_str()).cloned();
        match script {
            Some(AssetScript::Bytes(bytes)) => Ok(bytes),
            Some(AssetScript::TooLarge) => Err(Error::PayloadTooLarge {
                url: url.to_string(),
                limit_bytes: 10 * 1024 * 1024,
            }),
            Some(AssetScript::Unavailable) | None => {
                Err(Error::source_unavailable(url, "no scripted asset"))
            }
        }
    }
}

/// [`ProgressSink`] that records every call for later assertions.
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) overall: Mutex<Vec<u32>>,
    pub(crate) partial: Mutex<Vec<u32>>,
    pub(crate) labels: Mutex<Vec<String>>,
    pub(crate) location: Mutex<Option<PathBuf>>,
}

impl RecordingSink {
    pub(crate) fn overall_values(&self) -> Vec<u32> {
        self.overall.lock().unwrap().clone()
    }

    pub(crate) fn partial_values(&self) -> Vec<u32> {
        self.partial.lock().unwrap().clone()
    }

    pub(crate) fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn overall_progress(&self, current: u32) {
        self.overall.lock().unwrap().push(current);
    }

    fn partial_progress(&self, current: u32) {
        self.partial.lock().unwrap().push(current);
    }

    fn now_downloading(&self, label: &str) {
        self.labels.lock().unwrap().push(label.to_string());
    }

    fn save_location(&self, path: &Path) {
        *self.location.lock().unwrap() = Some(path.to_path_buf());
    }
}

/// List page whose latest-installment link carries `total` as its `no=` value.
pub(crate) fn list_page_html(total: u32) -> String {
    format!(
        r##"<html><body><div id="content"><div class="title"><a href="/webtoon/detail.nhn?titleId=42&no={total}">latest</a></div></div></body></html>"##
    )
}

/// Detail page with the given title and viewer image sources.
pub(crate) fn detail_page_html(title: &str, image_urls: &[&str]) -> String {
    let images: String = image_urls
        .iter()
        .map(|url| format!(r#"<img src="{url}">"#))
        .collect();
    format!(
        r#"<html><body><div class="tit_area"><div class="view"><h3>{title}</h3></div></div><div class="wt_viewer">{images}</div></body></html>"#
    )
}
