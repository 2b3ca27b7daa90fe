//! Page and byte fetching
//!
//! The [`Fetcher`] trait is the seam between the crawl pipeline and the
//! network: the catalog walker fetches pages through it, the download worker
//! fetches asset bytes through it, and tests substitute an in-memory double.
//! [`HttpFetcher`] is the production implementation on a shared
//! [`reqwest::Client`].

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::Credentials;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{COOKIE, REFERER};
use url::Url;

/// Fetches catalog pages and asset bytes.
///
/// Credentials are passed to every call and forwarded opaquely; the fetcher
/// never interprets them. Implementations perform no retries — a failure is
/// returned as-is and the caller decides whether the unit is skipped.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a catalog page as text.
    async fn fetch_page(&self, url: &Url, credentials: &Credentials) -> Result<String>;

    /// Fetch an asset's bytes, size-bounded.
    ///
    /// `referer` is the page the asset was discovered on; sources gate image
    /// delivery on it. Bodies exceeding the implementation's size bound fail
    /// with [`Error::PayloadTooLarge`].
    async fn fetch_bytes(
        &self,
        url: &Url,
        referer: &Url,
        credentials: &Credentials,
    ) -> Result<Vec<u8>>;
}

/// Production [`Fetcher`] backed by a shared HTTP client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_asset_bytes: usize,
}

impl HttpFetcher {
    /// Build a fetcher from the fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {e}"),
                key: Some("fetch".to_string()),
            })?;
        Ok(Self {
            client,
            max_asset_bytes: config.max_asset_bytes,
        })
    }

    fn apply_credentials(
        &self,
        request: reqwest::RequestBuilder,
        credentials: &Credentials,
    ) -> reqwest::RequestBuilder {
        match credentials.cookie_header() {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &Url, credentials: &Credentials) -> Result<String> {
        let request = self.apply_credentials(self.client.get(url.clone()), credentials);

        let response = request
            .send()
            .await
            .map_err(|e| Error::source_unavailable(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_unavailable(url, format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::source_unavailable(url, e))
    }

    async fn fetch_bytes(
        &self,
        url: &Url,
        referer: &Url,
        credentials: &Credentials,
    ) -> Result<Vec<u8>> {
        let request = self
            .apply_credentials(self.client.get(url.clone()), credentials)
            .header(REFERER, referer.as_str());

        let response = request
            .send()
            .await
            .map_err(|e| Error::source_unavailable(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_unavailable(url, format!("HTTP {status}")));
        }

        // Reject declared-oversized bodies before reading anything
        if let Some(length) = response.content_length()
            && length > self.max_asset_bytes as u64
        {
            return Err(Error::PayloadTooLarge {
                url: url.to_string(),
                limit_bytes: self.max_asset_bytes,
            });
        }

        // Servers that omit Content-Length are bounded while streaming
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::source_unavailable(url, e))?;
            if body.len() + chunk.len() > self.max_asset_bytes {
                return Err(Error::PayloadTooLarge {
                    url: url.to_string(),
                    limit_bytes: self.max_asset_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}
