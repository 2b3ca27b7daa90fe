//! Catalog traversal: probe-driven pagination over a collection
//!
//! The walker turns a [`CollectionDescriptor`] plus an ordinal into the next
//! page's title and image list, and a descriptor alone into the collection's
//! total installment count. Pagination is lazy — the worker asks for one page
//! per iteration, because the total is itself only discoverable by probing
//! the collection's first listing page.

mod extract;

use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{CollectionDescriptor, CollectionSummary, Credentials, Weekday};
use std::sync::Arc;
use url::Url;

/// One fetched item page: the discovered title and its ordered image list.
#[derive(Clone, Debug)]
pub struct ItemPage {
    /// Title discovered on the page (not known before the fetch)
    pub title: String,
    /// Resolved image URLs in document order, already filtered to images
    pub assets: Vec<Url>,
    /// The page's own URL, used as the referer for asset fetches
    pub page_url: Url,
}

/// Walks a collection's catalog pages through a [`Fetcher`].
#[derive(Clone)]
pub struct CatalogWalker {
    fetcher: Arc<dyn Fetcher>,
    base_url: Url,
}

impl CatalogWalker {
    /// Create a walker addressing catalog pages under `base_url`.
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    /// Discover the collection's total installment count from its list page.
    ///
    /// The total is discovered once, before traversal begins, and is not
    /// re-validated per item: a collection that grows or shrinks during a
    /// long run is iterated over its originally discovered range, and
    /// past-the-end probes surface as per-item fetch failures.
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`](crate::error::Error::SourceUnavailable)
    /// when the list page cannot be fetched,
    /// [`Error::MalformedListing`](crate::error::Error::MalformedListing)
    /// when the installment-count signal is absent. A zero total is a valid
    /// outcome, not an error.
    pub async fn discover_total(
        &self,
        descriptor: &CollectionDescriptor,
        credentials: &Credentials,
    ) -> Result<u32> {
        let url = self.list_url(descriptor);
        tracing::debug!(url = %url, "probing collection list page");
        let html = self.fetcher.fetch_page(&url, credentials).await?;
        extract::total_from_list_page(&html)
    }

    /// Fetch one item's page: its title and ordered image list.
    ///
    /// Non-image children of the page's viewer are silently skipped; a page
    /// with zero images is valid.
    pub async fn fetch_item(
        &self,
        descriptor: &CollectionDescriptor,
        ordinal: u32,
        credentials: &Credentials,
    ) -> Result<ItemPage> {
        let url = self.item_url(descriptor, ordinal);
        tracing::debug!(url = %url, ordinal, "fetching item page");
        let html = self.fetcher.fetch_page(&url, credentials).await?;
        let (title, assets) = extract::item_from_detail_page(&html, &url)?;
        Ok(ItemPage {
            title,
            assets,
            page_url: url,
        })
    }

    /// List the collections published on a given day of the week.
    ///
    /// Day listings only exist for the main webtoon catalog; the returned
    /// summaries carry enough metadata to construct descriptors and begin
    /// traversal. Listing entries without a collection id are skipped with a
    /// warning.
    pub async fn list_by_day(
        &self,
        day: Weekday,
        credentials: &Credentials,
    ) -> Result<Vec<CollectionSummary>> {
        let url = self.day_list_url(day);
        tracing::debug!(url = %url, day = day.query_value(), "fetching day listing");
        let html = self.fetcher.fetch_page(&url, credentials).await?;
        extract::collections_from_day_page(&html, &url)
    }

    fn list_url(&self, descriptor: &CollectionDescriptor) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/{}/list.nhn", descriptor.kind.path_segment()));
        url.query_pairs_mut()
            .clear()
            .append_pair("titleId", &descriptor.title_id);
        url
    }

    fn item_url(&self, descriptor: &CollectionDescriptor, ordinal: u32) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/{}/detail.nhn", descriptor.kind.path_segment()));
        url.query_pairs_mut()
            .clear()
            .append_pair("titleId", &descriptor.title_id)
            .append_pair("no", &ordinal.to_string());
        url
    }

    fn day_list_url(&self, day: Weekday) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("/webtoon/weekdayList.nhn");
        url.query_pairs_mut()
            .clear()
            .append_pair("week", day.query_value());
        url
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::{ScriptedFetcher, detail_page_html, list_page_html};
    use crate::types::CollectionKind;

    fn walker(fetcher: Arc<ScriptedFetcher>) -> CatalogWalker {
        CatalogWalker::new(fetcher, Url::parse("http://catalog.test").unwrap())
    }

    fn descriptor(kind: CollectionKind) -> CollectionDescriptor {
        CollectionDescriptor::new(kind, "42", "Test Toon")
    }

    #[test]
    fn urls_are_namespaced_by_collection_kind() {
        let w = walker(Arc::new(ScriptedFetcher::default()));

        assert_eq!(
            w.list_url(&descriptor(CollectionKind::Webtoon)).as_str(),
            "http://catalog.test/webtoon/list.nhn?titleId=42"
        );
        assert_eq!(
            w.item_url(&descriptor(CollectionKind::BestChallenge), 7).as_str(),
            "http://catalog.test/bestChallenge/detail.nhn?titleId=42&no=7"
        );
        assert_eq!(
            w.item_url(&descriptor(CollectionKind::Challenge), 1).as_str(),
            "http://catalog.test/challenge/detail.nhn?titleId=42&no=1"
        );
        assert_eq!(
            w.day_list_url(Weekday::Friday).as_str(),
            "http://catalog.test/webtoon/weekdayList.nhn?week=fri"
        );
    }

    #[tokio::test]
    async fn discover_total_reads_the_count_signal() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.add_page(
            "http://catalog.test/webtoon/list.nhn?titleId=42",
            list_page_html(23),
        );

        let total = walker(fetcher)
            .discover_total(&descriptor(CollectionKind::Webtoon), &Credentials::none())
            .await
            .unwrap();

        assert_eq!(total, 23);
    }

    #[tokio::test]
    async fn discover_total_propagates_fetch_failure() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let result = walker(fetcher)
            .discover_total(&descriptor(CollectionKind::Webtoon), &Credentials::none())
            .await;

        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn fetch_item_returns_page_url_for_referer_use() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.add_page(
            "http://catalog.test/webtoon/detail.nhn?titleId=42&no=3",
            detail_page_html("3화", &["http://img.test/a.jpg"]),
        );

        let page = walker(fetcher)
            .fetch_item(&descriptor(CollectionKind::Webtoon), 3, &Credentials::none())
            .await
            .unwrap();

        assert_eq!(page.title, "3화");
        assert_eq!(page.assets.len(), 1);
        assert_eq!(
            page.page_url.as_str(),
            "http://catalog.test/webtoon/detail.nhn?titleId=42&no=3"
        );
    }
}
