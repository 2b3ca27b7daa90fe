//! Field extraction from fetched catalog pages
//!
//! Parsing is synchronous and isolated here: callers fetch a page as text,
//! then hand it to a pure function, so parsed documents never live across an
//! await point. Every missing structural signal is a
//! [`Error::MalformedListing`]; a page with zero installments or zero images
//! is valid and returns an empty result instead.

use crate::error::{Error, Result};
use crate::types::CollectionSummary;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Extension an asset's resolved source must end in to be downloaded.
const IMAGE_EXTENSION: &str = ".jpg";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|_| Error::MalformedListing(format!("internal selector '{css}' failed to parse")))
}

fn pattern(re: &str) -> Result<Regex> {
    Regex::new(re)
        .map_err(|_| Error::MalformedListing(format!("internal pattern '{re}' failed to compile")))
}

fn capture_digits(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Text directly inside an element, excluding text of child elements.
fn own_text(element: &ElementRef) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &*t.text))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extract the total installment count from a collection's list page.
///
/// The first installment link under `#content .title` points at the latest
/// installment; its `no=` query value is the collection's total.
pub(crate) fn total_from_list_page(html: &str) -> Result<u32> {
    let document = Html::parse_document(html);

    let link_selector = selector("#content .title a")?;
    let link = document
        .select(&link_selector)
        .next()
        .ok_or_else(|| Error::MalformedListing("no installment link under #content .title".into()))?;

    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| Error::MalformedListing("installment link carries no href".into()))?;

    let digits = capture_digits(&pattern(r"no=(\d+)")?, href).ok_or_else(|| {
        Error::MalformedListing(format!("no installment-count signal in '{href}'"))
    })?;

    digits
        .parse()
        .map_err(|_| Error::MalformedListing(format!("installment count '{digits}' out of range")))
}

/// Extract an item's title and ordered image list from its detail page.
///
/// The title is the own text of the `.tit_area .view h3` heading; images are
/// the children of `.wt_viewer` whose resolved `src` ends in `.jpg`. Children
/// that are not images are silently skipped, so the returned sequence is
/// already dense.
pub(crate) fn item_from_detail_page(html: &str, page_url: &Url) -> Result<(String, Vec<Url>)> {
    let document = Html::parse_document(html);

    let title_selector = selector(".tit_area .view h3")?;
    let heading = document
        .select(&title_selector)
        .next()
        .ok_or_else(|| Error::MalformedListing("no title heading on detail page".into()))?;
    let title = own_text(&heading);

    let viewer_selector = selector(".wt_viewer")?;
    let viewer = document
        .select(&viewer_selector)
        .next()
        .ok_or_else(|| Error::MalformedListing("no viewer container on detail page".into()))?;

    let mut assets = Vec::new();
    for child in viewer.children().filter_map(ElementRef::wrap) {
        let Some(src) = child.value().attr("src") else {
            continue;
        };
        let Ok(resolved) = page_url.join(src) else {
            tracing::warn!(src, "unresolvable image source in viewer, skipping");
            continue;
        };
        if resolved.as_str().ends_with(IMAGE_EXTENSION) {
            assets.push(resolved);
        }
    }

    Ok((title, assets))
}

/// Extract the day listing's collection entries.
///
/// Iterates the children of `#content .img_list`; each entry's `.thumb a`
/// link carries the collection id in its href, the display title in its
/// `title` attribute, and the thumbnail as its first child image. Entries
/// missing the id signal are skipped with a warning rather than failing the
/// whole listing.
pub(crate) fn collections_from_day_page(
    html: &str,
    page_url: &Url,
) -> Result<Vec<CollectionSummary>> {
    let document = Html::parse_document(html);

    let list_selector = selector("#content .img_list")?;
    let list = document
        .select(&list_selector)
        .next()
        .ok_or_else(|| Error::MalformedListing("no day listing container".into()))?;

    let link_selector = selector(".thumb a")?;
    let id_pattern = pattern(r"titleId=(\d+)")?;

    let mut collections = Vec::new();
    for entry in list.children().filter_map(ElementRef::wrap) {
        let Some(link) = entry.select(&link_selector).next() else {
            tracing::warn!("day listing entry without a thumb link, skipping");
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            tracing::warn!("day listing link without href, skipping");
            continue;
        };
        let Some(title_id) = capture_digits(&id_pattern, href) else {
            tracing::warn!(href, "day listing link without a collection id, skipping");
            continue;
        };

        let title = link.value().attr("title").unwrap_or_default().to_string();
        let thumbnail = link
            .children()
            .filter_map(ElementRef::wrap)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| page_url.join(src).ok());

        collections.push(CollectionSummary {
            title_id,
            title,
            thumbnail,
        });
    }

    Ok(collections)
}
