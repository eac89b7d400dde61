//! Section page scraper.
//!
//! Fetches a news section's listing page and turns the elements matched by
//! the [`ListingRule`] into [`ListingItem`]s, in document order, stopping at
//! the configured limit. Teasers without a usable title or without an
//! http(s) link are skipped.

use crate::error::FetchError;
use crate::models::{ListingItem, MAX_LISTING_ITEMS};
use crate::scrapers::ListingRule;
use crate::transport::PageSource;
use crate::utils::join_fragments;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static anchor selector"));
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img[alt]").expect("static image selector"));

/// Fetch `section_url` and extract at most `limit` teasers from it.
///
/// # Arguments
///
/// * `source` - Transport used to retrieve the page
/// * `section_url` - Absolute URL of the listing page; relative links are
///   resolved against it
/// * `rule` - Selectors for the teaser link, title and thumbnail. The link
///   selector doubles as the browser's ready check
/// * `limit` - Maximum number of items, clamped to [`MAX_LISTING_ITEMS`]
///
/// # Returns
///
/// Teasers in document order. A page on which the rule matches nothing
/// yields an empty vector.
///
/// # Errors
///
/// * [`FetchError::InvalidUrl`] if `section_url` is not an absolute URL
/// * Any error from the transport, including a browser that cannot launch
#[instrument(level = "info", skip(source, rule))]
pub async fn fetch_listing<S: PageSource>(
    source: &S,
    section_url: &str,
    rule: &ListingRule,
    limit: usize,
) -> Result<Vec<ListingItem>, FetchError> {
    let base = Url::parse(section_url).map_err(|e| FetchError::InvalidUrl {
        url: section_url.to_string(),
        source: e,
    })?;

    let html = source.fetch(section_url, Some(&rule.link_source)).await?;
    let items = extract_listing(&html, &base, rule, limit);

    info!(count = items.len(), source = section_url, "Indexed listing items");
    debug!(urls = ?items.iter().map(|i| i.url.as_str()).collect::<Vec<_>>(), "Listing URLs");

    Ok(items)
}

/// Extract teasers from listing markup.
///
/// Elements matched by `rule.link` are visited in document order. Each one
/// needs an `href` (on itself or a descendant anchor) that resolves against
/// `base` to an http(s) URL, and a non-empty title; others are skipped.
/// At most `limit` items (never more than [`MAX_LISTING_ITEMS`]) are kept.
pub fn extract_listing(html: &str, base: &Url, rule: &ListingRule, limit: usize) -> Vec<ListingItem> {
    let document = Html::parse_document(html);
    let limit = limit.min(MAX_LISTING_ITEMS);

    document
        .select(&rule.link)
        .filter_map(|element| listing_item(element, base, rule))
        .take(limit)
        .collect()
}

fn listing_item(element: ElementRef<'_>, base: &Url, rule: &ListingRule) -> Option<ListingItem> {
    let href = element
        .value()
        .attr("href")
        .or_else(|| element.select(&ANCHOR).next()?.value().attr("href"))?;

    let Some(url) = resolve_http(base, href) else {
        debug!(href, "Skipping teaser without an http(s) link");
        return None;
    };

    let title = teaser_title(element, rule);
    if title.is_empty() {
        debug!(%url, "Skipping teaser without a title");
        return None;
    }

    let thumbnail_url = element.select(&rule.thumbnail).find_map(|img| {
        let src = img
            .value()
            .attr("src")
            .or_else(|| img.value().attr("data-src"))?;
        resolve_http(base, src)
    });

    Some(ListingItem {
        title,
        url,
        thumbnail_url,
    })
}

/// First non-empty of: title selector text, element text, `title` attribute, image `alt`.
fn teaser_title(element: ElementRef<'_>, rule: &ListingRule) -> String {
    let from_selector = rule
        .title
        .as_ref()
        .and_then(|sel| element.select(sel).next())
        .map(|el| join_fragments(el.text()));

    let candidates = [
        from_selector,
        Some(join_fragments(element.text())),
        element.value().attr("title").map(|t| join_fragments([t])),
        element
            .select(&IMAGE)
            .next()
            .and_then(|img| img.value().attr("alt"))
            .map(|alt| join_fragments([alt])),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// `href` resolved against `base`, if the result is http(s).
fn resolve_http(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href.trim()).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
