//! Listing and article scrapers.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Listing**: find up to [`MAX_LISTING_ITEMS`](crate::models::MAX_LISTING_ITEMS)
//!    teasers on a section page ([`listing`])
//! 2. **Article**: pull the main text out of each teaser's page ([`article`])
//!
//! The markup of a third-party news portal drifts over time, so neither
//! phase hard-codes selectors. They are supplied as a [`ListingRule`] and an
//! [`ExtractionRule`], both built from command-line options and parsed once
//! at startup.

pub mod article;
pub mod listing;

use crate::error::RuleError;
use scraper::Selector;

fn parse_selector(selector: &str) -> Result<Selector, RuleError> {
    Selector::parse(selector).map_err(|e| RuleError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// How to find teasers on a listing page.
#[derive(Debug, Clone)]
pub struct ListingRule {
    /// Matches each teaser's anchor (or an element wrapping one).
    pub link: Selector,
    /// The link selector as written, used as the browser's ready check.
    pub link_source: String,
    /// Optional element inside the teaser holding the headline.
    pub title: Option<Selector>,
    /// Element inside the teaser holding the thumbnail image.
    pub thumbnail: Selector,
}

impl ListingRule {
    pub fn new(
        link: &str,
        title: Option<&str>,
        thumbnail: &str,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            link: parse_selector(link)?,
            link_source: link.to_string(),
            title: title.map(parse_selector).transpose()?,
            thumbnail: parse_selector(thumbnail)?,
        })
    }
}

/// Where an article's main text lives, in order of preference.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub containers: Vec<Selector>,
}

impl ExtractionRule {
    /// `primary` is tried first, then each fallback in order.
    pub fn new<S: AsRef<str>>(primary: &str, fallbacks: &[S]) -> Result<Self, RuleError> {
        let containers = std::iter::once(primary)
            .chain(fallbacks.iter().map(|s| s.as_ref()))
            .map(parse_selector)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { containers })
    }
}
