//! Data models for listing teasers, article text, and summaries.
//!
//! - [`ListingItem`]: one teaser scraped from a section page
//! - [`ArticleText`]: extracted article body, or the "content unavailable" fallback
//! - [`Summary`]: model output for one article
//! - [`ItemOutcome`] / [`RunReport`]: what one run produced, for rendering
//!
//! Everything here lives for a single run. Nothing is persisted.

use crate::utils::truncate_chars;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Upper bound on teasers collected per run.
pub const MAX_LISTING_ITEMS: usize = 5;

/// Literal returned in place of article text when extraction fails.
pub const CONTENT_UNAVAILABLE: &str = "content unavailable";

/// A teaser scraped from the listing page.
///
/// `title` is never empty and `url` is always an absolute http(s) URL;
/// the listing extractor drops anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingItem {
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// Main text of an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleText {
    Body(String),
    /// No content container matched, or the page could not be fetched.
    Unavailable,
}

impl ArticleText {
    pub fn as_str(&self) -> &str {
        match self {
            ArticleText::Body(text) => text,
            ArticleText::Unavailable => CONTENT_UNAVAILABLE,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ArticleText::Body(_))
    }

    /// First `max_chars` characters, with an ellipsis when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let text = self.as_str();
        let head = truncate_chars(text, max_chars);
        if head.len() < text.len() {
            format!("{head}…")
        } else {
            head.to_string()
        }
    }
}

impl fmt::Display for ArticleText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ArticleText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Model-generated summary, kept exactly as the model returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Summary(pub String);

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happened when an item's article was handed to the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Summarized(Summary),
    /// Article text was present but below the length/sentence threshold.
    InsufficientContent,
    /// Article text could not be extracted, so the summarizer was not asked.
    ContentUnavailable,
    Failed(String),
    /// Summaries were switched off for this run.
    Disabled,
}

/// One processed listing item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    #[serde(flatten)]
    pub item: ListingItem,
    pub article: ArticleText,
    pub summary: SummaryOutcome,
}

/// Everything a single run produced.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub section_url: String,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ItemOutcome>,
}
