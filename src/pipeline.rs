//! Fetch → extract → summarize, one item at a time.
//!
//! The listing is fetched once. Each item then goes through the article
//! fetcher and the summarizer strictly in document order; nothing runs
//! concurrently and nothing is cached between items.
//!
//! Per-item failures become [`SummaryOutcome`] values. A fatal fetch error
//! (the browser cannot be launched) stops the run before the next item.

use crate::error::{FetchError, SummarizeError};
use crate::models::{ArticleText, ItemOutcome, ListingItem, SummaryOutcome};
use crate::scrapers::{ExtractionRule, ListingRule, article, listing};
use crate::summarizer::{ModelLoader, Summarizer};
use crate::transport::Transport;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

/// Requested summary length, in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLengths {
    pub max: usize,
    pub min: usize,
}

/// Everything needed to run the pipeline against one section page.
pub struct Pipeline<L: ModelLoader> {
    pub section_url: String,
    pub listing_source: Transport,
    pub article_source: Transport,
    pub listing_rule: ListingRule,
    pub extraction_rule: ExtractionRule,
    pub limit: usize,
    /// `None` when summaries are switched off.
    pub summarizer: Option<Summarizer<L>>,
    pub lengths: SummaryLengths,
}

impl<L: ModelLoader> Pipeline<L> {
    /// Fetch the section page's teasers.
    pub async fn listing(&self) -> Result<Vec<ListingItem>, FetchError> {
        listing::fetch_listing(
            &self.listing_source,
            &self.section_url,
            &self.listing_rule,
            self.limit,
        )
        .await
    }

    /// Fetch the article's text only.
    pub async fn article(&self, item: &ListingItem) -> Result<ArticleText, FetchError> {
        article::fetch_article(&self.article_source, &item.url, &self.extraction_rule).await
    }

    /// Summarize already-fetched article text.
    pub async fn summarize(&self, article: &ArticleText) -> SummaryOutcome {
        let Some(summarizer) = &self.summarizer else {
            return SummaryOutcome::Disabled;
        };
        if !article.is_available() {
            return SummaryOutcome::ContentUnavailable;
        }

        match summarizer
            .summarize(article.as_str(), self.lengths.max, self.lengths.min)
            .await
        {
            Ok(summary) => SummaryOutcome::Summarized(summary),
            Err(SummarizeError::InsufficientContent { .. }) => SummaryOutcome::InsufficientContent,
            Err(e) => SummaryOutcome::Failed(e.to_string()),
        }
    }

    /// Fetch and summarize one item.
    ///
    /// # Errors
    ///
    /// Only fatal fetch errors; everything else is reported in the outcome.
    #[instrument(level = "info", skip_all, fields(url = %item.url))]
    pub async fn process(&self, item: ListingItem) -> Result<ItemOutcome, FetchError> {
        let article = self.article(&item).await?;
        let summary = self.summarize(&article).await;
        debug!(?summary, "Processed item");
        Ok(ItemOutcome {
            item,
            article,
            summary,
        })
    }

    /// Process every item in order, calling `on_item` as each one finishes.
    ///
    /// # Arguments
    ///
    /// * `items` - Listing items, in the order they should be processed
    /// * `on_item` - Called with each outcome as soon as it is ready
    ///
    /// # Returns
    ///
    /// One outcome per item, in input order.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal fetch error; later items are not fetched.
    pub async fn process_all<F>(
        &self,
        items: Vec<ListingItem>,
        mut on_item: F,
    ) -> Result<Vec<ItemOutcome>, FetchError>
    where
        F: FnMut(&ItemOutcome),
    {
        let total = items.len();
        let outcomes: Vec<ItemOutcome> = stream::iter(items)
            .then(|item| self.process(item))
            .inspect_ok(|outcome| on_item(outcome))
            .try_collect()
            .await?;

        let summarized = outcomes
            .iter()
            .filter(|o| matches!(o.summary, SummaryOutcome::Summarized(_)))
            .count();
        info!(total, summarized, "Processed all items");
        Ok(outcomes)
    }
}
