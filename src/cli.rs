//! Command-line interface definitions for News Brief.
//!
//! Selectors, transports, and summarization thresholds are all options, so
//! adapting to a portal's markup changes is a matter of flags rather than
//! code. Options naming external resources can also come from environment
//! variables.

use crate::models::MAX_LISTING_ITEMS;
use crate::transport::{DEFAULT_USER_AGENT, TransportKind};
use clap::builder::{RangedU64ValueParser, TypedValueParser};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `Processing:` / `Summary:` lines with separators
    Text,
    /// One JSON report at the end of the run
    Json,
}

/// Command-line arguments for the News Brief application.
///
/// # Examples
///
/// ```sh
/// # Defaults: Naver's main page over plain HTTP
/// news_brief
///
/// # Render the listing in headless Chromium first
/// news_brief --listing-transport browser --chrome-path /usr/bin/chromium
///
/// # Pick articles one at a time
/// news_brief --interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing (section) page to scrape
    #[arg(long, env = "NEWS_SECTION_URL", default_value = "https://news.naver.com/main/main.naver")]
    pub section_url: String,

    /// CSS selector matching each teaser link on the listing page
    #[arg(long, default_value = "a[href*='read.naver']")]
    pub link_selector: String,

    /// CSS selector, inside a teaser, holding its headline
    #[arg(long)]
    pub title_selector: Option<String>,

    /// CSS selector, inside a teaser, holding its thumbnail image
    #[arg(long, default_value = "img")]
    pub thumbnail_selector: String,

    /// CSS selector of the article body container
    #[arg(long, default_value = "#dic_area")]
    pub content_selector: String,

    /// Containers to try, in order, when the primary one is absent
    #[arg(
        long = "fallback-selector",
        default_values = ["#articleBodyContents", "#newsct_article", "article"]
    )]
    pub fallback_selectors: Vec<String>,

    /// How to fetch the listing page
    #[arg(long, value_enum, default_value_t = TransportKind::Http)]
    pub listing_transport: TransportKind,

    /// How to fetch article pages
    #[arg(long, value_enum, default_value_t = TransportKind::Http)]
    pub article_transport: TransportKind,

    /// Chromium binary for the browser transport (auto-detected if unset)
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Seconds to wait for the listing selector in the browser
    #[arg(long, default_value_t = 10)]
    pub wait_timeout_secs: u64,

    /// Seconds before an HTTP request is abandoned
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Number of teasers to process (at most 5)
    #[arg(long, default_value_t = MAX_LISTING_ITEMS, value_parser = clap::value_parser!(u8).range(1..=MAX_LISTING_ITEMS as i64).map(usize::from))]
    pub max_items: usize,

    /// Upper bound on summary length, in model tokens
    #[arg(long, default_value_t = 150, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_length: usize,

    /// Lower bound on summary length, in model tokens
    #[arg(long, default_value_t = 30)]
    pub min_length: usize,

    /// Characters of article text sent to the model
    #[arg(long, default_value_t = 800, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub input_budget: usize,

    /// Shortest article, in characters, worth summarizing
    #[arg(long, default_value_t = 200)]
    pub min_chars: usize,

    /// Fewest sentences an article needs to be summarized
    #[arg(long, default_value_t = 3)]
    pub min_sentences: usize,

    /// Path to the awful_aj config.yaml (defaults to its config directory)
    #[arg(short, long, env = "AWFUL_AJ_CONFIG")]
    pub config: Option<PathBuf>,

    /// awful_aj chat template used for summaries
    #[arg(long, default_value = "news_summarizer")]
    pub template: String,

    /// Skip summarization and show excerpts only
    #[arg(long)]
    pub no_summary: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Choose articles from a menu and summarize them one at a time
    #[arg(short, long, conflicts_with = "format")]
    pub interactive: bool,
}

impl Cli {
    /// Checks that span more than one option.
    ///
    /// # Errors
    ///
    /// A clap validation error when `--min-length` exceeds `--max-length`.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.min_length > self.max_length {
            return Err(Self::command().error(
                ErrorKind::ValueValidation,
                format!(
                    "--min-length ({}) must not exceed --max-length ({})",
                    self.min_length, self.max_length
                ),
            ));
        }
        Ok(())
    }
}
