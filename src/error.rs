//! Error types for fetching, extraction rules, and summarization.
//!
//! Fetch and summarize failures are values the pipeline turns into
//! user-visible lines. Only [`FetchError::BrowserLaunch`], on any fetch, and
//! [`RuleError`] at startup end the process.

use std::time::Duration;
use thiserror::Error;

/// Failure to retrieve a page's markup.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("timed out after {waited:?} waiting for `{selector}` on {url}")]
    Timeout {
        url: String,
        selector: String,
        waited: Duration,
    },

    #[error("browser session failed on {url}: {reason}")]
    Browser { url: String, reason: String },

    #[error("could not launch headless browser: {0}")]
    BrowserLaunch(String),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    /// Missing or broken browser binaries cannot be worked around by skipping items.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::BrowserLaunch(_))
    }
}

/// A selector in the listing or extraction rules did not parse.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Outcome of a summarization attempt that produced no summary.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Business-rule skip, not a failure: the text is too short or has too few sentences.
    #[error("not enough content to summarize ({chars} chars, {sentences} sentences)")]
    InsufficientContent { chars: usize, sentences: usize },

    #[error("summarization model failed: {0}")]
    Model(String),

    #[error("summarization model could not be loaded: {0}")]
    ModelLoad(String),
}
