//! # News Brief
//!
//! Scrapes the top stories from a news portal's section page, pulls each
//! article's main text, and summarizes it with an LLM.
//!
//! ## Usage
//!
//! ```sh
//! news_brief                                  # Naver main page, plain HTTP
//! news_brief --listing-transport browser      # render the listing in Chromium
//! news_brief --format json > brief.json       # machine-readable report
//! news_brief --interactive                    # summarize on demand
//! ```
//!
//! ## Architecture
//!
//! The application runs three steps in sequence, one item at a time:
//! 1. **Listing**: collect up to five teasers from the section page
//! 2. **Article**: fetch each teaser's page and extract the body text
//! 3. **Summary**: send a truncated prefix of the body to the model
//!
//! Results are printed to stdout; logs go to stderr.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod interactive;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod summarizer;
mod transport;
mod utils;

use cli::{Cli, OutputFormat};
use models::RunReport;
use outputs::{console, json};
use pipeline::{Pipeline, SummaryLengths};
use scrapers::{ExtractionRule, ListingRule};
use summarizer::{AwfulJadeLoader, SummarizeConfig, Summarizer};
use transport::{BrowserOptions, Transport};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_brief starting up");

    let args = Cli::parse();
    args.validate().unwrap_or_else(|e| e.exit());
    debug!(?args, "Parsed CLI arguments");

    let pipeline = build_pipeline(&args)?;

    // ---- Listing ----
    let items = match pipeline.listing().await {
        Ok(items) => items,
        Err(e) if e.is_fatal() => {
            error!(error = %e, "Cannot start headless browser");
            return Err(e.into());
        }
        Err(e) => {
            error!(error = %e, section = %args.section_url, "Listing fetch failed; nothing to process");
            Vec::new()
        }
    };

    // ---- Model warm-up ----
    // Interactive mode keeps the load lazy until the first pick.
    if !args.interactive && !items.is_empty() {
        if let Some(summarizer) = &pipeline.summarizer {
            if let Err(e) = summarizer.initialize().await {
                warn!(error = %e, "Summarization model unavailable; items will report the failure");
            }
        }
    }

    // ---- Items ----
    if args.interactive {
        if items.is_empty() {
            warn!("No articles found; nothing to choose from");
            console::write_found(&mut io::stdout().lock(), 0)?;
        } else {
            interactive::run(&pipeline, items).await?;
        }
    } else {
        match args.format {
            OutputFormat::Text => {
                console::write_found(&mut io::stdout().lock(), items.len())?;
                pipeline
                    .process_all(items, |outcome| {
                        let mut stdout = io::stdout().lock();
                        if let Err(e) = console::write_item(&mut stdout, outcome).and_then(|_| stdout.flush()) {
                            warn!(error = %e, "Failed writing to stdout");
                        }
                    })
                    .await
                    .inspect_err(|e| error!(error = %e, "Cannot start headless browser"))?;
            }
            OutputFormat::Json => {
                let outcomes = pipeline
                    .process_all(items, |_| {})
                    .await
                    .inspect_err(|e| error!(error = %e, "Cannot start headless browser"))?;
                let report = RunReport {
                    section_url: args.section_url.clone(),
                    generated_at: Utc::now(),
                    items: outcomes,
                };
                json::write_report(&mut io::stdout().lock(), &report)?;
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Turn parsed arguments into rules, transports, and the summarizer.
///
/// Fails only on configuration that can never work, such as a selector that
/// does not parse.
fn build_pipeline(args: &Cli) -> Result<Pipeline<AwfulJadeLoader>, Box<dyn Error>> {
    let listing_rule = ListingRule::new(
        &args.link_selector,
        args.title_selector.as_deref(),
        &args.thumbnail_selector,
    )?;
    let extraction_rule = ExtractionRule::new(&args.content_selector, &args.fallback_selectors)?;

    let browser = BrowserOptions {
        chrome_path: args.chrome_path.clone(),
        wait_timeout: Duration::from_secs(args.wait_timeout_secs),
    };
    let request_timeout = Duration::from_secs(args.request_timeout_secs);
    let listing_source = Transport::build(
        args.listing_transport,
        &args.user_agent,
        request_timeout,
        &browser,
    )?;
    let article_source = Transport::build(
        args.article_transport,
        &args.user_agent,
        request_timeout,
        &browser,
    )?;

    let summarizer = (!args.no_summary).then(|| {
        let loader = AwfulJadeLoader {
            config_path: args.config.clone(),
            template: args.template.clone(),
        };
        let config = SummarizeConfig {
            input_budget: args.input_budget,
            min_chars: args.min_chars,
            min_sentences: args.min_sentences,
        };
        Summarizer::new(loader, config)
    });
    info!(
        listing_transport = ?args.listing_transport,
        article_transport = ?args.article_transport,
        summaries = summarizer.is_some(),
        "Pipeline configured"
    );

    Ok(Pipeline {
        section_url: args.section_url.clone(),
        listing_source,
        article_source,
        listing_rule,
        extraction_rule,
        limit: args.max_items,
        summarizer,
        lengths: SummaryLengths {
            max: args.max_length,
            min: args.min_length,
        },
    })
}
