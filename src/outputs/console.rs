//! Line-oriented console output.
//!
//! ```text
//! Found 5 news articles.
//! Processing: https://n.news.naver.com/article/001/0014
//! Summary: ...
//! --------------------------------------------------------------------------------
//! ```

use crate::models::{ItemOutcome, SummaryOutcome};
use std::io::{self, Write};

/// Characters of article text shown when summaries are off.
pub const EXCERPT_CHARS: usize = 200;

const SEPARATOR_WIDTH: usize = 80;

pub fn write_found<W: Write>(out: &mut W, count: usize) -> io::Result<()> {
    writeln!(out, "Found {count} news articles.")
}

/// Write one processed item: its URL, one result line, and a separator.
pub fn write_item<W: Write>(out: &mut W, outcome: &ItemOutcome) -> io::Result<()> {
    writeln!(out, "Processing: {}", outcome.item.url)?;
    match &outcome.summary {
        SummaryOutcome::Summarized(summary) => writeln!(out, "Summary: {summary}")?,
        SummaryOutcome::ContentUnavailable => writeln!(out, "No article content found.")?,
        SummaryOutcome::InsufficientContent => writeln!(out, "Not enough content to summarize.")?,
        SummaryOutcome::Failed(e) => writeln!(out, "Summarization failed: {e}")?,
        SummaryOutcome::Disabled if outcome.article.is_available() => {
            writeln!(out, "Excerpt: {}", outcome.article.excerpt(EXCERPT_CHARS))?
        }
        SummaryOutcome::Disabled => writeln!(out, "No article content found.")?,
    }
    write_separator(out)
}

pub fn write_separator<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleText, ListingItem, Summary};

    fn outcome(article: ArticleText, summary: SummaryOutcome) -> ItemOutcome {
        ItemOutcome {
            item: ListingItem {
                title: "Title".to_string(),
                url: "https://n.news.example.com/article/1".to_string(),
                thumbnail_url: None,
            },
            article,
            summary,
        }
    }

    fn render(outcome: &ItemOutcome) -> String {
        let mut buf = Vec::new();
        write_item(&mut buf, outcome).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_found_line() {
        let mut buf = Vec::new();
        write_found(&mut buf, 5).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Found 5 news articles.\n");
    }

    #[test]
    fn test_summarized_item() {
        let text = render(&outcome(
            ArticleText::Body("Body.".to_string()),
            SummaryOutcome::Summarized(Summary("Rates unchanged.".to_string())),
        ));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Processing: https://n.news.example.com/article/1");
        assert_eq!(lines[1], "Summary: Rates unchanged.");
        assert_eq!(lines[2], "-".repeat(80));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_unavailable_item() {
        let text = render(&outcome(
            ArticleText::Unavailable,
            SummaryOutcome::ContentUnavailable,
        ));
        assert!(text.contains("No article content found.\n"));
    }

    #[test]
    fn test_failed_and_insufficient_items() {
        let failed = render(&outcome(
            ArticleText::Body("Body.".to_string()),
            SummaryOutcome::Failed("connection refused".to_string()),
        ));
        assert!(failed.contains("Summarization failed: connection refused"));

        let short = render(&outcome(
            ArticleText::Body("Body.".to_string()),
            SummaryOutcome::InsufficientContent,
        ));
        assert!(short.contains("Not enough content to summarize."));
    }

    #[test]
    fn test_disabled_shows_excerpt() {
        let text = render(&outcome(
            ArticleText::Body("a".repeat(300)),
            SummaryOutcome::Disabled,
        ));
        assert!(text.contains(&format!("Excerpt: {}…", "a".repeat(EXCERPT_CHARS))));
    }
}
