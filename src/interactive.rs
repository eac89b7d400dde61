//! On-demand mode: pick a headline, then fetch and summarize just that one.
//!
//! The listing is shown as a menu. Nothing beyond the listing is fetched
//! until an item is chosen; each choice fetches the article, prints the
//! item with a short excerpt, and summarizes it.

use crate::models::{ItemOutcome, ListingItem, SummaryOutcome};
use crate::outputs::console::{EXCERPT_CHARS, write_separator};
use crate::pipeline::Pipeline;
use crate::summarizer::ModelLoader;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use std::error::Error;
use std::io::{self, Write};
use tracing::{info, instrument};

const QUIT: &str = "Quit";

/// Menu labels: one per item, then [`QUIT`].
fn menu_labels(items: &[ListingItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.title.clone())
        .chain(std::iter::once(QUIT.to_string()))
        .collect()
}

/// Print an item the way the menu shows it after selection.
pub fn write_detail<W: Write>(out: &mut W, outcome: &ItemOutcome) -> io::Result<()> {
    writeln!(out, "{}", outcome.item.title)?;
    writeln!(out, "Link: {}", outcome.item.url)?;
    if let Some(thumb) = &outcome.item.thumbnail_url {
        writeln!(out, "Thumbnail: {thumb}")?;
    }
    writeln!(out, "Excerpt: {}", outcome.article.excerpt(EXCERPT_CHARS))?;
    match &outcome.summary {
        SummaryOutcome::Summarized(summary) => writeln!(out, "Summary: {summary}")?,
        SummaryOutcome::InsufficientContent => writeln!(out, "Not enough content to summarize.")?,
        SummaryOutcome::ContentUnavailable => writeln!(out, "No article content found.")?,
        SummaryOutcome::Failed(e) => writeln!(out, "Summarization failed: {e}")?,
        SummaryOutcome::Disabled => {}
    }
    write_separator(out)
}

/// Run the selection loop until the user picks "Quit" or cancels.
#[instrument(level = "info", skip_all, fields(items = items.len()))]
pub async fn run<L: ModelLoader>(
    pipeline: &Pipeline<L>,
    items: Vec<ListingItem>,
) -> Result<(), Box<dyn Error>> {
    let labels = menu_labels(&items);
    let theme = ColorfulTheme::default();
    let mut default = 0;

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("Pick an article to summarize")
            .items(&labels)
            .default(default)
            .interact_opt()?;

        let Some(index) = choice.filter(|&i| i < items.len()) else {
            info!("Leaving interactive mode");
            return Ok(());
        };
        default = index;

        let outcome = pipeline.process(items[index].clone()).await?;
        let mut stdout = io::stdout().lock();
        write_detail(&mut stdout, &outcome)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleText, Summary};

    fn item(n: usize) -> ListingItem {
        ListingItem {
            title: format!("Headline {n}"),
            url: format!("https://news.example.com/read?oid={n}"),
            thumbnail_url: (n % 2 == 0).then(|| format!("https://img.example.com/{n}.jpg")),
        }
    }

    #[test]
    fn test_menu_labels_end_with_quit() {
        let labels = menu_labels(&[item(1), item(2)]);
        assert_eq!(labels, ["Headline 1", "Headline 2", "Quit"]);
    }

    #[test]
    fn test_menu_labels_empty_listing() {
        assert_eq!(menu_labels(&[]), ["Quit"]);
    }

    #[test]
    fn test_write_detail() {
        let outcome = ItemOutcome {
            item: item(2),
            article: ArticleText::Body("Exports rose for a third month.".to_string()),
            summary: SummaryOutcome::Summarized(Summary("Exports up again.".to_string())),
        };
        let mut buf = Vec::new();
        write_detail(&mut buf, &outcome).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Headline 2\n"));
        assert!(text.contains("Link: https://news.example.com/read?oid=2\n"));
        assert!(text.contains("Thumbnail: https://img.example.com/2.jpg\n"));
        assert!(text.contains("Excerpt: Exports rose for a third month.\n"));
        assert!(text.contains("Summary: Exports up again.\n"));
    }

    #[test]
    fn test_write_detail_without_thumbnail_or_content() {
        let outcome = ItemOutcome {
            item: item(1),
            article: ArticleText::Unavailable,
            summary: SummaryOutcome::ContentUnavailable,
        };
        let mut buf = Vec::new();
        write_detail(&mut buf, &outcome).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(!text.contains("Thumbnail:"));
        assert!(text.contains("Excerpt: content unavailable\n"));
        assert!(text.contains("No article content found.\n"));
    }
}
