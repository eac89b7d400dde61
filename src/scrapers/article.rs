//! Article page scraper.
//!
//! Pulls the main body text out of an article page using the containers of
//! an [`ExtractionRule`]. A transport error or a page without a matching
//! container gives [`ArticleText::Unavailable`], which callers treat as
//! "nothing to summarize". The one exception is a browser that cannot be
//! launched at all; that is returned as an error so the run can stop.

use crate::error::FetchError;
use crate::models::ArticleText;
use crate::scrapers::ExtractionRule;
use crate::transport::PageSource;
use crate::utils::join_fragments;
use scraper::Html;
use tracing::{info, instrument, warn};

/// Fetch a single article and extract its body.
///
/// # Arguments
///
/// * `source` - Transport used to retrieve the page
/// * `url` - Absolute URL of the article
/// * `rule` - Content containers, tried in order
///
/// # Returns
///
/// The article text, or [`ArticleText::Unavailable`] when the page could not
/// be fetched or no container matched.
///
/// # Errors
///
/// Only fatal fetch errors (see [`FetchError::is_fatal`]) are returned.
#[instrument(level = "info", skip(source, rule))]
pub async fn fetch_article<S: PageSource>(
    source: &S,
    url: &str,
    rule: &ExtractionRule,
) -> Result<ArticleText, FetchError> {
    let html = match source.fetch(url, None).await {
        Ok(html) => html,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            warn!(error = %e, "Article fetch failed");
            return Ok(ArticleText::Unavailable);
        }
    };

    let text = extract_article(&html, rule);
    match &text {
        ArticleText::Body(body) => info!(bytes = body.len(), "Parsed article"),
        ArticleText::Unavailable => warn!("No content container matched"),
    }
    Ok(text)
}

/// Text of the first container in `rule` that exists and is not empty.
pub fn extract_article(html: &str, rule: &ExtractionRule) -> ArticleText {
    let document = Html::parse_document(html);

    rule.containers
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| join_fragments(element.text()))
        .find(|text| !text.is_empty())
        .map_or(ArticleText::Unavailable, ArticleText::Body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CONTENT_UNAVAILABLE;
    use crate::transport::{BrowserOptions, BrowserSource, DEFAULT_USER_AGENT, HttpSource};
    use std::time::Duration;

    fn rule() -> ExtractionRule {
        ExtractionRule::new("#dic_area", &["#articleBodyContents", "article"]).unwrap()
    }

    fn http() -> HttpSource {
        HttpSource::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_extract_primary_container() {
        let html = r#"
            <div id="dic_area">
                First   line.<br>
                <strong>Second</strong> line.
            </div>
            <article>Ignored</article>
        "#;
        assert_eq!(
            extract_article(html, &rule()),
            ArticleText::Body("First line. Second line.".to_string())
        );
    }

    #[test]
    fn test_extract_uses_fallback_when_primary_missing() {
        let html = r#"<div id="articleBodyContents">Older layout body.</div>"#;
        assert_eq!(
            extract_article(html, &rule()),
            ArticleText::Body("Older layout body.".to_string())
        );
    }

    #[test]
    fn test_extract_skips_empty_primary() {
        let html = r#"<div id="dic_area">   </div><article>Fallback body.</article>"#;
        assert_eq!(
            extract_article(html, &rule()),
            ArticleText::Body("Fallback body.".to_string())
        );
    }

    #[test]
    fn test_extract_no_container_is_unavailable() {
        let html = r#"<html><body><div id="other">Nothing here</div></body></html>"#;
        assert_eq!(extract_article(html, &rule()), ArticleText::Unavailable);
    }

    #[tokio::test]
    async fn test_fetch_article_without_container_returns_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/read.naver")
            .with_status(200)
            .with_body("<html><body><p>Cookie banner</p></body></html>")
            .create_async()
            .await;

        let text = fetch_article(&http(), &format!("{}/read.naver", server.url()), &rule())
            .await
            .unwrap();
        assert_eq!(text.as_str(), CONTENT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_fetch_article_transport_error_returns_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/read.naver")
            .with_status(500)
            .create_async()
            .await;

        let text = fetch_article(&http(), &format!("{}/read.naver", server.url()), &rule())
            .await
            .unwrap();
        assert_eq!(text, ArticleText::Unavailable);
    }

    #[tokio::test]
    async fn test_fetch_article_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/read.naver")
            .with_status(200)
            .with_body(r#"<div id="dic_area">The central bank held rates.</div>"#)
            .create_async()
            .await;

        let text = fetch_article(&http(), &format!("{}/read.naver", server.url()), &rule())
            .await
            .unwrap();
        assert_eq!(text.as_str(), "The central bank held rates.");
    }

    #[tokio::test]
    async fn test_fetch_article_browser_launch_failure_is_fatal() {
        let source = BrowserSource::new(BrowserOptions {
            chrome_path: Some("/nonexistent/chromium".into()),
            wait_timeout: Duration::from_secs(1),
        });

        let err = fetch_article(&source, "https://news.example.com/read.naver", &rule())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::BrowserLaunch(_)), "got {err:?}");
        assert!(err.is_fatal());
    }
}
