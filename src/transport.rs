//! Page retrieval: plain HTTP or a headless Chromium session.
//!
//! Both fetchers go through [`PageSource`], so the listing and article code
//! is written once and the transport is picked per fetcher on the command
//! line. [`Transport`] is the enum the rest of the crate actually holds.
//!
//! # Browser sessions
//!
//! Every [`BrowserSource::fetch`] launches its own Chromium process and
//! wraps it in a [`BrowserSession`]. The session is released when the guard
//! drops, so the process is gone on success, on timeout, and on any driver
//! error alike.

use crate::error::FetchError;
use clap::ValueEnum;
use headless_chrome::{Browser, LaunchOptions};
use reqwest::Client;
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// User agent sent by the HTTP transport unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

/// Something that can turn a URL into page markup.
pub trait PageSource {
    /// Fetch `url` and return its HTML.
    ///
    /// `ready_selector` is a CSS selector the page must match before its
    /// markup is considered complete. Transports that do not render
    /// JavaScript ignore it.
    async fn fetch(&self, url: &str, ready_selector: Option<&str>) -> Result<String, FetchError>;
}

/// Which [`PageSource`] implementation a fetcher should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    Http,
    Browser,
}

/// Direct GET requests with a fixed user agent.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Build the HTTP client.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Value of the `User-Agent` header on every request
    /// * `timeout` - Total time allowed per request
    ///
    /// # Errors
    ///
    /// [`FetchError::Client`] when the client cannot be built, for example
    /// because `user_agent` is not a valid header value.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, _ready_selector: Option<&str>) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(http_err)?
            .text()
            .await
            .map_err(http_err)?;

        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page over HTTP"
        );
        Ok(body)
    }
}

/// Launch settings for the headless browser.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Chromium binary; `None` lets the driver auto-detect one.
    pub chrome_path: Option<PathBuf>,
    /// How long to wait for the ready selector.
    pub wait_timeout: Duration,
}

/// Renders pages in a headless Chromium before extracting markup.
#[derive(Debug, Clone)]
pub struct BrowserSource {
    options: BrowserOptions,
}

impl BrowserSource {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

impl PageSource for BrowserSource {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, ready_selector: Option<&str>) -> Result<String, FetchError> {
        let options = self.options.clone();
        let url_owned = url.to_string();
        let selector = ready_selector.map(str::to_string);

        // headless_chrome drives the browser with blocking calls.
        tokio::task::spawn_blocking(move || {
            let session = BrowserSession::launch(&options)?;
            session.render(&url_owned, selector.as_deref(), options.wait_timeout)
        })
        .await
        .map_err(|e| FetchError::Browser {
            url: url.to_string(),
            reason: e.to_string(),
        })?
    }
}

/// A running headless Chromium. The process is closed when this drops.
pub struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    /// Start a headless Chromium.
    ///
    /// # Errors
    ///
    /// [`FetchError::BrowserLaunch`] when the binary is missing or refuses
    /// to start. Callers treat this as fatal.
    pub fn launch(options: &BrowserOptions) -> Result<Self, FetchError> {
        let launch = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(options.chrome_path.clone())
            .args(vec![
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--start-maximized"),
            ])
            .build()
            .map_err(|e| FetchError::BrowserLaunch(e.to_string()))?;

        let browser = Browser::new(launch).map_err(|e| FetchError::BrowserLaunch(format!("{e:#}")))?;
        info!(chrome_path = ?options.chrome_path, "Headless browser started");
        Ok(Self { browser })
    }

    /// Navigate to `url`, wait for `ready_selector` if given, and return the rendered HTML.
    pub fn render(
        &self,
        url: &str,
        ready_selector: Option<&str>,
        wait_timeout: Duration,
    ) -> Result<String, FetchError> {
        let driver_err = |e| driver_error(url, e);

        let tab = self.browser.new_tab().map_err(driver_err)?;
        tab.set_default_timeout(wait_timeout);
        tab.navigate_to(url).map_err(driver_err)?;
        tab.wait_until_navigated().map_err(driver_err)?;

        if let Some(selector) = ready_selector {
            let t0 = Instant::now();
            match tab.wait_for_elements(selector) {
                Ok(found) => debug!(selector, count = found.len(), "Ready selector present"),
                Err(e) => return Err(wait_error(url, selector, t0.elapsed(), wait_timeout, e)),
            }
        }

        tab.get_content().map_err(driver_err)
    }
}

fn driver_error(url: &str, e: impl fmt::Display) -> FetchError {
    FetchError::Browser {
        url: url.to_string(),
        reason: format!("{e:#}"),
    }
}

/// Classify a failed wait for the ready selector.
///
/// A failure after the full `wait_timeout` means the selector never showed
/// up; anything earlier is the driver giving out.
fn wait_error(
    url: &str,
    selector: &str,
    elapsed: Duration,
    wait_timeout: Duration,
    e: impl fmt::Display,
) -> FetchError {
    if elapsed >= wait_timeout {
        warn!(selector, error = %e, "Ready selector never appeared");
        FetchError::Timeout {
            url: url.to_string(),
            selector: selector.to_string(),
            waited: wait_timeout,
        }
    } else {
        driver_error(url, e)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Browser's own Drop kills the child process.
        info!("Headless browser closed");
    }
}

/// The transport chosen for a fetcher.
#[derive(Debug, Clone)]
pub enum Transport {
    Http(HttpSource),
    Browser(BrowserSource),
}

impl Transport {
    pub fn build(
        kind: TransportKind,
        user_agent: &str,
        request_timeout: Duration,
        browser: &BrowserOptions,
    ) -> Result<Self, FetchError> {
        Ok(match kind {
            TransportKind::Http => Transport::Http(HttpSource::new(user_agent, request_timeout)?),
            TransportKind::Browser => Transport::Browser(BrowserSource::new(browser.clone())),
        })
    }
}

impl PageSource for Transport {
    async fn fetch(&self, url: &str, ready_selector: Option<&str>) -> Result<String, FetchError> {
        match self {
            Transport::Http(s) => s.fetch(url, ready_selector).await,
            Transport::Browser(s) => s.fetch(url, ready_selector).await,
        }
    }
}
