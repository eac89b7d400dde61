//! Summarization adapter around an external LLM.
//!
//! The model itself is opaque; this module decides *whether* to call it and
//! *what* to send:
//!
//! - Text below the content threshold (too short, or too few sentences) is
//!   rejected with [`SummarizeError::InsufficientContent`] before the model
//!   is touched.
//! - Everything else is cut to a fixed character budget, since the model's
//!   context window is bounded, and sent with the requested length bounds.
//!
//! # Architecture
//!
//! - [`SummaryModel`]: one generation call against a loaded model
//! - [`ModelLoader`]: how to bring a model up (expensive, done once)
//! - [`Summarizer`]: owns the loader and the lazily-loaded model for the
//!   lifetime of the process
//! - [`AwfulJadeLoader`] / [`AwfulJadeModel`]: the production backend,
//!   speaking to an OpenAI-compatible endpoint through `awful_aj`

use crate::error::SummarizeError;
use crate::models::Summary;
use crate::utils::{count_sentence_marks, truncate_chars, truncate_for_log};
use awful_aj::api::ask;
use awful_aj::{config, config::AwfulJadeConfig, config_dir, template, template::ChatTemplate};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// What the model is asked to do for one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Input text, already truncated to the budget.
    pub text: String,
    pub max_length: usize,
    pub min_length: usize,
}

/// A loaded summarization model.
///
/// Implementations decode deterministically: the same request should give
/// the same summary. Sampling is never requested.
pub trait SummaryModel {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, Box<dyn Error>>;
}

/// Brings a [`SummaryModel`] up. Called at most once per [`Summarizer`].
pub trait ModelLoader {
    type Model: SummaryModel;

    async fn load(&self) -> Result<Self::Model, Box<dyn Error>>;
}

/// Thresholds and budgets applied before the model is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizeConfig {
    /// Characters of article text sent to the model.
    pub input_budget: usize,
    /// Shortest text, in characters, worth summarizing.
    pub min_chars: usize,
    /// Fewest sentence-terminal marks worth summarizing.
    pub min_sentences: usize,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            input_budget: 800,
            min_chars: 200,
            min_sentences: 3,
        }
    }
}

/// Owns the summarization model for the life of the process.
///
/// The model is loaded on the first [`summarize`](Self::summarize) call (or
/// an explicit [`initialize`](Self::initialize)) and reused afterwards. A
/// failed load leaves nothing cached, so a later call loads again.
pub struct Summarizer<L: ModelLoader> {
    loader: L,
    model: OnceCell<L::Model>,
    config: SummarizeConfig,
}

impl<L: ModelLoader> fmt::Debug for Summarizer<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer")
            .field("loaded", &self.model.initialized())
            .field("config", &self.config)
            .finish()
    }
}

impl<L: ModelLoader> Summarizer<L> {
    pub fn new(loader: L, config: SummarizeConfig) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            config,
        }
    }

    /// Load the model now instead of on first use.
    ///
    /// Does nothing if the model is already loaded.
    ///
    /// # Errors
    ///
    /// [`SummarizeError::ModelLoad`] if the loader fails. Nothing is cached,
    /// so a later call tries again.
    pub async fn initialize(&self) -> Result<(), SummarizeError> {
        self.model().await.map(|_| ())
    }

    async fn model(&self) -> Result<&L::Model, SummarizeError> {
        self.model
            .get_or_try_init(|| async {
                let t0 = Instant::now();
                let model = self
                    .loader
                    .load()
                    .await
                    .map_err(|e| SummarizeError::ModelLoad(e.to_string()))?;
                info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Summarization model loaded");
                Ok::<_, SummarizeError>(model)
            })
            .await
    }

    /// Summarize `text` into roughly `min_len..=max_len` tokens.
    ///
    /// # Arguments
    ///
    /// * `text` - Full article text
    /// * `max_len` - Upper bound on summary length, in model tokens
    /// * `min_len` - Lower bound on summary length, in model tokens
    ///
    /// # Returns
    ///
    /// The model's output, unmodified. Only the first `input_budget`
    /// characters of `text` reach the model.
    ///
    /// # Errors
    ///
    /// * [`SummarizeError::InsufficientContent`] if `text` is shorter than
    ///   `min_chars` or has fewer than `min_sentences` sentence endings. The
    ///   model is neither loaded nor called.
    /// * [`SummarizeError::ModelLoad`] if the model cannot be brought up
    /// * [`SummarizeError::Model`] if generation fails
    #[instrument(level = "info", skip(self, text), fields(chars))]
    pub async fn summarize(
        &self,
        text: &str,
        max_len: usize,
        min_len: usize,
    ) -> Result<Summary, SummarizeError> {
        let chars = text.chars().count();
        tracing::Span::current().record("chars", chars);

        let sentences = count_sentence_marks(text);
        if chars < self.config.min_chars || sentences < self.config.min_sentences {
            debug!(chars, sentences, "Below content threshold; not summarizing");
            return Err(SummarizeError::InsufficientContent { chars, sentences });
        }

        let model = self.model().await?;
        let request = SummaryRequest {
            text: truncate_chars(text, self.config.input_budget).to_string(),
            max_length: max_len,
            min_length: min_len,
        };

        let t0 = Instant::now();
        match model.generate(&request).await {
            Ok(summary) => {
                info!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    summary_chars = summary.chars().count(),
                    "Summarized article"
                );
                Ok(Summary(summary))
            }
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Model call failed");
                Err(SummarizeError::Model(e.to_string()))
            }
        }
    }
}

/// Loads the `awful_aj` configuration and chat template for summarization.
///
/// # Examples
///
/// ```ignore
/// let loader = AwfulJadeLoader {
///     config_path: None, // config.yaml in the awful_aj config directory
///     template: "news_summarizer".to_string(),
/// };
/// let summarizer = Summarizer::new(loader, SummarizeConfig::default());
/// ```
#[derive(Debug, Clone)]
pub struct AwfulJadeLoader {
    /// Explicit `config.yaml`; defaults to the one in the `awful_aj` config dir.
    pub config_path: Option<PathBuf>,
    /// Name of the chat template to load.
    pub template: String,
}

impl ModelLoader for AwfulJadeLoader {
    type Model = AwfulJadeModel;

    #[instrument(level = "info", skip_all, fields(template = %self.template))]
    async fn load(&self) -> Result<AwfulJadeModel, Box<dyn Error>> {
        let config_path = match &self.config_path {
            Some(path) => path.clone(),
            None => config_dir()?.join("config.yaml"),
        };
        let config_path = config_path
            .to_str()
            .ok_or_else(|| format!("config path is not valid UTF-8: {}", config_path.display()))?
            .to_string();

        let config = config::load_config(&config_path).map_err(|e| format!("{e:?}"))?;
        info!(%config_path, "Loaded configuration");
        let template = template::load_template(&self.template).await?;
        info!(template = %self.template, "Loaded template");

        Ok(AwfulJadeModel { config, template })
    }
}

/// An OpenAI-compatible model reached through `awful_aj::api::ask`.
pub struct AwfulJadeModel {
    config: AwfulJadeConfig,
    template: ChatTemplate,
}

impl fmt::Debug for AwfulJadeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwfulJadeModel")
            .field("config", &"<AwfulJadeConfig>")
            .field("template", &"<ChatTemplate>")
            .finish()
    }
}

/// Prompt sent to the chat model; it has no native length controls.
///
/// # Arguments
///
/// * `request` - Truncated article text and the summary length bounds
///
/// # Returns
///
/// The user message passed to `awful_aj::api::ask`.
fn summary_prompt(request: &SummaryRequest) -> String {
    format!(
        "Summarize the following news article in the article's own language, \
         using at least {} and at most {} tokens. Reply with the summary only.\n\n{}",
        request.min_length, request.max_length, request.text
    )
}

impl SummaryModel for AwfulJadeModel {
    #[instrument(level = "info", skip_all)]
    async fn generate(&self, request: &SummaryRequest) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(&self.config, summary_prompt(request), &self.template, None, None, false).await;
        let dt = t0.elapsed();

        match &res {
            Ok(reply) => debug!(
                elapsed_ms = dt.as_millis() as u64,
                reply = %truncate_for_log(reply, 300),
                "API call succeeded"
            ),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "API call failed"),
        }
        res.map(|reply| reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Shared view of what the stub model saw.
    #[derive(Debug, Default)]
    struct Calls {
        loads: AtomicUsize,
        requests: Mutex<Vec<SummaryRequest>>,
    }

    struct StubLoader {
        calls: Arc<Calls>,
        fail_load: bool,
        reply: Result<String, String>,
    }

    struct StubModel {
        calls: Arc<Calls>,
        reply: Result<String, String>,
    }

    impl ModelLoader for StubLoader {
        type Model = StubModel;

        async fn load(&self) -> Result<StubModel, Box<dyn Error>> {
            self.calls.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_load {
                return Err("weights not found".into());
            }
            Ok(StubModel {
                calls: Arc::clone(&self.calls),
                reply: self.reply.clone(),
            })
        }
    }

    impl SummaryModel for StubModel {
        async fn generate(&self, request: &SummaryRequest) -> Result<String, Box<dyn Error>> {
            self.calls.requests.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(Into::into)
        }
    }

    fn summarizer(reply: Result<&str, &str>) -> (Summarizer<StubLoader>, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let loader = StubLoader {
            calls: Arc::clone(&calls),
            fail_load: false,
            reply: reply.map(str::to_string).map_err(str::to_string),
        };
        (Summarizer::new(loader, SummarizeConfig::default()), calls)
    }

    /// `sentences` sentences padded with filler to exactly `len` characters.
    fn article(len: usize, sentences: usize) -> String {
        let mut text = String::new();
        for i in 0..sentences {
            text.push_str(&format!("Sentence number {i} reports news. "));
        }
        while text.chars().count() < len {
            text.push('x');
        }
        truncate_chars(&text, len).to_string()
    }

    #[tokio::test]
    async fn test_short_text_skips_model() {
        let (summarizer, calls) = summarizer(Ok("unused"));

        let result = summarizer.summarize("Too short. Really. Yes.", 130, 30).await;

        assert!(matches!(
            result,
            Err(SummarizeError::InsufficientContent { chars: 23, sentences: 3 })
        ));
        assert_eq!(calls.loads.load(Ordering::SeqCst), 0);
        assert!(calls.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_text_without_sentences_skips_model() {
        let (summarizer, calls) = summarizer(Ok("unused"));
        let text = "word ".repeat(100);

        let result = summarizer.summarize(&text, 130, 30).await;

        assert!(matches!(
            result,
            Err(SummarizeError::InsufficientContent { sentences: 0, .. })
        ));
        assert!(calls.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_truncates_to_budget_and_returns_output_unmodified() {
        let (summarizer, calls) = summarizer(Ok("  Stub summary, verbatim.  "));
        let text = article(1500, 5);
        assert_eq!(text.chars().count(), 1500);

        let summary = summarizer.summarize(&text, 130, 30).await.unwrap();

        assert_eq!(summary.0, "  Stub summary, verbatim.  ");
        let requests = calls.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].text, text.chars().take(800).collect::<String>());
        assert_eq!(requests[0].max_length, 130);
        assert_eq!(requests[0].min_length, 30);
    }

    #[tokio::test]
    async fn test_idempotent_and_model_loaded_once() {
        let (summarizer, calls) = summarizer(Ok("Same every time."));
        let text = article(1000, 4);

        let first = summarizer.summarize(&text, 150, 30).await.unwrap();
        let second = summarizer.summarize(&text, 150, 30).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.loads.load(Ordering::SeqCst), 1);
        let requests = calls.requests.lock().unwrap();
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test]
    async fn test_explicit_initialize_loads_once() {
        let (summarizer, calls) = summarizer(Ok("ok"));

        summarizer.initialize().await.unwrap();
        summarizer.summarize(&article(400, 3), 150, 30).await.unwrap();

        assert_eq!(calls.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_model_failure_is_summarization_error() {
        let (summarizer, _calls) = summarizer(Err("CUDA out of memory"));

        let result = summarizer.summarize(&article(400, 3), 150, 30).await;

        match result {
            Err(SummarizeError::Model(msg)) => assert!(msg.contains("CUDA out of memory")),
            other => panic!("expected model error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let calls = Arc::new(Calls::default());
        let loader = StubLoader {
            calls: Arc::clone(&calls),
            fail_load: true,
            reply: Ok("never".to_string()),
        };
        let summarizer = Summarizer::new(loader, SummarizeConfig::default());

        for _ in 0..2 {
            let result = summarizer.summarize(&article(400, 3), 150, 30).await;
            assert!(matches!(result, Err(SummarizeError::ModelLoad(_))));
        }
        assert_eq!(calls.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_summary_prompt_carries_bounds() {
        let request = SummaryRequest {
            text: "Body text.".to_string(),
            max_length: 150,
            min_length: 30,
        };
        let prompt = summary_prompt(&request);
        assert!(prompt.contains("at least 30 and at most 150 tokens"));
        assert!(prompt.ends_with("Body text."));
    }
}
