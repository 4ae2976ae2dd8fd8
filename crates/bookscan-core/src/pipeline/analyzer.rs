//! Pipeline orchestration: image -> identity -> metadata -> summary.
//!
//! The analyzer runs the four stages in order for one request and publishes
//! an observable state (`idle -> pending -> settled | failed`) through a
//! `tokio::sync::watch` channel. Each call takes a ticket from a generation
//! counter; only the most recently initiated call may write the state, so a
//! superseded call can still finish but its outcome is never published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::catalog::{CatalogSource, GoogleBooksCatalog};
use crate::config::{Config, Language};
use crate::error::AnalysisError;
use crate::llm::LlmProvider;
use crate::types::{AnalysisState, AnalysisStatus, BookSummary, ImageRef, Stage};

use super::extract::VisionExtractor;
use super::fetch::{ImageFetcher, LocatorFetcher};
use super::normalize::ImageNormalizer;
use super::resolve::CatalogResolver;
use super::summarize::SummaryGenerator;

/// Single-shot book cover analyzer.
///
/// `analyze` takes `&self`, so one analyzer can serve overlapping calls
/// (e.g. a user retrying before the first attempt finished). Each call owns
/// its working data end to end.
pub struct Analyzer {
    normalizer: ImageNormalizer,
    extractor: VisionExtractor,
    resolver: CatalogResolver,
    generator: SummaryGenerator,
    provider_name: String,
    language: Language,
    state: watch::Sender<AnalysisState>,
    generation: AtomicU64,
}

impl Analyzer {
    /// Assemble an analyzer from explicit collaborators.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        catalog: Arc<dyn CatalogSource>,
        fetcher: Arc<dyn ImageFetcher>,
        config: &Config,
    ) -> Self {
        let (state, _) = watch::channel(AnalysisState::default());
        Self {
            normalizer: ImageNormalizer::new(fetcher),
            extractor: VisionExtractor::new(provider.clone(), &config.prompts),
            resolver: CatalogResolver::new(catalog, config.catalog.max_results),
            provider_name: provider.name().to_string(),
            generator: SummaryGenerator::new(provider, &config.prompts),
            language: config.prompts.language,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Analyzer using Google Books and the default locator fetcher.
    pub fn from_config(config: &Config, provider: Box<dyn LlmProvider>) -> Self {
        let catalog = GoogleBooksCatalog::new(
            &config.catalog,
            Duration::from_millis(config.limits.catalog_timeout_ms),
        );
        Self::new(
            Arc::from(provider),
            Arc::new(catalog),
            Arc::new(LocatorFetcher::new(&config.limits)),
            config,
        )
    }

    /// Language used for prompts and user-facing messages.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Status of the most recently initiated analysis.
    pub fn status(&self) -> AnalysisStatus {
        self.state.borrow().status
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> AnalysisState {
        self.state.borrow().clone()
    }

    /// Watch state changes (for progress display).
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state.subscribe()
    }

    /// Run the full pipeline for one image.
    ///
    /// The caller always receives its own outcome. The published state only
    /// reflects it if no newer call was started in the meantime.
    pub async fn analyze(&self, image: ImageRef) -> Result<BookSummary, AnalysisError> {
        let ticket = self.begin();
        let start = Instant::now();

        let result = self.run(ticket, image).await;

        match &result {
            Ok(summary) => tracing::info!(
                "Analysis settled in {:?}: \"{}\" by {}",
                start.elapsed(),
                summary.title(),
                summary.author()
            ),
            Err(e) => tracing::error!("Analysis failed after {:?}: {e}", start.elapsed()),
        }
        self.finish(ticket, &result);
        result
    }

    async fn run(&self, ticket: u64, image: ImageRef) -> Result<BookSummary, AnalysisError> {
        self.enter(ticket, Stage::ImagePreparation);
        tracing::info!(
            "Preparing {} image for analysis",
            if image.is_inline() { "inline" } else { "remote" }
        );
        let encoded = self
            .normalizer
            .normalize(image)
            .await
            .map_err(|e| AnalysisError::new(Stage::ImagePreparation, e))?;
        tracing::info!("Image prepared ({})", encoded.media_type());

        self.enter(ticket, Stage::Extraction);
        tracing::info!("Reading cover with {}...", self.provider_name);
        let identity = self
            .extractor
            .extract(encoded)
            .await
            .map_err(|e| AnalysisError::new(Stage::Extraction, e))?;
        tracing::info!(
            "Extraction result: \"{}\" by {}",
            identity.title,
            identity.author
        );

        self.enter(ticket, Stage::CatalogSearch);
        tracing::info!("Searching catalog...");
        let metadata = self.resolver.resolve(&identity).await;
        tracing::debug!(
            "Catalog metadata: cover={}, description={}",
            metadata.cover_url.is_some(),
            metadata.description.is_some()
        );

        self.enter(ticket, Stage::SummaryGeneration);
        tracing::info!("Generating summary with {}...", self.provider_name);
        self.generator
            .generate(metadata)
            .await
            .map_err(|e| AnalysisError::new(Stage::SummaryGeneration, e))
    }

    /// Take a new ticket and publish `Pending`, superseding any earlier call.
    fn begin(&self) -> u64 {
        let mut ticket = 0;
        // Ticket issue and publish happen under the watch lock, so they are
        // ordered with respect to `enter` and `finish` of other calls.
        self.state.send_modify(|state| {
            ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = AnalysisState::pending();
        });
        ticket
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Publish the running stage, if this call is still current.
    fn enter(&self, ticket: u64, stage: Stage) {
        self.state.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            state.stage = Some(stage);
            true
        });
    }

    /// Publish the terminal state, if this call is still current.
    fn finish(&self, ticket: u64, result: &Result<BookSummary, AnalysisError>) {
        let published = self.state.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            *state = match result {
                Ok(summary) => AnalysisState::settled(summary.clone()),
                Err(e) => AnalysisState::failed(e.to_string()),
            };
            true
        });
        if !published {
            tracing::debug!("Discarding outcome of superseded analysis #{ticket}");
        }
    }
}
