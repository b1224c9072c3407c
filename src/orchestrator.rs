// src/orchestrator.rs
//! Sources x pages crawl loop.
//!
//! Pages are processed strictly one at a time. Each page goes through
//! render -> prompt -> completion -> parse; any failure along the way is
//! recorded against that page and the loop moves on.

use crate::browser::{ChromeLauncher, ChromeSettings, PageRenderer};
use crate::completion::{CompletionClient, CompletionSettings, OpenAiClient};
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extraction::{ExtractionPromptBuilder, ResponseParser};
use crate::pacing::{PacingPolicy, Sleeper, TokioSleeper};
use crate::sources::{adapter_for, SourceAdapter};
use crate::types::{JobRecord, SearchQuery};
use crate::utils::snippet;
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

/// Per-source page counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTally {
    pub source: String,
    pub supported: bool,
    pub pages_attempted: usize,
    pub pages_succeeded: usize,
    pub pages_failed: usize,
    pub jobs_found: usize,
}

#[derive(Debug)]
pub struct PageFailure {
    pub query: SearchQuery,
    pub url: Option<String>,
    pub error: ScrapeError,
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// In (source, page, position in page) order
    pub records: Vec<JobRecord>,
    pub tallies: Vec<SourceTally>,
    pub failures: Vec<PageFailure>,
}

impl ScrapeReport {
    pub fn pages_failed(&self) -> usize {
        self.tallies.iter().map(|t| t.pages_failed).sum()
    }

    pub fn pages_succeeded(&self) -> usize {
        self.tallies.iter().map(|t| t.pages_succeeded).sum()
    }
}

pub struct ScrapeOrchestrator {
    renderer: PageRenderer,
    prompts: ExtractionPromptBuilder,
    client: Arc<dyn CompletionClient>,
    completion: CompletionSettings,
    pacing: PacingPolicy,
    sleeper: Arc<dyn Sleeper>,
    render_timeout_secs: u64,
    consult_provider_on_render_failure: bool,
}

impl ScrapeOrchestrator {
    pub fn new(
        renderer: PageRenderer,
        client: Arc<dyn CompletionClient>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            renderer,
            prompts: ExtractionPromptBuilder::default(),
            client,
            completion: CompletionSettings::default(),
            pacing: PacingPolicy::default(),
            sleeper,
            render_timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            consult_provider_on_render_failure: true,
        }
    }

    /// Wire up Chrome, the OpenAI-compatible client and real sleeps from config
    pub fn from_config(config: &ScraperConfig, api_key: String) -> anyhow::Result<Self> {
        let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
        let launcher = ChromeLauncher::new(ChromeSettings {
            headless: config.browser.headless,
            chrome_path: config.browser.chrome_path.clone(),
            user_agent: config.browser.user_agent.clone(),
            window_size: (config.browser.window_width, config.browser.window_height),
            idle_timeout: Duration::from_secs(config.browser.render_timeout_seconds.max(1) * 2),
        });
        let client = OpenAiClient::new(
            api_key,
            &config.provider.base_url,
            Duration::from_secs(config.provider.timeout_seconds),
        )
        .context("Failed to create completion client")?;

        Ok(Self::new(
            PageRenderer::new(Arc::new(launcher), Arc::clone(&sleeper)),
            Arc::new(client),
            sleeper,
        )
        .with_prompt_builder(
            ExtractionPromptBuilder::default()
                .with_max_content_chars(config.extraction.max_content_chars)
                .with_strip_markup(config.extraction.strip_markup),
        )
        .with_completion_settings(config.provider.completion_settings())
        .with_pacing(config.pacing.policy())
        .with_render_timeout(config.browser.render_timeout_seconds)
        .with_provider_troubleshooting(config.extraction.consult_provider_on_render_failure))
    }

    pub fn with_prompt_builder(mut self, prompts: ExtractionPromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_completion_settings(mut self, settings: CompletionSettings) -> Self {
        self.completion = settings;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_render_timeout(mut self, seconds: u64) -> Self {
        self.render_timeout_secs = seconds;
        self
    }

    /// Whether a failed render still sends the troubleshooting prompt
    pub fn with_provider_troubleshooting(mut self, enabled: bool) -> Self {
        self.consult_provider_on_render_failure = enabled;
        self
    }

    /// Crawl `pages_per_source` result pages of each named source.
    ///
    /// Always completes. Unknown sources and failed pages are recorded in
    /// the report, never returned as errors.
    pub async fn run(
        &self,
        job_title: &str,
        location: &str,
        source_names: &[String],
        pages_per_source: usize,
    ) -> ScrapeReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("scrape_run", run_id = %run_id);
        self.run_inner(run_id, job_title, location, source_names, pages_per_source)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        job_title: &str,
        location: &str,
        source_names: &[String],
        pages_per_source: usize,
    ) -> ScrapeReport {
        let started_at = Utc::now();
        let mut records = Vec::new();
        let mut tallies = Vec::with_capacity(source_names.len());
        let mut failures = Vec::new();

        for name in source_names {
            let Some(adapter) = adapter_for(name) else {
                warn!("Unsupported source: {}", name);
                tallies.push(SourceTally {
                    source: name.clone(),
                    ..SourceTally::default()
                });
                failures.push(PageFailure {
                    query: SearchQuery::new(job_title, location, name, 0),
                    url: None,
                    error: ScrapeError::UnsupportedSource(name.clone()),
                });
                continue;
            };

            info!("Scraping {} for {} in {}...", adapter.source(), job_title, location);
            let mut tally = SourceTally {
                source: adapter.source().to_string(),
                supported: true,
                ..SourceTally::default()
            };
            let mut consecutive_failures: u32 = 0;

            for page_index in 0..pages_per_source {
                let query = SearchQuery::new(job_title, location, name, page_index);
                let url = adapter.url_for(&query);
                tally.pages_attempted += 1;

                match self.scrape_page(adapter.as_ref(), &url).await {
                    Ok(jobs) => {
                        info!(
                            "Found {} jobs on {} (page {})",
                            jobs.len(),
                            adapter.source(),
                            page_index + 1
                        );
                        tally.pages_succeeded += 1;
                        tally.jobs_found += jobs.len();
                        records.extend(jobs);
                        consecutive_failures = 0;
                    }
                    Err(error) => {
                        warn!(
                            "Page {} of {} failed ({}): {}",
                            page_index + 1,
                            adapter.source(),
                            error.kind(),
                            error
                        );
                        tally.pages_failed += 1;
                        consecutive_failures = consecutive_failures.saturating_add(1);
                        failures.push(PageFailure {
                            query,
                            url: Some(url),
                            error,
                        });
                    }
                }

                if page_index + 1 < pages_per_source {
                    let delay = self.pacing.delay(consecutive_failures);
                    info!("Waiting {:.1} seconds before next page...", delay.as_secs_f64());
                    self.sleeper.sleep(delay).await;
                }
            }

            tallies.push(tally);
        }

        info!(
            "Run finished: {} jobs, {} failures",
            records.len(),
            failures.len()
        );

        ScrapeReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            records,
            tallies,
            failures,
        }
    }

    async fn scrape_page(
        &self,
        adapter: &dyn SourceAdapter,
        url: &str,
    ) -> Result<Vec<JobRecord>, ScrapeError> {
        let page = self.renderer.render(url, self.render_timeout_secs).await;
        let render_failure = (!page.success).then(|| {
            page.failure
                .clone()
                .unwrap_or_else(|| "page could not be rendered".to_string())
        });

        let request = self.completion.request_for(self.prompts.build(page));

        if let Some(reason) = render_failure {
            if self.consult_provider_on_render_failure {
                match self.client.complete(&request).await {
                    Ok(guidance) => info!("Troubleshooting guidance: {}", snippet(&guidance, 500)),
                    Err(e) => warn!("Troubleshooting request failed: {}", e),
                }
            }
            return Err(ScrapeError::Render(reason));
        }

        let completion = self.client.complete(&request).await?;
        Ok(ResponseParser::parse(&completion, adapter.source())?)
    }
}
