//! Pipeline orchestration
//!
//! Wires the URL source, fetcher and matcher together:
//!
//! ```text
//! UrlSource --[URL channel]--> fetcher --[page buffer]--> matcher --> ResultSink
//! ```
//!
//! All three stages run as independent tasks. The orchestrator tracks the
//! run through `Idle → Running → Draining → Done` and waits on the
//! matcher's completion signal before reporting.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::matcher::{run_matcher, TermMatcher};
use crate::crawler::{build_http_client, run_fetcher};
use crate::output::{FileSink, ResultSink, RunSummary};
use crate::source::{url_channel, UrlLimit, UrlSource};
use crate::state::RunState;
use crate::{Result, SiftError};
use reqwest::Client;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

/// Channel and worker sizing for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Capacity of the page buffer between fetcher and matcher
    pub buffer_capacity: usize,

    /// Number of fetch workers
    pub fetch_workers: usize,

    /// Bound for the URL channel; unbounded when `None`
    pub url_channel_capacity: Option<usize>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for PipelineOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            buffer_capacity: config.max_concurrent_fetches,
            fetch_workers: config.fetch_workers,
            url_channel_capacity: config.url_channel_capacity,
        }
    }
}

/// Runs one crawl-and-match pass over a URL source
pub struct Pipeline {
    client: Client,
    options: PipelineOptions,
    state: RunState,
}

impl Pipeline {
    /// Creates a pipeline around an existing HTTP client
    pub fn new(client: Client, options: PipelineOptions) -> Self {
        Self {
            client,
            options,
            state: RunState::Idle,
        }
    }

    /// Creates a pipeline from configuration, building its HTTP client
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, PipelineOptions::from(&config.crawler)))
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(SiftError::Pipeline(format!(
                "Invalid run state transition: {} -> {}",
                self.state, next
            )));
        }
        tracing::debug!("Run state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs the pipeline to completion
    ///
    /// The matcher must already be compiled and the sink already open, so
    /// the fatal failures of a run happen before this is called. Per-URL
    /// failures never end the run early. A pipeline runs once; calling this
    /// again returns `SiftError::Pipeline`.
    pub async fn run<S>(
        &mut self,
        source: UrlSource,
        matcher: TermMatcher,
        sink: S,
    ) -> Result<RunSummary>
    where
        S: ResultSink + 'static,
    {
        if self.state.is_terminal() {
            return Err(SiftError::Pipeline("Pipeline has already run".to_string()));
        }
        self.transition(RunState::Running)?;
        let start = Instant::now();

        let (url_tx, url_rx) = url_channel(self.options.url_channel_capacity);
        let (page_tx, page_rx) = mpsc::channel(self.options.buffer_capacity.max(1));
        let (done_tx, done_rx) = oneshot::channel();

        let source_task = source.spawn(url_tx);
        let fetcher_task = tokio::spawn(
            run_fetcher(
                self.client.clone(),
                url_rx,
                page_tx,
                self.options.fetch_workers,
            )
            .instrument(tracing::info_span!("fetcher")),
        );
        let matcher_task = tokio::spawn(
            run_matcher(page_rx, matcher, sink, done_tx).instrument(tracing::info_span!("matcher")),
        );

        let urls_read = source_task
            .await
            .map_err(|e| SiftError::Pipeline(format!("URL source task failed: {}", e)))?;
        self.transition(RunState::Draining)?;
        tracing::debug!("URL source closed after {} URLs", urls_read);

        let report = done_rx.await.map_err(|_| {
            SiftError::Pipeline("Matcher stopped without signaling completion".to_string())
        })?;
        self.transition(RunState::Done)?;

        let pages_fetched = fetcher_task
            .await
            .map_err(|e| SiftError::Pipeline(format!("Fetcher task failed: {}", e)))?;
        matcher_task
            .await
            .map_err(|e| SiftError::Pipeline(format!("Matcher task failed: {}", e)))?;

        Ok(RunSummary {
            urls_read,
            pages_fetched,
            pages_failed: report.pages_failed,
            matches: report.matches,
            elapsed: start.elapsed(),
        })
    }
}

/// Runs a complete search from configuration
///
/// This is the main entry point for a run. The fatal checks happen here,
/// before any URL is read: the term must compile (`SiftError::Pattern`) and
/// the results file must open (`SiftError::Output`). After that the source,
/// fetcher and matcher run until the matcher signals completion.
///
/// # Arguments
///
/// * `config` - The run configuration (input, output, crawler sizing)
/// * `term` - The search term, literal unless `search.regex` is set
pub async fn run_pipeline(config: &Config, term: &str) -> Result<RunSummary> {
    let matcher = TermMatcher::new(term, config.search.regex)?;
    let sink = FileSink::create(&config.output.results_path)?;

    let source = UrlSource::from_path(&config.input.path)
        .url_column(config.input.url_column)
        .header_label(config.input.header_label.clone())
        .limit(UrlLimit::from_raw(config.crawler.url_limit));

    let mut pipeline = Pipeline::from_config(config)?;
    pipeline.run(source, matcher, sink).await
}
