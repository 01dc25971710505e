//! Crawler module: the three-stage fetch-and-match pipeline
//!
//! This module contains:
//! - `Page`, the outcome of one fetch
//! - The fetcher stage (HTTP client, single worker or worker pool)
//! - The matcher stage (case-insensitive term matching)
//! - Pipeline orchestration and the run lifecycle

mod fetcher;
mod matcher;
mod page;
mod pipeline;

pub use fetcher::{build_http_client, fetch_page, run_fetcher};
pub use matcher::{run_matcher, MatchReport, TermMatcher};
pub use page::Page;
pub use pipeline::{run_pipeline, Pipeline, PipelineOptions};
