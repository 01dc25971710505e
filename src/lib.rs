//! Sumi-Sift: a term-finding crawler
//!
//! This crate reads a list of URLs, fetches every page over HTTP and reports
//! which pages contain a case-insensitive search term. Work moves through a
//! three-stage pipeline (URL source, fetcher, matcher) connected by channels.

pub mod config;
pub mod crawler;
pub mod output;
pub mod source;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Sift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while reading the URL provider
///
/// These never abort a run: the URL source reports them once and closes
/// its sequence.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open URL source {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to read URL source: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for Sumi-Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_pipeline, Page, Pipeline, TermMatcher};
pub use output::{FileSink, ResultSink, RunSummary};
pub use source::{UrlLimit, UrlSource, NO_LIMIT};
pub use state::RunState;
pub use url::normalize_scheme;
