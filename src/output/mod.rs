//! Output module for match results and run statistics
//!
//! This module handles:
//! - Writing matching URLs to the result sink, one line per match
//! - Summarizing and printing run statistics

mod sink;
pub mod stats;

pub use sink::{format_match_line, FileSink, ResultSink, WriterSink};
pub use stats::{print_summary, RunSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Could not open {path} for writing results: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write result: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
