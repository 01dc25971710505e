//! Configuration module for Sumi-Sift
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so an empty file (or no file
//! at all) yields a usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use sumi_sift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sift.toml")).unwrap();
//! println!("Page buffer capacity: {}", config.crawler.max_concurrent_fetches);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, InputConfig, OutputConfig, SearchConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
