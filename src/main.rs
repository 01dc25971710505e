//! Sumi-Sift main entry point
//!
//! This is the command-line interface for the Sumi-Sift term-finding crawler.

use clap::Parser;
use std::path::PathBuf;
use sumi_sift::config::{load_config, validate, Config};
use sumi_sift::output::print_summary;
use sumi_sift::run_pipeline;
use tracing_subscriber::EnvFilter;

/// Sumi-Sift: find a search term across a list of web pages
///
/// Sumi-Sift reads URLs from a CSV file, fetches every page and writes each
/// URL whose body contains the term (case-insensitive) to a results file.
#[derive(Parser, Debug)]
#[command(name = "sumi-sift")]
#[command(version)]
#[command(about = "Find a search term across a list of web pages", long_about = None)]
struct Cli {
    /// Location of the CSV file of URLs
    #[arg(long, value_name = "FILE")]
    infile: Option<String>,

    /// The search term to look for
    #[arg(long)]
    term: Option<String>,

    /// The max URLs to crawl (negative for no limit)
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// The name of the results file
    #[arg(long, value_name = "FILE")]
    outfile: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Capacity of the page buffer between fetching and matching
    #[arg(long)]
    concurrency: Option<usize>,

    /// Number of concurrent fetch workers (1 keeps input order)
    #[arg(long)]
    workers: Option<usize>,

    /// Treat the term as a regular expression instead of literal text
    #[arg(long)]
    regex: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    run(cli).await
}

/// Runs one search; returns early without touching any file when no term
/// was given
async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(term) = cli.term.clone() else {
        println!("No search term specified");
        return Ok(());
    };

    let config = resolve_config(&cli)?;

    if !cli.quiet {
        println!("Searching for term {} in file {}", term, config.input.path);
    }

    let summary = run_pipeline(&config, &term).await?;

    tracing::info!(
        "Results written to {} ({} matches)",
        config.output.results_path,
        summary.matches
    );

    if !cli.quiet {
        if cli.verbose > 0 {
            print_summary(&summary, &term);
        }
        println!("done");
    }

    Ok(())
}

/// Loads the config file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> sumi_sift::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(infile) = &cli.infile {
        config.input.path = infile.clone();
    }
    if let Some(outfile) = &cli.outfile {
        config.output.results_path = outfile.clone();
    }
    if let Some(limit) = cli.limit {
        config.crawler.url_limit = limit;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(workers) = cli.workers {
        config.crawler.fetch_workers = workers;
    }
    if cli.regex {
        config.search.regex = true;
    }

    // Overrides can break what the file validated
    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sift=info,warn"),
            1 => EnvFilter::new("sumi_sift=debug,info"),
            2 => EnvFilter::new("sumi_sift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
