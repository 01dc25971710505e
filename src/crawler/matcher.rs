//! Term matcher stage
//!
//! Pages that fetched successfully are tested against one case-insensitive
//! pattern, compiled before the pipeline starts. Every match is written to
//! the result sink as soon as it is found.

use crate::crawler::Page;
use crate::output::ResultSink;
use regex::{Regex, RegexBuilder};
use tokio::sync::{mpsc, oneshot};

/// A compiled, case-insensitive search term
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    regex: Regex,
}

impl TermMatcher {
    /// Compiles `term` so that it matches literally
    ///
    /// Regex metacharacters in the term are escaped first, so `a.b` only
    /// matches the text `a.b`.
    pub fn literal(term: &str) -> Result<Self, regex::Error> {
        Self::compile(term, &regex::escape(term))
    }

    /// Compiles `pattern` as a regular expression
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Self::compile(pattern, pattern)
    }

    /// Compiles the term either as a raw regex or as a literal
    pub fn new(term: &str, raw_regex: bool) -> Result<Self, regex::Error> {
        if raw_regex {
            Self::pattern(term)
        } else {
            Self::literal(term)
        }
    }

    fn compile(term: &str, pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            term: term.to_string(),
            regex,
        })
    }

    /// The term as the user supplied it
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns true if `body` contains the term
    pub fn is_match(&self, body: &str) -> bool {
        self.regex.is_match(body)
    }
}

/// Final tally of the matcher stage, sent with the completion signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Pages received from the fetcher
    pub pages_seen: usize,

    /// Pages whose fetch failed and were skipped
    pub pages_failed: usize,

    /// Pages that contain the term
    pub matches: usize,
}

/// Runs the matcher stage until the page sequence is exhausted
///
/// Failed pages are skipped without a match attempt. Each matching URL is
/// written to `sink` immediately; a write failure is logged and the match
/// still counts. Once the input ends, the final count is logged and the
/// report is sent on `done` exactly once.
pub async fn run_matcher<S: ResultSink>(
    mut pages: mpsc::Receiver<Page>,
    matcher: TermMatcher,
    mut sink: S,
    done: oneshot::Sender<MatchReport>,
) {
    let mut report = MatchReport::default();

    while let Some(page) = pages.recv().await {
        report.pages_seen += 1;

        if page.is_failed() {
            report.pages_failed += 1;
            tracing::debug!("Skipping failed page {}: {}", page.url(), page.body());
            continue;
        }

        if matcher.is_match(page.body()) {
            report.matches += 1;
            tracing::info!("{} has term", page.url());
            if let Err(e) = sink.record_match(page.url()) {
                tracing::error!("Failed to record match for {}: {}", page.url(), e);
            }
        } else {
            tracing::debug!("{} doesn't have term", page.url());
        }
    }

    tracing::info!(
        "Found {} pages with term {}",
        report.matches,
        matcher.term()
    );

    if done.send(report).is_err() {
        tracing::debug!("Completion receiver dropped before the matcher finished");
    }
}
