//! Run statistics
//!
//! Counts gathered from the pipeline stages once a run is done, and a
//! human-readable printout of them.

use std::time::Duration;

/// Summary of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// URLs emitted by the URL source
    pub urls_read: usize,

    /// Pages produced by the fetcher, failed ones included
    pub pages_fetched: usize,

    /// Pages whose fetch failed
    pub pages_failed: usize,

    /// Pages that contain the search term
    pub matches: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Pages that were fetched successfully
    pub fn pages_succeeded(&self) -> usize {
        self.pages_fetched.saturating_sub(self.pages_failed)
    }

    /// Percentage of fetched pages that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.pages_fetched > 0 {
            (self.pages_succeeded() as f64 / self.pages_fetched as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Pages fetched per second of run time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_fetched as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints run statistics to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary, term: &str) {
    println!("=== Sift Statistics ===\n");

    println!("Overview:");
    println!("  URLs read: {}", summary.urls_read);
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Failed fetches: {}", summary.pages_failed);
    println!("  Pages with term \"{}\": {}", term, summary.matches);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched successfully)",
        summary.success_rate(),
        summary.pages_succeeded(),
        summary.pages_fetched
    );
    println!(
        "Elapsed: {:.2?} ({:.2} pages/sec)",
        summary.elapsed,
        summary.pages_per_second()
    );
}
