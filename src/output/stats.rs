//! Run statistics
//!
//! Counters collected by the coordinator while it crawls, and the final
//! report printed by the binary once the run is over.

use crate::crawler::FetchFailure;
use crate::output::sink::UploadOutcome;
use crate::HarvestReport;
use chrono::{DateTime, Utc};

/// Counters for a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Addresses dequeued and fetched
    pub pages_visited: usize,

    /// Pages that produced a record
    pub records_collected: usize,

    /// Pages fetched successfully but with no extractable content
    pub pages_without_content: usize,

    /// Fetches aborted by the deadline
    pub fetch_timeouts: usize,

    /// Fetches answered with a non-success status
    pub fetch_bad_status: usize,

    /// Fetches that failed at the transport level
    pub fetch_network_errors: usize,

    /// Candidate links returned by the extractor
    pub links_discovered: usize,

    /// Candidate links that were new and entered the frontier
    pub links_enqueued: usize,

    /// Candidate links rejected as invalid addresses
    pub invalid_links: usize,
}

impl CrawlStats {
    /// Starts a new set of counters stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            records_collected: 0,
            pages_without_content: 0,
            fetch_timeouts: 0,
            fetch_bad_status: 0,
            fetch_network_errors: 0,
            links_discovered: 0,
            links_enqueued: 0,
            invalid_links: 0,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Counts a failed fetch by kind
    pub fn record_failure(&mut self, failure: &FetchFailure) {
        match failure {
            FetchFailure::Timeout(_) => self.fetch_timeouts += 1,
            FetchFailure::BadStatus(_) => self.fetch_bad_status += 1,
            FetchFailure::Network(_) => self.fetch_network_errors += 1,
        }
    }

    /// Total number of failed fetches
    pub fn failed_fetches(&self) -> usize {
        self.fetch_timeouts + self.fetch_bad_status + self.fetch_network_errors
    }

    /// Run duration in milliseconds, if the run has finished
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}

/// Prints the final run report to stdout
pub fn print_report(report: &HarvestReport) {
    let stats = &report.crawl.stats;

    println!("=== Harvest Report ===\n");

    println!("Crawl:");
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Records gathered: {}", stats.records_collected);
    println!("  Pages without content: {}", stats.pages_without_content);
    println!(
        "  Failed fetches: {} (timeouts: {}, bad status: {}, network: {})",
        stats.failed_fetches(),
        stats.fetch_timeouts,
        stats.fetch_bad_status,
        stats.fetch_network_errors
    );
    println!(
        "  Links discovered: {} ({} enqueued)",
        stats.links_discovered, stats.links_enqueued
    );
    if let Some(ms) = stats.duration_ms() {
        println!("  Duration: {:.1}s", ms as f64 / 1000.0);
    }
    println!();

    println!("Upload:");
    match &report.upload {
        Ok(UploadOutcome::Accepted(ack)) => {
            println!("  ✓ Inserted {}/{} pages", ack.inserted, ack.total)
        }
        Ok(UploadOutcome::Skipped) => println!("  - Nothing to send"),
        Err(e) => println!("  ✗ {}", e),
    }
}
