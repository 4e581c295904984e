//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal loop that ties the crawl together:
//! - Seeding and draining the frontier breadth-first
//! - Fetching each page under a deadline
//! - Extracting records and following new links
//! - Pausing between requests to bound the request rate

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{CrawlOutcome, Extractor};
use crate::output::{CrawlStats, PageRecord};
use crate::HarvestError;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Everything a crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Records in the order their pages were visited
    pub records: Vec<PageRecord>,

    /// Every fetched address, in fetch order
    pub visited: Vec<Url>,

    /// Run counters
    pub stats: CrawlStats,
}

/// Main crawler coordinator structure
///
/// Owns the frontier for the duration of a run. Exactly one request is in
/// flight at any time.
pub struct Coordinator {
    client: Client,
    extractor: Extractor,
    frontier: Frontier,
    max_pages: usize,
    delay: Duration,
    timeout: Duration,
}

impl Coordinator {
    /// Creates a new coordinator with the seed already queued
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Invalid seed, invalid selector or client setup failure
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent)?;
        let extractor = Extractor::new(&config.extract)?;

        let mut frontier = Frontier::new();
        frontier.enqueue_if_new(&config.crawler.seed_url)?;

        Ok(Self {
            client,
            extractor,
            frontier,
            max_pages: config.crawler.max_pages,
            delay: Duration::from_millis(config.crawler.delay_ms),
            timeout: Duration::from_millis(config.crawler.timeout_ms),
        })
    }

    /// The HTTP client used for fetching, shared with the uploader
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Runs the main crawl loop
    ///
    /// Loops while the frontier has addresses and fewer than `max_pages`
    /// addresses were visited:
    /// 1. Dequeue the next address
    /// 2. Fetch it under the configured timeout
    /// 3. On failure, log and move on (no record, no links)
    /// 4. On success, extract, keep the record, enqueue new links
    /// 5. Sleep the politeness delay if another fetch will follow
    pub async fn run(&mut self) -> CrawlReport {
        tracing::info!(
            "Starting crawl: max {} pages, {:?} delay, {:?} timeout",
            self.max_pages,
            self.delay,
            self.timeout
        );

        let mut stats = CrawlStats::start();
        let mut records = Vec::new();
        let mut visited = Vec::new();
        let start_time = Instant::now();

        while self.frontier.visited_count() < self.max_pages {
            let url = match self.frontier.next_to_visit() {
                Some(url) => url,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
            };

            tracing::debug!("Processing URL: {}", url);
            stats.pages_visited += 1;

            if let Some(outcome) = self.visit(&url, &mut stats).await {
                if let Some(record) = outcome.record {
                    tracing::info!("✓ Crawled: {}", url);
                    stats.records_collected += 1;
                    records.push(record);
                } else {
                    tracing::debug!("No content extracted from {}", url);
                    stats.pages_without_content += 1;
                }

                self.absorb_links(&outcome.links, &mut stats);
            }
            visited.push(url);

            if visited.len() % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} records in {:?}",
                    visited.len(),
                    self.frontier.pending(),
                    records.len(),
                    start_time.elapsed()
                );
            }

            if !self.frontier.is_empty() && self.frontier.visited_count() < self.max_pages {
                tokio::time::sleep(self.delay).await;
            }
        }

        if self.frontier.visited_count() >= self.max_pages {
            tracing::info!(
                "Page cap of {} reached with {} addresses left in frontier",
                self.max_pages,
                self.frontier.pending()
            );
        }

        stats.finish();
        tracing::info!(
            "Crawl finished: {} pages visited, {} records gathered in {:?}",
            visited.len(),
            records.len(),
            start_time.elapsed()
        );

        CrawlReport {
            records,
            visited,
            stats,
        }
    }

    /// Fetches and extracts a single page; None if the fetch failed
    async fn visit(&self, url: &Url, stats: &mut CrawlStats) -> Option<CrawlOutcome> {
        match fetch_url(&self.client, url, self.timeout).await {
            Ok(page) => {
                tracing::debug!("Fetched {} (HTTP {})", url, page.status_code);
                if page.final_url.as_str() != url.as_str() {
                    tracing::debug!("{} redirected to {}", url, page.final_url);
                }
                Some(
                    self.extractor
                        .extract_with_base(&page.body, url, &page.final_url),
                )
            }
            Err(failure) => {
                tracing::warn!("✗ Error crawling {}: {}", url, failure);
                stats.record_failure(&failure);
                None
            }
        }
    }

    /// Adds every new candidate link to the frontier
    fn absorb_links(&mut self, links: &[Url], stats: &mut CrawlStats) {
        stats.links_discovered += links.len();

        for link in links {
            match self.frontier.enqueue_if_new(link.as_str()) {
                Ok(true) => stats.links_enqueued += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!("Dropping link {}: {}", link, e);
                    stats.invalid_links += 1;
                }
            }
        }
    }
}

/// Runs a crawl and returns its report without uploading anything
///
/// # Example
///
/// ```no_run
/// use article_harvester::config::load_config;
/// use article_harvester::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} records", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
