//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching under a per-request deadline
//! - HTML extraction of records and links
//! - Frontier management and deduplication
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, user_agent_string, FetchFailure, FetchedPage};
pub use frontier::Frontier;
pub use parser::{collapse_whitespace, truncate_chars, CrawlOutcome, Extractor};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the crawl-only entry point. It will:
/// 1. Build the HTTP client and extractor
/// 2. Seed the frontier
/// 3. Fetch and extract pages breadth-first
/// 4. Return the gathered records without uploading them
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl ran to completion
/// * `Err(HarvestError)` - Crawl could not start
pub async fn crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    run_crawl(config).await
}
