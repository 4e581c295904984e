//! HTTP fetcher implementation
//!
//! This module handles all page retrievals for the crawler:
//! - Building the HTTP client with the crawler's user agent string
//! - A single GET per address, bounded by a hard deadline
//! - Error classification into timeout / bad status / network failures
//!
//! There is no retry. Each call is one attempt and the coordinator decides
//! what to do with a failure.

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully retrieved document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Per-page fetch failures; none of these stop the run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request took longer than {0:?}")]
    Timeout(Duration),

    #[error("HTTP {0}")]
    BadStatus(u16),

    #[error("network error: {0}")]
    Network(String),
}

/// Formats the identifying user agent: `Name/Version (Comment)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    if config.comment.is_empty() {
        format!("{}/{}", config.crawler_name, config.crawler_version)
    } else {
        format!(
            "{}/{} ({})",
            config.crawler_name, config.crawler_version, config.comment
        )
    }
}

/// Builds an HTTP client with proper configuration
///
/// No overall request timeout is set on the client; every operation carries
/// its own deadline instead.
///
/// # Example
///
/// ```no_run
/// use article_harvester::config::UserAgentConfig;
/// use article_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once, aborting when `timeout` elapses
///
/// The deadline covers the whole exchange, headers and body.
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | Non-2xx status | `FetchFailure::BadStatus` |
/// | Deadline elapsed | `FetchFailure::Timeout` |
/// | Connection/TLS/body error | `FetchFailure::Network` |
pub async fn fetch_url(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<FetchedPage, FetchFailure> {
    match tokio::time::timeout(timeout, fetch_once(client, url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchFailure::Timeout(timeout)),
    }
}

async fn fetch_once(client: &Client, url: &Url) -> Result<FetchedPage, FetchFailure> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::BadStatus(status.as_u16()));
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(classify_error)?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

fn classify_error(e: reqwest::Error) -> FetchFailure {
    if e.is_connect() {
        FetchFailure::Network(format!("connection failed: {}", e))
    } else {
        FetchFailure::Network(e.to_string())
    }
}
