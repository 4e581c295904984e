//! Article Harvester: a polite single-pass article crawler
//!
//! This crate walks a site breadth-first from a seed address, extracts a title
//! and a short content preview from every page it visits, and delivers the
//! collected records to a sink endpoint in a single batch.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use crate::crawler::{Coordinator, CrawlReport};
use crate::output::{BatchUploader, UploadError, UploadOutcome};
use std::time::Duration;
use thiserror::Error;

/// Main error type for harvest runs
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("No sink credential configured (set `api-key` or the `{env_var}` environment variable)")]
    MissingCredential { env_var: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Everything a completed run produced
///
/// The upload result is kept separate from the crawl so that a failed delivery
/// still hands the gathered records back to the caller.
#[derive(Debug)]
pub struct HarvestReport {
    pub crawl: CrawlReport,
    pub upload: std::result::Result<UploadOutcome, UploadError>,
}

impl HarvestReport {
    /// Returns true if the batch was delivered or there was nothing to deliver
    pub fn is_success(&self) -> bool {
        self.upload.is_ok()
    }
}

/// Runs a complete harvest: credential check, crawl, single batch upload
///
/// The credential is resolved before any request is made; a missing credential
/// refuses the run with [`HarvestError::MissingCredential`].
pub async fn harvest(config: Config) -> Result<HarvestReport> {
    let api_key = config
        .sink
        .resolve_api_key()
        .ok_or_else(|| HarvestError::MissingCredential {
            env_var: config.sink.api_key_env.clone(),
        })?;

    let timeout = Duration::from_millis(config.crawler.timeout_ms);
    let endpoint = ::url::Url::parse(&config.sink.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid sink endpoint: {}", e)))?;

    let mut coordinator = Coordinator::new(&config)?;
    let crawl = coordinator.run().await;

    let uploader = BatchUploader::new(coordinator.client().clone(), endpoint, api_key);
    let upload = uploader.upload(&crawl.records, timeout).await;

    match &upload {
        Ok(UploadOutcome::Accepted(ack)) => {
            tracing::info!("Sink accepted batch: {}/{} inserted", ack.inserted, ack.total)
        }
        Ok(UploadOutcome::Skipped) => tracing::info!("No records gathered, upload skipped"),
        Err(e) => tracing::error!("Batch upload failed: {}", e),
    }

    Ok(HarvestReport { crawl, upload })
}

// Re-export commonly used types
pub use config::Config;
pub use output::PageRecord;
pub use crate::url::canonicalize;
