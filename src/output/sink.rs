//! Batch uploader
//!
//! Delivers all records gathered in a run to the sink endpoint in one POST.
//! There is no retry: a failed delivery is reported once to the caller.

use crate::output::types::{BatchPayload, PageRecord, UploadAck};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Header carrying the sink credential
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Batch-level delivery failures
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Sink responded with {status_code}: {body}")]
    BadStatus { status_code: u16, body: String },

    #[error("Malformed sink acknowledgement: {0}")]
    MalformedResponse(String),

    #[error("Network error while uploading: {0}")]
    Network(String),

    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),
}

/// Result of a successful call to [`BatchUploader::upload`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The batch was empty; no request was made
    Skipped,

    /// The sink stored the batch
    Accepted(UploadAck),
}

/// Sends a whole batch to the sink endpoint
pub struct BatchUploader {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl BatchUploader {
    /// Creates an uploader sharing the crawler's HTTP client
    pub fn new(client: Client, endpoint: Url, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    /// Uploads the batch within `timeout`
    ///
    /// # Returns
    ///
    /// * `Ok(UploadOutcome::Skipped)` - The batch was empty, nothing was sent
    /// * `Ok(UploadOutcome::Accepted(ack))` - The sink acknowledged the batch
    /// * `Err(UploadError)` - Non-2xx status, unreadable acknowledgement,
    ///   transport failure or deadline exceeded
    pub async fn upload(
        &self,
        batch: &[PageRecord],
        timeout: Duration,
    ) -> Result<UploadOutcome, UploadError> {
        if batch.is_empty() {
            return Ok(UploadOutcome::Skipped);
        }

        tracing::info!("Sending {} pages to {}", batch.len(), self.endpoint);

        match tokio::time::timeout(timeout, self.send(batch)).await {
            Ok(result) => result.map(UploadOutcome::Accepted),
            Err(_) => Err(UploadError::Timeout(timeout)),
        }
    }

    async fn send(&self, batch: &[PageRecord]) -> Result<UploadAck, UploadError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&BatchPayload { pages: batch })
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::BadStatus {
                status_code: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| UploadError::MalformedResponse(e.to_string()))
    }
}
