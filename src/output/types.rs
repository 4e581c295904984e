//! Wire types exchanged with the sink

use serde::{Deserialize, Serialize};

/// Maximum number of characters kept in a record's content preview
pub const CONTENT_PREVIEW_LIMIT: usize = 250;

/// A single extracted page, as delivered to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// First heading of the page (empty if the page has none)
    pub title: String,

    /// Canonical address the page was fetched from
    pub url: String,

    /// Language tag
    pub language: String,

    /// Content preview, at most [`CONTENT_PREVIEW_LIMIT`] characters
    pub content: String,
}

/// Request body for a batch delivery: `{"pages": [...]}`
#[derive(Debug, Serialize)]
pub struct BatchPayload<'a> {
    pub pages: &'a [PageRecord],
}

/// Acknowledgement returned by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UploadAck {
    /// Records newly stored by the sink
    pub inserted: u64,

    /// Records the sink received
    pub total: u64,
}
