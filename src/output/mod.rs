//! Output module for delivering crawl results
//!
//! This module handles:
//! - The record shape delivered to the sink
//! - Uploading the gathered batch in a single request
//! - Recording and printing run statistics

mod sink;
pub mod stats;
mod types;

pub use sink::{BatchUploader, UploadError, UploadOutcome, API_KEY_HEADER};
pub use stats::{print_report, CrawlStats};
pub use types::{BatchPayload, PageRecord, UploadAck, CONTENT_PREVIEW_LIMIT};
