//! Frontier and deduplication for a single crawl run
//!
//! The frontier is a FIFO queue, which makes the traversal breadth-first.
//! Every address is canonicalized before it is compared, so two addresses
//! differing only in their fragment are the same node.

use crate::url::canonicalize;
use crate::UrlError;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Queue of addresses awaiting a visit plus the set already visited
///
/// Owned by the coordinator for the lifetime of a run; nothing is persisted.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Addresses waiting to be fetched, oldest first
    queue: VecDeque<Url>,

    /// Addresses currently in `queue`
    queued: HashSet<Url>,

    /// Addresses already handed out by `next_to_visit`
    visited: HashSet<Url>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalizes `address` and appends it unless already visited or queued
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The address was added to the back of the queue
    /// * `Ok(false)` - The address was already known; nothing changed
    /// * `Err(UrlError)` - The address could not be canonicalized
    pub fn enqueue_if_new(&mut self, address: &str) -> Result<bool, UrlError> {
        let url = canonicalize(address)?;

        if self.visited.contains(&url) || self.queued.contains(&url) {
            return Ok(false);
        }

        self.queued.insert(url.clone());
        self.queue.push_back(url);
        Ok(true)
    }

    /// Pops the oldest queued address and marks it visited
    ///
    /// Entries that were visited after being queued are skipped. Returns None
    /// once the queue is exhausted.
    pub fn next_to_visit(&mut self) -> Option<Url> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);

            if self.visited.insert(url.clone()) {
                return Some(url);
            }

            tracing::trace!("Skipping already visited {}", url);
        }

        None
    }

    /// Number of distinct addresses handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of addresses waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no address is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns true if the (canonical) address was already handed out
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }
}
