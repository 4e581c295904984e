//! URL handling module for Article Harvester
//!
//! This module provides address canonicalization (the identity key used for
//! deduplication) and the link filter deciding which anchors are followed.

mod matcher;
mod normalize;

// Re-export main functions
pub use matcher::{LinkFilter, NAMESPACE_SEPARATOR};
pub use normalize::{canonical_form, canonicalize};
