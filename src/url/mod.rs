//! URL handling module for Sumi-Harvest
//!
//! This module provides the link model used for deduplication, href
//! normalization, page name derivation, and the ignored-pattern matcher.

mod link;
mod matcher;
mod normalize;

// Re-export main types and functions
pub use link::Link;
pub use matcher::IgnoredPatterns;
pub use normalize::{normalize_href, origin_prefix, page_name, strip_fragment};
