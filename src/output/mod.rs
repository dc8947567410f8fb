//! Output module for crawl statistics
//!
//! This module handles:
//! - Collecting the statistics of a crawl session
//! - Printing them as a summary at the end of a CLI run

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};
