//! Page snapshots
//!
//! A snapshot is the immutable record of one crawled page. It is created once,
//! right after the page is fetched, and is what every repository exports.

mod snapshot;

pub use snapshot::PageSnapshot;
