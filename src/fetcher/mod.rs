//! Page fetching
//!
//! The crawl engines never talk to the network directly. They ask a
//! [`PageFetcher`] for the content of a URL and receive a plain
//! [`FetchedPage`], which they turn into an immutable snapshot. This module
//! holds that contract and the HTTP implementation used by the CLI:
//! - Building HTTP clients with proper user agent strings
//! - GET requests and error classification
//! - HTML extraction of title, visible text, category and links

mod http;
mod parser;

pub use http::{build_http_client, HttpPageFetcher};
pub use parser::parse_page;

use crate::url::Link;
use async_trait::async_trait;
use thiserror::Error;

/// Transient faults raised while fetching a page
///
/// Every variant is eligible for retry by `RetriableCrawl` and triggers the
/// failsafe of `SwitchableCrawl`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Fetch session error: {0}")]
    Session(String),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Content of a page, as seen by the fetcher
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// The page title
    pub title: String,

    /// Visible text of the page
    pub text_content: String,

    /// Text of the element with id `pagectg`, empty if there is none
    pub category: String,

    /// Links to other pages of the same site
    pub links: Vec<Link>,
}

/// A fetch session: loads pages one at a time
///
/// A session is used by one crawl run at a time and is released when the run
/// ends, whether it succeeded or not. `release` must be idempotent.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Loads the page at `url`
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;

    /// Releases whatever the session holds
    async fn release(&self);
}
