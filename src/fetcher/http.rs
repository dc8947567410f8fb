//! HTTP fetcher implementation
//!
//! This module loads pages over HTTP(S), including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with redirect following
//! - Error classification into transient fetch faults
//! - Handing HTML bodies to the parser

use crate::config::UserAgentConfig;
use crate::fetcher::parser::parse_page;
use crate::fetcher::{FetchError, FetchResult, FetchedPage, PageFetcher};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total time allowed for one request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_harvest::config::UserAgentConfig;
/// use sumi_harvest::fetcher::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SumiHarvest".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A fetch session backed by a reqwest client
///
/// Server errors (5xx), rate limiting (429), timeouts and network failures are
/// reported as [`FetchError`]s. Any other status is treated like a browser
/// would: the returned document is rendered and snapshotted as it is.
pub struct HttpPageFetcher {
    client: Client,
    released: AtomicBool,
    pages_fetched: AtomicUsize,
}

impl HttpPageFetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            released: AtomicBool::new(false),
            pages_fetched: AtomicUsize::new(0),
        }
    }

    /// Creates a fetcher with a client built from the user agent configuration
    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }

    /// Number of pages fetched since the session was last released
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        if self.released.swap(false, Ordering::SeqCst) {
            tracing::debug!("Reopening released fetch session");
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            tracing::debug!("{} answered with HTTP {}", url, status.as_u16());
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;
        self.pages_fetched.fetch_add(1, Ordering::SeqCst);

        if !content_type.is_empty() && !content_type.contains("html") {
            tracing::debug!("{} is not HTML ({}), keeping an empty page", url, content_type);
            return Ok(FetchedPage::default());
        }

        Ok(parse_page(&body, &final_url))
    }

    async fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            let fetched = self.pages_fetched.swap(0, Ordering::SeqCst);
            tracing::debug!("Released fetch session after {} pages", fetched);
        }
    }
}

/// Maps a reqwest error to a fetch fault
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
