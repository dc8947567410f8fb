//! Sitemap source for sitemap crawls
//!
//! Reads a `<urlset>` document, from any reader, a local file or a URL, and
//! turns it into the ordered, duplicate-free list of pages to visit. Loading
//! always completes (or fails) before any page is crawled.

use crate::url::normalize_href;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use sitemap::reader::{SiteMapEntity, SiteMapReader};
use sitemap::structs::ChangeFreq;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a sitemap
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to read sitemap: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to download sitemap {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Sitemap {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed sitemap: {0}")]
    Malformed(String),
}

/// One `<url>` entry of a sitemap
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    loc: String,
    lastmod: Option<DateTime<FixedOffset>>,
    changefreq: Option<String>,
    priority: Option<f32>,
}

impl SitemapUrl {
    /// Creates an entry with only a location
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    /// Page location
    pub fn loc(&self) -> &str {
        &self.loc
    }

    /// Last modification time, if declared
    pub fn lastmod(&self) -> Option<DateTime<FixedOffset>> {
        self.lastmod
    }

    /// Declared change frequency, e.g. `daily`
    pub fn changefreq(&self) -> Option<&str> {
        self.changefreq.as_deref()
    }

    /// Declared priority between 0.0 and 1.0
    pub fn priority(&self) -> Option<f32> {
        self.priority
    }
}

impl PartialEq for SitemapUrl {
    fn eq(&self, other: &Self) -> bool {
        normalize_href(&self.loc) == normalize_href(&other.loc)
    }
}

impl Eq for SitemapUrl {}

impl Hash for SitemapUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        normalize_href(&self.loc).hash(state);
    }
}

/// The URL set of a sitemap, in document order and without duplicates
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    urls: Vec<SitemapUrl>,
}

impl Sitemap {
    /// Creates a sitemap from entries, dropping duplicates
    pub fn new(entries: impl IntoIterator<Item = SitemapUrl>) -> Self {
        let mut seen = HashSet::new();
        let urls = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.clone()))
            .collect();
        Self { urls }
    }

    /// Parses a sitemap document
    ///
    /// # Errors
    ///
    /// Returns [`SitemapError::Malformed`] if the XML cannot be parsed or an
    /// entry has no valid `<loc>`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SitemapError> {
        let mut entries = Vec::new();

        for entity in SiteMapReader::new(reader) {
            match entity {
                SiteMapEntity::Url(entry) => {
                    let loc = entry.loc.get_url().ok_or_else(|| {
                        SitemapError::Malformed("entry without a valid <loc>".to_string())
                    })?;
                    let changefreq = match entry.changefreq {
                        ChangeFreq::None => None,
                        other => Some(other.as_str().to_string()),
                    };

                    entries.push(SitemapUrl {
                        loc: loc.to_string(),
                        lastmod: entry.lastmod.get_time(),
                        changefreq,
                        priority: entry.priority.get_priority(),
                    });
                }
                SiteMapEntity::Err(e) => {
                    return Err(SitemapError::Malformed(format!("{:?}", e)));
                }
                _ => {}
            }
        }

        let sitemap = Self::new(entries);
        tracing::debug!("Sitemap lists {} pages", sitemap.len());
        Ok(sitemap)
    }

    /// Reads a sitemap from a local file
    pub fn from_file(path: &Path) -> Result<Self, SitemapError> {
        let content = std::fs::read(path)?;
        Self::from_reader(Cursor::new(content))
    }

    /// Downloads a sitemap
    pub async fn from_url(client: &Client, url: &str) -> Result<Self, SitemapError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| SitemapError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| SitemapError::Http {
            url: url.to_string(),
            source,
        })?;
        Self::from_reader(Cursor::new(bytes))
    }

    /// Loads a sitemap from a location that is either a URL or a file path
    pub async fn load(client: &Client, location: &str) -> Result<Self, SitemapError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::from_url(client, location).await
        } else {
            Self::from_file(Path::new(location))
        }
    }

    /// Entries in document order
    pub fn urls(&self) -> &[SitemapUrl] {
        &self.urls
    }

    /// Locations in document order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(SitemapUrl::loc)
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true if the sitemap lists no pages
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
