use crate::fetcher::FetchedPage;
use crate::url::{page_name, Link};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Immutable snapshot of a crawled web page
///
/// Snapshots are identified by their URL alone: two snapshots of the same URL
/// are equal even if the page changed between fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    name: String,
    url: String,
    title: String,
    text_content: String,
    category: String,
    links: Vec<Link>,
}

impl PageSnapshot {
    /// Creates a snapshot from its parts
    ///
    /// Duplicate links (by [`Link`] equality) are dropped, keeping the first
    /// occurrence.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        text_content: impl Into<String>,
        category: impl Into<String>,
        links: impl IntoIterator<Item = Link>,
    ) -> Self {
        let mut seen = HashSet::new();
        let links = links
            .into_iter()
            .filter(|link| seen.insert(link.clone()))
            .collect();

        Self {
            name: name.into(),
            url: url.into(),
            title: title.into(),
            text_content: text_content.into(),
            category: category.into(),
            links,
        }
    }

    /// Takes the snapshot of a page that was just fetched from `url`
    ///
    /// The snapshot name is derived from the URL (see [`page_name`]).
    pub fn capture(url: &str, page: FetchedPage) -> Self {
        Self::new(
            page_name(url),
            url,
            page.title,
            page.text_content,
            page.category,
            page.links,
        )
    }

    /// File-like name of the page, e.g. `index` or `about.html`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL the page was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Page title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Visible text of the page
    pub fn text_content(&self) -> &str {
        &self.text_content
    }

    /// Page category, empty when the page declares none
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Outbound links, without duplicates
    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

impl PartialEq for PageSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for PageSnapshot {}

impl Hash for PageSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}
