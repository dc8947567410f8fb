//! Anchor references found on crawled pages

use crate::url::normalize::{normalize_href, origin_prefix, strip_fragment};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An anchor on a web page: its visible text and its target
///
/// Two links are equal when their hrefs are equal after removing the fragment
/// and a single trailing slash. The anchor text never takes part in equality,
/// so a set of links holds at most one entry per target page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    text: String,
    href: String,
}

impl Link {
    /// Creates a new link
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }

    /// The anchor text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The raw href, as found on the page
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The href without its fragment, which is what gets fetched
    pub fn target(&self) -> &str {
        strip_fragment(&self.href)
    }

    /// The normalized href used as the equality key
    pub fn key(&self) -> &str {
        normalize_href(&self.href)
    }

    /// Checks whether this link is worth crawling from the page at `origin`
    ///
    /// A link is valid when it is not a `mailto:` link and it points to the
    /// same `scheme://host[:port]` as the origin. The host must match as a
    /// whole, so `http://example.com` does not validate
    /// `http://example.com.evil.org/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_harvest::url::Link;
    ///
    /// let link = Link::new("post", "https://example.com/2016/04/post.html");
    /// assert!(link.valid("https://example.com/index.html"));
    /// assert!(!link.valid("https://other.com"));
    /// ```
    pub fn valid(&self, origin: &str) -> bool {
        if self.href.starts_with("mailto:") {
            return false;
        }

        let prefix = origin_prefix(origin);
        if prefix.is_empty() {
            return false;
        }

        let (Some(head), Some(rest)) = (
            self.href.get(..prefix.len()),
            self.href.get(prefix.len()..),
        ) else {
            return false;
        };

        head.eq_ignore_ascii_case(prefix)
            && matches!(rest.chars().next(), None | Some('/') | Some('?') | Some('#'))
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href)
    }
}
