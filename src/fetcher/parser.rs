//! HTML parser for extracting page content
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - The visible text of the body
//! - The page category (element with id `pagectg`)
//! - Links to other pages of the same site

use crate::fetcher::FetchedPage;
use crate::url::Link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses an HTML document fetched from `page_url`
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags resolved against the page URL
/// - only links on the same site as the page (see [`Link::valid`])
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
///
/// # Example
///
/// ```
/// use sumi_harvest::fetcher::parse_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_page(html, &page_url);
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.links[0].href(), "https://example.com/page");
/// ```
pub fn parse_page(html: &str, page_url: &Url) -> FetchedPage {
    let document = Html::parse_document(html);

    FetchedPage {
        title: extract_title(&document),
        text_content: extract_text(&document),
        category: extract_category(&document),
        links: extract_links(&document, page_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(collapse_whitespace)
        .unwrap_or_default()
}

/// Extracts the visible text of the body, whitespace collapsed
fn extract_text(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };
    let Some(body) = document.select(&body_selector).next() else {
        return String::new();
    };

    let mut words: Vec<&str> = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Extracts the text of the category element
fn extract_category(document: &Html) -> String {
    let Ok(category_selector) = Selector::parse("#pagectg") else {
        return String::new();
    };

    document
        .select(&category_selector)
        .next()
        .map(collapse_whitespace)
        .unwrap_or_default()
}

/// Extracts all crawlable links from the HTML document
fn extract_links(document: &Html, page_url: &Url) -> Vec<Link> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(absolute_url) = resolve_link(href, page_url) else {
                continue;
            };

            let link = Link::new(collapse_whitespace(element), absolute_url);
            if link.valid(page_url.as_str()) {
                links.push(link);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

/// Joins the text of an element, collapsing runs of whitespace
fn collapse_whitespace(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
