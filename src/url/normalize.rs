/// Reduces an href to the key used for link equality
///
/// # Normalization Steps
///
/// 1. Remove the fragment (everything from the first `#`)
/// 2. Remove a single trailing slash
///
/// Nothing else is touched: case, query strings and percent-encoding are
/// compared verbatim.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::normalize_href;
///
/// assert_eq!(normalize_href("http://x.com/a/#top"), "http://x.com/a");
/// assert_eq!(normalize_href("http://x.com/"), "http://x.com");
/// ```
pub fn normalize_href(href: &str) -> &str {
    let without_fragment = strip_fragment(href);

    without_fragment
        .strip_suffix('/')
        .unwrap_or(without_fragment)
}

/// Removes the fragment (everything from the first `#`) of an href
///
/// This is the address actually requested from the server.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::strip_fragment;
///
/// assert_eq!(strip_fragment("http://x.com/b#top"), "http://x.com/b");
/// assert_eq!(strip_fragment("http://x.com/b/"), "http://x.com/b/");
/// ```
pub fn strip_fragment(href: &str) -> &str {
    match href.find('#') {
        Some(idx) => &href[..idx],
        None => href,
    }
}

/// Returns the `scheme://host[:port]` prefix of an origin URL
///
/// The prefix ends at the first `/` following the `://` separator. Origins
/// without a scheme (e.g. `www.example.com/page`) end at their first `/`. If
/// no such slash exists the whole origin is returned.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::origin_prefix;
///
/// assert_eq!(origin_prefix("https://example.com/a/b"), "https://example.com");
/// assert_eq!(origin_prefix("http://localhost:8080"), "http://localhost:8080");
/// assert_eq!(origin_prefix("www.example.com/x"), "www.example.com");
/// ```
pub fn origin_prefix(origin: &str) -> &str {
    let host_start = origin.find("://").map(|idx| idx + 3).unwrap_or(0);

    match origin[host_start..].find('/') {
        Some(idx) => &origin[..host_start + idx],
        None => origin,
    }
}

/// Derives the file-like name of a page from its URL
///
/// The name is the last path segment, ignoring fragment, query and a trailing
/// slash. A URL with no path at all is named `index`.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::page_name;
///
/// assert_eq!(page_name("http://x.com"), "index");
/// assert_eq!(page_name("http://x.com/test/some_page.html"), "some_page.html");
/// assert_eq!(page_name("www.x.com/today/test"), "test");
/// ```
pub fn page_name(url: &str) -> String {
    let mut trimmed = normalize_href(url);
    if let Some(idx) = trimmed.find('?') {
        trimmed = trimmed[..idx].strip_suffix('/').unwrap_or(&trimmed[..idx]);
    }

    let rest = match trimmed.find("://") {
        Some(idx) => &trimmed[idx + 3..],
        None => trimmed,
    };

    match rest.rfind('/') {
        Some(idx) if idx + 1 < rest.len() => rest[idx + 1..].to_string(),
        _ => "index".to_string(),
    }
}
