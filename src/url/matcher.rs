use regex::Regex;

/// URL patterns that should not be crawled
///
/// Every pattern is tried in three ways, in this order:
/// 1. Exact match, ignoring case: `"https://example.com/login"`
/// 2. Asterisk match: `"*.pdf"`, `"https://example.com/*/2016/04/*"`
/// 3. Regular expression matching the whole URL: `".*\\?print=1"`
///
/// A URL is ignored as soon as one pattern matches it in any of these ways,
/// so the order of the patterns never changes the outcome.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::IgnoredPatterns;
///
/// let ignored = IgnoredPatterns::new(["*.pdf", "https://example.com/private/*"]);
/// assert!(ignored.contains("https://example.com/files/report.pdf"));
/// assert!(ignored.contains("https://example.com/private/notes"));
/// assert!(!ignored.contains("https://example.com/blog"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IgnoredPatterns {
    patterns: Vec<IgnoredPattern>,
}

#[derive(Debug, Clone)]
struct IgnoredPattern {
    /// Trimmed pattern text
    text: String,

    /// Lowercased copy used for the exact comparison
    lowered: String,

    /// Anchored regex, if the pattern compiles as one
    regex: Option<Regex>,
}

impl IgnoredPattern {
    fn new(pattern: &str) -> Self {
        let text = pattern.trim().to_string();
        let regex = match Regex::new(&format!("^(?:{})$", text)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::debug!("Ignored pattern '{}' is not a valid regex: {}", text, e);
                None
            }
        };

        Self {
            lowered: text.to_lowercase(),
            text,
            regex,
        }
    }

    fn matches(&self, url: &str) -> bool {
        self.lowered == url.to_lowercase()
            || matches_asterisk(&self.text, url)
            || self.regex.as_ref().is_some_and(|regex| regex.is_match(url))
    }
}

impl IgnoredPatterns {
    /// Creates a matcher from the given patterns
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| IgnoredPattern::new(p.as_ref()))
                .collect(),
        }
    }

    /// Checks whether the given URL should be ignored
    pub fn contains(&self, url: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(url))
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if there are no patterns at all
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The trimmed pattern strings, in their original order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.text.as_str())
    }
}

/// Checks a URL against a pattern where `*` stands for any text
///
/// The pattern is split on `*`; every non-empty part must occur in the URL,
/// and the first occurrence of each part may not come before the first
/// occurrence of any earlier part. Occurrences may overlap. Empty parts, from
/// leading, trailing or repeated `*`, are skipped, so `**` acts as `*`. A
/// pattern without `*` never matches here.
fn matches_asterisk(pattern: &str, url: &str) -> bool {
    if !pattern.contains('*') {
        return false;
    }

    let mut last_index = 0;
    for part in pattern.split('*').filter(|part| !part.is_empty()) {
        match url.find(part) {
            Some(index) if index >= last_index => last_index = index,
            _ => return false,
        }
    }

    true
}
