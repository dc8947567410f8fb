use serde::Deserialize;

/// Main configuration structure for Sumi-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub export: ExportConfig,
}

/// Traversal strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Follow links starting from the index page
    Graph,
    /// Visit the URLs listed in a sitemap
    Sitemap,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Strategy used for the crawl
    pub strategy: StrategyKind,

    /// Strategy run instead when the primary one hits a fetch fault
    #[serde(default)]
    pub failsafe: Option<StrategyKind>,

    /// Index page of the site, required by the graph strategy
    #[serde(default)]
    pub index: Option<String>,

    /// Sitemap path or URL, required by the sitemap strategy
    #[serde(default)]
    pub sitemap: Option<String>,

    /// Number of pages exported together
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of attempts before a crawl is given up
    #[serde(rename = "max-trials", default = "default_max_trials")]
    pub max_trials: u32,

    /// Number of concurrent fetch sessions for the graph strategy
    #[serde(default = "default_sessions")]
    pub sessions: usize,

    /// URL patterns that are never crawled
    #[serde(default)]
    pub ignored: Vec<String>,
}

impl CrawlConfig {
    /// Returns true if the given strategy is used, as primary or as failsafe
    pub fn uses(&self, kind: StrategyKind) -> bool {
        self.strategy == kind || self.failsafe == Some(kind)
    }
}

fn default_batch_size() -> usize {
    10
}

fn default_max_trials() -> u32 {
    3
}

fn default_sessions() -> usize {
    1
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_harvest::config::UserAgentConfig;
    ///
    /// let config = UserAgentConfig {
    ///     crawler_name: "SumiHarvest".to_string(),
    ///     crawler_version: "1.0".to_string(),
    ///     contact_url: "https://example.com/about".to_string(),
    ///     contact_email: "admin@example.com".to_string(),
    /// };
    /// assert_eq!(
    ///     config.user_agent_string(),
    ///     "SumiHarvest/1.0 (+https://example.com/about; admin@example.com)"
    /// );
    /// ```
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Total time allowed for one page request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Repository selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    /// Keep pages in memory
    Memory,
    /// One JSON file per page
    JsonFiles,
    /// Elasticsearch bulk API
    Elasticsearch,
}

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Repository receiving the pages
    pub kind: ExportKind,

    /// Target directory for JSON files
    #[serde(default)]
    pub directory: Option<String>,

    /// Target index for Elasticsearch
    #[serde(default)]
    pub elasticsearch: Option<ElasticSearchConfig>,
}

/// Elasticsearch index location
#[derive(Debug, Clone, Deserialize)]
pub struct ElasticSearchConfig {
    /// Host name of the node
    pub node: String,

    /// HTTP port of the node
    #[serde(default = "default_elasticsearch_port")]
    pub port: u16,

    /// Name of the index
    pub index: String,
}

fn default_elasticsearch_port() -> u16 {
    9200
}
