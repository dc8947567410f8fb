use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Strategy: {:?}", config.crawl.strategy);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExportKind, StrategyKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const USER_AGENT: &str = r#"
[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    #[test]
    fn test_load_valid_config() {
        let config_content = format!(
            r#"
[crawl]
strategy = "graph"
failsafe = "sitemap"
index = "https://example.com"
sitemap = "https://example.com/sitemap.xml"
batch-size = 5
max-trials = 2
sessions = 4
ignored = ["*.pdf", "https://example.com/private/*"]

[fetcher]
timeout-secs = 10

[export]
kind = "elasticsearch"

[export.elasticsearch]
node = "localhost"
index = "pages"
{}"#,
            USER_AGENT
        );

        let file = create_temp_config(&config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.strategy, StrategyKind::Graph);
        assert_eq!(config.crawl.failsafe, Some(StrategyKind::Sitemap));
        assert_eq!(config.crawl.batch_size, 5);
        assert_eq!(config.crawl.max_trials, 2);
        assert_eq!(config.crawl.sessions, 4);
        assert_eq!(config.crawl.ignored.len(), 2);
        assert_eq!(config.fetcher.timeout_secs, 10);
        assert_eq!(config.export.kind, ExportKind::Elasticsearch);

        let es = config.export.elasticsearch.unwrap();
        assert_eq!(es.port, 9200);
        assert_eq!(es.index, "pages");
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
    }

    #[test]
    fn test_defaults() {
        let config_content = format!(
            r#"
[crawl]
strategy = "graph"
index = "https://example.com"

[export]
kind = "memory"
{}"#,
            USER_AGENT
        );

        let config = parse_config(&config_content).unwrap();
        assert_eq!(config.crawl.batch_size, 10);
        assert_eq!(config.crawl.max_trials, 3);
        assert_eq!(config.crawl.sessions, 1);
        assert!(config.crawl.failsafe.is_none());
        assert!(config.crawl.ignored.is_empty());
        assert_eq!(config.fetcher.timeout_secs, 30);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_strategy_is_parse_error() {
        let config_content = format!(
            r#"
[crawl]
strategy = "random"

[export]
kind = "memory"
{}"#,
            USER_AGENT
        );
        assert!(matches!(
            parse_config(&config_content),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = format!(
            r#"
[crawl]
strategy = "sitemap"
batch-size = 0
sitemap = "sitemap.xml"

[export]
kind = "memory"
{}"#,
            USER_AGENT
        );

        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
