use crate::config::types::{Config, CrawlConfig, ExportConfig, ExportKind, StrategyKind, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Largest number of concurrent fetch sessions
pub const MAX_SESSIONS: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_export_config(&config.export)?;

    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.failsafe == Some(config.strategy) {
        return Err(ConfigError::Validation(format!(
            "failsafe must differ from the primary strategy, both are {:?}",
            config.strategy
        )));
    }

    if config.uses(StrategyKind::Graph) {
        let index = config.index.as_deref().ok_or_else(|| {
            ConfigError::Validation("the graph strategy needs an index URL".to_string())
        })?;
        validate_index_url(index)?;
    }

    if config.uses(StrategyKind::Sitemap)
        && config.sitemap.as_deref().map_or(true, |s| s.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "the sitemap strategy needs a sitemap path or URL".to_string(),
        ));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch-size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.max_trials < 1 {
        return Err(ConfigError::Validation(format!(
            "max-trials must be >= 1, got {}",
            config.max_trials
        )));
    }

    if config.sessions < 1 || config.sessions > MAX_SESSIONS {
        return Err(ConfigError::Validation(format!(
            "sessions must be between 1 and {}, got {}",
            MAX_SESSIONS, config.sessions
        )));
    }

    Ok(())
}

/// Validates the index URL of a graph crawl
fn validate_index_url(index: &str) -> Result<(), ConfigError> {
    let url = Url::parse(index)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index URL '{}': {}", index, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Index URL '{}' must use HTTP or HTTPS",
            index
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates export configuration
fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    match config.kind {
        ExportKind::Memory => {}
        ExportKind::JsonFiles => {
            if config.directory.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::Validation(
                    "json-files export needs a directory".to_string(),
                ));
            }
        }
        ExportKind::Elasticsearch => {
            let es = config.elasticsearch.as_ref().ok_or_else(|| {
                ConfigError::Validation(
                    "elasticsearch export needs an [export.elasticsearch] table".to_string(),
                )
            })?;

            if es.node.is_empty() || es.index.is_empty() {
                return Err(ConfigError::Validation(
                    "elasticsearch node and index cannot be empty".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
