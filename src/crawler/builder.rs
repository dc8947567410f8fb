//! Strategy wiring from configuration
//!
//! Turns a validated [`Config`] into a ready-to-run strategy stack:
//!
//! ```text
//! SwitchableCrawl (only with a failsafe)
//! ├── RetriableCrawl ── GraphCrawl | ParallelGraphCrawl | SitemapCrawl (staged)
//! └── RetriableCrawl ── failsafe engine
//! ```
//!
//! Sitemaps are loaded here, so a missing or malformed sitemap is reported
//! before any page is crawled.

use crate::config::{Config, ExportConfig, ExportKind, StrategyKind};
use crate::crawler::{
    CrawlObserver, CrawlStrategy, GraphCrawl, ParallelGraphCrawl, RetriableCrawl, SitemapCrawl,
    SwitchableCrawl,
};
use crate::fetcher::{build_http_client, HttpPageFetcher, PageFetcher};
use crate::repository::{
    ElasticSearchIndex, ElasticSearchRepository, InMemoryRepository, JsonFilesRepository,
    Repository, StagingRepository,
};
use crate::sitemap::Sitemap;
use crate::url::IgnoredPatterns;
use crate::{ConfigError, HarvestError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Creates the repository selected by the export configuration
pub fn build_repository(config: &ExportConfig) -> Result<Arc<dyn Repository>, HarvestError> {
    let repository: Arc<dyn Repository> = match config.kind {
        ExportKind::Memory => Arc::new(InMemoryRepository::new()),
        ExportKind::JsonFiles => {
            let directory = config.directory.as_deref().ok_or_else(|| {
                ConfigError::Validation("json-files export needs a directory".to_string())
            })?;
            Arc::new(JsonFilesRepository::new(directory))
        }
        ExportKind::Elasticsearch => {
            let es = config.elasticsearch.as_ref().ok_or_else(|| {
                ConfigError::Validation(
                    "elasticsearch export needs an [export.elasticsearch] table".to_string(),
                )
            })?;
            Arc::new(ElasticSearchRepository::new(ElasticSearchIndex::new(
                es.node.as_str(),
                es.port,
                es.index.as_str(),
            )))
        }
    };
    Ok(repository)
}

/// Builds the strategy stack described by the configuration
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `repository` - Where every engine exports its pages
/// * `observer` - Receives the events of every layer
///
/// # Returns
///
/// * `Ok(Box<dyn CrawlStrategy>)` - The strategy to run
/// * `Err(HarvestError)` - The HTTP client could not be built, or a sitemap
///   could not be loaded
pub async fn build_strategy(
    config: &Config,
    repository: Arc<dyn Repository>,
    observer: Arc<dyn CrawlObserver>,
) -> Result<Box<dyn CrawlStrategy>, HarvestError> {
    let client = build_http_client(
        &config.user_agent,
        Duration::from_secs(config.fetcher.timeout_secs),
    )?;
    let ignored = IgnoredPatterns::new(&config.crawl.ignored);

    let Some(failsafe_kind) = config.crawl.failsafe else {
        return build_engine(
            config.crawl.strategy,
            config,
            &client,
            &ignored,
            repository,
            observer,
        )
        .await;
    };

    // the primary exports only once it has finished without a fetch fault
    let staging = Arc::new(StagingRepository::new(repository.clone()));
    let primary = build_engine(
        config.crawl.strategy,
        config,
        &client,
        &ignored,
        staging.clone(),
        observer.clone(),
    )
    .await?;

    let failsafe = build_engine(
        failsafe_kind,
        config,
        &client,
        &ignored,
        repository,
        observer.clone(),
    )
    .await?;

    Ok(Box::new(
        SwitchableCrawl::new(primary, failsafe, staging).with_observer(observer),
    ))
}

/// Builds one traversal engine wrapped in its retry layer
async fn build_engine(
    kind: StrategyKind,
    config: &Config,
    client: &Client,
    ignored: &IgnoredPatterns,
    repository: Arc<dyn Repository>,
    observer: Arc<dyn CrawlObserver>,
) -> Result<Box<dyn CrawlStrategy>, HarvestError> {
    let batch_size = config.crawl.batch_size;

    let engine: Box<dyn CrawlStrategy> = match kind {
        StrategyKind::Graph => {
            let index = config.crawl.index.as_deref().ok_or_else(|| {
                ConfigError::Validation("the graph strategy needs an index URL".to_string())
            })?;

            if config.crawl.sessions > 1 {
                let sessions: Vec<Arc<dyn PageFetcher>> = (0..config.crawl.sessions)
                    .map(|_| Arc::new(HttpPageFetcher::new(client.clone())) as Arc<dyn PageFetcher>)
                    .collect();
                Box::new(
                    ParallelGraphCrawl::new(index, sessions, ignored.clone(), repository, batch_size)
                        .with_observer(observer.clone()),
                )
            } else {
                Box::new(
                    GraphCrawl::new(
                        index,
                        Arc::new(HttpPageFetcher::new(client.clone())),
                        ignored.clone(),
                        repository,
                        batch_size,
                    )
                    .with_observer(observer.clone()),
                )
            }
        }
        StrategyKind::Sitemap => {
            let location = config.crawl.sitemap.as_deref().ok_or_else(|| {
                ConfigError::Validation("the sitemap strategy needs a sitemap".to_string())
            })?;

            tracing::info!("Loading sitemap from {}", location);
            let sitemap = Sitemap::load(client, location).await?;
            tracing::info!("Sitemap lists {} pages", sitemap.len());

            Box::new(
                SitemapCrawl::new(
                    sitemap,
                    Arc::new(HttpPageFetcher::new(client.clone())),
                    ignored.clone(),
                    repository,
                    batch_size,
                )
                .with_observer(observer.clone()),
            )
        }
    };

    Ok(Box::new(
        RetriableCrawl::with_trials(engine, config.crawl.max_trials).with_observer(observer),
    ))
}
