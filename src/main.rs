//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest site snapshot harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sumi_harvest::config::{load_config, Config, ExportKind, StrategyKind};
use sumi_harvest::crawler::{build_repository, build_strategy, CountingObserver};
use sumi_harvest::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a site snapshot harvester
///
/// Sumi-Harvest crawls one website, following its links or the URLs of its
/// sitemap, and exports a snapshot of every page in batches to memory, JSON
/// files or an Elasticsearch index.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A site snapshot harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully");

    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn strategy_name(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Graph => "graph",
        StrategyKind::Sitemap => "sitemap",
    }
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Harvest Dry Run ===\n");

    println!("Crawl Configuration:");
    println!("  Strategy: {}", strategy_name(config.crawl.strategy));
    if let Some(failsafe) = config.crawl.failsafe {
        println!("  Failsafe: {}", strategy_name(failsafe));
    }
    if let Some(index) = &config.crawl.index {
        println!("  Index: {}", index);
    }
    if let Some(sitemap) = &config.crawl.sitemap {
        println!("  Sitemap: {}", sitemap);
    }
    println!("  Batch size: {}", config.crawl.batch_size);
    println!("  Max trials: {}", config.crawl.max_trials);
    println!("  Sessions: {}", config.crawl.sessions);

    println!("\nIgnored Patterns ({}):", config.crawl.ignored.len());
    for pattern in &config.crawl.ignored {
        println!("  - {}", pattern.trim());
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent_string());
    println!("  Timeout: {}s", config.fetcher.timeout_secs);

    println!("\nExport:");
    match config.export.kind {
        ExportKind::Memory => println!("  In memory"),
        ExportKind::JsonFiles => println!(
            "  JSON files in {}",
            config.export.directory.as_deref().unwrap_or_default()
        ),
        ExportKind::Elasticsearch => {
            if let Some(es) = &config.export.elasticsearch {
                println!("  Elasticsearch index http://{}:{}/{}", es.node, es.port, es.index);
            }
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let repository = build_repository(&config.export)?;
    let observer = Arc::new(CountingObserver::new());

    let strategy = build_strategy(config, repository, observer.clone())
        .await
        .context("Failed to prepare the crawl")?;

    let outcome = strategy.crawl().await;
    print_statistics(&observer.statistics());

    match outcome {
        Ok(report) => {
            tracing::info!(
                "Crawl completed successfully: {} pages in {} batches",
                report.pages_crawled,
                report.batches_exported
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
