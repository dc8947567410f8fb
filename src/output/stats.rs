//! Statistics of a crawl session
//!
//! Statistics are collected by `CountingObserver` while strategies run and
//! printed by the CLI once the crawl is over.

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When collection started
    pub started_at: DateTime<Utc>,

    /// When this snapshot of the statistics was taken
    pub finished_at: DateTime<Utc>,

    /// Runs started by traversal engines, retries and failsafe included
    pub runs_started: usize,

    /// Runs that ended with a fault
    pub runs_failed: usize,

    /// Pages fetched and snapshotted
    pub pages_fetched: usize,

    /// URLs skipped because of an ignored pattern
    pub pages_ignored: usize,

    /// Outbound links found on fetched pages
    pub links_found: usize,

    /// Pages handed to the repository
    pub pages_exported: usize,

    /// Calls made to the repository
    pub batches_exported: usize,

    /// Retries after a fetch fault
    pub retries: usize,

    /// Switches to a failsafe strategy
    pub failovers: usize,

    /// Message of the last fault, if any
    pub last_error: Option<String>,
}

impl CrawlStatistics {
    /// Duration of the session in whole seconds
    pub fn duration_seconds(&self) -> u64 {
        (self.finished_at - self.started_at).num_seconds().max(0) as u64
    }

    /// Pages fetched per second
    pub fn pages_per_second(&self) -> f64 {
        let millis = (self.finished_at - self.started_at).num_milliseconds();
        if millis <= 0 {
            return 0.0;
        }
        self.pages_fetched as f64 * 1000.0 / millis as f64
    }

    /// Share of fetched pages that reached the repository, as a percentage
    pub fn export_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            return 0.0;
        }
        (self.pages_exported as f64 / self.pages_fetched as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Session:");
    println!("  Started: {}", stats.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Duration: {}s", stats.duration_seconds());
    println!(
        "  Runs: {} started, {} failed",
        stats.runs_started, stats.runs_failed
    );
    println!();

    println!("Pages:");
    println!(
        "  Fetched: {} ({:.2} pages/sec)",
        stats.pages_fetched,
        stats.pages_per_second()
    );
    println!("  Ignored: {}", stats.pages_ignored);
    println!("  Links found: {}", stats.links_found);
    println!();

    println!("Export:");
    println!(
        "  Pages exported: {} in {} batches",
        stats.pages_exported, stats.batches_exported
    );
    println!();

    if stats.retries > 0 || stats.failovers > 0 {
        println!("Recovery:");
        println!("  Retries: {}", stats.retries);
        println!("  Failovers: {}", stats.failovers);
        println!();
    }

    if let Some(error) = &stats.last_error {
        println!("Last error: {}", error);
        println!();
    }

    println!(
        "Export Rate: {:.1}% ({} / {} pages exported)",
        stats.export_rate(),
        stats.pages_exported,
        stats.pages_fetched
    );
}
