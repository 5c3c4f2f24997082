//! Crawl statistics
//!
//! Counters gathered while the traversal runs. They are logged when the
//! crawl finishes; standard output only ever carries link lines.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched successfully (including ones whose body read failed midway)
    pub pages_fetched: u64,

    /// Fetches that failed at transport level or with a status above 299
    pub fetch_failures: u64,

    /// Valid links written to the sink
    pub links_emitted: u64,

    /// Unmatched closing anchor tags seen across all pages
    pub malformed_anchors: u64,
}

impl CrawlStats {
    /// Total fetch attempts
    pub fn pages_attempted(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }

    /// Share of fetch attempts that failed, as a percentage
    pub fn failure_rate(&self) -> f64 {
        let attempted = self.pages_attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.fetch_failures as f64 / attempted as f64) * 100.0
    }
}

/// Logs a statistics summary at info level
pub fn log_statistics(stats: &CrawlStats, elapsed: Duration) {
    tracing::info!(
        "Crawl finished in {:.2}s: {} links, {} pages fetched, {} failed ({:.1}%)",
        elapsed.as_secs_f64(),
        stats.links_emitted,
        stats.pages_fetched,
        stats.fetch_failures,
        stats.failure_rate()
    );

    if stats.malformed_anchors > 0 {
        tracing::warn!(
            "{} unmatched closing anchor tag(s) skipped",
            stats.malformed_anchors
        );
    }
}
