//! Crawler module for link discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with transport/status failure classification
//! - Incremental HTML tokenizing and anchor extraction
//! - Link validation
//! - Depth-first traversal coordination

mod coordinator;
mod extractor;
mod fetcher;
mod link;
mod tokenizer;
mod validator;

pub use coordinator::Crawler;
pub use extractor::{extract_links, extract_links_from_html, LinkExtractor, Scan};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchResult, PageBody};
pub use link::Link;
pub use tokenizer::{tokenize, HtmlTokenStream, Token};
pub use validator::is_valid;

use crate::config::Config;
use crate::output::{log_statistics, CrawlStats, LineWriter};
use crate::RippleError;

/// Runs a complete crawl from one seed URL
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the seed page and extract its links at depth 0
/// 3. Print each valid link to standard output as it is discovered
/// 4. Follow links depth-first until the configured depth limit
/// 5. Log summary statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL to start from
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed (individual pages may have failed)
/// * `Err(RippleError)` - The client could not be built or stdout failed
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlStats, RippleError> {
    let start_time = std::time::Instant::now();

    let crawler = Crawler::new(config)?;
    let mut sink = LineWriter::stdout();
    let stats = crawler.crawl(seed, 0, &mut sink).await?;

    log_statistics(&stats, start_time.elapsed());
    Ok(stats)
}
