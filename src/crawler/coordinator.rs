//! Crawler coordinator - traversal orchestration
//!
//! Drives the fetch, extract, emit, descend cycle. Traversal is strictly
//! sequential and depth-first: a link's whole subtree, including every
//! request it triggers, is finished before its next sibling is emitted.
//!
//! Instead of native recursion the coordinator keeps an explicit stack of
//! links waiting to be emitted. A page's links are pushed in reverse so the
//! first one in document order is popped first; popping a link emits it and,
//! if the depth limit allows, pushes that link's own page links on top. The
//! resulting emission and request order is exactly that of the recursive
//! formulation.

use crate::config::Config;
use crate::crawler::extractor::{LinkExtractor, Scan};
use crate::crawler::tokenizer::{HtmlTokenStream, Token};
use crate::crawler::{build_http_client, fetch_url, FetchResult, Link, PageBody};
use crate::output::{CrawlStats, LinkSink};
use crate::RippleError;
use reqwest::Client;

/// Depth-bounded link crawler
#[derive(Debug, Clone)]
pub struct Crawler {
    config: Config,
    client: Client,
}

impl Crawler {
    /// Creates a crawler, building its HTTP client from the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(RippleError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, RippleError> {
        let client = build_http_client(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a crawler around an existing HTTP client
    pub fn with_client(config: Config, client: Client) -> Self {
        Self { config, client }
    }

    /// The depth limit this crawler enforces
    pub fn max_depth(&self) -> u32 {
        self.config.crawler.max_depth
    }

    /// Crawls from `url`, treating its links as found at `depth`
    ///
    /// Each valid link is handed to `sink` as soon as it is reached. A page
    /// that cannot be fetched is logged and skipped; its siblings and
    /// ancestors carry on. The only error returned is a sink failure.
    ///
    /// Use `depth = 0` for a seed URL.
    pub async fn crawl<S>(
        &self,
        url: &str,
        depth: u32,
        sink: &mut S,
    ) -> Result<CrawlStats, RippleError>
    where
        S: LinkSink + ?Sized,
    {
        let max_depth = self.max_depth();
        let mut stats = CrawlStats::default();
        let mut pending: Vec<Link> = Vec::new();

        tracing::info!("Crawling {} (max depth {})", url, max_depth);
        self.visit(url, depth, &mut pending, &mut stats).await;

        while let Some(link) = pending.pop() {
            sink.emit(&link)?;
            stats.links_emitted += 1;

            let next_depth = link.depth() + 1;
            if next_depth < max_depth {
                self.visit(link.url(), next_depth, &mut pending, &mut stats).await;
            }
        }

        Ok(stats)
    }

    /// Fetches one page and queues its valid links for emission
    async fn visit(
        &self,
        url: &str,
        depth: u32,
        pending: &mut Vec<Link>,
        stats: &mut CrawlStats,
    ) {
        tracing::debug!("Visiting {} at depth {}", url, depth);

        let body = match fetch_url(&self.client, url).await {
            FetchResult::Success { status_code, body } => {
                tracing::trace!("Fetched {} ({})", url, status_code);
                stats.pages_fetched += 1;
                body
            }
            FetchResult::Failure(error) => {
                tracing::error!("{}", error);
                stats.fetch_failures += 1;
                return;
            }
        };

        let (links, malformed) = self.extract(url, depth, body).await;
        stats.malformed_anchors += malformed;

        tracing::debug!("{} valid link(s) on {}", links.len(), url);
        pending.extend(links.into_iter().rev());
    }

    /// Streams a page body through the tokenizer and link extractor
    async fn extract(&self, url: &str, depth: u32, mut body: PageBody) -> (Vec<Link>, u64) {
        let mut tokens = HtmlTokenStream::new();
        let mut extractor = LinkExtractor::new(depth, self.max_depth());

        loop {
            let chunk = match body.next_chunk().await {
                Ok(chunk) => chunk,
                Err(error) => {
                    tracing::warn!("Reading body of {} failed: {}", url, error);
                    extractor.push(Token::Error(error.to_string()));
                    break;
                }
            };

            let at_end = chunk.is_none();
            match chunk {
                Some(bytes) => tokens.feed(&bytes),
                None => tokens.end(),
            }

            if drain(&mut tokens, &mut extractor) == Scan::Done || at_end {
                break;
            }
        }

        let malformed = extractor.malformed_count();
        (extractor.finish(), malformed)
    }
}

/// Moves every ready token into the extractor
fn drain(tokens: &mut HtmlTokenStream, extractor: &mut LinkExtractor) -> Scan {
    while let Some(token) = tokens.next_token() {
        if extractor.push(token) == Scan::Done {
            return Scan::Done;
        }
    }
    Scan::Continue
}
