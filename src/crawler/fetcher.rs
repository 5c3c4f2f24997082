//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests whose bodies are read incrementally
//! - Error classification into transport and status failures

use crate::config::Config;
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use thiserror::Error;

/// Why a fetch produced no usable page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// DNS, connection, TLS, timeout or malformed URL
    #[error("{0}")]
    Transport(String),

    /// The server answered with a status above 299
    #[error("Error ({status}): {url}")]
    HttpStatus { status: u16, url: String },
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page headers; the body is still unread
    Success {
        /// HTTP status code
        status_code: u16,
        /// Streaming page body
        body: PageBody,
    },

    /// The page could not be fetched
    Failure(FetchError),
}

/// Response body, read one chunk at a time
#[derive(Debug)]
pub struct PageBody {
    response: Response,
}

impl PageBody {
    /// Reads the next chunk of the body; `Ok(None)` at end of stream
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        self.response
            .chunk()
            .await
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent, timeouts, redirects)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_ripple::config::Config;
/// use link_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let crawler = &config.crawler;

    // With no redirects allowed, a 3xx is returned as-is and reported as a status failure
    let redirect = if crawler.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(crawler.max_redirects)
    };

    Client::builder()
        .user_agent(config.user_agent.user_agent_string())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, classifying the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | Status <= 299 | `Success` with the unread body |
/// | Status > 299 | `Failure(HttpStatus)` |
/// | Connection refused, DNS, TLS, timeout | `Failure(Transport)` |
/// | Unparseable or relative URL | `Failure(Transport)` |
///
/// There are no retries; one failed attempt is final.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    tracing::debug!("Downloading {}", url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Transport error for {}: {}", url, e);
            return FetchResult::Failure(FetchError::Transport(e.to_string()));
        }
    };

    let status_code = response.status().as_u16();
    if status_code > 299 {
        let error = FetchError::HttpStatus {
            status: status_code,
            url: url.to_string(),
        };
        tracing::debug!("{}", error);
        return FetchResult::Failure(error);
    }

    FetchResult::Success {
        status_code,
        body: PageBody { response },
    }
}
