use serde::Deserialize;

/// Default traversal depth limit
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Main configuration structure for Link-Ripple
///
/// Every section and field has a default, so an empty file (or no file at
/// all) yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Links discovered at this depth or deeper are discarded
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Total time allowed for a single request (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Maximum number of redirects followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler (optional)
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,

    /// Email address for crawler-related contact (optional)
    #[serde(rename = "contact-email", default)]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// `Name/Version`, followed by ` (+ContactURL; ContactEmail)` when any
    /// contact detail is configured.
    pub fn user_agent_string(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);

        match (self.contact_url.is_empty(), self.contact_email.is_empty()) {
            (true, true) => base,
            (false, true) => format!("{} (+{})", base, self.contact_url),
            (true, false) => format!("{} ({})", base, self.contact_email),
            (false, false) => format!("{} (+{}; {})", base, self.contact_url, self.contact_email),
        }
    }
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

fn default_crawler_name() -> String {
    "LinkRipple".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
