//! Discovered link records

use std::fmt;

/// One anchor discovered during a crawl
///
/// Fields are private so a link cannot change after the extractor builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    url: String,
    text: String,
    depth: u32,
}

impl Link {
    /// Creates a link, trimming surrounding whitespace from `url` and `text`
    pub fn new(url: &str, text: &str, depth: u32) -> Self {
        Self {
            url: url.trim().to_string(),
            text: text.trim().to_string(),
            depth,
        }
    }

    /// The raw `href` value (may be relative or empty)
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The anchor's text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Depth at which the link was discovered (0 = the seed page)
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Formats as `<tabs><text> (<depth>) - <url>`, one tab per depth level
impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_str("\t")?;
        }
        write!(f, "{} ({}) - {}", self.text, self.depth, self.url)
    }
}
