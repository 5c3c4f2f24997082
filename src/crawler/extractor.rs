//! Anchor extraction state machine
//!
//! Rebuilds `<a href=...>text</a>` elements from a flat token stream. The
//! extractor never looks back: each token moves it between two states and
//! completed anchors that pass validation are collected in document order.
//!
//! Malformed markup is handled leniently:
//! - a second `<a>` before `</a>` replaces the first (last open tag wins)
//! - a `</a>` with no open anchor is logged, counted and skipped
//! - a self-closing `<a ... />` is ignored, so its `</a>` is unmatched

use crate::crawler::tokenizer::{tokenize, Token};
use crate::crawler::{is_valid, Link};

/// Where the extractor is relative to an anchor element
#[derive(Debug, Clone, PartialEq, Eq)]
enum AnchorState {
    Idle,
    InsideAnchor { href: String, text: String },
    Finished,
}

/// Whether the extractor wants more tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Continue,
    Done,
}

/// Streaming link extractor for one page
#[derive(Debug)]
pub struct LinkExtractor {
    depth: u32,
    max_depth: u32,
    state: AnchorState,
    links: Vec<Link>,
    malformed: u64,
}

impl LinkExtractor {
    /// Creates an extractor for a page fetched at `depth`
    pub fn new(depth: u32, max_depth: u32) -> Self {
        Self {
            depth,
            max_depth,
            state: AnchorState::Idle,
            links: Vec::new(),
            malformed: 0,
        }
    }

    /// Advances the state machine by one token
    pub fn push(&mut self, token: Token) -> Scan {
        if self.state == AnchorState::Finished {
            return Scan::Done;
        }

        match token {
            Token::StartTag { name, attrs } if name == "a" && !attrs.is_empty() => {
                if matches!(self.state, AnchorState::InsideAnchor { .. }) {
                    tracing::debug!("Nested anchor start, replacing the open anchor");
                }

                let href = attrs
                    .into_iter()
                    .find(|(key, _)| key == "href")
                    .map(|(_, value)| value)
                    .unwrap_or_default();

                self.state = AnchorState::InsideAnchor {
                    href,
                    text: String::new(),
                };
            }
            Token::Text(chunk) => {
                if let AnchorState::InsideAnchor { text, .. } = &mut self.state {
                    text.push_str(&chunk);
                }
            }
            Token::EndTag { name } if name == "a" => self.close_anchor(),
            // `<a ... />` never opens an anchor
            Token::SelfClosingTag { .. } => {}
            Token::Eof => {
                self.state = AnchorState::Finished;
                return Scan::Done;
            }
            Token::Error(message) => {
                tracing::debug!("Token stream ended with error: {}", message);
                self.state = AnchorState::Finished;
                return Scan::Done;
            }
            _ => {}
        }

        Scan::Continue
    }

    fn close_anchor(&mut self) {
        match std::mem::replace(&mut self.state, AnchorState::Idle) {
            AnchorState::InsideAnchor { href, text } => {
                let link = Link::new(&href, &text, self.depth);
                if is_valid(&link, self.max_depth) {
                    tracing::debug!("Link found: {:?}", link);
                    self.links.push(link);
                } else {
                    tracing::trace!("Link rejected: {:?}", link);
                }
            }
            _ => {
                self.malformed += 1;
                tracing::warn!("Link end found without start (depth {})", self.depth);
            }
        }
    }

    /// Number of unmatched `</a>` tags seen so far
    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }

    /// Consumes the extractor, returning the valid links in document order
    pub fn finish(self) -> Vec<Link> {
        self.links
    }
}

/// Extracts valid links from a token sequence
///
/// Stops at the first [`Token::Eof`] or [`Token::Error`].
pub fn extract_links<I>(tokens: I, depth: u32, max_depth: u32) -> Vec<Link>
where
    I: IntoIterator<Item = Token>,
{
    let mut extractor = LinkExtractor::new(depth, max_depth);
    for token in tokens {
        if extractor.push(token) == Scan::Done {
            break;
        }
    }
    extractor.finish()
}

/// Extracts valid links from a complete HTML document
pub fn extract_links_from_html(html: &str, depth: u32, max_depth: u32) -> Vec<Link> {
    extract_links(tokenize(html), depth, max_depth)
}
