//! Link validation policy

use crate::crawler::Link;

/// Returns true if a link is worth emitting and following
///
/// A link is rejected when any of these hold:
/// - it was found at or beyond `max_depth`
/// - its text is empty
/// - its URL is empty or mentions `javascript` in any letter case
pub fn is_valid(link: &Link, max_depth: u32) -> bool {
    if link.depth() >= max_depth {
        return false;
    }

    if link.text().trim().is_empty() {
        return false;
    }

    let url = link.url().trim();
    if url.is_empty() || url.to_lowercase().contains("javascript") {
        return false;
    }

    true
}
