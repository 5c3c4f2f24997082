//! Output module for reporting discovered links
//!
//! This module handles:
//! - Writing each valid link as it is discovered
//! - Recording crawl statistics

pub mod stats;
mod traits;

pub use stats::{log_statistics, CrawlStats};
pub use traits::{LineWriter, LinkSink, OutputError, OutputResult};
