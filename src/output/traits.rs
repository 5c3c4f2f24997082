//! Output sink trait and error types
//!
//! A sink receives each valid link the moment the traversal engine
//! discovers it.

use crate::crawler::Link;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives discovered links in pre-order
pub trait LinkSink {
    /// Records one valid link
    fn emit(&mut self, link: &Link) -> OutputResult<()>;
}

/// Collects links in memory
impl LinkSink for Vec<Link> {
    fn emit(&mut self, link: &Link) -> OutputResult<()> {
        self.push(link.clone());
        Ok(())
    }
}

/// Writes one line per link using the link's display form
///
/// The writer is flushed after every line so output appears as links are
/// discovered.
#[derive(Debug)]
pub struct LineWriter<W: Write> {
    writer: W,
}

impl<W: Write> LineWriter<W> {
    /// Wraps a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineWriter<std::io::Stdout> {
    /// Line writer over standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> LinkSink for LineWriter<W> {
    fn emit(&mut self, link: &Link) -> OutputResult<()> {
        writeln!(self.writer, "{}", link)?;
        self.writer.flush()?;
        Ok(())
    }
}
