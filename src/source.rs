//! # Event Source
//!
//! Reads [`MessageEvent`]s as newline-delimited JSON, from a file or stdin.
//! This is the seam to the chat-client process: it owns the platform session
//! and writes one resolved event per line. Blank lines are ignored and
//! malformed lines are logged and skipped, so one bad event never ends the
//! stream.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::warn;

use crate::error::PingslipError;
use crate::event::MessageEvent;

/// Boxed line source, so files and stdin share one reader type.
pub type LineSource = Box<dyn AsyncBufRead + Unpin + Send>;

pub struct EventReader<R> {
    lines: Lines<R>,
    line_no: usize,
    skipped: usize,
}

impl EventReader<LineSource> {
    /// Open `path`, or stdin when `path` is `None` or `-`.
    pub async fn open(path: Option<&Path>) -> Result<Self, PingslipError> {
        let source: LineSource = match path {
            Some(p) if p != Path::new("-") => {
                let file = File::open(p).await.map_err(|e| {
                    PingslipError::Config(format!("cannot open {}: {}", p.display(), e))
                })?;
                Box::new(BufReader::new(file))
            }
            _ => Box::new(BufReader::new(io::stdin())),
        };
        Ok(Self::new(source))
    }
}

impl<R: AsyncBufRead + Unpin> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// The next well-formed event, or `None` at end of input.
    pub async fn next_event(&mut self) -> Result<Option<MessageEvent>, PingslipError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match MessageEvent::from_json(line) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => {
                    warn!(line = self.line_no, "skipping malformed event: {}", e);
                    self.skipped += 1;
                }
            }
        }
        Ok(None)
    }

    /// Lines that could not be parsed so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
