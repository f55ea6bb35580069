//! In-memory connector.
//!
//! Records every connection and write instead of talking to a printer.
//! Used by tests and by `--dry-run`.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use super::{Connector, PrinterStream};
use crate::config::Endpoint;

/// What one connection received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedConnection {
    pub endpoint: String,
    pub bytes: Vec<u8>,
    /// Number of successful `poll_write` calls.
    pub writes: usize,
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
enum Mode {
    #[default]
    Accept,
    Refuse,
    FailAfter(usize),
    Stall,
}

#[derive(Debug, Default)]
struct State {
    mode: Mode,
    connections: Vec<RecordedConnection>,
    open: usize,
    peak_open: usize,
}

/// A [`Connector`] whose connections write into shared memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<State>>,
}

impl MemoryConnector {
    /// Accepts every connection and every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses every connection, like a printer that is switched off.
    pub fn refusing() -> Self {
        Self::with_mode(Mode::Refuse)
    }

    /// Accepts connections, but each one breaks after `n` writes.
    pub fn failing_after(n: usize) -> Self {
        Self::with_mode(Mode::FailAfter(n))
    }

    /// Accepts connections that never accept a byte.
    pub fn stalling() -> Self {
        Self::with_mode(Mode::Stall)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                mode,
                ..Default::default()
            })),
        }
    }

    pub fn connections(&self) -> Vec<RecordedConnection> {
        lock(&self.state).connections.clone()
    }

    /// Most connections that were ever open at the same time.
    pub fn peak_open(&self) -> usize {
        lock(&self.state).peak_open
    }

    /// Successful writes across all connections.
    pub fn write_count(&self) -> usize {
        lock(&self.state).connections.iter().map(|c| c.writes).sum()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<PrinterStream> {
        let mut state = lock(&self.state);
        if let Mode::Refuse = state.mode {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        state.connections.push(RecordedConnection {
            endpoint: endpoint.to_string(),
            ..Default::default()
        });
        state.open += 1;
        state.peak_open = state.peak_open.max(state.open);
        Ok(Box::new(MemoryStream {
            state: Arc::clone(&self.state),
            index: state.connections.len() - 1,
            mode: state.mode,
        }))
    }
}

struct MemoryStream {
    state: Arc<Mutex<State>>,
    index: usize,
    mode: Mode,
}

impl AsyncWrite for MemoryStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut state = lock(&self.state);
        let conn = &mut state.connections[self.index];
        match self.mode {
            Mode::Stall => Poll::Pending,
            Mode::FailAfter(n) if conn.writes >= n => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "connection reset by printer",
            ))),
            _ => {
                conn.bytes.extend_from_slice(buf);
                conn.writes += 1;
                Poll::Ready(Ok(buf.len()))
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let mut state = lock(&self.state);
        if !state.connections[self.index].closed {
            state.connections[self.index].closed = true;
            state.open -= 1;
        }
        Poll::Ready(Ok(()))
    }
}

// Ignore poisoning so one failed assertion doesn't cascade.
fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
