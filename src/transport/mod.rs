//! # Printer Transport Layer
//!
//! Delivers a [`RenderJob`] to a printer endpoint.
//!
//! Every job gets its own connection: connect, write `ESC @` and then each
//! directive in order, close. A job that dies half-way never shares a socket
//! with the next one, so the printer's `ESC @` on the next connection puts it
//! back in a known state.
//!
//! ## Available Connectors
//!
//! - [`network`]: raw TCP (port 9100), the normal path
//! - [`memory`]: records writes in memory, for tests and dry runs

pub mod memory;
pub mod network;

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::{Config, Endpoint};
use crate::error::SubmitError;
use crate::job::RenderJob;
use crate::protocol::commands;

pub use memory::MemoryConnector;
pub use network::TcpConnector;

/// A writable byte stream to a printer.
pub type PrinterStream = Box<dyn AsyncWrite + Unpin + Send>;

/// Opens connections to a printer endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<PrinterStream>;
}

/// Sends render jobs to the printer, one fresh connection per job.
pub struct PrinterTransport {
    connector: Box<dyn Connector>,
    write_timeout: Duration,
}

impl PrinterTransport {
    pub fn new(connector: Box<dyn Connector>, write_timeout: Duration) -> Self {
        Self {
            connector,
            write_timeout,
        }
    }

    /// TCP transport using the configured connect and write timeouts.
    pub fn tcp(config: &Config) -> Self {
        Self::new(
            Box::new(TcpConnector::new(config.connect_timeout)),
            config.write_timeout,
        )
    }

    /// Deliver `job` to `endpoint`.
    ///
    /// If the connection cannot be opened nothing is written and
    /// [`SubmitError::Connect`] is returned. A failed or timed-out write
    /// abandons the rest of the job, closes the connection and returns
    /// [`SubmitError::Write`].
    pub async fn submit(&self, job: &RenderJob, endpoint: &Endpoint) -> Result<(), SubmitError> {
        let mut stream =
            self.connector
                .connect(endpoint)
                .await
                .map_err(|e| SubmitError::Connect {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })?;

        debug!("Connected to {}, sending {} directives", endpoint, job.len());

        let result = self.write_job(&mut stream, job).await;
        if let Err(e) = &result {
            warn!("Aborting job to {}: {}", endpoint, e);
        }

        // Close either way; a failed job has already decided the result.
        match timeout(self.write_timeout, stream.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Closing connection to {} failed: {}", endpoint, e),
            Err(_) => debug!("Closing connection to {} timed out", endpoint),
        }

        result.map_err(|e| SubmitError::Write {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    async fn write_job(&self, stream: &mut PrinterStream, job: &RenderJob) -> io::Result<()> {
        self.write_chunk(stream, &commands::init()).await?;
        for directive in job.iter() {
            self.write_chunk(stream, &directive.to_bytes()).await?;
        }
        timeout(self.write_timeout, stream.flush())
            .await
            .map_err(|_| timed_out("flush"))?
    }

    async fn write_chunk(&self, stream: &mut PrinterStream, bytes: &[u8]) -> io::Result<()> {
        timeout(self.write_timeout, stream.write_all(bytes))
            .await
            .map_err(|_| timed_out("write"))?
    }
}

fn timed_out(op: &str) -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, format!("{} timed out", op))
}
