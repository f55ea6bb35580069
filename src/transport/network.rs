//! Raw TCP connections to network receipt printers.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{Connector, PrinterStream};
use crate::config::Endpoint;

/// Connects with [`TcpStream`], giving up after `connect_timeout`.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Duration,
}

impl TcpConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<PrinterStream> {
        let addr = (endpoint.host.as_str(), endpoint.port);
        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect timed out after {:?}", self.connect_timeout),
                )
            })??;
        // Receipts are written in a handful of large chunks; don't hold them back.
        stream.set_nodelay(true)?;
        Ok(Box::new(stream))
    }
}
