//! # Error Types
//!
//! This module defines error types used throughout the pingslip library.
//!
//! None of these are fatal to the event pipeline: image failures degrade to a
//! missing image, lookup failures degrade to "no role match", and transport
//! failures drop the one job that hit them.

use thiserror::Error;

/// Main error type for pingslip operations
#[derive(Debug, Error)]
pub enum PingslipError {
    /// Printer job could not be delivered
    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),

    /// Image download or decode failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Guild membership could not be queried
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Malformed inbound event
    #[error("Event error: {0}")]
    Event(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a print job failed to reach the printer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The connection could not be opened; nothing was sent.
    #[error("could not connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    /// The connection broke (or timed out) part-way through the job.
    #[error("write to {endpoint} failed: {reason}")]
    Write { endpoint: String, reason: String },
}

/// Why an image could not be turned into a bitmap.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode image from {url}: {reason}")]
    Decode { url: String, reason: String },
}
