//! # Pingslip - Chat Mentions on a Receipt Printer
//!
//! Pingslip watches a stream of chat messages and prints the ones that concern
//! a single monitored user on a network thermal printer. It provides:
//!
//! - **Relevance filter**: direct messages, user/role/broadcast mentions, replies
//! - **Receipt rendering**: header, avatar, author line, wrapped body, images
//! - **Image processing**: HTTP download, grayscale, Lanczos resize, dithering
//! - **Transport**: ESC/POS over raw TCP, one connection per receipt
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pingslip::{
//!     Config, HttpImageFetcher, Pipeline, PrinterTransport, ReceiptRenderer,
//!     RelevanceFilter, StaticMembership, event::{MessageEvent, UserId},
//! };
//!
//! # async fn demo(line: &str) -> Result<(), pingslip::PingslipError> {
//! let config = Config {
//!     monitored_user: UserId(99),
//!     printer: "192.168.1.50:9100".parse()?,
//!     ..Config::default()
//! };
//!
//! let pipeline = Pipeline::new(
//!     &config,
//!     RelevanceFilter::new(config.monitored_user, Arc::new(StaticMembership::new())),
//!     ReceiptRenderer::new(&config, Arc::new(HttpImageFetcher::new(&config)?)),
//!     PrinterTransport::tcp(&config),
//! );
//!
//! let event = MessageEvent::from_json(line).map_err(|e| pingslip::PingslipError::Event(e.to_string()))?;
//! pipeline.process(event).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`event`] | Message event snapshot |
//! | [`filter`] | Relevance filter and membership lookup |
//! | [`layout`] | Word wrapping |
//! | [`render`] | Image download, resize and dithering |
//! | [`receipt`] | Receipt components and renderer |
//! | [`job`] | Print directives and their byte encoding |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Printer connections |
//! | [`pipeline`] | Filter, render, submit |
//! | [`source`] | JSON-lines event input |
//! | [`config`] | Runtime configuration |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod job;
pub mod layout;
pub mod pipeline;
pub mod protocol;
pub mod receipt;
pub mod render;
pub mod source;
pub mod transport;

// Re-exports for convenience
pub use config::Config;
pub use error::PingslipError;
pub use filter::{RelevanceFilter, StaticMembership};
pub use pipeline::Pipeline;
pub use receipt::ReceiptRenderer;
pub use render::HttpImageFetcher;
pub use transport::PrinterTransport;
