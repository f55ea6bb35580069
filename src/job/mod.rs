//! # Render Jobs
//!
//! The directive layer between [`crate::receipt`] and [`crate::transport`].
//!
//! ## Example
//!
//! ```
//! use pingslip::job::{Directive, RenderJob};
//! use pingslip::protocol::text::{Alignment, Font, TextStyle};
//!
//! let mut job = RenderJob::new();
//! job.push(Directive::SetStyle(TextStyle::new(Alignment::Left, Font::B, true)));
//! job.push(Directive::Text("# general\n".into()));
//! job.push(Directive::Cut);
//!
//! // Inspect
//! println!("{:#?}", job);
//!
//! // Encode
//! let bytes = job.to_bytes();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

mod codegen;
mod directive;

pub use directive::*;
