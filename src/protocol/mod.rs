//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for ESC/POS receipt printers reached over a
//! raw TCP socket.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, feed, cut)
//! - [`text`]: Alignment, font and emphasis
//! - [`graphics`]: Raster bit images (`GS v 0`)
//! - [`cp437`]: Text encoding with control-character stripping
//!
//! ## Usage Example
//!
//! ```
//! use pingslip::protocol::{commands, cp437, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::TextStyle::new(text::Alignment::Center, text::Font::A, true).to_commands());
//! data.extend(cp437::encode("RECEIPT\n"));
//! data.extend(commands::cut_full_feed());
//! ```

pub mod commands;
pub mod cp437;
pub mod graphics;
pub mod text;
