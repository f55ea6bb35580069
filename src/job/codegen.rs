//! # Code Generation
//!
//! Converts directives to ESC/POS bytes.

use super::directive::{Directive, RenderJob};
use crate::protocol::{commands, cp437, graphics};

impl Directive {
    /// ESC/POS bytes for this directive alone.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Directive::SetStyle(style) => style.to_commands(),
            Directive::Text(s) => cp437::encode(s),
            Directive::Image(bitmap) => graphics::raster_chunked(
                bitmap.width_bytes(),
                bitmap.height as usize,
                &bitmap.data,
            ),
            Directive::Cut => commands::cut_full_feed(),
        }
    }
}

impl RenderJob {
    /// The complete byte stream for the job, starting with `ESC @`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = commands::init();
        for directive in &self.directives {
            out.extend(directive.to_bytes());
        }
        out
    }
}
