//! # Print Directives
//!
//! A [`RenderJob`] is an ordered list of [`Directive`]s: the inspectable
//! middle layer between the receipt renderer and raw printer bytes.
//!
//! ```text
//! Renderer → RenderJob (Vec<Directive>) → Codegen → Transport
//! ```
//!
//! Directives are coarse on purpose. A style change always carries the
//! whole style, so each one is meaningful on its own and a job can be
//! compared against an expected list in tests.

use crate::protocol::text::TextStyle;
use crate::render::Bitmap;

/// One atomic instruction to the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Set alignment, font and bold for what follows.
    SetStyle(TextStyle),

    /// Raw text. Line breaks are part of the string.
    Text(String),

    /// 1-bit raster image, positioned by the current alignment.
    Image(Bitmap),

    /// Feed past the cutter and cut.
    Cut,
}

/// The directives for one receipt. Built once, consumed by one submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderJob {
    pub directives: Vec<Directive>,
}

impl RenderJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    /// All text in the job, concatenated. Handy for logs and tests.
    pub fn text(&self) -> String {
        self.directives
            .iter()
            .filter_map(|d| match d {
                Directive::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of image directives.
    pub fn image_count(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Image(_)))
            .count()
    }
}

impl FromIterator<Directive> for RenderJob {
    fn from_iter<T: IntoIterator<Item = Directive>>(iter: T) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RenderJob {
    type Item = Directive;
    type IntoIter = std::vec::IntoIter<Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.into_iter()
    }
}

impl<'a> IntoIterator for &'a RenderJob {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}
