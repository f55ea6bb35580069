//! # Receipt Components
//!
//! The building blocks of a message receipt, top to bottom:
//!
//! ```text
//! # general                 ← ChannelHeader (font B, bold channel)
//! Rust Programming             (plain guild name)
//!
//!   Replying to bob         ← ReplyMarker (only for replies)
//!
//! ▓▓▓▓                      ← Avatar (64x64 dithered)
//! alice @ @role  14:03:22   ← AuthorLine (bold name, badges, time)
//! hey, can you take a       ← Body (wrapped)
//! look at this?
//!
//! [Image: cat.png]          ← Attachments (caption + centered image)
//!        ▓▓▓▓▓▓
//! ```
//!
//! Every component sets the full style it needs before printing, so they
//! can be composed in any order without leaking bold or alignment.

use super::Component;
use crate::event::Origin;
use crate::filter::{Tag, Verdict};
use crate::job::{Directive, RenderJob};
use crate::layout;
use crate::protocol::text::{Alignment, Font, TextStyle};
use crate::render::Bitmap;

/// Badge printed after the author name for a direct mention.
pub const MENTION_BADGE: &str = " @";
/// Badge for a mention of a role the monitored user holds.
pub const ROLE_BADGE: &str = " @role";
/// Badge for `@everyone` / `@here`.
pub const BROADCAST_BADGE: &str = " @everyone";
/// Header line for direct messages.
pub const DIRECT_MESSAGE_HEADER: &str = "DIRECT MESSAGE";
/// Printed in place of an attachment that could not be fetched.
pub const FAILED_IMAGE_CAPTION: &str = "(Failed to load image)";

fn style(align: Alignment, font: Font, bold: bool) -> Directive {
    Directive::SetStyle(TextStyle::new(align, font, bold))
}

fn text(s: impl Into<String>) -> Directive {
    Directive::Text(s.into())
}

/// Where the message came from.
pub struct ChannelHeader<'a> {
    origin: &'a Origin,
}

impl<'a> ChannelHeader<'a> {
    pub fn new(origin: &'a Origin) -> Self {
        Self { origin }
    }
}

impl Component for ChannelHeader<'_> {
    fn emit(&self, job: &mut RenderJob) {
        match self.origin {
            Origin::Guild {
                guild_name,
                channel_name,
                ..
            } => {
                job.push(style(Alignment::Left, Font::B, true));
                job.push(text(format!("# {}\n", channel_name)));
                job.push(style(Alignment::Left, Font::B, false));
                job.push(text(format!("{}\n", guild_name)));
            }
            Origin::Direct => {
                job.push(style(Alignment::Left, Font::B, true));
                job.push(text(format!("{}\n", DIRECT_MESSAGE_HEADER)));
            }
        }
        job.push(text("\n"));
    }
}

/// "Replying to NAME", naming the author of the replied-to message.
pub struct ReplyMarker<'a> {
    author_name: &'a str,
}

impl<'a> ReplyMarker<'a> {
    pub fn new(author_name: &'a str) -> Self {
        Self { author_name }
    }
}

impl Component for ReplyMarker<'_> {
    fn emit(&self, job: &mut RenderJob) {
        job.push(style(Alignment::Left, Font::B, false));
        job.push(text(format!("  Replying to {}\n", self.author_name)));
        job.push(text("\n"));
    }
}

/// The author's avatar thumbnail, printed flush left.
pub struct Avatar {
    bitmap: Bitmap,
}

impl Avatar {
    pub fn new(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }
}

impl Component for Avatar {
    fn emit(&self, job: &mut RenderJob) {
        job.push(style(Alignment::Left, Font::A, false));
        job.push(Directive::Image(self.bitmap.clone()));
    }
}

/// Bold author name, relevance badges, then the print time.
pub struct AuthorLine<'a> {
    name: &'a str,
    verdict: &'a Verdict,
    timestamp: String,
}

impl<'a> AuthorLine<'a> {
    pub fn new(name: &'a str, verdict: &'a Verdict, timestamp: impl Into<String>) -> Self {
        Self {
            name,
            verdict,
            timestamp: timestamp.into(),
        }
    }

    /// Badge suffixes in print order.
    pub fn badges(verdict: &Verdict) -> String {
        let mut badges = String::new();
        for tag in &verdict.tags {
            match tag {
                Tag::DirectMention => badges.push_str(MENTION_BADGE),
                Tag::RoleMention => badges.push_str(ROLE_BADGE),
                Tag::BroadcastMention => badges.push_str(BROADCAST_BADGE),
                Tag::ReplyTarget => {}
            }
        }
        badges
    }
}

impl Component for AuthorLine<'_> {
    fn emit(&self, job: &mut RenderJob) {
        job.push(style(Alignment::Left, Font::A, true));
        job.push(text(self.name));
        job.push(style(Alignment::Left, Font::A, false));

        let badges = Self::badges(self.verdict);
        if !badges.is_empty() {
            job.push(text(badges));
        }
        job.push(text(format!("  {}\n", self.timestamp)));
    }
}

/// Message text, word-wrapped; one directive per line.
pub struct Body<'a> {
    content: &'a str,
    width: usize,
}

impl<'a> Body<'a> {
    pub fn new(content: &'a str, width: usize) -> Self {
        Self { content, width }
    }
}

impl Component for Body<'_> {
    fn emit(&self, job: &mut RenderJob) {
        job.push(style(Alignment::Left, Font::A, false));
        for line in layout::wrap(self.content, self.width) {
            job.push(text(line + "\n"));
        }
    }
}

/// Image attachments with their captions. `None` marks a failed download.
pub struct Attachments {
    images: Vec<(String, Option<Bitmap>)>,
}

impl Attachments {
    pub fn new(images: Vec<(String, Option<Bitmap>)>) -> Self {
        Self { images }
    }
}

impl Component for Attachments {
    fn emit(&self, job: &mut RenderJob) {
        if self.images.is_empty() {
            return;
        }

        job.push(text("\n"));
        for (filename, bitmap) in &self.images {
            job.push(style(Alignment::Left, Font::B, false));
            job.push(text(format!("[Image: {}]\n", filename)));
            match bitmap {
                Some(bitmap) => {
                    job.push(style(Alignment::Center, Font::B, false));
                    job.push(Directive::Image(bitmap.clone()));
                    job.push(text("\n"));
                }
                None => job.push(text(format!("{}\n", FAILED_IMAGE_CAPTION))),
            }
        }
    }
}
