//! # Message Events
//!
//! The immutable snapshot of one chat message, as handed to the core by the
//! chat-client collaborator. Everything the filter and renderer need is
//! resolved up front (reply targets, avatar URLs, attachment URLs), so neither
//! ever touches a live platform session.
//!
//! Events arrive as JSON, one per line:
//!
//! ```json
//! {
//!   "id": 1,
//!   "author": { "id": 42, "display_name": "alice", "avatar_url": "https://..." },
//!   "origin": { "kind": "guild", "guild_id": 7, "guild_name": "Rust", "channel_name": "general" },
//!   "body": "hey <@99>",
//!   "mentioned_user_ids": [99]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::{Tag, Verdict};

/// Platform user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Platform role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u64);

/// Platform guild (server) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Where the message was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// A direct message to the monitored identity.
    Direct,
    /// A channel inside a guild.
    Guild {
        guild_id: GuildId,
        guild_name: String,
        channel_name: String,
    },
}

impl Origin {
    pub fn is_direct(&self) -> bool {
        matches!(self, Origin::Direct)
    }
}

/// The already-resolved message this one replies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub author_id: UserId,
    pub author_name: String,
}

/// Image suffixes the renderer will try to print.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// A file attached to the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl Attachment {
    /// True if the filename ends in a printable image extension (any case).
    pub fn is_image(&self) -> bool {
        let name = self.filename.to_lowercase();
        IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}

/// One chat message, frozen at filter time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Platform message id, used only for log correlation.
    #[serde(default)]
    pub id: u64,
    pub author: Author,
    pub origin: Origin,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub mentioned_user_ids: Vec<UserId>,
    #[serde(default)]
    pub mentioned_role_ids: Vec<RoleId>,
    /// `@everyone` / `@here`
    #[serde(default)]
    pub broadcast_mention: bool,
    #[serde(default)]
    pub reply_target: Option<ReplyTarget>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl MessageEvent {
    /// Parse one event from a JSON document.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Attachments the renderer treats as images, in original order.
    pub fn image_attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter().filter(|a| a.is_image())
    }

    /// One-line console summary of a passed event.
    ///
    /// ```text
    /// [Rust#general] [MENTION] [REPLY] alice: hello
    /// [DM] bob: hi
    /// ```
    pub fn summary(&self, verdict: &Verdict) -> String {
        match &self.origin {
            Origin::Direct => format!("[DM] {}: {}", self.author.display_name, self.body),
            Origin::Guild {
                guild_name,
                channel_name,
                ..
            } => {
                let mut marks = String::new();
                if verdict.has(Tag::DirectMention) {
                    marks.push_str(" [MENTION]");
                }
                if verdict.has(Tag::ReplyTarget) {
                    marks.push_str(" [REPLY]");
                }
                format!(
                    "[{}#{}]{} {}: {}",
                    guild_name, channel_name, marks, self.author.display_name, self.body
                )
            }
        }
    }
}
