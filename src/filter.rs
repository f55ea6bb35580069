//! # Relevance Filter
//!
//! Decides whether a message concerns the monitored identity and records
//! why. The rules are independent; every matching rule adds its tag:
//!
//! | Rule | Tag |
//! |------|-----|
//! | Direct message | *(none, short-circuits)* |
//! | Monitored id in user mentions | [`Tag::DirectMention`] |
//! | A mentioned role is held by the monitored id in that guild | [`Tag::RoleMention`] |
//! | `@everyone` / `@here` | [`Tag::BroadcastMention`] |
//! | Reply to a message written by the monitored id | [`Tag::ReplyTarget`] |
//!
//! Role membership is asked for on every event that mentions a role. It is
//! never cached, since roles change while the process runs.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::PingslipError;
use crate::event::{GuildId, MessageEvent, Origin, RoleId, UserId};

/// Why an event passed. Ordering is the order badges are printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    DirectMention,
    RoleMention,
    BroadcastMention,
    ReplyTarget,
}

/// Result of running the filter over one event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    pub pass: bool,
    pub tags: BTreeSet<Tag>,
}

impl Verdict {
    pub fn reject() -> Self {
        Self::default()
    }

    /// Passed on origin alone (direct messages).
    pub fn pass_untagged() -> Self {
        Self {
            pass: true,
            tags: BTreeSet::new(),
        }
    }

    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    fn tag(&mut self, tag: Tag) {
        self.pass = true;
        self.tags.insert(tag);
    }
}

/// Answers "which roles does this user hold in this guild right now".
///
/// `Ok(None)` means the user is not a member of the guild. `Err` means the
/// answer is unavailable; the filter treats both as "no role match".
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    async fn roles(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> Result<Option<HashSet<RoleId>>, PingslipError>;
}

/// Fixed membership table, filled in at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticMembership {
    members: HashMap<(GuildId, UserId), HashSet<RoleId>>,
}

impl StaticMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user` is a member of `guild` holding `roles`.
    pub fn with_roles(
        mut self,
        guild: GuildId,
        user: UserId,
        roles: impl IntoIterator<Item = RoleId>,
    ) -> Self {
        self.members
            .entry((guild, user))
            .or_default()
            .extend(roles);
        self
    }
}

#[async_trait]
impl MembershipLookup for StaticMembership {
    async fn roles(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> Result<Option<HashSet<RoleId>>, PingslipError> {
        Ok(self.members.get(&(guild, user)).cloned())
    }
}

/// Evaluate one event against the monitored identity.
///
/// Never fails: a broken membership lookup only disables the role rule.
pub async fn evaluate(
    event: &MessageEvent,
    monitored: UserId,
    lookup: &dyn MembershipLookup,
) -> Verdict {
    let guild_id = match &event.origin {
        Origin::Direct => return Verdict::pass_untagged(),
        Origin::Guild { guild_id, .. } => *guild_id,
    };

    let mut verdict = Verdict::reject();

    if event.mentioned_user_ids.contains(&monitored) {
        verdict.tag(Tag::DirectMention);
    }

    if !event.mentioned_role_ids.is_empty() {
        match lookup.roles(guild_id, monitored).await {
            Ok(Some(held)) => {
                if event.mentioned_role_ids.iter().any(|r| held.contains(r)) {
                    verdict.tag(Tag::RoleMention);
                }
            }
            Ok(None) => {
                debug!(event = event.id, guild = %guild_id, "monitored user is not a guild member");
            }
            Err(e) => {
                warn!(event = event.id, guild = %guild_id, error = %e, "membership lookup failed, skipping role rule");
            }
        }
    }

    if event.broadcast_mention {
        verdict.tag(Tag::BroadcastMention);
    }

    if let Some(reply) = &event.reply_target
        && reply.author_id == monitored
    {
        verdict.tag(Tag::ReplyTarget);
    }

    verdict
}

/// The filter bound to its configuration: one monitored identity and one
/// membership source.
#[derive(Clone)]
pub struct RelevanceFilter {
    monitored: UserId,
    lookup: Arc<dyn MembershipLookup>,
}

impl RelevanceFilter {
    pub fn new(monitored: UserId, lookup: Arc<dyn MembershipLookup>) -> Self {
        Self { monitored, lookup }
    }

    pub fn monitored(&self) -> UserId {
        self.monitored
    }

    pub async fn evaluate(&self, event: &MessageEvent) -> Verdict {
        evaluate(event, self.monitored, self.lookup.as_ref()).await
    }
}
