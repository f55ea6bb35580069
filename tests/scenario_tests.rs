//! # Scenario Tests
//!
//! End-to-end runs of filter → renderer → transport with an in-memory
//! printer and canned images.
//!
//! ## Test Coverage
//!
//! - Direct mention with wrapped body
//! - Reply to the monitored user
//! - Image and non-image attachments
//! - Unreachable printer
//! - Role mentions resolved through the membership table

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveTime;
use pretty_assertions::assert_eq;

use pingslip::config::Config;
use pingslip::error::SubmitError;
use pingslip::event::{Attachment, Author, GuildId, MessageEvent, Origin, ReplyTarget, RoleId, UserId};
use pingslip::filter::{RelevanceFilter, StaticMembership, Tag};
use pingslip::job::Directive;
use pingslip::layout::wrap;
use pingslip::pipeline::{Outcome, Pipeline};
use pingslip::protocol::{commands, cp437};
use pingslip::receipt::ReceiptRenderer;
use pingslip::render::{Bitmap, ImageFetcher};
use pingslip::transport::{MemoryConnector, PrinterTransport};

const ME: UserId = UserId(99);
const GUILD: GuildId = GuildId(7);

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Returns a small black bitmap for URLs it knows, `None` for the rest.
struct CannedImages {
    known: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl CannedImages {
    fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn serve(&self, url: &str, width: u32, height: u32) -> Option<Bitmap> {
        self.requested.lock().unwrap().push(url.to_string());
        self.known.contains(url).then(|| Bitmap {
            width,
            height,
            data: vec![0xFF; width.div_ceil(8) as usize * height as usize],
        })
    }
}

#[async_trait]
impl ImageFetcher for CannedImages {
    async fn fetch_avatar(&self, url: &str, size: u32) -> Option<Bitmap> {
        self.serve(url, size, size)
    }

    async fn fetch_attachment(&self, url: &str, max_width: u32) -> Option<Bitmap> {
        self.serve(url, max_width, 4)
    }
}

fn config() -> Config {
    Config {
        monitored_user: ME,
        wrap_width: 10,
        avatar_size: 16,
        attachment_max_width: 32,
        ..Config::default()
    }
}

fn guild_event(body: &str) -> MessageEvent {
    MessageEvent {
        id: 42,
        author: Author {
            id: UserId(1),
            display_name: "alice".into(),
            avatar_url: None,
        },
        origin: Origin::Guild {
            guild_id: GUILD,
            guild_name: "Rust".into(),
            channel_name: "general".into(),
        },
        body: body.into(),
        mentioned_user_ids: vec![],
        mentioned_role_ids: vec![],
        broadcast_mention: false,
        reply_target: None,
        attachments: vec![],
    }
}

fn filter(membership: StaticMembership) -> RelevanceFilter {
    RelevanceFilter::new(ME, Arc::new(membership))
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_direct_mention_is_wrapped_and_printed() {
    let mut event = guild_event("hello there friend");
    event.mentioned_user_ids = vec![ME];

    let verdict = filter(StaticMembership::new()).evaluate(&event).await;
    assert!(verdict.pass);
    assert_eq!(verdict.tags, BTreeSet::from([Tag::DirectMention]));

    assert_eq!(wrap(&event.body, 10), vec!["hello ", "there ", "friend "]);

    let renderer = ReceiptRenderer::new(&config(), Arc::new(CannedImages::new(&[])));
    let job = renderer.render_at(&event, &verdict, noon()).await;
    let text = job.text();
    assert!(text.contains("alice @  12:00:00\n"));
    assert!(text.contains("hello \nthere \nfriend \n"));
    assert_eq!(job.directives.last(), Some(&Directive::Cut));
}

#[tokio::test]
async fn test_reply_marker_names_replied_to_author() {
    let mut event = guild_event("agreed");
    event.reply_target = Some(ReplyTarget {
        author_id: ME,
        author_name: "monitored-me".into(),
    });

    let verdict = filter(StaticMembership::new()).evaluate(&event).await;
    assert_eq!(verdict.tags, BTreeSet::from([Tag::ReplyTarget]));

    let renderer = ReceiptRenderer::new(&config(), Arc::new(CannedImages::new(&[])));
    let job = renderer.render_at(&event, &verdict, noon()).await;

    // First text after the header block is the reply marker
    let texts: Vec<&str> = job
        .iter()
        .filter_map(|d| match d {
            Directive::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts[..4], ["# general\n", "Rust\n", "\n", "  Replying to monitored-me\n"]);
}

#[tokio::test]
async fn test_image_attachments_only() {
    let mut event = guild_event("look");
    event.broadcast_mention = true;
    event.attachments = vec![
        Attachment {
            filename: "cat.png".into(),
            url: "https://cdn.example/cat.png".into(),
            content_type: Some("image/png".into()),
        },
        Attachment {
            filename: "archive.zip".into(),
            url: "https://cdn.example/archive.zip".into(),
            content_type: None,
        },
    ];

    let verdict = filter(StaticMembership::new()).evaluate(&event).await;
    let images = Arc::new(CannedImages::new(&["https://cdn.example/cat.png"]));
    let renderer = ReceiptRenderer::new(&config(), images.clone());
    let job = renderer.render_at(&event, &verdict, noon()).await;

    assert_eq!(job.image_count(), 1);
    assert!(job.text().contains("[Image: cat.png]\n"));
    assert!(!job.text().contains("archive.zip"));
    assert_eq!(images.requested(), vec!["https://cdn.example/cat.png"]);
}

#[tokio::test]
async fn test_unreachable_printer_writes_nothing() {
    let connector = MemoryConnector::refusing();
    let config = config();
    let pipeline = Pipeline::new(
        &config,
        filter(StaticMembership::new()),
        ReceiptRenderer::new(&config, Arc::new(CannedImages::new(&[]))),
        PrinterTransport::new(Box::new(connector.clone()), Duration::from_secs(1)),
    );

    let mut event = guild_event("anyone there?");
    event.mentioned_user_ids = vec![ME];

    match pipeline.process(event).await {
        Outcome::Failed(SubmitError::Connect { endpoint, .. }) => {
            assert_eq!(endpoint, "127.0.0.1:9100");
        }
        other => panic!("expected connect failure, got {:?}", other),
    }
    assert_eq!(connector.write_count(), 0);
}

#[tokio::test]
async fn test_role_mention_end_to_end() {
    let connector = MemoryConnector::new();
    let config = config();
    let membership = StaticMembership::new().with_roles(GUILD, ME, [RoleId(10)]);
    let pipeline = Pipeline::new(
        &config,
        filter(membership),
        ReceiptRenderer::new(&config, Arc::new(CannedImages::new(&[]))),
        PrinterTransport::new(Box::new(connector.clone()), Duration::from_secs(1)),
    );

    let mut held = guild_event("standup");
    held.mentioned_role_ids = vec![RoleId(10)];
    let mut other = guild_event("standup");
    other.mentioned_role_ids = vec![RoleId(11)];

    assert_eq!(
        pipeline.process(held).await,
        Outcome::Printed(BTreeSet::from([Tag::RoleMention]))
    );
    assert_eq!(pipeline.process(other).await, Outcome::Skipped);

    let connections = connector.connections();
    assert_eq!(connections.len(), 1);
    let bytes = &connections[0].bytes;
    assert!(bytes.starts_with(&commands::init()));
    assert!(bytes.ends_with(&commands::cut_full_feed()));
    let badge = cp437::encode(" @role  ");
    assert!(bytes.windows(badge.len()).any(|w| w == badge.as_slice()));
}
