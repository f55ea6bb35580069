//! # Receipt Renderer
//!
//! Turns a passed [`MessageEvent`] into a [`RenderJob`]. The order of the
//! receipt is fixed:
//!
//! ```text
//! header → reply marker? → avatar? → author line → body → attachments → cut
//! ```
//!
//! Images are downloaded first; the receipt is then composed from
//! declarative [`Component`]s. Missing avatars are silently left out;
//! attachments that fail to load get a caption instead.
//!
//! ## Example
//!
//! ```
//! use pingslip::receipt::{ComponentExt, Receipt, ReplyMarker};
//!
//! let job = Receipt::new().child(ReplyMarker::new("bob")).cut().compile();
//! assert_eq!(job.text(), "  Replying to bob\n\n");
//! ```

mod components;

pub use components::*;

use std::sync::Arc;

use chrono::{Local, NaiveTime};
use tracing::debug;

use crate::config::Config;
use crate::event::MessageEvent;
use crate::filter::{Tag, Verdict};
use crate::job::{Directive, RenderJob};
use crate::render::ImageFetcher;

/// Trait for declarative receipt parts.
pub trait Component {
    /// Append this component's directives to the job.
    fn emit(&self, job: &mut RenderJob);
}

/// Extension trait for compiling components.
pub trait ComponentExt: Component {
    /// Compile this component on its own into a job.
    fn compile(&self) -> RenderJob {
        let mut job = RenderJob::new();
        self.emit(&mut job);
        job
    }
}

impl<T: Component + ?Sized> ComponentExt for T {}

impl Component for Box<dyn Component + '_> {
    fn emit(&self, job: &mut RenderJob) {
        self.as_ref().emit(job);
    }
}

/// Root container: children in order, optionally followed by a cut.
#[derive(Default)]
pub struct Receipt<'a> {
    children: Vec<Box<dyn Component + 'a>>,
    cut: bool,
}

impl<'a> Receipt<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child component.
    pub fn child<C: Component + 'a>(mut self, component: C) -> Self {
        self.children.push(Box::new(component));
        self
    }

    /// Add a child only when present.
    pub fn maybe_child<C: Component + 'a>(self, component: Option<C>) -> Self {
        match component {
            Some(c) => self.child(c),
            None => self,
        }
    }

    /// End the receipt with a cut.
    pub fn cut(mut self) -> Self {
        self.cut = true;
        self
    }
}

impl Component for Receipt<'_> {
    fn emit(&self, job: &mut RenderJob) {
        for child in &self.children {
            child.emit(job);
        }
        if self.cut {
            job.push(Directive::Cut);
        }
    }
}

/// Renders message receipts with a configured width and image source.
#[derive(Clone)]
pub struct ReceiptRenderer {
    fetcher: Arc<dyn ImageFetcher>,
    wrap_width: usize,
    avatar_size: u32,
    attachment_max_width: u32,
}

impl ReceiptRenderer {
    pub fn new(config: &Config, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            fetcher,
            wrap_width: config.wrap_width,
            avatar_size: config.avatar_size,
            attachment_max_width: config.attachment_max_width,
        }
    }

    /// Render with the current local time on the author line.
    pub async fn render(&self, event: &MessageEvent, verdict: &Verdict) -> RenderJob {
        self.render_at(event, verdict, Local::now().time()).await
    }

    /// Render with an explicit print time.
    pub async fn render_at(
        &self,
        event: &MessageEvent,
        verdict: &Verdict,
        now: NaiveTime,
    ) -> RenderJob {
        let avatar = match &event.author.avatar_url {
            Some(url) => self.fetcher.fetch_avatar(url, self.avatar_size).await,
            None => None,
        };

        let mut images = Vec::new();
        for attachment in event.image_attachments() {
            let bitmap = self
                .fetcher
                .fetch_attachment(&attachment.url, self.attachment_max_width)
                .await;
            images.push((attachment.filename.clone(), bitmap));
        }

        let skipped = event.attachments.len() - images.len();
        if skipped > 0 {
            debug!(event = event.id, skipped, "ignoring non-image attachments");
        }

        let reply = event
            .reply_target
            .as_ref()
            .filter(|_| verdict.has(Tag::ReplyTarget))
            .map(|r| ReplyMarker::new(&r.author_name));

        let timestamp = now.format("%H:%M:%S").to_string();

        Receipt::new()
            .child(ChannelHeader::new(&event.origin))
            .maybe_child(reply)
            .maybe_child(avatar.map(Avatar::new))
            .child(AuthorLine::new(&event.author.display_name, verdict, timestamp))
            .child(Body::new(&event.body, self.wrap_width))
            .child(Attachments::new(images))
            .cut()
            .compile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Attachment, Author, GuildId, Origin, ReplyTarget, UserId};
    use crate::protocol::text::{Alignment, Font, TextStyle};
    use crate::render::Bitmap;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::{BTreeSet, HashSet};
    use std::sync::Mutex;

    /// Serves 8x1 bitmaps for known URLs and records every request.
    #[derive(Default)]
    struct FakeFetcher {
        ok: HashSet<String>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn serving(urls: &[&str]) -> Self {
            Self {
                ok: urls.iter().map(|u| u.to_string()).collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn lookup(&self, url: &str, width: u32) -> Option<Bitmap> {
            self.requests.lock().unwrap().push(url.to_string());
            self.ok.contains(url).then(|| Bitmap {
                width,
                height: 1,
                data: vec![0xFF; (width as usize).div_ceil(8)],
            })
        }
    }

    #[async_trait]
    impl ImageFetcher for FakeFetcher {
        async fn fetch_avatar(&self, url: &str, size: u32) -> Option<Bitmap> {
            self.lookup(url, size)
        }

        async fn fetch_attachment(&self, url: &str, max_width: u32) -> Option<Bitmap> {
            self.lookup(url, max_width)
        }
    }

    const AVATAR: &str = "https://cdn.example/avatar.png";

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 34, 56).unwrap()
    }

    fn renderer(fetcher: Arc<FakeFetcher>, width: usize) -> ReceiptRenderer {
        let config = Config {
            wrap_width: width,
            avatar_size: 16,
            attachment_max_width: 32,
            ..Config::default()
        };
        ReceiptRenderer::new(&config, fetcher)
    }

    fn guild_event() -> MessageEvent {
        MessageEvent {
            id: 7,
            author: Author {
                id: UserId(1),
                display_name: "alice".into(),
                avatar_url: Some(AVATAR.into()),
            },
            origin: Origin::Guild {
                guild_id: GuildId(3),
                guild_name: "Rust".into(),
                channel_name: "general".into(),
            },
            body: "hello there friend".into(),
            mentioned_user_ids: vec![UserId(99)],
            mentioned_role_ids: vec![],
            broadcast_mention: false,
            reply_target: None,
            attachments: vec![],
        }
    }

    fn tagged(tags: &[Tag]) -> Verdict {
        Verdict {
            pass: true,
            tags: tags.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    fn style(align: Alignment, font: Font, bold: bool) -> Directive {
        Directive::SetStyle(TextStyle::new(align, font, bold))
    }

    fn text(s: &str) -> Directive {
        Directive::Text(s.into())
    }

    fn attachment(name: &str) -> Attachment {
        Attachment {
            filename: name.into(),
            url: format!("https://cdn.example/{}", name),
            content_type: None,
        }
    }

    #[tokio::test]
    async fn test_full_guild_receipt() {
        let fetcher = Arc::new(FakeFetcher::serving(&[AVATAR]));
        let job = renderer(fetcher, 10)
            .render_at(&guild_event(), &tagged(&[Tag::DirectMention]), noon())
            .await;

        assert_eq!(
            job.directives,
            vec![
                style(Alignment::Left, Font::B, true),
                text("# general\n"),
                style(Alignment::Left, Font::B, false),
                text("Rust\n"),
                text("\n"),
                style(Alignment::Left, Font::A, false),
                Directive::Image(Bitmap {
                    width: 16,
                    height: 1,
                    data: vec![0xFF, 0xFF],
                }),
                style(Alignment::Left, Font::A, true),
                text("alice"),
                style(Alignment::Left, Font::A, false),
                text(" @"),
                text("  12:34:56\n"),
                style(Alignment::Left, Font::A, false),
                text("hello \n"),
                text("there \n"),
                text("friend \n"),
                Directive::Cut,
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_avatar_is_omitted() {
        let fetcher = Arc::new(FakeFetcher::default());
        let job = renderer(fetcher.clone(), 48)
            .render_at(&guild_event(), &tagged(&[Tag::DirectMention]), noon())
            .await;
        assert_eq!(job.image_count(), 0);
        assert!(!job.text().contains("Failed"));
        assert_eq!(*fetcher.requests.lock().unwrap(), vec![AVATAR.to_string()]);
    }

    #[tokio::test]
    async fn test_no_avatar_url_skips_fetch() {
        let fetcher = Arc::new(FakeFetcher::default());
        let mut event = guild_event();
        event.author.avatar_url = None;
        renderer(fetcher.clone(), 48)
            .render_at(&event, &tagged(&[Tag::DirectMention]), noon())
            .await;
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_direct_message_header() {
        let fetcher = Arc::new(FakeFetcher::default());
        let mut event = guild_event();
        event.origin = Origin::Direct;
        let job = renderer(fetcher, 48)
            .render_at(&event, &Verdict::pass_untagged(), noon())
            .await;
        assert!(job.text().starts_with("DIRECT MESSAGE\n\nalice  12:34:56\n"));
    }

    #[tokio::test]
    async fn test_reply_marker_follows_header() {
        let fetcher = Arc::new(FakeFetcher::serving(&[AVATAR]));
        let mut event = guild_event();
        event.mentioned_user_ids.clear();
        event.reply_target = Some(ReplyTarget {
            author_id: UserId(99),
            author_name: "me_old_name".into(),
        });
        let job = renderer(fetcher, 48)
            .render_at(&event, &tagged(&[Tag::ReplyTarget]), noon())
            .await;

        // Header is the first five directives; the reply marker comes next,
        // before the avatar.
        assert_eq!(
            job.directives[5..8],
            [
                style(Alignment::Left, Font::B, false),
                text("  Replying to me_old_name\n"),
                text("\n"),
            ]
        );
        assert!(matches!(job.directives[9], Directive::Image(_)));
        // Replies carry no author-line badge.
        assert!(job.text().contains("alice  12:34:56\n"));
    }

    #[tokio::test]
    async fn test_reply_to_someone_else_has_no_marker() {
        let fetcher = Arc::new(FakeFetcher::default());
        let mut event = guild_event();
        event.reply_target = Some(ReplyTarget {
            author_id: UserId(5),
            author_name: "carol".into(),
        });
        let job = renderer(fetcher, 48)
            .render_at(&event, &tagged(&[Tag::DirectMention]), noon())
            .await;
        assert!(!job.text().contains("Replying"));
    }

    #[tokio::test]
    async fn test_attachments() {
        let cat = attachment("cat.png");
        let fetcher = Arc::new(FakeFetcher::serving(&[&cat.url]));
        let mut event = guild_event();
        event.author.avatar_url = None;
        event.attachments = vec![cat, attachment("archive.zip"), attachment("dog.JPG")];

        let job = renderer(fetcher.clone(), 48)
            .render_at(&event, &tagged(&[Tag::DirectMention]), noon())
            .await;

        assert_eq!(job.image_count(), 1);
        let text = job.text();
        assert!(text.contains("[Image: cat.png]\n"));
        assert!(text.contains("[Image: dog.JPG]\n(Failed to load image)\n"));
        assert!(!text.contains("archive.zip"));
        assert_eq!(
            *fetcher.requests.lock().unwrap(),
            vec![
                "https://cdn.example/cat.png".to_string(),
                "https://cdn.example/dog.JPG".to_string()
            ]
        );
        assert_eq!(job.directives.last(), Some(&Directive::Cut));
    }

    #[tokio::test]
    async fn test_all_badges() {
        let fetcher = Arc::new(FakeFetcher::default());
        let job = renderer(fetcher, 48)
            .render_at(
                &guild_event(),
                &tagged(&[Tag::BroadcastMention, Tag::RoleMention, Tag::DirectMention]),
                noon(),
            )
            .await;
        assert!(job.text().contains("alice @ @role @everyone  12:34:56\n"));
    }
}
