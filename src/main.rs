//! # Pingslip CLI
//!
//! Prints chat messages that mention you on a network receipt printer.
//!
//! ## Usage
//!
//! ```bash
//! # Print mentions of user 99 from events piped in by the chat client
//! chat-client --json | pingslip --user 99 --printer 192.168.1.50 watch
//!
//! # Read events from a file, treating user 99 as holding roles 10 and 11 in guild 7
//! pingslip --user 99 --printer 192.168.1.50 --member-role 7:10,11 watch --events events.jsonl
//!
//! # Print a sample receipt to check the printer
//! pingslip --user 99 --printer 192.168.1.50:9100 demo
//!
//! # Render without touching the printer
//! RUST_LOG=pingslip=debug pingslip --user 99 --dry-run demo
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pingslip::{
    Config, HttpImageFetcher, Pipeline, PingslipError, PrinterTransport, ReceiptRenderer,
    RelevanceFilter, StaticMembership,
    config::{Endpoint, parse_member_roles},
    event::{Attachment, Author, GuildId, MessageEvent, Origin, UserId},
    pipeline::Outcome,
    render::dither::DitheringAlgorithm,
    source::EventReader,
    transport::MemoryConnector,
};

/// Pingslip - chat mentions on a receipt printer
#[derive(Parser, Debug)]
#[command(name = "pingslip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    printer: PrinterArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct PrinterArgs {
    /// User id whose mentions are printed
    #[arg(long, env = "PINGSLIP_USER", global = true)]
    user: Option<u64>,

    /// Printer address, HOST or HOST:PORT
    #[arg(long, env = "PINGSLIP_PRINTER", default_value = "127.0.0.1:9100", global = true)]
    printer: String,

    /// Body wrap width in characters
    #[arg(long, default_value = "48", global = true)]
    width: usize,

    /// Avatar size in dots
    #[arg(long, default_value = "64", global = true)]
    avatar_size: u32,

    /// Maximum attachment image width in dots
    #[arg(long, default_value = "384", global = true)]
    image_width: u32,

    /// Dithering algorithm for images
    #[arg(long, value_enum, default_value = "floyd-steinberg", global = true)]
    dither: DitheringAlgorithm,

    /// Roles the monitored user holds in a guild, GUILD:ROLE[,ROLE...] (repeatable)
    #[arg(long = "member-role", value_name = "GUILD:ROLES", global = true)]
    member_roles: Vec<String>,

    /// Printer connect timeout in seconds
    #[arg(long, default_value = "5", global = true)]
    connect_timeout: u64,

    /// Printer write timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    write_timeout: u64,

    /// Events rendering at the same time
    #[arg(long, default_value = "4", global = true)]
    concurrency: usize,

    /// Render receipts but don't connect to the printer
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print relevant events read as JSON lines
    Watch {
        /// Event file (defaults to stdin)
        #[arg(long, value_name = "FILE")]
        events: Option<PathBuf>,
    },

    /// Print a sample receipt
    Demo {
        /// Message body to print
        #[arg(long)]
        body: Option<String>,

        /// Image URL to attach
        #[arg(long, value_name = "URL")]
        image: Option<String>,
    },
}

impl PrinterArgs {
    fn config(&self) -> Result<Config, PingslipError> {
        let user = self.user.ok_or_else(|| {
            PingslipError::Config("--user (or PINGSLIP_USER) is required".into())
        })?;
        let config = Config {
            monitored_user: UserId(user),
            printer: self.printer.parse::<Endpoint>()?,
            wrap_width: self.width,
            avatar_size: self.avatar_size,
            attachment_max_width: self.image_width,
            dither: self.dither,
            connect_timeout: Duration::from_secs(self.connect_timeout),
            write_timeout: Duration::from_secs(self.write_timeout),
            render_concurrency: self.concurrency,
            ..Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn membership(&self, user: UserId) -> Result<StaticMembership, PingslipError> {
        self.member_roles
            .iter()
            .try_fold(StaticMembership::new(), |membership, arg| {
                let (guild, roles) = parse_member_roles(arg)?;
                Ok(membership.with_roles(guild, user, roles))
            })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pingslip=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PingslipError> {
    let cli = Cli::parse();
    let config = cli.printer.config()?;
    let membership = cli.printer.membership(config.monitored_user)?;

    let dry_run = cli.printer.dry_run.then(MemoryConnector::new);
    let transport = match &dry_run {
        Some(connector) => PrinterTransport::new(Box::new(connector.clone()), config.write_timeout),
        None => PrinterTransport::tcp(&config),
    };

    let mut pipeline = Pipeline::new(
        &config,
        RelevanceFilter::new(config.monitored_user, Arc::new(membership)),
        ReceiptRenderer::new(&config, Arc::new(HttpImageFetcher::new(&config)?)),
        transport,
    );

    info!(
        user = %config.monitored_user,
        printer = %config.printer,
        dry_run = dry_run.is_some(),
        "pingslip starting"
    );

    match cli.command {
        Commands::Watch { events } => {
            let mut reader = EventReader::open(events.as_deref()).await?;
            while let Some(event) = reader.next_event().await? {
                pipeline.handle(event);
            }
            let summary = pipeline.drain().await;
            info!(
                printed = summary.printed,
                skipped = summary.skipped,
                failed = summary.failed,
                malformed = reader.skipped(),
                "end of input"
            );
        }
        Commands::Demo { body, image } => {
            let event = demo_event(config.monitored_user, body, image);
            if let Outcome::Failed(e) = pipeline.process(event).await {
                return Err(e.into());
            }
        }
    }

    if let Some(connector) = dry_run {
        let connections = connector.connections();
        let bytes: usize = connections.iter().map(|c| c.bytes.len()).sum();
        info!("dry run: {} receipts, {} bytes not sent", connections.len(), bytes);
    }

    Ok(())
}

/// A guild message that mentions `user` directly.
fn demo_event(user: UserId, body: Option<String>, image: Option<String>) -> MessageEvent {
    MessageEvent {
        id: 0,
        author: Author {
            id: UserId(0),
            display_name: "pingslip".into(),
            avatar_url: None,
        },
        origin: Origin::Guild {
            guild_id: GuildId(0),
            guild_name: "pingslip".into(),
            channel_name: "test-print".into(),
        },
        body: body.unwrap_or_else(|| {
            "If you can read this, the printer is set up. Messages that mention you, \
             reply to you or ping a role you hold will come out just like this one."
                .into()
        }),
        mentioned_user_ids: vec![user],
        mentioned_role_ids: vec![],
        broadcast_mention: false,
        reply_target: None,
        attachments: image
            .map(|url| Attachment {
                filename: "image.png".into(),
                url,
                content_type: None,
            })
            .into_iter()
            .collect(),
    }
}
