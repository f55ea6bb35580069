//! # Configuration
//!
//! Plain values handed to each component at construction. Nothing in the
//! library reads the environment; the CLI builds a [`Config`] and passes it
//! down.
//!
//! ## Defaults
//!
//! | Setting | Default | Notes |
//! |---------|---------|-------|
//! | Printer port | 9100 | Raw TCP ("JetDirect") port |
//! | Wrap width | 48 | Font A columns on 80mm paper |
//! | Avatar size | 64 dots | Square |
//! | Attachment width | 384 dots | Never upscaled |
//! | Avatar timeout | 5s | |
//! | Attachment timeout | 10s | |
//! | Connect timeout | 5s | |
//! | Write timeout | 10s | Per write call |
//! | Render concurrency | 4 | Jobs downloading images at once |

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::PingslipError;
use crate::event::{GuildId, RoleId, UserId};
use crate::render::dither::DitheringAlgorithm;

/// Conventional raw-print port.
pub const DEFAULT_PORT: u16 = 9100;

/// Where the printer listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = PingslipError;

    /// `host` or `host:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                let port = port
                    .parse()
                    .map_err(|_| PingslipError::Config(format!("invalid port in '{}'", s)))?;
                Ok(Self::new(host, port))
            }
            Some(_) => Err(PingslipError::Config(format!("missing host in '{}'", s))),
            None if s.is_empty() => Err(PingslipError::Config("empty printer address".into())),
            None => Ok(Self::new(s, DEFAULT_PORT)),
        }
    }
}

/// Everything the core needs for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The one identity whose mentions get printed.
    pub monitored_user: UserId,
    pub printer: Endpoint,
    /// Body text wrap width in characters.
    pub wrap_width: usize,
    /// Avatar edge length in dots.
    pub avatar_size: u32,
    /// Widest an attachment image may be printed, in dots.
    pub attachment_max_width: u32,
    pub dither: DitheringAlgorithm,
    pub avatar_timeout: Duration,
    pub attachment_timeout: Duration,
    pub connect_timeout: Duration,
    pub write_timeout: Duration,
    /// Upper bound on events rendering at the same time.
    pub render_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitored_user: UserId(0),
            printer: Endpoint::new("127.0.0.1", DEFAULT_PORT),
            wrap_width: 48,
            avatar_size: 64,
            attachment_max_width: 384,
            dither: DitheringAlgorithm::FloydSteinberg,
            avatar_timeout: Duration::from_secs(5),
            attachment_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            render_concurrency: 4,
        }
    }
}

impl Config {
    /// Reject values that would make rendering meaningless.
    pub fn validate(&self) -> Result<(), PingslipError> {
        if self.wrap_width == 0 {
            return Err(PingslipError::Config("wrap width must be at least 1".into()));
        }
        if self.avatar_size == 0 || self.attachment_max_width == 0 {
            return Err(PingslipError::Config("image sizes must be at least 1 dot".into()));
        }
        if self.render_concurrency == 0 {
            return Err(PingslipError::Config(
                "render concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parse `GUILD_ID:ROLE_ID[,ROLE_ID...]`, the CLI form of one guild's
/// role membership for the monitored user.
///
/// ```
/// use pingslip::config::parse_member_roles;
/// use pingslip::event::{GuildId, RoleId};
///
/// let (guild, roles) = parse_member_roles("7:10,11").unwrap();
/// assert_eq!(guild, GuildId(7));
/// assert!(roles.contains(&RoleId(11)));
/// ```
pub fn parse_member_roles(s: &str) -> Result<(GuildId, HashSet<RoleId>), PingslipError> {
    let bad = || PingslipError::Config(format!("expected GUILD_ID:ROLE_ID[,ROLE_ID...], got '{}'", s));

    let (guild, roles) = s.split_once(':').ok_or_else(bad)?;
    let guild = guild.trim().parse().map_err(|_| bad())?;
    let roles = roles
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| r.parse().map(RoleId).map_err(|_| bad()))
        .collect::<Result<HashSet<_>, _>>()?;

    Ok((GuildId(guild), roles))
}
