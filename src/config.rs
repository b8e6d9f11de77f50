use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use crate::constants::{CHUNK_SIZE, DEFAULT_LISTEN, UPLOADS_DIR_NAME};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Delay every request by this many milliseconds
    #[arg(long, value_name = "MILLISECONDS", allow_hyphen_values = true)]
    pub latency: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub uploads_dir: PathBuf,
    pub latency: Option<Duration>,
    pub chunk_size: usize,
}

impl ServerConfig {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            listen: DEFAULT_LISTEN,
            uploads_dir: uploads_dir.into(),
            latency: None,
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let config = Self::new(default_uploads_dir()?);
        Ok(match args.latency.as_deref().and_then(parse_latency) {
            Some(latency) => config.with_latency(latency),
            None => config,
        })
    }

    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// `uploads` next to the server executable.
pub fn default_uploads_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate server executable")?;
    let dir = exe
        .parent()
        .context("server executable has no parent directory")?;
    Ok(dir.join(UPLOADS_DIR_NAME))
}

/// Lenient integer parse of a `--latency` value.
///
/// Leading whitespace and a sign are accepted and anything after the first
/// run of digits is ignored, so `"200ms"` is 200. Only positive values enable
/// the delay; everything else means "no latency".
pub fn parse_latency(raw: &str) -> Option<Duration> {
    let s = raw.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let ms: u64 = digits[..end].parse().ok()?;

    if negative || ms == 0 {
        return None;
    }
    Some(Duration::from_millis(ms))
}
