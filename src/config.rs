//! Server Configuration
//!
//! Command-line settings for the `kv-server` binary.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(5);

pub const USAGE: &str =
    "Usage: kv-server [--bind <addr:port>] [--log-level <level>] [--stats-interval <secs>]";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub log_level: tracing::Level,
    /// `None` disables the periodic stats log.
    pub stats_interval: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: tracing::Level::INFO,
            stats_interval: Some(DEFAULT_STATS_INTERVAL),
        }
    }
}

impl ServerConfig {
    /// Parses flags from `args`, where `args[0]` is the program name.
    ///
    /// Unknown flags are skipped.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    config.bind_addr = parse_value(args, i)?;
                    i += 2;
                }
                "--log-level" => {
                    config.log_level = parse_value(args, i)?;
                    i += 2;
                }
                "--stats-interval" => {
                    let secs: u64 = parse_value(args, i)?;
                    config.stats_interval = (secs > 0).then(|| Duration::from_secs(secs));
                    i += 2;
                }
                other => {
                    tracing::debug!("Ignoring unknown argument {}", other);
                    i += 1;
                }
            }
        }

        Ok(config)
    }
}

fn parse_value<T>(args: &[String], flag_idx: usize) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let flag = &args[flag_idx];
    let raw = args
        .get(flag_idx + 1)
        .with_context(|| format!("{} requires a value", flag))?;

    raw.parse().map_err(|e: <T as FromStr>::Err| {
        anyhow::anyhow!("invalid value {:?} for {}: {}", raw, flag, e)
    })
}
