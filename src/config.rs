//! Server configuration.
//!
//! Values come from command-line flags first, then `MEMKV_*` environment variables, then
//! defaults. Parsing is pure: callers pass the argument list and an environment lookup,
//! so tests never touch the real process environment.

use anyhow::{Context, Result, anyhow, bail};
use std::net::SocketAddr;

use crate::limiter::bucket::TokenBucket;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

pub const ENV_BIND: &str = "MEMKV_BIND";
pub const ENV_RATE_CAPACITY: &str = "MEMKV_RATE_CAPACITY";
pub const ENV_RATE_PER_SEC: &str = "MEMKV_RATE_PER_SEC";
pub const ENV_LOG_LEVEL: &str = "MEMKV_LOG_LEVEL";

pub const USAGE: &str = "\
Usage: memkv [--bind <addr:port>] [--rate-capacity <n>] [--rate-per-sec <r>] [--log-level <lvl>]

  --bind <addr:port>     listen address (env MEMKV_BIND, default 0.0.0.0:8080)
  --rate-capacity <n>    token bucket burst size; enables rate limiting (env MEMKV_RATE_CAPACITY)
  --rate-per-sec <r>     token refill rate per second, defaults to the capacity (env MEMKV_RATE_PER_SEC)
  --log-level <lvl>      trace|debug|info|warn|error (env MEMKV_LOG_LEVEL, default info)
  --help                 print this message";

/// Token bucket parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub capacity: u32,
    pub refill_per_sec: f64,
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<()> {
        TokenBucket::check_params(self.capacity, self.refill_per_sec)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// `None` disables the admission limiter entirely.
    pub rate_limit: Option<RateLimitConfig>,
    pub log_level: tracing::Level,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            rate_limit: None,
            log_level: tracing::Level::INFO,
        }
    }
}

impl ServerConfig {
    /// Reads the real process arguments (minus the program name) and environment.
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1), |name| std::env::var(name).ok())
    }

    /// Builds a config from `args` (without the program name) and an environment lookup.
    pub fn from_args<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut bind: Option<String> = None;
        let mut capacity: Option<String> = None;
        let mut rate: Option<String> = None;
        let mut level: Option<String> = None;

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let slot = match flag.as_str() {
                "--bind" => &mut bind,
                "--rate-capacity" => &mut capacity,
                "--rate-per-sec" => &mut rate,
                "--log-level" => &mut level,
                other => bail!("unknown argument: {other}"),
            };
            let value = args
                .next()
                .ok_or_else(|| anyhow!("{flag} requires a value"))?;
            *slot = Some(value);
        }

        let bind = bind.or_else(|| env(ENV_BIND));
        let capacity = capacity.or_else(|| env(ENV_RATE_CAPACITY));
        let rate = rate.or_else(|| env(ENV_RATE_PER_SEC));
        let level = level.or_else(|| env(ENV_LOG_LEVEL));

        let bind_addr: SocketAddr = bind
            .as_deref()
            .unwrap_or(DEFAULT_BIND)
            .parse()
            .context("invalid bind address")?;

        let rate_limit = match capacity {
            Some(capacity) => {
                let capacity: u32 = capacity
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid rate limit capacity: {capacity}"))?;
                let refill_per_sec = match rate {
                    Some(rate) => rate
                        .trim()
                        .parse::<f64>()
                        .with_context(|| format!("invalid rate limit refill rate: {rate}"))?,
                    None => capacity as f64,
                };
                let cfg = RateLimitConfig {
                    capacity,
                    refill_per_sec,
                };
                cfg.validate()?;
                Some(cfg)
            }
            None if rate.is_some() => bail!("a refill rate needs a rate limit capacity"),
            None => None,
        };

        let log_level = match level {
            Some(level) => level
                .trim()
                .parse::<tracing::Level>()
                .map_err(|_| anyhow!("invalid log level: {level}"))?,
            None => tracing::Level::INFO,
        };

        Ok(Self {
            bind_addr,
            rate_limit,
            log_level,
        })
    }
}
