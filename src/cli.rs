//! Command-line interface parsing for pagecache
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`ProxyConfig`] before any store or network access happens.

use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::store::StoreEndpoint;

/// Largest accepted `--ttl`, so the expiry fits a signed millisecond count
pub const MAX_TTL_SECS: u64 = i64::MAX as u64 / 1000;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The store endpoint is neither `memory` nor a Redis URL
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// A zero TTL would make every request a miss
    #[error("Invalid TTL: must be at least 1 second")]
    ZeroTtl,

    /// The TTL does not fit a millisecond expiry
    #[error("Invalid TTL: must be at most {max} seconds")]
    TtlTooLarge { max: u64 },

    /// `--repeat 0` would do nothing
    #[error("Invalid repeat count: must be at least 1")]
    ZeroRepeat,
}

/// pagecache - fetch pages through a counting, short-lived cache
#[derive(Parser, Debug)]
#[command(name = "pagecache")]
#[command(about = "Fetch URLs through a shared cache that counts every access")]
#[command(version)]
pub struct Cli {
    /// Key-value store holding counters and cached pages
    ///
    /// Either `memory` (process-local, forgotten on exit) or a Redis URL such
    /// as `redis://127.0.0.1:6379`.
    #[arg(long, global = true, env = "PAGECACHE_STORE", default_value = "memory")]
    pub store: String,

    /// Seconds a fetched page stays cached
    #[arg(long, global = true, value_name = "SECONDS", default_value_t = 10)]
    pub ttl: u64,

    /// Log cache hits, misses and counts to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the content of each URL, counting the access
    Get {
        /// URLs to fetch, in order
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        /// Request the whole URL list this many times
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },

    /// Print how many times each URL has been requested
    Count {
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },
}

/// Settings derived from CLI arguments for building the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Where counters and cached pages live
    pub store: StoreEndpoint,
    /// Lifetime of a cached page
    pub ttl: Duration,
}

impl ProxyConfig {
    /// Creates a ProxyConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ProxyConfig)` with the store endpoint and TTL
    /// * `Err(CliError)` if any argument is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let store = cli.store.parse::<StoreEndpoint>().map_err(CliError::InvalidStore)?;

        if cli.ttl == 0 {
            return Err(CliError::ZeroTtl);
        }

        if cli.ttl > MAX_TTL_SECS {
            return Err(CliError::TtlTooLarge { max: MAX_TTL_SECS });
        }

        if let Command::Get { repeat: 0, .. } = cli.command {
            return Err(CliError::ZeroRepeat);
        }

        Ok(ProxyConfig {
            store,
            ttl: Duration::from_secs(cli.ttl),
        })
    }
}
