//! Key-value store adapter
//!
//! The proxy keeps all shared state in an external associative store that
//! offers three atomic primitives: `GET`, `SETEX` and `INCR`. Anything that
//! implements [`KeyValueStore`] can back the proxy; this module ships an
//! in-process [`MemoryStore`] and a Redis-backed [`RedisStore`].

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// How often a [`MemoryStore`] opened through [`StoreEndpoint`] drops expired entries
pub const MEMORY_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Errors reported by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (connection refused, dropped, timed out)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store was reachable but rejected the command
    #[error("Store command failed: {0}")]
    Command(String),
}

/// The three atomic operations the proxy relies on.
///
/// Implementations must make each call atomic on its own; the proxy never
/// holds a lock across calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the live value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value and expiry.
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Atomically adds one to the integer under `key`, creating it at 1.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;
}

/// Where the proxy keeps its counters and cached pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEndpoint {
    /// Process-local map; state is lost on exit
    Memory,
    /// A Redis server, e.g. `redis://127.0.0.1:6379`
    Redis(String),
}

impl StoreEndpoint {
    /// Opens a store handle for this endpoint.
    ///
    /// A memory store gets a background sweeper, so this must run inside a
    /// tokio runtime.
    pub async fn connect(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        match self {
            StoreEndpoint::Memory => {
                let store = MemoryStore::new();
                store.spawn_sweeper(MEMORY_SWEEP_INTERVAL);
                Ok(Arc::new(store))
            }
            StoreEndpoint::Redis(url) => Ok(Arc::new(RedisStore::connect(url).await?)),
        }
    }
}

impl FromStr for StoreEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("memory") {
            Ok(StoreEndpoint::Memory)
        } else if s.starts_with("redis://") || s.starts_with("rediss://") {
            Ok(StoreEndpoint::Redis(s.to_string()))
        } else {
            Err(format!(
                "Unknown store endpoint '{}'. Use 'memory' or a redis:// URL",
                s
            ))
        }
    }
}
