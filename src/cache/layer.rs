//! Read-through cache over the key-value store
//!
//! Provides a `CacheLayer` that returns a live cached value for an identifier
//! or runs the supplied computation, stores its result with a fixed TTL and
//! returns it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::identifier::Identifier;
use crate::store::{KeyValueStore, StoreError};

/// How long a cached page stays live
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Caches computed content under `cached:<id>` for a fixed TTL
///
/// Concurrent misses for the same identifier are not deduplicated: each one
/// runs its own computation and writes the key, and the last write wins both
/// the content and the TTL window.
#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl CacheLayer {
    /// Creates a cache layer using [`DEFAULT_TTL`]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_ttl(store, DEFAULT_TTL)
    }

    /// Creates a cache layer with a custom TTL
    pub fn with_ttl(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Changes the TTL for subsequent writes; existing entries keep theirs
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    /// The TTL applied to every write
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `id` if one is live, without computing
    pub async fn peek(&self, id: &Identifier) -> Result<Option<String>, StoreError> {
        self.store.get(&id.cache_key()).await
    }

    /// Returns the cached content for `id`, or computes, stores and returns it.
    ///
    /// # Arguments
    /// * `id` - Identifier whose `cached:` entry is consulted
    /// * `compute` - Produces fresh content; only invoked on a miss
    ///
    /// # Returns
    /// * `Ok(String)` - Cached content on a hit, fresh content on a miss
    /// * `Err(E)` - A store failure, or the computation's own error
    ///
    /// # Behavior
    /// - A hit returns the stored value verbatim and never calls `compute`
    /// - A miss (absent or expired) calls `compute` once
    /// - The result is written with a TTL starting now, only if `compute` succeeded
    pub async fn get_or_compute<F, Fut, E>(&self, id: &Identifier, compute: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: From<StoreError>,
    {
        let key = id.cache_key();

        if let Some(content) = self.store.get(&key).await? {
            debug!(url = %id, "Cache hit");
            return Ok(content);
        }

        debug!(url = %id, "Cache miss");
        let content = compute().await?;

        self.store.set_with_expiry(&key, &content, self.ttl).await?;
        debug!(url = %id, ttl_secs = self.ttl.as_secs_f64(), bytes = content.len(), "Cached page");

        Ok(content)
    }
}
