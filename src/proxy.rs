//! Request orchestration: count, then cache, then fetch
//!
//! [`PageProxy::get_page`] is the single public entry point. Every call is
//! counted before the cache is consulted, so the counter reflects hits as well
//! as misses, and the fetcher only runs when the cache has no live entry.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use crate::cache::CacheLayer;
use crate::counter::AccessCounter;
use crate::fetcher::{FetchError, Fetcher, HttpFetcher};
use crate::identifier::{Identifier, IdentifierError};
use crate::store::{KeyValueStore, StoreError};

/// Errors surfaced to callers of [`PageProxy`]
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The URL was rejected before any store access
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(#[from] IdentifierError),

    /// The key-value store failed and the request was aborted.
    ///
    /// Covers both an unreachable store ([`StoreError::Unavailable`]) and a
    /// reachable store that rejected a command ([`StoreError::Command`], e.g.
    /// a non-numeric counter). Either way the request cannot be counted.
    #[error("{0}")]
    StoreUnavailable(#[from] StoreError),

    /// The page could not be retrieved; the cache was left untouched
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Memoizing access proxy over a shared key-value store
pub struct PageProxy<F = HttpFetcher> {
    counter: AccessCounter,
    cache: CacheLayer,
    fetcher: F,
}

impl PageProxy<HttpFetcher> {
    /// Creates a proxy that fetches over HTTP with the default TTL
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_fetcher(store, HttpFetcher::new())
    }
}

impl<F: Fetcher> PageProxy<F> {
    /// Creates a proxy around a custom fetcher with the default TTL
    pub fn with_fetcher(store: Arc<dyn KeyValueStore>, fetcher: F) -> Self {
        Self {
            counter: AccessCounter::new(Arc::clone(&store)),
            cache: CacheLayer::new(store),
            fetcher,
        }
    }

    /// Replaces the cache TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache.set_ttl(ttl);
        self
    }

    /// TTL applied to cached pages
    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Returns the content behind `url`, serving from cache for up to one TTL.
    ///
    /// # Behavior
    /// 1. `url` is validated; a malformed URL fails without touching the store
    /// 2. The access counter for `url` is incremented, always
    /// 3. A live cached copy is returned as-is, otherwise the page is fetched,
    ///    cached and returned
    #[instrument(skip(self))]
    pub async fn get_page(&self, url: &str) -> Result<String, ProxyError> {
        let id = Identifier::parse(url)?;

        self.counter.record_access(&id).await?;

        let fetcher = &self.fetcher;
        let id_ref = &id;
        self.cache
            .get_or_compute(&id, move || async move {
                fetcher.fetch(id_ref).await.map_err(ProxyError::from)
            })
            .await
    }

    /// How many times `url` has been requested through any proxy sharing this store
    pub async fn access_count(&self, url: &str) -> Result<u64, ProxyError> {
        let id = Identifier::parse(url)?;
        Ok(self.counter.count(&id).await?)
    }
}
