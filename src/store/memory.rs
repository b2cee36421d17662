//! In-process key-value store with expiry
//!
//! Expired entries are treated as absent on read and physically removed by
//! [`MemoryStore::purge_expired`], which [`MemoryStore::spawn_sweeper`] runs on
//! a background interval.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

use super::{KeyValueStore, StoreError};

/// A stored value and its optional deadline
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Thread-safe in-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of physically stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes all expired entries and returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Spawns a task that purges expired entries every `interval`.
    ///
    /// Must be called from within a tokio runtime. Abort the returned handle
    /// to stop sweeping.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip the first tick (immediate)
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = store.purge_expired();
                trace!(removed, "Memory store sweep");
            }
        })
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let expires_at = Instant::now().checked_add(ttl).ok_or_else(|| {
            StoreError::Command(format!("expiry of {:?} for '{}' is out of range", ttl, key))
        })?;
        let entry = Entry {
            value: value.to_string(),
            expires_at: Some(expires_at),
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.write();

        // Like INCR, a live value keeps its expiry and a dead one starts over.
        let (current, expires_at) = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let current = entry.value.parse::<i64>().map_err(|_| {
                    StoreError::Command(format!("value at '{}' is not an integer", key))
                })?;
                (current, entry.expires_at)
            }
            _ => (0, None),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Command(format!("increment of '{}' would overflow", key)))?;

        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at,
            },
        );
        Ok(next)
    }
}
