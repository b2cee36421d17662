//! Per-identifier access counting

use std::sync::Arc;

use tracing::debug;

use crate::identifier::Identifier;
use crate::store::{KeyValueStore, StoreError};

/// Counts every logical request for an identifier, hit or miss
#[derive(Clone)]
pub struct AccessCounter {
    store: Arc<dyn KeyValueStore>,
}

impl AccessCounter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Adds one to the counter for `id`, creating it at 1.
    ///
    /// A store failure is returned to the caller; the request must not
    /// proceed uncounted.
    pub async fn record_access(&self, id: &Identifier) -> Result<(), StoreError> {
        let count = self.store.increment(&id.counter_key()).await?;
        debug!(url = %id, count, "Recorded access");
        Ok(())
    }

    /// Current counter value for `id`, 0 if it was never accessed
    pub async fn count(&self, id: &Identifier) -> Result<u64, StoreError> {
        let key = id.counter_key();
        match self.store.get(&key).await? {
            None => Ok(0),
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                StoreError::Command(format!("counter '{}' holds non-numeric value '{}'", key, raw))
            }),
        }
    }
}
