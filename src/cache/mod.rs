//! Cache layer for fetched pages
//!
//! Wraps any content-producing computation with a read-through lookup in the
//! key-value store. Entries live for a fixed TTL and are then absent; there is
//! no stale fallback and no size bound.

mod layer;

pub use layer::{CacheLayer, DEFAULT_TTL};
