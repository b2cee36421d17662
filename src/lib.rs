//! pagecache library
//!
//! A memoizing access proxy: [`PageProxy::get_page`] returns the content behind
//! a URL, caching it in a shared key-value store for a short TTL and counting
//! every request for that URL whether or not it was served from cache.

pub mod cache;
pub mod cli;
pub mod counter;
pub mod fetcher;
pub mod identifier;
pub mod proxy;
pub mod store;

pub use cache::{CacheLayer, DEFAULT_TTL};
pub use counter::AccessCounter;
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use identifier::{Identifier, IdentifierError};
pub use proxy::{PageProxy, ProxyError};
pub use store::{KeyValueStore, MemoryStore, RedisStore, StoreEndpoint, StoreError};
