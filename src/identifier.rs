//! Resource identifiers and the store key scheme derived from them
//!
//! An [`Identifier`] is the requested URL exactly as the caller passed it. It
//! names two independent store entries: an access counter under
//! `count:<url>` and a cached page under `cached:<url>`.

use std::fmt;

use reqwest::Url;
use thiserror::Error;

/// Key prefix for per-identifier access counters
pub const COUNTER_PREFIX: &str = "count:";

/// Key prefix for cached page content
pub const CACHE_PREFIX: &str = "cached:";

/// Errors raised when a string cannot be used as an identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// Nothing but whitespace was supplied
    #[error("URL must not be empty")]
    Empty,

    /// The string is not a parseable URL
    #[error("Invalid URL '{url}': {reason}")]
    Invalid { url: String, reason: String },

    /// Only http and https resources can be fetched
    #[error("Unsupported URL scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },
}

/// A validated URL used as both counter and cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    raw: String,
}

impl Identifier {
    /// Validates `input` as an http(s) URL.
    ///
    /// The original text is kept as the key; it is not normalized, so two
    /// spellings of the same URL are counted and cached separately.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        if input.trim().is_empty() {
            return Err(IdentifierError::Empty);
        }

        // The URL parser trims this, but the key would not
        if input.trim() != input {
            return Err(IdentifierError::Invalid {
                url: input.to_string(),
                reason: "leading or trailing whitespace".to_string(),
            });
        }

        let url = Url::parse(input).map_err(|e| IdentifierError::Invalid {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Self {
                raw: input.to_string(),
            }),
            other => Err(IdentifierError::UnsupportedScheme {
                url: input.to_string(),
                scheme: other.to_string(),
            }),
        }
    }

    /// The URL as originally supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Store key of the access counter for this identifier
    pub fn counter_key(&self) -> String {
        format!("{}{}", COUNTER_PREFIX, self.raw)
    }

    /// Store key of the cached content for this identifier
    pub fn cache_key(&self) -> String {
        format!("{}{}", CACHE_PREFIX, self.raw)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
