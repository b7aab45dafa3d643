//! Errors raised by cache backends and the value codec.

use std::time::Duration;

use thiserror::Error;

/// Failures reading, writing or decoding cached values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    /// The backend did not answer within the allotted time.
    #[error("cache call for {key} timed out after {after:?}")]
    Timeout {
        /// Rendered cache key.
        key: String,
        /// Timeout that elapsed.
        after: Duration,
    },
    /// A value could not be encoded.
    #[error("failed to encode cache value: {source}")]
    Encode {
        /// Codec error.
        #[source]
        source: bincode::Error,
    },
    /// Stored bytes could not be decoded.
    #[error("failed to decode cache value: {source}")]
    Decode {
        /// Codec error.
        #[source]
        source: bincode::Error,
    },
    /// The backend failed.
    #[error("cache backend failed: {message}")]
    Backend {
        /// Backend error description.
        message: String,
    },
}
