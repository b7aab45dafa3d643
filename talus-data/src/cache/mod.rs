//! Key-value caching of fetched conditions and computed scores.
//!
//! Keys bucket locations into 0.1 degree cells so nearby reference points
//! share entries. Values are bincode-encoded and expire after the TTL of
//! their [`CacheKind`].

mod codec;
mod error;
mod key;
mod memory;

use std::time::Duration;

use async_trait::async_trait;

pub use codec::{decode, encode};
pub use error::CacheError;
pub use key::{CacheKey, CacheKind, SPATIAL_BUCKET_DEGREES, SpatialBucket, TemporalBucket};
pub use memory::MemoryCache;

/// Byte store with per-entry expiry.
///
/// Implementations may be remote, so every call is asynchronous and may
/// fail; callers treat failures as misses.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Fetch an unexpired value.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` for `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;
}
