//! In-process TTL cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{CacheError, KeyValueCache};

#[derive(Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Thread-safe map with per-entry expiry.
///
/// Expired entries are dropped lazily when read.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet read.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`] when the lock is poisoned.
    pub fn len(&self) -> Result<usize, CacheError> {
        Ok(self.lock()?.len())
    }

    /// Whether nothing is stored.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`] when the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::Backend {
            message: "memory cache lock poisoned".to_owned(),
        })
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.lock()?
            .insert(key.to_owned(), Entry { value, expires_at });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn stores_until_expiry() {
        let cache = MemoryCache::new();
        cache
            .set("forecast:1", vec![1, 2, 3], Duration::from_secs(60))
            .await
            .expect("set");
        assert_eq!(
            cache.get("forecast:1").await.expect("get"),
            Some(vec![1, 2, 3])
        );
        assert_eq!(cache.get("forecast:2").await.expect("get"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn expired_entries_are_dropped() {
        let cache = MemoryCache::new();
        cache
            .set("stats:1", vec![9], Duration::ZERO)
            .await
            .expect("set");
        assert_eq!(cache.len().expect("len"), 1);
        assert_eq!(cache.get("stats:1").await.expect("get"), None);
        assert!(cache.is_empty().expect("is_empty"));
    }
}
