//! Cache backend implementations.

use super::key::CacheKey;
use crate::{Error, Result};
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Clone)]
struct CacheEntry {
    data: Vec<u8>,
    created_at: Instant,
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.ttl.map(|ttl| self.created_at.elapsed() > ttl).unwrap_or(false)
    }
}

/// Storage a report cache writes through.
///
/// Backends with `native_ttl()` expire entries on their own; the others keep entries
/// until overwritten and leave expiry bookkeeping to the caller.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn read(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;
    /// `ttl` is honoured only when `native_ttl()` is true.
    async fn write(&self, key: &CacheKey, value: &[u8], ttl: Option<Duration>) -> Result<()>;
    async fn delete(&self, key: &CacheKey) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
    fn native_ttl(&self) -> bool;
    fn name(&self) -> &'static str;
}

/// In-process LRU store.
pub struct MemoryCache {
    entries: Arc<Mutex<LruCache<String, CacheEntry>>>,
    honor_ttl: bool,
}

impl MemoryCache {
    /// Store with native TTL support.
    pub fn new(max_entries: usize) -> Self {
        Self::with_ttl_support(max_entries, true)
    }

    /// Store that ignores TTLs, like a plain key/value store.
    pub fn without_ttl(max_entries: usize) -> Self {
        Self::with_ttl_support(max_entries, false)
    }

    fn with_ttl_support(max_entries: usize, honor_ttl: bool) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(cap))),
            honor_ttl,
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.iter().filter(|(_, e)| !e.is_expired()).count())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String, CacheEntry>>> {
        self.entries.lock().map_err(|_| Error::cache("memory cache lock poisoned"))
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn read(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let mut entries = self.lock()?;
        let expired = match entries.get(key.as_str()) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.data.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key.as_str());
        }
        Ok(None)
    }
    async fn write(&self, key: &CacheKey, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let ttl = if self.honor_ttl { ttl } else { None };
        self.lock()?.put(key.as_str().to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }
    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.lock()?.pop(key.as_str()).is_some())
    }
    async fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
    fn native_ttl(&self) -> bool {
        self.honor_ttl
    }
    fn name(&self) -> &'static str {
        if self.honor_ttl {
            "memory"
        } else {
            "memory_plain"
        }
    }
}

/// Store that keeps nothing; every read misses.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn read(&self, _: &CacheKey) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
    async fn write(&self, _: &CacheKey, _: &[u8], _: Option<Duration>) -> Result<()> {
        Ok(())
    }
    async fn delete(&self, _: &CacheKey) -> Result<bool> {
        Ok(false)
    }
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
    fn native_ttl(&self) -> bool {
        true
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
