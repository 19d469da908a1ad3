//! Cache manager.

use super::backend::CacheBackend;
use super::clock::{Clock, SystemClock};
use super::key::CacheKey;
use crate::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Off means every fetch computes, as with a zero TTL.
    pub enabled: bool,
    /// TTL for reports that do not override `expires_in`.
    pub default_ttl_secs: u64,
    /// Serialized reports above this size are not stored.
    pub max_entry_size: usize,
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: 60,
            max_entry_size: 10 * 1024 * 1024,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.default_ttl_secs = secs;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_max_entry_size(mut self, bytes: usize) -> Self {
        self.max_entry_size = bytes;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// How a [`CacheManager::fetch`] call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Caching was off for this call (zero TTL or disabled cache); computed directly.
    Bypassed,
    /// Served from the backend.
    Hit,
    /// Computed and written back.
    Miss,
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Query/cache template shared by all reports.
///
/// Two storage strategies, picked by [`CacheBackend::native_ttl`]:
///
/// * native TTL: a single entry written with the TTL, read back as-is;
/// * no native TTL: the data entry plus a `<key>_expires_at` timestamp entry. The
///   data is served only while the timestamp lies in the future, otherwise it is
///   recomputed and both entries are rewritten.
///
/// Concurrent callers racing on a cold key may all compute and write; the last
/// write wins.
#[derive(Clone)]
pub struct CacheManager {
    config: CacheConfig,
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    stats: Arc<AtomicStats>,
}

impl CacheManager {
    pub fn new(config: CacheConfig, backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_clock(config, backend, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: CacheConfig,
        backend: Arc<dyn CacheBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            backend,
            clock,
            stats: Arc::new(AtomicStats::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Serve `key` from the cache, or run `compute` and store its result for `ttl`.
    ///
    /// A zero `ttl` always computes and never touches the backend. Backend failures
    /// and undecodable data entries are returned as errors, never retried.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<(T, CacheOutcome)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if ttl.is_zero() || !self.config.enabled {
            debug!(key = %key, "report cache bypassed");
            return Ok((compute().await?, CacheOutcome::Bypassed));
        }
        let key = self.prefix_key(key);
        if self.backend.native_ttl() {
            self.fetch_native(&key, ttl, compute).await
        } else {
            self.fetch_with_expiry(&key, ttl, compute).await
        }
    }

    async fn fetch_native<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<(T, CacheOutcome)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(data) = self.read(key).await? {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, backend = self.backend.name(), "report cache hit");
            return Ok((self.decode(&data)?, CacheOutcome::Hit));
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        info!(key = %key, backend = self.backend.name(), "report cache miss, computing");
        let value = compute().await?;
        self.store(key, &value, Some(ttl)).await?;
        Ok((value, CacheOutcome::Miss))
    }

    async fn fetch_with_expiry<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<(T, CacheOutcome)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let expiry_key = key.expiry_key();
        let fresh = match self.read(&expiry_key).await? {
            Some(raw) => match serde_json::from_slice::<DateTime<Utc>>(&raw) {
                Ok(expires_at) => expires_at > self.clock.now(),
                Err(e) => {
                    warn!(key = %expiry_key, error = %e, "unparsable expiry entry, recomputing");
                    false
                }
            },
            None => false,
        };
        if fresh {
            if let Some(data) = self.read(key).await? {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, backend = self.backend.name(), "report cache hit");
                return Ok((self.decode(&data)?, CacheOutcome::Hit));
            }
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        info!(
            key = %key,
            backend = self.backend.name(),
            "report cache stale or missing, computing"
        );
        let value = compute().await?;
        if self.store(key, &value, None).await? {
            let step = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
            let expires_at = self
                .clock
                .now()
                .checked_add_signed(step)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            self.write(&expiry_key, &serde_json::to_vec(&expires_at)?, None).await?;
        }
        Ok((value, CacheOutcome::Miss))
    }

    /// Drop the cached entry for `key`, including its expiry entry.
    pub async fn invalidate(&self, key: &CacheKey) -> Result<bool> {
        let key = self.prefix_key(key);
        let data = self.delete(&key).await?;
        let expiry = self.delete(&key.expiry_key()).await?;
        Ok(data || expiry)
    }

    async fn store<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let data = serde_json::to_vec(value)?;
        if data.len() > self.config.max_entry_size {
            debug!(
                key = %key,
                size = data.len(),
                limit = self.config.max_entry_size,
                "report too large to cache"
            );
            return Ok(false);
        }
        self.write(key, &data, ttl).await?;
        Ok(true)
    }

    async fn read(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        self.backend.read(key).await.map_err(|e| {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
            e
        })
    }

    async fn write(&self, key: &CacheKey, data: &[u8], ttl: Option<Duration>) -> Result<()> {
        match self.backend.write(key, data, ttl).await {
            Ok(()) => {
                self.stats.sets.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, backend = self.backend.name(), error = %e, "cache write failed");
                Err(e)
            }
        }
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        match self.backend.delete(key).await {
            Ok(deleted) => {
                if deleted {
                    self.stats.deletes.fetch_add(1, Ordering::Relaxed);
                }
                Ok(deleted)
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        serde_json::from_slice(data).map_err(|e| {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
            Error::Serialization(e)
        })
    }

    fn prefix_key(&self, key: &CacheKey) -> CacheKey {
        match self.config.key_prefix {
            Some(ref prefix) => CacheKey::new(format!("{}:{}", prefix, key.hash)),
            None => key.clone(),
        }
    }
}
