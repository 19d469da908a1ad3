//! 报表缓存模块：为组装好的报表组件序列提供可插拔的缓存后端。
//!
//! # Report Caching Module
//!
//! Assembled reports are cached under a key derived from the report class and its
//! construction options, so repeated requests for the same report skip `do_query`
//! until the entry goes stale.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | The fetch-or-compute template with both storage strategies |
//! | [`CacheConfig`] | Default TTL, size limit, key prefix, on/off switch |
//! | [`CacheBackend`] | Trait for implementing custom cache backends |
//! | [`MemoryCache`] | In-memory LRU store, with or without native TTL |
//! | [`FileCache`] | Directory store without native TTL |
//! | [`NullCache`] | No-op cache for disabling caching |
//! | [`CacheKey`] | Report cache key derivation |
//! | [`Clock`] | Wall-clock source for `expires_at` bookkeeping |
//!
//! ## Example
//!
//! ```rust
//! use report_engine::cache::{CacheConfig, CacheManager, MemoryCache};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryCache::new(1000)); // max 1000 entries
//! let config = CacheConfig::default().with_ttl_secs(300);
//! let cache = CacheManager::new(config, backend);
//! assert_eq!(cache.backend_name(), "memory");
//! ```

mod backend;
mod clock;
mod file;
mod key;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use file::FileCache;
pub use key::{CacheKey, ReportOptions};
pub use manager::{CacheConfig, CacheManager, CacheOutcome, CacheStats};
