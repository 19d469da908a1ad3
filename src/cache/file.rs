//! Directory-backed cache store.

use super::backend::CacheBackend;
use super::key::CacheKey;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::fs;

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// One file per key below `root`. Has no notion of expiry, so reports stored here go
/// through the `expires_at` bookkeeping in [`CacheManager`](super::CacheManager).
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(key: &CacheKey) -> String {
        key.as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(Self::file_name(key))
    }

    /// Private to one write call. The dots keep it apart from every entry name.
    fn staging_path_for(&self, key: &CacheKey) -> PathBuf {
        let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{}.tmp",
            Self::file_name(key),
            std::process::id(),
            seq
        ))
    }

    fn io_error(&self, field: &str, op: &str, err: std::io::Error) -> Error {
        Error::cache_with_context(
            format!("{} failed: {}", op, err),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("file_cache"),
        )
    }
}

#[async_trait]
impl CacheBackend for FileCache {
    async fn read(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(key.as_str(), "read", e)),
        }
    }

    async fn write(&self, key: &CacheKey, value: &[u8], _ttl: Option<Duration>) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| self.io_error(key.as_str(), "create_dir", e))?;
        // Readers only ever see complete entries; concurrent writers each rename
        // their own staging file, so the last rename wins.
        let target = self.path_for(key);
        let staging = self.staging_path_for(key);
        if let Err(e) = fs::write(&staging, value).await {
            let _ = fs::remove_file(&staging).await;
            return Err(self.io_error(key.as_str(), "write", e));
        }
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(self.io_error(key.as_str(), "rename", e));
        }
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(key.as_str(), "delete", e)),
        }
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(&self.root.display().to_string(), "clear", e)),
        }
    }

    fn native_ttl(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_file_cache_round_trip_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("reports"));
        let key = CacheKey::new("prefix:abc_expires_at");

        assert!(cache.read(&key).await.unwrap().is_none());
        cache.write(&key, b"payload", None).await.unwrap();
        assert_eq!(cache.read(&key).await.unwrap(), Some(b"payload".to_vec()));
        assert!(dir.path().join("reports").join("prefix_abc_expires_at").exists());

        assert!(cache.delete(&key).await.unwrap());
        assert!(!cache.delete(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_file_cache_clear_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("never-created"));
        cache.clear().await.unwrap();
        assert!(!cache.native_ttl());
    }

    #[tokio::test]
    async fn test_file_cache_clear_failure_names_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("not-a-dir");
        std::fs::write(&root, b"plain file").unwrap();
        let cache = FileCache::new(&root);

        let err = cache.clear().await.unwrap_err();
        let context = err.context().unwrap();
        assert_eq!(context.source.as_deref(), Some("file_cache"));
        assert_eq!(
            context.field_path.as_deref(),
            Some(root.display().to_string().as_str())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_writers_leave_one_complete_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(FileCache::new(dir.path()));
        let key = CacheKey::new("racing");
        let large = vec![b'L'; 4 * 1024 * 1024];
        let small = vec![b's'; 1024];

        for _ in 0..20 {
            let writers: Vec<_> = (0..4)
                .map(|i| {
                    let cache = cache.clone();
                    let key = key.clone();
                    let value = if i % 2 == 0 { large.clone() } else { small.clone() };
                    tokio::spawn(async move { cache.write(&key, &value, None).await })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }
            let stored = cache.read(&key).await.unwrap().unwrap();
            assert!(stored == large || stored == small, "torn entry of {} bytes", stored.len());
        }

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "staging files left: {:?}", leftovers);
    }
}
