//! Cache key generation.

use crate::utils::underscore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const EXPIRY_SUFFIX: &str = "_expires_at";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Side-channel key holding the expiry timestamp for stores without native TTL.
    pub fn expiry_key(&self) -> CacheKey {
        CacheKey::new(format!("{}{}", self.hash, EXPIRY_SUFFIX))
    }

    /// Derive the key of a report from its class name and construction options.
    ///
    /// `MD5(underscore(class) + key1 + value1 + key2 + value2 ...)` with option keys
    /// in sorted order, hex encoded. Independent of option insertion order.
    pub fn for_report(class_name: &str, options: &ReportOptions) -> Self {
        let mut canonical = underscore(class_name);
        for (k, v) in options.iter() {
            canonical.push_str(k);
            canonical.push_str(v);
        }
        Self::new(format!("{:x}", md5::compute(canonical.as_bytes())))
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Construction options of a report, kept sorted by key.
///
/// Values are stored in their display form since that is all the key derivation sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    values: BTreeMap<String, String>,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
