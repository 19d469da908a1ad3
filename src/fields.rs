//! Persisted values of editable text components.
//!
//! When a user edits a text in a rendered report, the client posts the new values
//! to the report's `data_post_url`. The application stores them as a
//! [`FieldSubmission`]; [`Report::update`](crate::report::Report::update) later
//! looks the latest one up and writes the values back into the report.

use crate::cache::CacheKey;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSubmission {
    pub user_id: u64,
    pub project_id: u64,
    /// Cache key of the report the values belong to.
    pub key: CacheKey,
    /// Component key (`<report_class>/<index>`) to new value.
    pub values: BTreeMap<String, String>,
    pub submitted_at: DateTime<Utc>,
}

impl FieldSubmission {
    pub fn new(user_id: u64, project_id: u64, key: CacheKey) -> Self {
        Self {
            user_id,
            project_id,
            key,
            values: BTreeMap::new(),
            submitted_at: Utc::now(),
        }
    }

    pub fn with_value(
        mut self,
        component_key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.values.insert(component_key.into(), value.into());
        self
    }
}

#[async_trait]
pub trait EditableFieldStore: Send + Sync {
    /// Most recent submission by `user_id` in `project_id` for the report keyed `key`.
    async fn latest_submission(
        &self,
        user_id: u64,
        project_id: u64,
        key: &CacheKey,
    ) -> Result<Option<FieldSubmission>>;
}

/// Store without any submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFieldStore;

#[async_trait]
impl EditableFieldStore for NoFieldStore {
    async fn latest_submission(
        &self,
        _: u64,
        _: u64,
        _: &CacheKey,
    ) -> Result<Option<FieldSubmission>> {
        Ok(None)
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Default)]
pub struct InMemoryFieldStore {
    submissions: RwLock<Vec<FieldSubmission>>,
}

impl InMemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, submission: FieldSubmission) -> Result<()> {
        self.submissions
            .write()
            .map_err(|_| Error::field_store("submission lock poisoned"))?
            .push(submission);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.submissions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EditableFieldStore for InMemoryFieldStore {
    async fn latest_submission(
        &self,
        user_id: u64,
        project_id: u64,
        key: &CacheKey,
    ) -> Result<Option<FieldSubmission>> {
        let submissions = self
            .submissions
            .read()
            .map_err(|_| Error::field_store("submission lock poisoned"))?;
        Ok(submissions
            .iter()
            .rev()
            .find(|s| s.user_id == user_id && s.project_id == project_id && &s.key == key)
            .cloned())
    }
}
