//! 报表模块：报表定义、组件构建与缓存查询流程。
//!
//! # Reports Module
//!
//! A report type implements [`ReportDefinition`]: it names itself, declares its
//! options and fills a [`ComponentBuilder`] in `do_query`. The engine wraps it in a
//! [`Report`], which runs the cached query pipeline and exposes the loaded
//! components to accessors and exporters.
//!
//! ## Example
//!
//! ```rust
//! use report_engine::report::{ComponentBuilder, ReportDefinition};
//! use report_engine::{ReportEngine, ReportOptions, Result};
//!
//! struct RunSummary { project_id: u64 }
//!
//! #[async_trait::async_trait]
//! impl ReportDefinition for RunSummary {
//!     fn class_name(&self) -> &str { "Report::RunSummary" }
//!     fn name(&self) -> &str { "Run summary" }
//!     fn options(&self) -> ReportOptions {
//!         ReportOptions::new().with("project_id", self.project_id)
//!     }
//!
//!     async fn do_query(&self, b: &mut ComponentBuilder) -> Result<()> {
//!         b.h1("Run summary")?;
//!         b.show_params([("Project", self.project_id)])?;
//!         Ok(())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let engine = ReportEngine::builder().build();
//! let mut report = engine.report(RunSummary { project_id: 7 });
//! assert_eq!(report.components().await?.len(), 2);
//! # Ok::<(), report_engine::Error>(())
//! # }).unwrap();
//! ```

mod accessors;
mod builder;

pub use accessors::{ChartList, TableList};
pub use builder::ComponentBuilder;

use crate::cache::{CacheKey, CacheOutcome, ReportOptions};
use crate::component::{Component, ComponentRegistry, CsvOptions, Table};
use crate::engine::ReportEngine;
use crate::render::{PdfOptions, ReportDocument};
use crate::utils::underscore;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// A report type: identity, options and the query that builds its body.
#[async_trait]
pub trait ReportDefinition: Send + Sync {
    /// Class name the report is identified by, e.g. `Report::RunSummary`.
    /// Feeds the cache key and component keys, so it must be stable.
    fn class_name(&self) -> &str;

    fn name(&self) -> &str {
        "Unknown"
    }

    fn options(&self) -> ReportOptions {
        ReportOptions::new()
    }

    /// How long the assembled report stays cached. Zero disables caching.
    fn expires_in(&self, default: Duration) -> Duration {
        default
    }

    fn pdf_options(&self, defaults: &PdfOptions) -> PdfOptions {
        defaults.clone()
    }

    fn registry(&self) -> ComponentRegistry {
        ComponentRegistry::standard()
    }

    /// Build the report body. Runs only when no fresh cached copy exists.
    async fn do_query(&self, builder: &mut ComponentBuilder) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub components: Vec<Component>,
    pub outcome: CacheOutcome,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReportState {
    #[default]
    Unloaded,
    Loaded(LoadedData),
}

impl ReportState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ReportState::Loaded(_))
    }

    pub fn components(&self) -> Option<&[Component]> {
        match self {
            ReportState::Loaded(data) => Some(&data.components),
            ReportState::Unloaded => None,
        }
    }
}

/// One report instance, constructed per request.
pub struct Report<R> {
    definition: R,
    engine: ReportEngine,
    class_key: String,
    cache_key: CacheKey,
    state: ReportState,
}

impl<R: ReportDefinition> Report<R> {
    pub fn new(definition: R, engine: ReportEngine) -> Self {
        let class_key = underscore(definition.class_name());
        let cache_key = CacheKey::for_report(definition.class_name(), &definition.options());
        Self {
            definition,
            engine,
            class_key,
            cache_key,
            state: ReportState::Unloaded,
        }
    }

    pub fn definition(&self) -> &R {
        &self.definition
    }

    pub fn engine(&self) -> &ReportEngine {
        &self.engine
    }

    pub fn cache_key(&self) -> &CacheKey {
        &self.cache_key
    }

    /// Underscored class name, prefix of every component key.
    pub fn class_key(&self) -> &str {
        &self.class_key
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn expires_in(&self) -> Duration {
        self.definition
            .expires_in(self.engine.settings().cache.default_ttl())
    }

    /// Run the cache pipeline and replace the loaded data with its result.
    pub async fn query(&mut self) -> Result<CacheOutcome> {
        let data = self.run_query().await?;
        let outcome = data.outcome;
        self.transition(data);
        Ok(outcome)
    }

    async fn run_query(&self) -> Result<LoadedData> {
        let ttl = self.expires_in();
        let definition = &self.definition;
        let engine = &self.engine;
        let class_key = &self.class_key;
        let cache_key = &self.cache_key;
        let (components, outcome) = engine
            .cache()
            .fetch(cache_key, ttl, || async move {
                debug!(report = %class_key, key = %cache_key, "running do_query");
                let mut builder = ComponentBuilder::new(
                    class_key.clone(),
                    definition.name(),
                    cache_key.clone(),
                    definition.registry(),
                    engine.clone(),
                );
                definition.do_query(&mut builder).await?;
                Ok::<_, Error>(builder.into_components())
            })
            .await?;
        Ok(LoadedData {
            components,
            outcome,
        })
    }

    fn transition(&mut self, data: LoadedData) {
        info!(
            report = %self.class_key,
            key = %self.cache_key,
            outcome = ?data.outcome,
            components = data.components.len(),
            "report loaded"
        );
        self.state = ReportState::Loaded(data);
    }

    async fn loaded(&mut self) -> Result<&mut LoadedData> {
        if !self.state.is_loaded() {
            self.query().await?;
        }
        match &mut self.state {
            ReportState::Loaded(data) => Ok(data),
            ReportState::Unloaded => Err(Error::cache_with_context(
                "report has no data after query",
                ErrorContext::new()
                    .with_field_path(self.cache_key.as_str())
                    .with_source("report"),
            )),
        }
    }

    /// Loaded components, querying first when unloaded.
    pub async fn components(&mut self) -> Result<&[Component]> {
        let data: &LoadedData = self.loaded().await?;
        Ok(&data.components)
    }

    pub async fn to_data(&mut self) -> Result<&[Component]> {
        self.components().await
    }

    pub fn into_components(self) -> Option<Vec<Component>> {
        match self.state {
            ReportState::Loaded(data) => Some(data.components),
            ReportState::Unloaded => None,
        }
    }

    pub async fn tables(&mut self) -> Result<TableList<'_>> {
        let data = self.loaded().await?;
        Ok(TableList::new(
            data.components.iter_mut().filter_map(Component::as_table_mut).collect(),
        ))
    }

    pub async fn charts(&mut self) -> Result<ChartList<'_>> {
        let data = self.loaded().await?;
        Ok(ChartList::new(
            data.components.iter_mut().filter_map(Component::as_chart_mut).collect(),
        ))
    }

    /// Row `x` of the `table_index`-th table.
    pub async fn row(&mut self, x: usize, table_index: usize) -> Result<Option<&[String]>> {
        let data: &LoadedData = self.loaded().await?;
        let tables: Vec<_> = data.components.iter().filter_map(Component::as_table).collect();
        let table: &Table = tables.get(table_index).copied().ok_or(Error::TableIndexOutOfRange {
            index: table_index,
            available: tables.len(),
        })?;
        Ok(table.row(x))
    }

    pub async fn to_csv(&mut self, table_index: usize, options: &CsvOptions) -> Result<String> {
        let data: &LoadedData = self.loaded().await?;
        let tables: Vec<_> = data.components.iter().filter_map(Component::as_table).collect();
        let table: &Table = tables.get(table_index).copied().ok_or(Error::TableIndexOutOfRange {
            index: table_index,
            available: tables.len(),
        })?;
        table.to_csv(options)
    }

    pub async fn to_pdf(&mut self) -> Result<Vec<u8>> {
        self.loaded().await?;
        let options = self.definition.pdf_options(&self.engine.settings().pdf);
        self.engine.pdf_renderer().render(&self.document(), &options)
    }

    pub async fn to_spreadsheet(&mut self) -> Result<Vec<u8>> {
        self.loaded().await?;
        self.engine.spreadsheet_renderer().render(&self.document())
    }

    /// `{"type": "report", "components": [...]}`
    pub async fn to_json(&mut self) -> Result<serde_json::Value> {
        self.loaded().await?;
        self.document().to_json()
    }

    pub async fn to_json_string(&mut self) -> Result<String> {
        let value = self.to_json().await?;
        Ok(serde_json::to_string(&value)?)
    }

    /// Set where the client posts editable values: `<url><cache key>` on the meta component.
    pub async fn set_data_post_url(&mut self, url: &str) -> Result<()> {
        let value = format!("{}{}", url, self.cache_key);
        let registry = self.definition.registry();
        let data = self.loaded().await?;
        builder::find_or_insert_meta(&mut data.components, &registry)?.data_post_url = Some(value);
        Ok(())
    }

    /// Write the latest persisted editable-field submission into the matching texts.
    ///
    /// Every submitted key must match an editable text, otherwise nothing is
    /// changed and [`Error::UnmatchedEditableField`] is returned. Returns the number
    /// of texts updated.
    pub async fn update(&mut self, project_id: u64, user_id: u64) -> Result<usize> {
        self.loaded().await?;
        let store = self.engine.field_store().clone();
        let submission = match store
            .latest_submission(user_id, project_id, &self.cache_key)
            .await?
        {
            Some(submission) => submission,
            None => return Ok(0),
        };
        let data = self.loaded().await?;

        let mut targets = Vec::with_capacity(submission.values.len());
        for (key, value) in &submission.values {
            let index = data
                .components
                .iter()
                .position(|c| {
                    matches!(c, Component::Text(t) if t.key.as_deref() == Some(key.as_str()))
                })
                .ok_or_else(|| Error::UnmatchedEditableField { key: key.clone() })?;
            targets.push((index, value));
        }
        for (index, value) in &targets {
            if let Some(text) = data.components[*index].as_text_mut() {
                text.value = value.to_string();
            }
        }
        debug!(report = %self.class_key, updated = targets.len(), "applied editable field values");
        Ok(targets.len())
    }

    /// Drop this report's cached copy.
    pub async fn expire_cache(&self) -> Result<bool> {
        self.engine.cache().invalidate(&self.cache_key).await
    }

    fn document(&self) -> ReportDocument<'_> {
        ReportDocument {
            name: self.definition.name(),
            class_key: &self.class_key,
            cache_key: &self.cache_key,
            components: self.state.components().unwrap_or(&[]),
        }
    }
}
