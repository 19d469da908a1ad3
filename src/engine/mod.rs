//! Report engine: settings plus every injected collaborator.

mod builder;

pub use builder::ReportEngineBuilder;

use crate::cache::CacheManager;
use crate::config::ReportSettings;
use crate::fields::EditableFieldStore;
use crate::render::{PdfRenderer, SpreadsheetRenderer};
use crate::report::{Report, ReportDefinition};
use std::sync::Arc;

/// Shared handle reports run against. Cheap to clone.
#[derive(Clone)]
pub struct ReportEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    settings: ReportSettings,
    cache: CacheManager,
    pdf: Arc<dyn PdfRenderer>,
    spreadsheet: Arc<dyn SpreadsheetRenderer>,
    fields: Arc<dyn EditableFieldStore>,
}

impl ReportEngine {
    pub fn builder() -> ReportEngineBuilder {
        ReportEngineBuilder::new()
    }

    /// Wrap `definition` in a fresh, unloaded report.
    pub fn report<R: ReportDefinition>(&self, definition: R) -> Report<R> {
        Report::new(definition, self.clone())
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.inner.settings
    }

    pub fn cache(&self) -> &CacheManager {
        &self.inner.cache
    }

    pub fn pdf_renderer(&self) -> &Arc<dyn PdfRenderer> {
        &self.inner.pdf
    }

    pub fn spreadsheet_renderer(&self) -> &Arc<dyn SpreadsheetRenderer> {
        &self.inner.spreadsheet
    }

    pub fn field_store(&self) -> &Arc<dyn EditableFieldStore> {
        &self.inner.fields
    }
}

impl std::fmt::Debug for ReportEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportEngine")
            .field("cache_backend", &self.inner.cache.backend_name())
            .field("default_ttl", &self.inner.settings.cache.default_ttl())
            .finish()
    }
}
