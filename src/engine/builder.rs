use super::{EngineInner, ReportEngine};
use crate::cache::{CacheBackend, CacheManager, Clock, MemoryCache, SystemClock};
use crate::config::ReportSettings;
use crate::fields::{EditableFieldStore, NoFieldStore};
use crate::render::{PdfRenderer, SpreadsheetRenderer, UnconfiguredRenderer};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_MEMORY_ENTRIES: usize = 1000;

/// Builder for creating engines with custom collaborators.
///
/// Defaults: settings from [`ReportSettings::default`], an in-memory cache with
/// native TTL, the system clock, no editable-field submissions, and renderers
/// that fail until configured.
pub struct ReportEngineBuilder {
    settings: ReportSettings,
    backend: Option<Arc<dyn CacheBackend>>,
    clock: Arc<dyn Clock>,
    pdf: Arc<dyn PdfRenderer>,
    spreadsheet: Arc<dyn SpreadsheetRenderer>,
    fields: Arc<dyn EditableFieldStore>,
}

impl ReportEngineBuilder {
    pub fn new() -> Self {
        Self {
            settings: ReportSettings::default(),
            backend: None,
            clock: Arc::new(SystemClock),
            pdf: Arc::new(UnconfiguredRenderer),
            spreadsheet: Arc::new(UnconfiguredRenderer),
            fields: Arc::new(NoFieldStore),
        }
    }

    pub fn settings(mut self, settings: ReportSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Clock used for `expires_at` bookkeeping on stores without native TTL.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn pdf_renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.pdf = renderer;
        self
    }

    pub fn spreadsheet_renderer(mut self, renderer: Arc<dyn SpreadsheetRenderer>) -> Self {
        self.spreadsheet = renderer;
        self
    }

    pub fn field_store(mut self, store: Arc<dyn EditableFieldStore>) -> Self {
        self.fields = store;
        self
    }

    pub fn build(self) -> ReportEngine {
        let backend = self.backend.unwrap_or_else(|| {
            Arc::new(MemoryCache::new(DEFAULT_MEMORY_ENTRIES)) as Arc<dyn CacheBackend>
        });
        debug!(
            backend = backend.name(),
            native_ttl = backend.native_ttl(),
            default_ttl_secs = self.settings.cache.default_ttl_secs,
            "building report engine"
        );
        let cache = CacheManager::with_clock(self.settings.cache.clone(), backend, self.clock);
        ReportEngine {
            inner: Arc::new(EngineInner {
                settings: self.settings,
                cache,
                pdf: self.pdf,
                spreadsheet: self.spreadsheet,
                fields: self.fields,
            }),
        }
    }
}

impl Default for ReportEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
